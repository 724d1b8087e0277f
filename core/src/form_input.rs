//! Conversions between raw form values and typed API payloads.

use crate::error::FieldErrors;
use crate::form::{Fields, FormInput, ToForm};
use crate::schemas;
use crate::types::{
    ActiveStatus, CareStatus, Category, CategoryInput, ChangePassword, Client, ClientInput, Contract,
    ContractInput, ContractStatus, Feeding, FeedingInput, ForgotPassword, LoginRequest, Medicine,
    MedicineInput, ResetPassword, Sede, SedeInput, Service, ServiceInput, Specimen, SpecimenInput, User,
    UserInput, Vaccination, VaccinationInput,
};
use crate::validation::{FormSchema, FormValues};

fn opt_id(id: Option<uuid::Uuid>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

impl FormInput for SpecimenInput {
    fn schema() -> &'static FormSchema {
        &schemas::SPECIMEN
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(SpecimenInput {
            name: f.text("name"),
            breed: f.text("breed"),
            color: f.text("color"),
            birth_date: f.parse("birthDate")?,
            estado: f.parse_or("estado", ActiveStatus::Active)?,
            category_id: f.parse("categoryId")?,
            sede_id: f.parse("sedeId")?,
            client_id: f.parse_opt("clientId")?,
        })
    }
}

impl ToForm for Specimen {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.as_str())
            .with("breed", self.breed.as_str())
            .with("color", self.color.as_str())
            .with("birthDate", self.birth_date.to_string())
            .with("estado", self.estado.as_str())
            .with("categoryId", opt_id(self.category_id))
            .with("sedeId", opt_id(self.sede_id))
            .with("clientId", opt_id(self.client_id))
    }
}

impl FormInput for CategoryInput {
    fn schema() -> &'static FormSchema {
        &schemas::CATEGORY
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(CategoryInput {
            name: f.text("name"),
            estado: f.parse_or("estado", ActiveStatus::Active)?,
        })
    }
}

impl ToForm for Category {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.as_str())
            .with("estado", self.estado.as_str())
    }
}

impl FormInput for SedeInput {
    fn schema() -> &'static FormSchema {
        &schemas::SEDE
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(SedeInput {
            nombre_sede: f.text("NombreSede"),
        })
    }
}

impl ToForm for Sede {
    fn to_form(&self) -> FormValues {
        FormValues::new().with("NombreSede", self.nombre_sede.as_str())
    }
}

impl FormInput for ClientInput {
    fn schema() -> &'static FormSchema {
        &schemas::CLIENT
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(ClientInput {
            nombre: f.text("nombre"),
            documento: f.text("documento"),
            email: f.text("email"),
            celular: f.optional("celular"),
        })
    }
}

impl ToForm for Client {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("nombre", self.nombre.as_str())
            .with("documento", self.documento.as_str())
            .with("email", self.email.as_str())
            .with("celular", self.celular.clone().unwrap_or_default())
    }
}

impl FormInput for ContractInput {
    fn schema() -> &'static FormSchema {
        &schemas::CONTRACT
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(ContractInput {
            client_id: f.parse("clientId")?,
            specimen_id: f.parse("specimenId")?,
            fecha_inicio: f.parse("fechaInicio")?,
            precio_mensual: f.parse("precioMensual")?,
            estado: f.parse_or("estado", ContractStatus::Active)?,
            service_ids: f.ids("serviceIds")?,
        })
    }
}

impl ToForm for Contract {
    fn to_form(&self) -> FormValues {
        let services: Vec<String> = self.service_ids.iter().map(|id| id.to_string()).collect();
        FormValues::new()
            .with("clientId", self.client_id.to_string())
            .with("specimenId", self.specimen_id.to_string())
            .with("fechaInicio", self.fecha_inicio.to_string())
            .with("precioMensual", self.precio_mensual.to_string())
            .with("estado", self.estado.as_str())
            .with("serviceIds", services.join(","))
    }
}

impl FormInput for ServiceInput {
    fn schema() -> &'static FormSchema {
        &schemas::SERVICE
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(ServiceInput {
            nombre: f.text("nombre"),
            descripcion: f.text("descripcion"),
            imagen: f.optional("imagen"),
            status: f.parse_or("status", ActiveStatus::Active)?,
        })
    }
}

impl ToForm for Service {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("nombre", self.nombre.as_str())
            .with("descripcion", self.descripcion.as_str())
            .with("imagen", self.imagen.clone().unwrap_or_default())
            .with("status", self.status.as_str())
    }
}

impl FormInput for MedicineInput {
    fn schema() -> &'static FormSchema {
        &schemas::MEDICINE
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(MedicineInput {
            specimen_id: f.parse("specimenId")?,
            name: f.text("name"),
            dose: f.text("dose"),
            time: f.text("time"),
            estado: f.parse_or("estado", CareStatus::Scheduled)?,
        })
    }
}

impl ToForm for Medicine {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("specimenId", self.specimen_id.to_string())
            .with("name", self.name.as_str())
            .with("dose", self.dose.as_str())
            .with("time", self.time.as_str())
            .with("estado", self.estado.as_str())
    }
}

impl FormInput for FeedingInput {
    fn schema() -> &'static FormSchema {
        &schemas::FEEDING
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(FeedingInput {
            specimen_id: f.parse("specimenId")?,
            name: f.text("name"),
            quantity: f.text("quantity"),
            time: f.text("time"),
            estado: f.parse_or("estado", CareStatus::Scheduled)?,
        })
    }
}

impl ToForm for Feeding {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("specimenId", self.specimen_id.to_string())
            .with("name", self.name.as_str())
            .with("quantity", self.quantity.as_str())
            .with("time", self.time.as_str())
            .with("estado", self.estado.as_str())
    }
}

impl FormInput for VaccinationInput {
    fn schema() -> &'static FormSchema {
        &schemas::VACCINATION
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(VaccinationInput {
            specimen_id: f.parse("specimenId")?,
            name: f.text("name"),
            dose: f.text("dose"),
            date: f.parse("date")?,
            estado: f.parse_or("estado", CareStatus::Scheduled)?,
        })
    }
}

impl ToForm for Vaccination {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("specimenId", self.specimen_id.to_string())
            .with("name", self.name.as_str())
            .with("dose", self.dose.as_str())
            .with("date", self.date.to_string())
            .with("estado", self.estado.as_str())
    }
}

impl FormInput for UserInput {
    fn schema() -> &'static FormSchema {
        &schemas::USER
    }

    fn create_schema() -> &'static FormSchema {
        &schemas::USER_CREATE
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(UserInput {
            username: f.text("username"),
            email: f.text("email"),
            nombre_completo: f.text("nombreCompleto"),
            role: f.parse("role")?,
            celular: f.optional("celular"),
            documento: f.optional("documento"),
            password: f.optional("password"),
        })
    }
}

impl ToForm for User {
    fn to_form(&self) -> FormValues {
        FormValues::new()
            .with("username", self.username.as_str())
            .with("email", self.email.as_str())
            .with("nombreCompleto", self.nombre_completo.as_str())
            .with("role", self.role.as_str())
            .with("celular", self.celular.clone().unwrap_or_default())
            .with("documento", self.documento.clone().unwrap_or_default())
    }
}

impl FormInput for LoginRequest {
    fn schema() -> &'static FormSchema {
        &schemas::LOGIN
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(LoginRequest {
            username: f.text("username"),
            // Passwords are sent verbatim.
            password: values.get("password").to_string(),
        })
    }
}

impl FormInput for ChangePassword {
    fn schema() -> &'static FormSchema {
        &schemas::CHANGE_PASSWORD
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        Fields::validated(Self::schema(), values)?;
        Ok(ChangePassword {
            current_password: values.get("currentPassword").to_string(),
            new_password: values.get("newPassword").to_string(),
        })
    }
}

impl FormInput for ForgotPassword {
    fn schema() -> &'static FormSchema {
        &schemas::FORGOT_PASSWORD
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        let f = Fields::validated(Self::schema(), values)?;
        Ok(ForgotPassword { email: f.text("email") })
    }
}

impl FormInput for ResetPassword {
    fn schema() -> &'static FormSchema {
        &schemas::RESET_PASSWORD
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors> {
        Fields::validated(Self::schema(), values)?;
        Ok(ResetPassword {
            password: values.get("password").to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    const CATEGORY_ID: &str = "6f1c7c6e-7bd4-4a45-a8a4-2b1f0d4f1a11";
    const SEDE_ID: &str = "0b8d0a43-5a5e-4d86-9d1c-0b0c2c5e8f22";

    #[test]
    fn specimen_input_from_form() {
        let values = FormValues::new()
            .with("name", "  Luna ")
            .with("breed", "Beagle")
            .with("color", "Tricolor")
            .with("birthDate", "2020-03-14")
            .with("categoryId", CATEGORY_ID)
            .with("sedeId", SEDE_ID);
        let input = SpecimenInput::from_form(&values).unwrap();
        assert_eq!(input.name, "Luna");
        assert_eq!(input.birth_date, NaiveDate::from_ymd_opt(2020, 3, 14).unwrap());
        assert_eq!(input.estado, ActiveStatus::Active);
        assert_eq!(input.category_id, Uuid::parse_str(CATEGORY_ID).unwrap());
        assert!(input.client_id.is_none());
    }

    #[test]
    fn invalid_form_reports_field_errors() {
        let values = FormValues::new().with("name", "L");
        let errors = SpecimenInput::from_form(&values).unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("birthDate"));
    }

    #[test]
    fn contract_form_round_trips_service_ids() {
        let contract = Contract {
            id: Uuid::nil(),
            client_id: Uuid::from_u128(1),
            specimen_id: Uuid::from_u128(2),
            fecha_inicio: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            precio_mensual: 350000.0,
            estado: ContractStatus::Active,
            service_ids: vec![Uuid::from_u128(3), Uuid::from_u128(4)],
            client_name: None,
            specimen_name: None,
        };
        let input = ContractInput::from_form(&contract.to_form()).unwrap();
        assert_eq!(input.service_ids, contract.service_ids);
        assert_eq!(input.precio_mensual, 350000.0);
    }

    #[test]
    fn bad_service_id_is_a_field_error() {
        let values = FormValues::new()
            .with("clientId", Uuid::from_u128(1).to_string())
            .with("specimenId", Uuid::from_u128(2).to_string())
            .with("fechaInicio", "2024-01-01")
            .with("precioMensual", "10")
            .with("serviceIds", "not-an-id");
        let errors = ContractInput::from_form(&values).unwrap_err();
        assert!(errors.contains("serviceIds"));
    }

    #[test]
    fn login_keeps_password_whitespace() {
        let values = FormValues::new().with("username", "admin").with("password", " pass ");
        let login = LoginRequest::from_form(&values).unwrap();
        assert_eq!(login.password, " pass ");
    }
}
