//! Rule tables for every form in the admin client.

use crate::validation::{FieldSpec, FormSchema, Rule};

const STATUS_VALUES: &[&str] = &["active", "inactive"];
const CONTRACT_STATUS_VALUES: &[&str] = &["active", "finalized", "cancelled"];
const CARE_STATUS_VALUES: &[&str] = &["scheduled", "administered", "cancelled"];
const ROLE_VALUES: &[&str] = &["admin", "employee"];

pub static SPECIMEN: FormSchema = FormSchema {
    name: "specimen",
    fields: &[
        FieldSpec { name: "name", label: "Name", rules: &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(50)] },
        FieldSpec { name: "breed", label: "Breed", rules: &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(50)] },
        FieldSpec { name: "color", label: "Color", rules: &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(30)] },
        FieldSpec { name: "birthDate", label: "Birth date", rules: &[Rule::Required, Rule::PastDate] },
        FieldSpec { name: "estado", label: "Status", rules: &[Rule::OneOf(STATUS_VALUES)] },
        FieldSpec { name: "categoryId", label: "Category", rules: &[Rule::Required, Rule::Id] },
        FieldSpec { name: "sedeId", label: "Sede", rules: &[Rule::Required, Rule::Id] },
        FieldSpec { name: "clientId", label: "Client", rules: &[Rule::Id] },
    ],
};

pub static CATEGORY: FormSchema = FormSchema {
    name: "category",
    fields: &[
        FieldSpec { name: "name", label: "Name", rules: &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(50)] },
        FieldSpec { name: "estado", label: "Status", rules: &[Rule::OneOf(STATUS_VALUES)] },
    ],
};

pub static SEDE: FormSchema = FormSchema {
    name: "sede",
    fields: &[FieldSpec {
        name: "NombreSede",
        label: "Sede name",
        rules: &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(60)],
    }],
};

pub static CLIENT: FormSchema = FormSchema {
    name: "client",
    fields: &[
        FieldSpec { name: "nombre", label: "Name", rules: &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(80)] },
        FieldSpec { name: "documento", label: "Document", rules: &[Rule::Required, Rule::Document] },
        FieldSpec { name: "email", label: "Email", rules: &[Rule::Required, Rule::Email] },
        FieldSpec { name: "celular", label: "Phone", rules: &[Rule::Phone] },
    ],
};

pub static CONTRACT: FormSchema = FormSchema {
    name: "contract",
    fields: &[
        FieldSpec { name: "clientId", label: "Client", rules: &[Rule::Required, Rule::Id] },
        FieldSpec { name: "specimenId", label: "Specimen", rules: &[Rule::Required, Rule::Id] },
        FieldSpec { name: "fechaInicio", label: "Start date", rules: &[Rule::Required, Rule::Date] },
        FieldSpec {
            name: "precioMensual",
            label: "Monthly price",
            rules: &[Rule::Required, Rule::Range { min: 0.0, max: 100_000_000.0 }],
        },
        FieldSpec { name: "estado", label: "Status", rules: &[Rule::OneOf(CONTRACT_STATUS_VALUES)] },
    ],
};

pub static SERVICE: FormSchema = FormSchema {
    name: "service",
    fields: &[
        FieldSpec { name: "nombre", label: "Name", rules: &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(60)] },
        FieldSpec {
            name: "descripcion",
            label: "Description",
            rules: &[Rule::Required, Rule::MinLen(10), Rule::MaxLen(500)],
        },
        FieldSpec { name: "imagen", label: "Image", rules: &[Rule::Url] },
        FieldSpec { name: "status", label: "Status", rules: &[Rule::OneOf(STATUS_VALUES)] },
    ],
};

pub static MEDICINE: FormSchema = FormSchema {
    name: "medicine",
    fields: &[
        FieldSpec { name: "specimenId", label: "Specimen", rules: &[Rule::Required, Rule::Id] },
        FieldSpec { name: "name", label: "Medicine", rules: &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(60)] },
        FieldSpec { name: "dose", label: "Dose", rules: &[Rule::Required, Rule::MaxLen(40)] },
        FieldSpec { name: "time", label: "Time", rules: &[Rule::Required, Rule::Time] },
        FieldSpec { name: "estado", label: "Status", rules: &[Rule::OneOf(CARE_STATUS_VALUES)] },
    ],
};

pub static FEEDING: FormSchema = FormSchema {
    name: "feeding",
    fields: &[
        FieldSpec { name: "specimenId", label: "Specimen", rules: &[Rule::Required, Rule::Id] },
        FieldSpec { name: "name", label: "Food", rules: &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(60)] },
        FieldSpec { name: "quantity", label: "Quantity", rules: &[Rule::Required, Rule::MaxLen(40)] },
        FieldSpec { name: "time", label: "Time", rules: &[Rule::Required, Rule::Time] },
        FieldSpec { name: "estado", label: "Status", rules: &[Rule::OneOf(CARE_STATUS_VALUES)] },
    ],
};

pub static VACCINATION: FormSchema = FormSchema {
    name: "vaccination",
    fields: &[
        FieldSpec { name: "specimenId", label: "Specimen", rules: &[Rule::Required, Rule::Id] },
        FieldSpec { name: "name", label: "Vaccine", rules: &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(60)] },
        FieldSpec { name: "dose", label: "Dose", rules: &[Rule::Required, Rule::MaxLen(40)] },
        FieldSpec { name: "date", label: "Date", rules: &[Rule::Required, Rule::Date] },
        FieldSpec { name: "estado", label: "Status", rules: &[Rule::OneOf(CARE_STATUS_VALUES)] },
    ],
};

const USER_USERNAME: FieldSpec =
    FieldSpec { name: "username", label: "Username", rules: &[Rule::Required, Rule::MinLen(4), Rule::MaxLen(30)] };
const USER_EMAIL: FieldSpec = FieldSpec { name: "email", label: "Email", rules: &[Rule::Required, Rule::Email] };
const USER_FULL_NAME: FieldSpec = FieldSpec {
    name: "nombreCompleto",
    label: "Full name",
    rules: &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(80)],
};
const USER_ROLE: FieldSpec = FieldSpec { name: "role", label: "Role", rules: &[Rule::Required, Rule::OneOf(ROLE_VALUES)] };
const USER_PHONE: FieldSpec = FieldSpec { name: "celular", label: "Phone", rules: &[Rule::Phone] };
const USER_DOCUMENT: FieldSpec = FieldSpec { name: "documento", label: "Document", rules: &[Rule::Document] };

/// Editing an account: the password is only changed when one is entered.
pub static USER: FormSchema = FormSchema {
    name: "user",
    fields: &[
        USER_USERNAME,
        USER_EMAIL,
        USER_FULL_NAME,
        USER_ROLE,
        USER_PHONE,
        USER_DOCUMENT,
        FieldSpec { name: "password", label: "Password", rules: &[Rule::MinLen(8)] },
        FieldSpec {
            name: "confirmPassword",
            label: "Password confirmation",
            rules: &[Rule::RequiredWith("password"), Rule::Matches("password")],
        },
    ],
};

/// Creating an account, which always needs a password.
pub static USER_CREATE: FormSchema = FormSchema {
    name: "user-create",
    fields: &[
        USER_USERNAME,
        USER_EMAIL,
        USER_FULL_NAME,
        USER_ROLE,
        USER_PHONE,
        USER_DOCUMENT,
        FieldSpec { name: "password", label: "Password", rules: &[Rule::Required, Rule::MinLen(8)] },
        FieldSpec {
            name: "confirmPassword",
            label: "Password confirmation",
            rules: &[Rule::Required, Rule::Matches("password")],
        },
    ],
};

pub static LOGIN: FormSchema = FormSchema {
    name: "login",
    fields: &[
        FieldSpec { name: "username", label: "Username", rules: &[Rule::Required] },
        FieldSpec { name: "password", label: "Password", rules: &[Rule::Required] },
    ],
};

pub static CHANGE_PASSWORD: FormSchema = FormSchema {
    name: "change-password",
    fields: &[
        FieldSpec { name: "currentPassword", label: "Current password", rules: &[Rule::Required] },
        FieldSpec { name: "newPassword", label: "New password", rules: &[Rule::Required, Rule::MinLen(8)] },
        FieldSpec {
            name: "confirmPassword",
            label: "Password confirmation",
            rules: &[Rule::Required, Rule::Matches("newPassword")],
        },
    ],
};

pub static FORGOT_PASSWORD: FormSchema = FormSchema {
    name: "forgot-password",
    fields: &[FieldSpec { name: "email", label: "Email", rules: &[Rule::Required, Rule::Email] }],
};

pub static RESET_PASSWORD: FormSchema = FormSchema {
    name: "reset-password",
    fields: &[
        FieldSpec { name: "password", label: "Password", rules: &[Rule::Required, Rule::MinLen(8)] },
        FieldSpec {
            name: "confirmPassword",
            label: "Password confirmation",
            rules: &[Rule::Required, Rule::Matches("password")],
        },
    ],
};

pub static MOVE_SPECIMEN: FormSchema = FormSchema {
    name: "move-specimen",
    fields: &[
        FieldSpec { name: "categoryId", label: "Category", rules: &[Rule::Id] },
        FieldSpec { name: "sedeId", label: "Sede", rules: &[Rule::Id] },
    ],
};

static ALL: &[&FormSchema] = &[
    &SPECIMEN,
    &CATEGORY,
    &SEDE,
    &CLIENT,
    &CONTRACT,
    &SERVICE,
    &MEDICINE,
    &FEEDING,
    &VACCINATION,
    &USER,
    &USER_CREATE,
    &LOGIN,
    &CHANGE_PASSWORD,
    &FORGOT_PASSWORD,
    &RESET_PASSWORD,
    &MOVE_SPECIMEN,
];

/// Look a schema up by its `name`.
pub fn by_name(name: &str) -> Option<&'static FormSchema> {
    ALL.iter().copied().find(|s| s.name == name)
}
