//! Runtime dispatch from a collection name to the typed core clients.
//!
//! Request bodies arrive as JSON text and are decoded into the resource's
//! input type before building, so a malformed payload is rejected here
//! instead of reaching the server.

use serde_json::Value;
use uuid::Uuid;
use vet_core::resource::{
    Categories, Clients, Contracts, Feedings, Medicines, Sedes, Services, Specimens, Users, Vaccinations,
};
use vet_core::types::MoveSpecimen;
use vet_core::{ApiClient, ApiError, HttpRequest, HttpResponse, Resource, ResourceClient, ResourceKind, StatusResource};

use crate::types::FfiOperation;

/// Why a request could not be built.
#[derive(Debug)]
pub(crate) enum Rejected {
    Invalid(String),
    Api(ApiError),
}

impl From<ApiError> for Rejected {
    fn from(err: ApiError) -> Self {
        Rejected::Api(err)
    }
}

macro_rules! with_resource {
    ($kind:expr, $f:ident($($arg:expr),*)) => {
        match $kind {
            ResourceKind::Specimens => $f::<Specimens>($($arg),*),
            ResourceKind::Categories => $f::<Categories>($($arg),*),
            ResourceKind::Sedes => $f::<Sedes>($($arg),*),
            ResourceKind::Clients => $f::<Clients>($($arg),*),
            ResourceKind::Contracts => $f::<Contracts>($($arg),*),
            ResourceKind::Services => $f::<Services>($($arg),*),
            ResourceKind::Medicines => $f::<Medicines>($($arg),*),
            ResourceKind::Feedings => $f::<Feedings>($($arg),*),
            ResourceKind::Vaccinations => $f::<Vaccinations>($($arg),*),
            ResourceKind::Users => $f::<Users>($($arg),*),
        }
    };
}

pub(crate) fn build_request(
    api: &ApiClient,
    kind: ResourceKind,
    op: FfiOperation,
    id: Option<Uuid>,
    body: Option<&str>,
) -> Result<HttpRequest, Rejected> {
    with_resource!(kind, build(api, op, id, body))
}

pub(crate) fn parse_response(
    api: &ApiClient,
    kind: ResourceKind,
    op: FfiOperation,
    response: HttpResponse,
) -> Result<Option<Value>, ApiError> {
    with_resource!(kind, parse(api, op, response))
}

fn require_id(id: Option<Uuid>) -> Result<Uuid, Rejected> {
    id.ok_or_else(|| Rejected::Invalid("this operation needs an id".to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(body: Option<&str>) -> Result<T, Rejected> {
    let body = body.ok_or_else(|| Rejected::Invalid("this operation needs a body".to_string()))?;
    serde_json::from_str(body).map_err(|e| Rejected::Invalid(format!("invalid body: {e}")))
}

fn build<R: Resource>(
    api: &ApiClient,
    op: FfiOperation,
    id: Option<Uuid>,
    body: Option<&str>,
) -> Result<HttpRequest, Rejected> {
    let client = ResourceClient::<R>::new(api.clone());
    let request = match op {
        FfiOperation::List => client.build_list(),
        FfiOperation::Get => client.build_get(require_id(id)?),
        FfiOperation::Create => client.build_create(&decode::<R::Input>(body)?)?,
        FfiOperation::Update => client.build_update(require_id(id)?, &decode::<R::Input>(body)?)?,
        FfiOperation::Delete => client.build_delete(require_id(id)?),
        FfiOperation::SetStatus => match R::KIND {
            ResourceKind::Services => build_status::<Services>(api, require_id(id)?, body)?,
            ResourceKind::Medicines => build_status::<Medicines>(api, require_id(id)?, body)?,
            other => return Err(Rejected::Invalid(format!("{other} has no status action"))),
        },
        FfiOperation::Move if R::KIND.supports_move() => {
            let target: MoveSpecimen = decode(body)?;
            ResourceClient::<Specimens>::new(api.clone()).build_move(require_id(id)?, &target)?
        }
        FfiOperation::Move => return Err(Rejected::Invalid(format!("{} cannot be moved", R::KIND))),
    };
    Ok(request)
}

/// Body is `{"<field>": "<status>"}` with the field the collection uses.
fn build_status<R: StatusResource>(api: &ApiClient, id: Uuid, body: Option<&str>) -> Result<HttpRequest, Rejected> {
    let body: Value = decode(body)?;
    let field = R::KIND.status_action().map(|(_, field)| field).unwrap_or("status");
    let raw = body
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| Rejected::Invalid(format!("body needs a string \"{field}\"")))?;
    let status = raw
        .parse::<R::Status>()
        .map_err(|_| Rejected::Invalid(format!("unknown {field}: {raw}")))?;
    Ok(ResourceClient::<R>::new(api.clone()).build_set_status(id, status)?)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn parse<R: Resource>(api: &ApiClient, op: FfiOperation, response: HttpResponse) -> Result<Option<Value>, ApiError> {
    let client = ResourceClient::<R>::new(api.clone());
    match op {
        FfiOperation::List => to_json(&client.parse_list(response)?).map(Some),
        FfiOperation::Delete => client.parse_delete(response).map(|()| None),
        // Every other operation answers with the affected entity.
        _ => to_json(&client.parse_get(response)?).map(Some),
    }
}
