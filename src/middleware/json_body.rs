use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

/// Request body as a JSON object. Missing, malformed or non-object bodies
/// all become `{}` rather than a rejection.
#[derive(Debug, Clone)]
pub struct LenientJson(pub Value);

impl LenientJson {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value @ Value::Object(_)) => Self(value),
            _ => Self(Value::Object(Map::new())),
        }
    }

    /// Capability callers may wrap the payload as `{"input": {...}}`.
    pub fn into_ability_input(self) -> Value {
        match self.0 {
            Value::Object(mut map) if map.len() == 1 && map.contains_key("input") => {
                match map.remove("input") {
                    Some(input @ Value::Object(_)) => input,
                    _ => Value::Object(Map::new()),
                }
            }
            other => other,
        }
    }
}

impl<S> FromRequest<S> for LenientJson
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self::from_bytes(&bytes))
    }
}
