use axum::{Json, extract::State, routing::MethodRouter, routing::post};
use serde_json::Value;
use tracing::info;

use crate::abilities::{AbilityDescriptor, CallerContext, Surface};
use crate::middleware::json_body::LenientJson;
use crate::{error::FormsError, router::FormsState};

/// Run a descriptor's operation behind the same permission predicate and
/// input schema the registry applies.
pub async fn run_legacy(
    state: &FormsState,
    descriptor: &'static AbilityDescriptor,
    caller: CallerContext,
    body: Value,
) -> Result<Json<Value>, FormsError> {
    if !descriptor.permission.allows(caller) {
        return Err(FormsError::PermissionDenied {
            ability: descriptor.name.to_string(),
            caller,
        });
    }

    state.registry.validate(descriptor.name, &body)?;

    info!(route = descriptor.route, ?caller, "legacy route requested");
    let output = descriptor
        .operation
        .execute(&state.ops, &body, Surface::Legacy)
        .await?;
    Ok(Json(output))
}

/// `POST` handler bound to one descriptor.
pub fn legacy_route(descriptor: &'static AbilityDescriptor) -> MethodRouter<FormsState> {
    post(
        move |State(state): State<FormsState>, caller: CallerContext, LenientJson(body): LenientJson| async move {
            run_legacy(&state, descriptor, caller, body).await
        },
    )
}
