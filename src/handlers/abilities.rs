use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;
use tracing::info;

use crate::abilities::{AbilityCategory, AbilityDescriptor, CallerContext, FORMS_CATEGORY};
use crate::middleware::json_body::LenientJson;
use crate::{error::FormsError, router::FormsState};

/// GET /wp-json/wp-abilities/v1/abilities
pub async fn list_abilities(
    State(state): State<FormsState>,
) -> Json<Vec<&'static AbilityDescriptor>> {
    Json(state.registry.descriptors().collect())
}

/// GET /wp-json/wp-abilities/v1/categories
pub async fn list_categories() -> Json<Vec<AbilityCategory>> {
    Json(vec![FORMS_CATEGORY])
}

/// GET /wp-json/wp-abilities/v1/abilities/{name}
pub async fn describe_ability(
    State(state): State<FormsState>,
    Path(name): Path<String>,
) -> Result<Json<&'static AbilityDescriptor>, FormsError> {
    state
        .registry
        .get(&name)
        .map(|a| Json(a.descriptor))
        .ok_or(FormsError::AbilityNotFound(name))
}

/// POST /wp-json/wp-abilities/v1/abilities/{name}/run
///
/// Ability names contain a `/`, so the whole remainder of the path is
/// captured and the `/run` suffix split off here.
pub async fn run_ability(
    State(state): State<FormsState>,
    caller: CallerContext,
    Path(rest): Path<String>,
    body: LenientJson,
) -> Result<Json<Value>, FormsError> {
    let Some(name) = rest.strip_suffix("/run") else {
        return Err(FormsError::NoRoute);
    };

    info!(ability = name, ?caller, "ability run requested");
    let output = state
        .registry
        .execute(&state.ops, name, caller, body.into_ability_input())
        .await?;
    Ok(Json(output))
}
