use axum::{Router, routing::get};
use std::sync::Arc;

use crate::abilities::{ABILITIES, AbilityRegistry};
use crate::config::{ABILITIES_API_PREFIX, LEGACY_API_PREFIX};
use crate::handlers::{abilities, legacy, no_route};
use crate::middleware::auth::AdminCredentials;
use crate::service::forms_ops::FormsOps;

#[derive(Clone)]
pub struct FormsState {
    pub ops: FormsOps,
    pub registry: Arc<AbilityRegistry>,
    pub admin: Option<Arc<AdminCredentials>>,
    /// Mount the abilities routes; without them only the legacy routes answer.
    pub abilities_api: bool,
}

impl FormsState {
    pub fn new(
        ops: FormsOps,
        registry: AbilityRegistry,
        admin: Option<AdminCredentials>,
    ) -> Self {
        Self {
            ops,
            registry: Arc::new(registry),
            admin: admin.map(Arc::new),
            abilities_api: true,
        }
    }

    pub fn with_abilities_api(mut self, enabled: bool) -> Self {
        self.abilities_api = enabled;
        self
    }
}

pub fn forms_router(state: FormsState) -> Router {
    let mut router = Router::new();

    if state.abilities_api {
        router = router
            .route(
                &format!("{ABILITIES_API_PREFIX}/abilities"),
                get(abilities::list_abilities),
            )
            .route(
                &format!("{ABILITIES_API_PREFIX}/abilities/{{*rest}}"),
                get(abilities::describe_ability).post(abilities::run_ability),
            )
            .route(
                &format!("{ABILITIES_API_PREFIX}/categories"),
                get(abilities::list_categories),
            );
    }

    for descriptor in ABILITIES.iter() {
        router = router.route(
            &format!("{LEGACY_API_PREFIX}/{}", descriptor.route),
            legacy::legacy_route(descriptor),
        );
    }

    router
        .fallback(no_route)
        .method_not_allowed_fallback(no_route)
        .with_state(state)
}
