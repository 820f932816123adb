//! Bridge from agent tool calls to the forms service.
//!
//! Each tool maps to one ability. A call goes to the capability endpoint
//! first; if that endpoint is missing on the target host the same input is
//! sent once to the legacy route. There are no other retries.

pub mod client;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::abilities::{ABILITIES, AbilityDescriptor, Permission, find_by_tool};
use crate::config::BridgeConfig;
use crate::error::BridgeError;

pub use client::{AbilitiesClient, basic_auth_header};

/// Substrings of an upstream error message that mean the capability
/// endpoint itself does not exist. Free-text matching: the upstream gives
/// no stable code for this.
pub const ROUTE_MISSING_MARKERS: [&str; 3] = ["No route was found", "rest_no_route", "/wp-abilities/"];

/// True when `err` says the capability route is absent, as opposed to the
/// ability failing. Connection-level failures never qualify.
pub fn is_route_missing(err: &BridgeError) -> bool {
    match err {
        BridgeError::Transport { message, .. } => ROUTE_MISSING_MARKERS
            .iter()
            .any(|marker| message.contains(marker)),
        _ => false,
    }
}

/// Tool as advertised to the agent. The output schema is not advertised.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDefinition {
    fn from_descriptor(descriptor: &AbilityDescriptor) -> Self {
        let tier = match descriptor.permission {
            Permission::Public => "public",
            Permission::Administrative => "admin",
        };
        let mut input_schema = descriptor.input_schema.clone();
        if let Some(obj) = input_schema.as_object_mut() {
            obj.insert("additionalProperties".to_string(), Value::Bool(false));
        }
        Self {
            name: descriptor.tool_name.to_string(),
            description: format!(
                "Run ability {} ({tier}): {}",
                descriptor.name, descriptor.description
            ),
            input_schema,
        }
    }
}

pub struct Bridge {
    client: AbilitiesClient,
}

impl Bridge {
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        Ok(Self {
            client: AbilitiesClient::new(config)?,
        })
    }

    pub fn tools(&self) -> Vec<ToolDefinition> {
        ABILITIES.iter().map(ToolDefinition::from_descriptor).collect()
    }

    /// Invoke a tool. Missing arguments are sent as `{}`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<Value, BridgeError> {
        let descriptor =
            find_by_tool(name).ok_or_else(|| BridgeError::UnknownTool(name.to_string()))?;
        let input = match arguments {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(args) => args,
        };

        match self.client.run_ability(descriptor.name, &input).await {
            Ok(result) => Ok(result),
            Err(err) if is_route_missing(&err) => {
                warn!(tool = name, error = %err, "abilities route missing, using fallback route");
                let result = self.client.run_fallback(descriptor, &input).await?;
                info!(tool = name, "fallback route succeeded");
                Ok(result)
            }
            Err(err) => Err(err),
        }
    }
}
