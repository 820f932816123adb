use jsonschema::JSONSchema;
use jsonschema::error::{ValidationError, ValidationErrorKind};
use serde_json::Value;
use tracing::{debug, info};

use super::descriptor::{ABILITIES, AbilityDescriptor, Surface};
use super::permission::CallerContext;
use crate::error::FormsError;
use crate::service::forms_ops::FormsOps;

/// A descriptor paired with its compiled input schema.
pub struct RegisteredAbility {
    pub descriptor: &'static AbilityDescriptor,
    validator: JSONSchema,
}

impl RegisteredAbility {
    fn compile(descriptor: &'static AbilityDescriptor) -> Result<Self, FormsError> {
        // `format` stays advisory: email syntax is judged by the operation
        // itself so both invocation paths report it the same way.
        let validator = JSONSchema::options()
            .should_validate_formats(false)
            .compile(&descriptor.input_schema)
            .map_err(|e| FormsError::InvalidSchema {
                ability: descriptor.name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            descriptor,
            validator,
        })
    }

    pub fn validate(&self, input: &Value) -> Result<(), FormsError> {
        if let Err(errors) = self.validator.validate(input) {
            let reason = errors
                .map(|e| violation(&e))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FormsError::InvalidInput {
                ability: self.descriptor.name.to_string(),
                reason,
            });
        }
        Ok(())
    }
}

/// `<instance path>: <keyword>`, never the offending value itself.
fn violation(e: &ValidationError<'_>) -> String {
    let schema_path = e.schema_path.to_string();
    let keyword = schema_path.rsplit('/').next().unwrap_or_default();
    let path = match &e.kind {
        ValidationErrorKind::Required { property } => {
            format!("/{}", property.as_str().unwrap_or_default())
        }
        _ => e.instance_path.to_string(),
    };
    if path.is_empty() {
        format!("/: {keyword}")
    } else {
        format!("{path}: {keyword}")
    }
}

/// Primary invocation path: operations looked up by ability name.
pub struct AbilityRegistry {
    abilities: Vec<RegisteredAbility>,
}

impl AbilityRegistry {
    /// Register every descriptor in [`ABILITIES`].
    pub fn new() -> Result<Self, FormsError> {
        let abilities = ABILITIES
            .iter()
            .map(RegisteredAbility::compile)
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = abilities.len(), "abilities registered");
        Ok(Self { abilities })
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredAbility> {
        self.abilities.iter().find(|a| a.descriptor.name == name)
    }

    /// Check `input` against the named ability's input schema.
    pub fn validate(&self, name: &str, input: &Value) -> Result<(), FormsError> {
        self.get(name)
            .ok_or_else(|| FormsError::AbilityNotFound(name.to_string()))?
            .validate(input)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static AbilityDescriptor> + '_ {
        self.abilities.iter().map(|a| a.descriptor)
    }

    /// Unknown name, denied permission and schema violations are caller
    /// errors and the operation never runs; otherwise the operation's result
    /// is returned as is.
    pub async fn execute(
        &self,
        ops: &FormsOps,
        name: &str,
        caller: CallerContext,
        input: Value,
    ) -> Result<Value, FormsError> {
        let ability = self
            .get(name)
            .ok_or_else(|| FormsError::AbilityNotFound(name.to_string()))?;

        if !ability.descriptor.permission.allows(caller) {
            debug!(ability = name, ?caller, "ability denied");
            return Err(FormsError::PermissionDenied {
                ability: name.to_string(),
                caller,
            });
        }

        ability.validate(&input)?;
        debug!(ability = name, ?caller, "running ability");
        ability
            .descriptor
            .operation
            .execute(ops, &input, Surface::Abilities)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason(name: &str, input: Value) -> String {
        let registry = AbilityRegistry::new().unwrap();
        match registry.validate(name, &input) {
            Err(FormsError::InvalidInput { reason, .. }) => reason,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn violations_name_path_and_keyword_only() {
        let long_name = "x".repeat(1000);
        let reason = reason(
            "wcnpl-abilities-demo/submit-form",
            json!({"form_id": 1, "name": long_name, "email": "a@example.com", "message": "m"}),
        );
        assert_eq!(reason, "/name: maxLength");
    }

    #[test]
    fn missing_properties_are_reported_by_name() {
        let reason = reason(
            "wcnpl-abilities-demo/submit-form",
            json!({"form_id": 1, "email": "a@example.com"}),
        );
        assert!(reason.contains("/name: required"), "{reason}");
        assert!(reason.contains("/message: required"), "{reason}");
        assert!(!reason.contains("a@example.com"), "{reason}");
    }

    #[test]
    fn unknown_ability_cannot_be_validated() {
        let registry = AbilityRegistry::new().unwrap();
        assert!(matches!(
            registry.validate("wcnpl-abilities-demo/nope", &json!({})),
            Err(FormsError::AbilityNotFound(_))
        ));
    }
}
