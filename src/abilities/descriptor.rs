use serde::Serialize;
use serde_json::{Value, json};
use std::sync::LazyLock;

use super::permission::Permission;
use crate::error::FormsError;
use crate::service::forms_ops::{FormsListing, FormsOps};
use crate::types::forms::{CountSubmissionsInput, GetSubmissionInput, SubmitFormInput};

/// Which registration adapter is invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Abilities,
    Legacy,
}

/// The business operation a descriptor is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SubmitForm,
    GetSubmission,
    CountForms,
    CountSubmissions,
}

impl Operation {
    /// Run against `ops` with a loosely typed payload. Business failures come
    /// back inside the value as `success: false`; only store failures of the
    /// count operations surface as `Err`.
    pub async fn execute(
        self,
        ops: &FormsOps,
        input: &Value,
        surface: Surface,
    ) -> Result<Value, FormsError> {
        let output = match self {
            Operation::SubmitForm => {
                serde_json::to_value(ops.submit_form(SubmitFormInput::from_payload(input)).await)?
            }
            Operation::GetSubmission => serde_json::to_value(
                ops.get_submission(GetSubmissionInput::from_payload(input))
                    .await,
            )?,
            Operation::CountForms => {
                let listing = match surface {
                    Surface::Abilities => FormsListing::WithForms,
                    Surface::Legacy => FormsListing::CountOnly,
                };
                serde_json::to_value(ops.count_forms(listing).await?)?
            }
            Operation::CountSubmissions => serde_json::to_value(
                ops.count_submissions(CountSubmissionsInput::from_payload(input))
                    .await?,
            )?,
        };
        Ok(output)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AbilityCategory {
    pub slug: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const FORMS_CATEGORY: AbilityCategory = AbilityCategory {
    slug: "wcnpl-forms",
    label: "Forms",
    description: "Abilities related to form submissions and management.",
};

/// One operation, described once and registered by both the abilities
/// registry and the legacy routes.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityDescriptor {
    /// `wcnpl-abilities-demo/<route>`
    pub name: &'static str,
    /// Path segment of the legacy route.
    #[serde(skip)]
    pub route: &'static str,
    /// Tool name advertised by the bridge.
    #[serde(skip)]
    pub tool_name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub input_schema: Value,
    pub output_schema: Value,
    pub permission: Permission,
    #[serde(skip)]
    pub operation: Operation,
}

fn submit_form() -> AbilityDescriptor {
    AbilityDescriptor {
        name: "wcnpl-abilities-demo/submit-form",
        route: "submit-form",
        tool_name: "wcnpl_submit_form",
        label: "Submit Form",
        description: "Submit a new form entry with name, email, and message.",
        category: FORMS_CATEGORY.slug,
        input_schema: json!({
            "type": "object",
            "properties": {
                "form_id": {
                    "type": "integer",
                    "description": "The ID of the form to submit to.",
                    "minimum": 1
                },
                "name": {
                    "type": "string",
                    "description": "Name of the person submitting the form.",
                    "minLength": 1,
                    "maxLength": 255
                },
                "email": {
                    "type": "string",
                    "description": "Email address of the person submitting the form.",
                    "format": "email",
                    "maxLength": 255
                },
                "message": {
                    "type": "string",
                    "description": "The message content.",
                    "minLength": 1
                }
            },
            "required": ["form_id", "name", "email", "message"]
        }),
        output_schema: json!({
            "type": "object",
            "properties": {
                "success": {
                    "type": "boolean",
                    "description": "Whether the submission was successful."
                },
                "submission_id": {
                    "type": "integer",
                    "description": "The ID of the created submission."
                },
                "message": {
                    "type": "string",
                    "description": "A message describing the result."
                }
            }
        }),
        permission: Permission::Public,
        operation: Operation::SubmitForm,
    }
}

fn get_submission() -> AbilityDescriptor {
    AbilityDescriptor {
        name: "wcnpl-abilities-demo/get-submission",
        route: "get-submission",
        tool_name: "wcnpl_get_submission",
        label: "Get Submission Details",
        description: "Retrieve details of a specific form submission.",
        category: FORMS_CATEGORY.slug,
        input_schema: json!({
            "type": "object",
            "properties": {
                "submission_id": {
                    "type": "integer",
                    "description": "The ID of the submission to retrieve.",
                    "minimum": 1
                }
            },
            "required": ["submission_id"]
        }),
        output_schema: json!({
            "type": "object",
            "properties": {
                "success": {
                    "type": "boolean",
                    "description": "Whether the request was successful."
                },
                "submission": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "form_id": { "type": "integer" },
                        "name": { "type": "string" },
                        "email": { "type": "string" },
                        "message": { "type": "string" },
                        "submitted_at": { "type": "string" }
                    }
                },
                "message": {
                    "type": "string",
                    "description": "A message describing the result."
                }
            }
        }),
        permission: Permission::Administrative,
        operation: Operation::GetSubmission,
    }
}

fn count_forms() -> AbilityDescriptor {
    AbilityDescriptor {
        name: "wcnpl-abilities-demo/count-forms",
        route: "count-forms",
        tool_name: "wcnpl_count_forms",
        label: "Count Forms",
        description: "Get the total number of forms in the system.",
        category: FORMS_CATEGORY.slug,
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
        output_schema: json!({
            "type": "object",
            "properties": {
                "count": {
                    "type": "integer",
                    "description": "Total number of forms."
                },
                "forms": {
                    "type": "array",
                    "description": "All forms, ordered by ID.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "description": { "type": ["string", "null"] },
                            "created_at": { "type": "string" },
                            "updated_at": { "type": "string" }
                        }
                    }
                }
            }
        }),
        permission: Permission::Administrative,
        operation: Operation::CountForms,
    }
}

fn count_submissions() -> AbilityDescriptor {
    AbilityDescriptor {
        name: "wcnpl-abilities-demo/count-submissions",
        route: "count-submissions",
        tool_name: "wcnpl_count_submissions",
        label: "Count Submissions",
        description: "Get the total number of form submissions, optionally filtered by form ID.",
        category: FORMS_CATEGORY.slug,
        input_schema: json!({
            "type": "object",
            "properties": {
                "form_id": {
                    "type": "integer",
                    "description": "Optional form ID to filter submissions.",
                    "minimum": 1
                }
            }
        }),
        output_schema: json!({
            "type": "object",
            "properties": {
                "count": {
                    "type": "integer",
                    "description": "Total number of submissions."
                },
                "form_id": {
                    "type": "integer",
                    "description": "The form ID used for filtering (if provided)."
                }
            }
        }),
        permission: Permission::Administrative,
        operation: Operation::CountSubmissions,
    }
}

/// Every operation the service exposes, in registration order.
pub static ABILITIES: LazyLock<Vec<AbilityDescriptor>> =
    LazyLock::new(|| vec![submit_form(), get_submission(), count_forms(), count_submissions()]);

pub fn find_by_name(name: &str) -> Option<&'static AbilityDescriptor> {
    ABILITIES.iter().find(|d| d.name == name)
}

pub fn find_by_tool(tool_name: &str) -> Option<&'static AbilityDescriptor> {
    ABILITIES.iter().find(|d| d.tool_name == tool_name)
}
