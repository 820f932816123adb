use serde::Serialize;

/// Capability tier of whoever is invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerContext {
    Public,
    Administrative,
}

/// Permission predicate attached to every operation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Anyone, authenticated or not.
    Public,
    /// Callers holding the administrative capability.
    Administrative,
}

impl Permission {
    pub fn allows(&self, caller: CallerContext) -> bool {
        match self {
            Permission::Public => true,
            Permission::Administrative => caller == CallerContext::Administrative,
        }
    }
}
