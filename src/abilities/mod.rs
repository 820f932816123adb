//! Capability registry: named, schema-described, permission-gated operations.
//!
//! Layout:
//! - `permission.rs`: caller tiers and permission predicates
//! - `descriptor.rs`: the single descriptor per operation, shared by the
//!   abilities routes, the legacy routes and the bridge's tool list
//! - `registry.rs`: schema compilation and the `execute` contract

pub mod descriptor;
pub mod permission;
pub mod registry;

pub use descriptor::{
    ABILITIES, AbilityCategory, AbilityDescriptor, FORMS_CATEGORY, Operation, Surface,
    find_by_name, find_by_tool,
};
pub use permission::{CallerContext, Permission};
pub use registry::{AbilityRegistry, RegisteredAbility};
