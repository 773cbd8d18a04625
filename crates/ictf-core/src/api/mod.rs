//! Host-facing façade.
//!
//! Thin wrappers the plugin host (or the `ictf` binary) calls into. They
//! translate requests into workflow calls and errors into diagnostics.
//!
//! No orchestration or business logic should live here.

pub mod function;
pub mod provider;
pub mod resource;

pub use crate::dto::{Diagnostic, Diagnostics, Severity};
pub use function::FunctionDefinition;
pub use provider::{Provider, ProviderMetadata};
pub use resource::{AttributeKind, AttributeSchema, CanisterResource, ResourceSchema};
