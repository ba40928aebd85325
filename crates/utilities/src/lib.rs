//! Shared helpers
//!
//! Small, stateless helpers used by the CRD models and the provider:
//! - Dynamic-type wrappers with hand-written JSON schemas (`DynamicValue`,
//!   `IntOrString`, `Base64String`, `DateTimeString`)
//! - Naming helpers mapping CRD property names to attribute names
//! - Resource id generation

pub mod id;
pub mod naming;
pub mod values;

pub use id::generate_id;
pub use naming::{resource_type_name, to_snake_case};
pub use values::*;
