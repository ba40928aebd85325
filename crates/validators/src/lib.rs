//! Attribute validators
//!
//! Stateless checks attached to schema attributes. Every validator accepts a
//! `serde_json::Value` and ignores values of a type it does not apply to;
//! type checking is done by the schema before validators run.

pub mod base64;
pub mod datetime;
pub mod error;
pub mod labels;
pub mod name;
pub mod validator;

pub use error::ValidationError;
pub use validator::Validator;
