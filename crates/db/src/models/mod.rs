//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - The DTOs the repositories accept for inserts and filtering

pub mod limit;
pub mod request;
