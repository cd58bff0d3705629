//! HTTP handlers, grouped by resource.

pub mod limits;
pub mod org;
pub mod requests;
