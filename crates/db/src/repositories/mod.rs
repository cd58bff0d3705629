//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run
//! inside a caller-owned transaction take `&mut PgConnection` instead.

pub mod limit_repo;
pub mod request_repo;
pub mod scope_repo;

pub use limit_repo::LimitRepo;
pub use request_repo::RequestRepo;
pub use scope_repo::ScopeRepo;
