//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Centralizes signup, login and token handling business logic under the
//! service crate. Admin login reuses the same machinery with the admin
//! claim set.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
