//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod purge;
pub mod animals;
pub mod users;
pub mod messages;
pub mod newsletter;
pub mod media;
pub mod storage;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
