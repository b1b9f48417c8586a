/// Database connection and migration tests
pub mod db_tests;

/// CRUD operations tests for all models
pub mod crud_tests;
