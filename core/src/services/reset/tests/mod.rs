//! Unit tests for the password-reset engine

mod service_tests;
