//! Endpoint tests against a real PostgreSQL database.
//!
//! Runs against the PostgreSQL instance at `TEST_DATABASE_URL`; the harness
//! creates and migrates the database on first use.

mod common;
mod plan_tests;
mod problem_tests;
