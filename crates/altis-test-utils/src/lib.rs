//! Shared test utilities for the altis-installer workspace.
//!
//! Dev-dependency only, never published. Fixtures here only touch the
//! filesystem so they can be used from any crate's tests without pulling the
//! crate under test in twice.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for Composer project layouts

pub mod project;

pub use project::TestProject;
