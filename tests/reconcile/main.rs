//! Integration tests for reconciliation
//!
//! Tests applying desired-state tables to collections: creation, updates,
//! removal, atomicity on failure, and the logs each outcome leaves.

mod atomicity;
mod logging;
mod properties;
mod scenarios;
