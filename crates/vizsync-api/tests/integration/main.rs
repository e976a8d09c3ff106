//! Integration tests for vizsync-api
//!
//! Uses wiremock to simulate the dashboard server and verifies end-to-end
//! behavior of the client, the port implementations and the core use cases
//! running on top of them.

mod common;

mod test_catalog;
mod test_destinations;
mod test_sync_jobs;
