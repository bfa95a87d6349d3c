//! Integration tests for sitecheck-api
//!
//! Uses wiremock to simulate the SiteCheck backend and verifies end-to-end
//! behavior of the ApiClient, the endpoint modules, and the provider ports
//! driven through the core stores and coordinator.

mod common;

mod test_assignment_flow;
mod test_folders;
mod test_photos;
