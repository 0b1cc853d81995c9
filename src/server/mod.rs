//! HTTP Server Module
//!
//! Wires the search handler, the landing page and static assets into one Axum
//! router, and owns process startup and shutdown.
//!
//! ## Routes
//! - `GET /`: embedded search page.
//! - `GET|POST /imgrep/search`: keyword search, JSON response.
//! - `GET /assets/*`: files from the configured assets directory.
//! - `GET /health`: liveness probe.

pub mod routes;
pub mod runtime;
