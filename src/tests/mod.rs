//! Test suite for the page content model
//!
//! Tests are grouped by the part of the system they exercise: the block
//! model, the page store, the builder session, the renderer, and properties
//! that hold for any page. `integration` talks to a real HTTP server.

#[cfg(test)]
mod core_tests;
