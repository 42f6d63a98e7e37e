//! HTTP layer of the OTP verification backend.
//!
//! Parses requests, calls the OTP service and serializes every outcome into
//! the `{success, message, data?, error?}` envelope.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
