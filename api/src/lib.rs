//! HTTP surface of the assessment platform.
//!
//! Staff endpoints expect a bearer token minted by [`auth::generate_jwt`];
//! student endpoints identify the student by login code instead.

pub mod auth;
pub mod response;
pub mod routes;
pub mod state;
