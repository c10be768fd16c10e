//! The `api` module is the client side of the hospital REST API.
//!
//! The API itself is an external service; this module only knows its calling
//! convention: one base URL, a bearer credential, and the
//! `{ data, message? }` response envelope with `{ message }` on failure.

pub mod client;
pub mod credentials;

pub use client::{ApiClient, ApiEnvelope};
pub use credentials::{CookieCredentials, CredentialProvider, StaticCredentials};
