//! Single-request HTTP transport
//!
//! One authenticated call per invocation, no caching, no retries. Transport
//! failures are wrapped once into [`crate::Error::ApiRequest`] and surfaced
//! to the caller; the response envelope is resolved into a [`Payload`] at
//! this boundary so downstream code never re-checks the `data` shape.

mod client;
mod envelope;

pub use client::{ApiClient, ApiClientConfig, DEFAULT_BASE_URL};
pub use envelope::{ApiEnvelope, PageInfo, Payload};

#[cfg(test)]
mod tests;
