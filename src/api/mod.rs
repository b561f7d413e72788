//! Portal API gateway.
//!
//! Typed operations over the remote records service. `ApiClient` is the
//! HTTP implementation; controllers depend on the `PortalApi` trait so
//! tests can substitute `MockApi`.

pub mod client;
pub mod error;
pub mod mock;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use mock::MockApi;
pub use types::{ApiEnvelope, AuthSession, NewTreatment, PortalApi, SignupRequest};
