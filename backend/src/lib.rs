//! Todo backend library modules.
//!
//! The domain core lives in [`domain`]; [`outbound`] holds the PostgreSQL
//! and in-memory stores and [`inbound`] the HTTP adapter.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use settings::TodoSettings;
