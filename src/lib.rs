pub mod api; // Portal API gateway (typed operations over HTTP)
pub mod attachments; // File → data-URL conversion for new treatments
pub mod auth; // Role selection → credentials → OTP state machine
pub mod bootstrap; // Startup session restoration
pub mod config;
pub mod export; // Treatment record PDF export
pub mod models;
pub mod session_store; // Durable bearer-token storage
pub mod workspace; // Session-scoped roster / profile state

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host application.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
/// Call once at startup, before any controller is constructed.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("MediPort client core v{}", config::APP_VERSION);
}
