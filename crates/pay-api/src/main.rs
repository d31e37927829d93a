//! # Fest-Pay RS
//!
//! Registration payment relay for Instamojo hosted checkout.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export INSTAMOJO_API_KEY=...
//! export INSTAMOJO_AUTH_TOKEN=...
//!
//! # Run the server
//! fest-pay
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state; refuses to start without credentials
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment gateway: {}", state.gateway.provider_name());
    info!(
        "Cooldown: {}ms, gateway unavailable policy: {:?}",
        state.policy.cooldown_ms, state.policy.on_gateway_unavailable
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🚀 Fest-Pay starting on http://{}", addr);

    if !is_prod {
        info!("💳 Payment API: POST http://{}/api/create-payment", addr);
        info!("🎉 Success page: GET http://{}/payment-success", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  💳 Fest-Pay RS 💳
  ━━━━━━━━━━━━━━━━━━━━━━━
  Registration payment relay
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
