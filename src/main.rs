//! Standalone runner: starts both provider mocks and serves until Ctrl-C.
//!
//! Useful for poking at the mocks manually; test suites embed
//! [`idp_mock::MockServer`] directly instead.

use anyhow::Result;
use idp_mock::provider::{self, ProviderOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "idp_mock=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut oauth2 = provider::oauth2(ProviderOptions::default())?;
    let mut openid = provider::openid(ProviderOptions::default())?;

    oauth2.start().await?;
    openid.start().await?;
    info!("mock providers running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;

    openid.stop().await;
    oauth2.stop().await;
    Ok(())
}
