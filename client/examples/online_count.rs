//! Polls the online counter on the caller's own timer.

use anyhow::Result;
use stellarsis_client::{ClientConfig, RECOMMENDED_POLL_INTERVAL, RemoteForumClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stellarsis_client=info".into()),
        )
        .init();

    let client = RemoteForumClient::new(ClientConfig::from_env()?)?;
    let mut ticker = tokio::time::interval(RECOMMENDED_POLL_INTERVAL);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                println!("Online: {}", client.online_count().await);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
