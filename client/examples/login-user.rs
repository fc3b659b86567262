use anyhow::Result;
use stellarsis_client::{ClientConfig, RemoteForumClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stellarsis_client=debug".into()),
        )
        .init();

    let username = std::env::var("STELLARSIS_USERNAME").expect("Set STELLARSIS_USERNAME environment variable");
    let password = std::env::var("STELLARSIS_PASSWORD").expect("Set STELLARSIS_PASSWORD environment variable");

    let mut client = RemoteForumClient::new(ClientConfig::from_env()?)?;

    let user = client.login(&username, &password).await?;
    println!("Logged in as: {}", user.display_name());

    for room in client.list_rooms().await? {
        println!("[room {}] {} - {}", room.id, room.name, room.description);
    }

    if let Some(room) = client.list_rooms().await?.first() {
        for msg in client.chat_history(room.id, 20).await? {
            println!(
                "[{}] {}: {}",
                msg.timestamp.format("%Y-%m-%d %H:%M:%S"),
                msg.author(),
                msg.content
            );
        }
    }

    for section in client.list_sections().await? {
        let threads = client.list_threads(section.id).await?;
        println!("{} ({} threads)", section.name, threads.len());
    }

    client.logout().await;
    println!("Logged out.");

    Ok(())
}
