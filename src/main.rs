use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use movie_browser::external::{CacheCleanupTask, GraphqlCatalogClient};
use movie_browser::services::FieldStore;
use movie_browser::shell::{self, HELP};
use movie_browser::{BrowserConfig, MovieBrowser};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = BrowserConfig::from_env()?;
    let client = GraphqlCatalogClient::new(&config)?;
    tracing::info!("Using catalog API at {}", client.endpoint());

    let store = FieldStore::shared();
    let mut browser = MovieBrowser::new(store, Arc::new(client), &config);

    // Start detail cache cleanup task
    let cleanup_task = CacheCleanupTask::new(
        browser.detail_cache().clone(),
        Duration::from_secs(5 * 60), // 每5分钟清理一次
    );
    tokio::spawn(cleanup_task.start());

    if let Err(e) = browser.load_bounds().await {
        tracing::error!("Catalog is unavailable: {}", e);
        return Err(e.into());
    }
    browser.run_pending().await;

    println!("{}", HELP);
    println!("{}", shell::status_line(&browser));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match shell::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match shell::execute(&mut browser, command).await {
            Some(output) => println!("{}", output),
            None => break,
        }
    }

    Ok(())
}
