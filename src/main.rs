use anyhow::Result;
use sitesmith::{cli, logger};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logger::init() {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }

    cli::main().await
}
