use anyhow::Result;
use contribgrid::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
