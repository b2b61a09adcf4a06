#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let result = trellis::cli::run().await;

    use std::io::{self, Write};
    let _ = io::stdout().flush();

    result
}
