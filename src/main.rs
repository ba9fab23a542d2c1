#[tokio::main]
async fn main() -> anyhow::Result<()> {
    signbridge::run().await?;
    Ok(())
}
