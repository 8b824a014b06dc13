#[tokio::main]
async fn main() -> anyhow::Result<()> {
    summer_host::run().await
}
