#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jtyping_server::run().await
}
