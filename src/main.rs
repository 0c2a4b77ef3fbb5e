#[tokio::main]
async fn main() -> anyhow::Result<()> {
    detector_ia_lib::run().await
}
