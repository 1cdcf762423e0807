#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    poem_reader::run().await
}
