#[tokio::main]
async fn main() {
    soulpath_backend::run().await;
}
