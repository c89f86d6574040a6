#[tokio::main]
async fn main() {
    contact_book::start_server().await;
}
