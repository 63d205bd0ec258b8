#[tokio::main]
async fn main() {
    if let Err(e) = wordbook_lib::run().await {
        eprintln!("wordbook: {}", e);
        std::process::exit(1);
    }
}
