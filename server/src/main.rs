use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8081")]
    listen: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Attack tables, Zobrist keys, the opening book, and the shared
    // transposition table are built once, before the first request.
    rookery_engine::init();

    let app = rookery_server::api::router();
    let listener = TcpListener::bind(&args.listen)
        .await
        .expect("failed to bind listen address");
    info!("chess engine listening on {}", args.listen);
    axum::serve(listener, app).await.expect("server error");
}
