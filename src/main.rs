//! campusd entry point
//!
//! This is a minimal entrypoint that:
//! 1. Hands control to the HTTP server module
//! 2. Prints errors to stderr
//! 3. Exits with non-zero on failure
//!
//! Configuration loading, pool construction and schema bootstrap all live
//! in `http_server::server::run`.

#[tokio::main]
async fn main() {
    if let Err(e) = campusd::http_server::server::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
