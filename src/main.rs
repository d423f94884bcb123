//! Phalanx UCI Chess Engine

use phalanx::uci::UCI;

fn main() {
    // stdout carries the protocol; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Phalanx v{} - UCI Chess Engine", env!("CARGO_PKG_VERSION"));
    println!("Type 'uci' to start UCI mode, 'd' to display board, 'quit' to exit");

    let mut uci = UCI::new();
    uci.run();
}
