use color_eyre::eyre::{Result, WrapErr};
use framesrv::echo::EchoSession;
use framesrv::http::{DefaultHandler, HttpSession};
use framesrv::stream::{StreamConfig, StreamServer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("framesrv=info")
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Default to the echo protocol if none is specified
    let protocol = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "echo".to_string());
    let port = args
        .get(2)
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let config = StreamConfig {
        bind_addr: format!("127.0.0.1:{}", port).parse().unwrap(),
        ..StreamConfig::default()
    };

    match protocol.as_str() {
        "echo" => {
            info!(address = %config.bind_addr, max_connections = config.max_connections, "starting echo server");
            let server = StreamServer::new(config, EchoSession);
            server.run().await.wrap_err("failed to run echo server")?;
        }
        "http" => {
            info!(address = %config.bind_addr, max_connections = config.max_connections, "starting http server");
            let server = StreamServer::new(config, HttpSession::new(DefaultHandler));
            server.run().await.wrap_err("failed to run http server")?;
        }
        _ => {
            eprintln!("Usage: {} [echo|http] [port]", args[0]);
            eprintln!("  echo|http: protocol to serve (default: echo)");
            eprintln!("  port:      port to bind on 127.0.0.1 (default: 8080)");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  {} echo 8080   # newline-delimited echo server", args[0]);
            eprintln!("  {} http 8080   # HTTP/1.1 subset server", args[0]);
            std::process::exit(1);
        }
    }

    Ok(())
}
