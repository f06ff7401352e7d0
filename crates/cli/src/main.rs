use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tripo-relay")]
#[command(about = "Relay server converting 2D images to 3D models via Tripo3D", long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory for downloaded model files
    #[arg(short, long, default_value = "downloads")]
    downloads: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    server::banner::print_banner();

    let cli = Cli::parse();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let config = server::Config::from_env(cli.downloads);

    server::run_server(addr, config).await
}
