use anyhow::Result;
use clap::Parser;
use img2vid_proxy::app::App;
use img2vid_proxy::models::Config;
use img2vid_proxy::server;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "img2vid-proxy")]
#[command(about = "Proxy image-to-video generation requests to Runway")]
struct CliArgs {
    /// Port to listen on (overrides PORT).
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "img2vid_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting img2vid-proxy");

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let port = args.port.unwrap_or(config.port);

    let app = Arc::new(App::new(&config));
    if let Err(e) = server::serve(app, port).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn test_port_override() {
        let args = CliArgs::try_parse_from(["img2vid-proxy", "--port", "8080"]).unwrap();
        assert_eq!(args.port, Some(8080));
    }

    #[test]
    fn test_port_defaults_to_config() {
        let args = CliArgs::try_parse_from(["img2vid-proxy"]).unwrap();
        assert_eq!(args.port, None);
    }
}
