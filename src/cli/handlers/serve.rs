//! API server handlers

use crate::AppConfig;
use crate::Result;

/// Apply command-line overrides and run the server until it exits
pub async fn handle_serve_api(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    no_cors: bool,
) -> Result<()> {
    use crate::api::serve_api;

    let mut config = config.clone();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if no_cors {
        config.server.enable_cors = false;
    }

    println!("🚀 Starting Course Recommendation Server");
    println!("========================================\n");
    println!("📍 Host: {}", config.server.host);
    println!("🔌 Port: {}", config.server.port);
    println!(
        "🌐 CORS: {}",
        if config.server.enable_cors {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!(
        "🔀 Proxy: {}",
        if config.proxy.enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!();

    serve_api(&config).await
}
