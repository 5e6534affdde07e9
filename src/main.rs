use actix_web::{App, HttpServer, web};
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info, warn};

use imv_prompts::config::{SERVICE_CONFIG_FILE, ServiceConfigManager};
use imv_prompts::handlers::{AppState, configure};
use imv_prompts::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "imv-prompts")]
#[command(about = "Voice profile section extraction and platform export service")]
struct Cli {
    /// Path to the service config file
    #[arg(short, long, default_value = SERVICE_CONFIG_FILE)]
    config: String,

    /// Bind host, overrides config and IMV_HOST
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides config and IMV_PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let config_manager = ServiceConfigManager::new(&cli.config);
    let (mut config, load_error) = match config_manager.load_config() {
        Ok(config) => (config, None),
        Err(e) => (Default::default(), Some(e)),
    };
    let override_error = config.apply_env_overrides().err();

    // CLI flags beat environment and file
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let _log_guard = init_logging(&config);

    if let Some(e) = load_error {
        warn!("Failed to load {}: {}. Using defaults", cli.config, e);
    }
    if let Some(e) = override_error {
        error!("{}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }

    let bind_address = config.bind_address();
    info!(
        "Starting server at http://{} (export style {:?}, cache capacity {})",
        bind_address, config.export_style, config.export_cache_capacity
    );

    let app_state = web::Data::new(AppState::new(config));

    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(configure))
        .bind(bind_address)?
        .run()
        .await
}
