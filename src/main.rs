use crate::config::AppConfig;
use crate::router::respond;
use crate::state::AppState;
use astra::Server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod errors;
mod extraction;
mod handlers;
mod images;
mod openai;
mod requests;
mod responses;
mod router;
mod state;


fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_query_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1️⃣ Load configuration from .env and the environment
    if let Some(path) = config::load_dotenv() {
        info!("Loaded {}", path.display());
    }
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };
    let addr = match config.bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("❌ {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Build the shared clients, prompt and schema once
    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Startup failed: {e}");
            std::process::exit(1);
        }
    };
    info!(
        model = %config.chat_model,
        upstream = %config.openai_base_url,
        "loaded"
    );

    // 3️⃣ Start the server
    info!("Starting server at http://{addr}");
    let server = Server::bind(&addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| respond(req, &state));

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
