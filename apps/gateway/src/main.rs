use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use gateway::config::GatewayConfig;
use gateway::directory::HttpUserDirectory;
use gateway::middleware::cors::cors_middleware;
use gateway::middleware::request_trace::RequestTrace;
use gateway::routes;
use gateway::state::app_state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let security = config.security();

    let directory = match HttpUserDirectory::new(&config.users_service_url, security.clone()) {
        Ok(directory) => directory,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let http = match reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to build downstream HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(
        security,
        Arc::new(directory),
        config.downstream_graphql_url.clone(),
        http,
    );

    println!(
        "🚀 Starting gateway on http://{}:{}",
        config.host, config.port
    );

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
