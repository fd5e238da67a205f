use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use awc::Client;
use env_logger::Env;
use murmur::config::GatewayConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();

    let config = GatewayConfig::from_env();
    if config.api_key.is_none() {
        log::warn!("UPSTREAM_API_KEY is not set; proxied requests will fail until it is.");
    }
    let bind_addr = config.bind_addr.clone();
    log::info!("gateway listening on {}", bind_addr);

    HttpServer::new(move || {
        // The widget embeds on arbitrary third-party origins, so the
        // proxy surface must answer cross-origin preflights.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(Data::new(config.clone()))
            // One client per worker; awc is not Send.
            .app_data(Data::new(Client::default()))
            .wrap(cors)
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(murmur::web::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}

/// Initialize third party crates we rely on but don't have control over.
fn init_lib_mods() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
