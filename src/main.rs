use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use taskboard::{routes, AppState, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    let bind_address = config.bind_address();

    let state = AppState::connect(config).await.map_err(|e| {
        log::error!("Failed to open the store: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    let state = web::Data::new(state);

    log::info!(
        "Starting server at http://{}:{}",
        bind_address.0,
        bind_address.1
    );
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(routes::cors(&state.config))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(bind_address)?
    .run()
    .await
}
