use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use deckforge::auth::provider::IdentityClient;
use deckforge::auth::rate_limit::RateLimiter;
use deckforge::config::AppConfig;
use deckforge::deck::DeckSettings;
use deckforge::generation::GenerationClient;
use deckforge::graph::GraphHandle;
use deckforge::images::ImageFinder;
use deckforge::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    if !config.missing_vars.is_empty() {
        log::warn!("Missing environment variables: {}", config.missing_vars.join(", "));
    }

    // Initialize database
    let pool = db::init_pool(&config.database_url, config.database_max_connections)
        .await
        .expect("Failed to connect to database");
    db::run_migrations(&pool).await.expect("Failed to run migrations");

    let auth_mode = config.auth_mode();
    if auth_mode.is_bypass() {
        log::warn!("Development auth bypass is ACTIVE: anonymous requests reach protected routes");
    }

    let generation = web::Data::new(
        GenerationClient::new(&config.providers, config.http_timeout).expect("Failed to build HTTP client"),
    );
    let status = generation.status();
    log::info!("Text generation provider: {}", status.provider.as_str());

    let images = web::Data::new(
        ImageFinder::new(config.pexels_api_key.clone(), config.http_timeout).expect("Failed to build HTTP client"),
    );
    let identity = web::Data::new(
        IdentityClient::new(&config.identity_api_url, config.identity_secret_key.clone(), config.http_timeout)
            .expect("Failed to build HTTP client"),
    );
    let graph = web::Data::new(GraphHandle::new(config.neo4j.clone()));
    let limiter = web::Data::new(RateLimiter::default());
    let settings = web::Data::new(DeckSettings {
        outline_slide_count: config.outline_slide_count,
        max_generated_slides: config.max_generated_slides,
    });

    // Session encryption key, from SESSION_KEY for sessions that survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };
    let secure_cookies = !config.app_env.eq_ignore_ascii_case("development");

    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);
    let graph_for_shutdown = graph.clone();

    log::info!("Starting server at http://{}", bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(secure_cookies)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(auth_mode))
            .app_data(config.clone())
            .app_data(generation.clone())
            .app_data(images.clone())
            .app_data(identity.clone())
            .app_data(graph.clone())
            .app_data(limiter.clone())
            .app_data(settings.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    graph_for_shutdown.close().await;
    Ok(())
}
