use std::net::Ipv4Addr;

use rocket::*;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigError, Settings};
use crate::database::{ConnectionManager, MongoConnector};

mod config;
mod cors;
mod database;

#[derive(Debug, Error)]
enum LaunchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("server failed: {0}")]
    Rocket(#[from] Box<rocket::Error>),
}

#[rocket::main]
async fn main() -> Result<(), LaunchError> {
    init_tracing();

    let settings = Settings::from_env()?;
    let figment = Config::figment()
        .merge(("address", Ipv4Addr::UNSPECIFIED))
        .merge(("port", settings.port));

    // The database is only contacted once the first request needs it
    let connection = ConnectionManager::new(MongoConnector::new(settings.mongo_uri));

    app(custom(figment), connection)
        .attach(fairing::AdHoc::on_liftoff("Startup message", |rocket| {
            Box::pin(async move {
                tracing::info!(port = rocket.config().port, "server running");
            })
        }))
        .launch()
        .await
        .map_err(Box::new)?;

    Ok(())
}

fn init_tracing() {
    // Also picks up rocket's own `log` records.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Mounts the score routes on `rocket`, backed by `connection`.
pub fn app(rocket: Rocket<Build>, connection: ConnectionManager) -> Rocket<Build> {
    rocket
        .attach(cors::Cors)
        .mount(
            "/",
            routes![database::requests::add_score, database::requests::get_ranking],
        )
        .register("/", catchers![database::requests::default_catcher])
        .manage(connection)
}
