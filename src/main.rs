mod app;
mod auth;
mod config;
mod db;
mod error;
mod logging;
mod state;
mod thesis;
mod users;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::setup_logging(logging::LogFormat::from_env());

    let state = state::AppState::init().await?;
    tracing::info!(
        restrict_to_institution = state.config.roles.restrict_to_institution,
        domain = %state.config.roles.domain,
        "role policy loaded"
    );

    app::serve(app::build_app(state)).await
}
