mod app;
mod applications;
mod auth;
mod config;
mod cron;
mod db;
mod error;
mod extract;
mod mailer;
mod media;
mod messages;
mod projects;
mod skills;
mod state;
mod storage;
#[cfg(test)]
mod testing;
mod timelines;
mod validate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "folio=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;

    let keepalive = state
        .config
        .production
        .then(|| cron::spawn_keepalive(state.clone(), state.config.keepalive_minutes));

    let result = app::serve(app::build_app(state.clone())).await;

    if let Some(job) = keepalive {
        job.abort();
    }
    state.shutdown().await;
    result
}
