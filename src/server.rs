use crate::config::Config;
use crate::engine::assembler::{self, LiveMatch, MatchOdds};
use crate::engine::tracker::ChangeTracker;
use crate::feed::{self, betsapi::BetsApi, the_odds_api::TheOddsApi, LiveFeed, OddsFeed};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Set on every `/api/*` response: `ok`, or `failed` when the upstream fetch
/// failed and the empty body is not "no events".
pub const FETCH_STATUS_HEADER: &str = "x-odds-fetch";

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub odds: Arc<dyn OddsFeed>,
    pub live: Arc<dyn LiveFeed>,
    pub tracker: Arc<ChangeTracker>,
}

impl AppState {
    pub fn new(
        config: Config,
        odds: Arc<dyn OddsFeed>,
        live: Arc<dyn LiveFeed>,
        tracker: Arc<ChangeTracker>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            odds,
            live,
            tracker,
        }
    }

    /// Build the real upstream feeds with credentials from the environment.
    pub fn from_env(config: Config) -> Result<Self> {
        let api_key = Config::odds_api_key();
        if api_key.is_none() {
            tracing::warn!("ODDS_API_KEY not set, /api/football and /api/cricket will serve []");
        }
        let token = Config::betsapi_token();
        if token.is_none() {
            tracing::warn!("BETSAPI_TOKEN not set, /api/live will serve []");
        }

        let odds = TheOddsApi::new(api_key, &config.odds_feed)?;
        let live = BetsApi::new(token, &config.live_feed)?;

        Ok(Self::new(
            config,
            Arc::new(odds),
            Arc::new(live),
            Arc::new(ChangeTracker::new()),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/football", get(football))
        .route("/api/cricket", get(cricket))
        .route("/api/live", get(live))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {:#}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(st): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "tracked_keys": st.tracker.len(),
        "ts": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn football(State(st): State<AppState>) -> impl IntoResponse {
    let cfg = &st.config.odds_feed;
    prematch(&st, &cfg.football_sport, cfg.football_limit).await
}

async fn cricket(State(st): State<AppState>) -> impl IntoResponse {
    let cfg = &st.config.odds_feed;
    prematch(&st, &cfg.cricket_sport, cfg.cricket_limit).await
}

fn with_fetch_status<T>(failed: bool, rows: T) -> ([(&'static str, &'static str); 1], Json<T>) {
    let status = if failed { "failed" } else { "ok" };
    ([(FETCH_STATUS_HEADER, status)], Json(rows))
}

async fn prematch(
    st: &AppState,
    sport: &str,
    limit: usize,
) -> ([(&'static str, &'static str); 1], Json<Vec<MatchOdds>>) {
    let outcome = feed::fetch_odds(st.odds.as_ref(), sport, limit).await;
    let failed = outcome.is_failed();
    let rows = assembler::annotate_prematch(outcome.into_vec(), &st.tracker);
    tracing::debug!(sport, count = rows.len(), failed, "served pre-match odds");
    with_fetch_status(failed, rows)
}

async fn live(State(st): State<AppState>) -> impl IntoResponse {
    let outcome = feed::fetch_live(st.live.as_ref(), st.config.live_feed.event_limit).await;
    let failed = outcome.is_failed();
    let rows: Vec<LiveMatch> = assembler::annotate_live(outcome.into_vec(), &st.tracker);
    tracing::debug!(count = rows.len(), failed, "served in-play odds");
    with_fetch_status(failed, rows)
}
