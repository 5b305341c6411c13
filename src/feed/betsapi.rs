use super::types::*;
use super::LiveFeed;
use crate::config::LiveFeedConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use std::time::Duration;

/// In-play odds from a BetsAPI-style provider. The token travels as a
/// query parameter on every request.
pub struct BetsApi {
    client: Client,
    token: Option<String>,
    base_url: String,
    sport_id: u32,
}

impl BetsApi {
    pub fn new(token: Option<String>, config: &LiveFeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build BetsAPI client")?;

        Ok(Self {
            client,
            token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sport_id: config.sport_id,
        })
    }

    async fn get_body(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("BetsAPI request to {} failed", path))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("BetsAPI {} ({}): {}", path, status, body);
        }

        resp.text()
            .await
            .with_context(|| format!("failed to read BetsAPI {} response", path))
    }

    async fn inplay_events(&self, token: &str) -> Result<Vec<InplayEvent>> {
        let sport_id = self.sport_id.to_string();
        let body = self
            .get_body(
                "/v1/events/inplay",
                &[("token", token), ("sport_id", sport_id.as_str())],
            )
            .await?;
        parse_inplay_response(&body)
    }

    async fn event_odds(&self, token: &str, event_id: &str) -> Result<EventOdds> {
        let body = self
            .get_body("/v1/event/odds", &[("token", token), ("event_id", event_id)])
            .await?;
        parse_event_odds_response(&body)
    }
}

fn unwrap_envelope<T>(resp: BetsApiResponse<T>, what: &str) -> Result<T> {
    if resp.success != 1 {
        anyhow::bail!("BetsAPI {} returned success={}", what, resp.success);
    }
    resp.results
        .with_context(|| format!("BetsAPI {} response has no results", what))
}

pub fn parse_inplay_response(body: &str) -> Result<Vec<InplayEvent>> {
    let resp: BetsApiResponse<Vec<InplayEvent>> =
        serde_json::from_str(body).context("failed to parse BetsAPI in-play response")?;
    unwrap_envelope(resp, "in-play")
}

pub fn parse_event_odds_response(body: &str) -> Result<EventOdds> {
    let resp: BetsApiResponse<EventOdds> =
        serde_json::from_str(body).context("failed to parse BetsAPI event odds response")?;
    unwrap_envelope(resp, "event odds")
}

/// Keep the first `limit` events that are actually in play, in upstream order.
pub fn select_live(events: Vec<InplayEvent>, limit: usize) -> Vec<InplayEvent> {
    events.into_iter().filter(InplayEvent::is_live).take(limit).collect()
}

/// Flatten an odds lookup into quotes: exchange runners first, then bookmakers.
/// Returns `None` when the event carries no bookmaker data at all.
pub fn build_live_event(event: &InplayEvent, odds: EventOdds) -> Option<LiveEventOdds> {
    let mut quotes: Vec<LiveQuote> = odds
        .betfair
        .into_iter()
        .map(|r| LiveQuote::Betfair {
            team: r.team,
            back: r.back,
            lay: r.lay,
        })
        .collect();
    quotes.extend(odds.bookmaker.into_iter().map(|b| LiveQuote::Bookmaker {
        team: b.team,
        odds: b.odds,
    }));

    if quotes.is_empty() {
        return None;
    }

    Some(LiveEventOdds {
        event_id: event.id.clone(),
        match_label: event.match_label(),
        quotes,
    })
}

#[async_trait]
impl LiveFeed for BetsApi {
    async fn fetch_live(&self, limit: usize) -> Result<Vec<LiveEventOdds>> {
        let token = self.token.as_deref().context("BETSAPI_TOKEN is not set")?;

        let events = select_live(self.inplay_events(token).await?, limit);
        let lookups = join_all(events.iter().map(|e| self.event_odds(token, &e.id))).await;

        let mut out = Vec::with_capacity(events.len());
        for (event, odds) in events.iter().zip(lookups) {
            match odds {
                Ok(odds) => match build_live_event(event, odds) {
                    Some(live) => out.push(live),
                    None => {
                        tracing::debug!(event_id = event.id.as_str(), "skipping in-play event: no bookmaker data");
                    }
                },
                Err(e) => {
                    tracing::warn!(event_id = event.id.as_str(), error = %e, "skipping in-play event: odds lookup failed");
                }
            }
        }

        Ok(out)
    }
}
