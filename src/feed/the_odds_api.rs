use super::types::*;
use super::OddsFeed;
use crate::config::OddsFeedConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct TheOddsApi {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    regions: String,
    markets: String,
    odds_format: String,
}

impl TheOddsApi {
    pub fn new(api_key: Option<String>, config: &OddsFeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build the-odds-api client")?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            regions: config.regions.clone(),
            markets: config.markets.clone(),
            odds_format: config.odds_format.clone(),
        })
    }
}

/// Parse a v4 `/odds` body into at most `limit` records, in upstream order.
///
/// The price is the first outcome of the first market of the first bookmaker.
/// An event missing any part of that path fails the whole parse.
pub fn parse_odds_response(body: &str, limit: usize) -> Result<Vec<OddsRecord>> {
    let events: Vec<TheOddsApiEvent> =
        serde_json::from_str(body).context("failed to parse the-odds-api response")?;

    events
        .into_iter()
        .take(limit)
        .map(|event| {
            let outcome = event
                .bookmakers
                .first()
                .and_then(|bm| bm.markets.first())
                .and_then(|m| m.outcomes.first())
                .with_context(|| {
                    format!(
                        "event {} ({} vs {}) has no bookmaker price",
                        event.id, event.home_team, event.away_team
                    )
                })?;

            Ok(OddsRecord {
                match_label: format!("{} vs {}", event.home_team, event.away_team),
                team: Some(outcome.name.clone()),
                price: outcome.price,
                source: Source::Bookmaker,
            })
        })
        .collect()
}

#[async_trait]
impl OddsFeed for TheOddsApi {
    async fn fetch_odds(&self, sport: &str, limit: usize) -> Result<Vec<OddsRecord>> {
        let api_key = self
            .api_key
            .as_deref()
            .context("ODDS_API_KEY is not set")?;

        let url = format!("{}/v4/sports/{}/odds", self.base_url, sport);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", api_key),
                ("regions", self.regions.as_str()),
                ("markets", self.markets.as_str()),
                ("oddsFormat", self.odds_format.as_str()),
            ])
            .send()
            .await
            .context("the-odds-api request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("the-odds-api {} ({}): {}", sport, status, body);
        }

        let body = resp
            .text()
            .await
            .context("failed to read the-odds-api response")?;

        parse_odds_response(&body, limit)
    }
}
