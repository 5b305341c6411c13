use super::classifier::{classify, Status};
use super::tracker::{ChangeTracker, Direction};
use crate::feed::types::{LiveEventOdds, LiveQuote, OddsRecord, Source};
use serde::Serialize;

/// One row of `/api/football` and `/api/cricket`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOdds {
    #[serde(rename = "match")]
    pub match_label: String,
    pub odds: f64,
    pub change: f64,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiveMarket {
    Betfair {
        team: String,
        back: f64,
        lay: f64,
        back_dir: Direction,
        lay_dir: Direction,
        source: Source,
    },
    Bookmaker {
        team: String,
        odds: f64,
        source: Source,
    },
}

/// One row of `/api/live`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveMatch {
    #[serde(rename = "match")]
    pub match_label: String,
    pub markets: Vec<LiveMarket>,
}

/// Tracker key for one side of an exchange runner: `{event_id}_{team}_{side}`.
pub fn live_key(event_id: &str, team: &str, side: &str) -> String {
    format!("{}_{}_{}", event_id, team, side)
}

/// Annotate pre-match records with change and status, keyed by match label.
pub fn annotate_prematch(records: Vec<OddsRecord>, tracker: &ChangeTracker) -> Vec<MatchOdds> {
    records
        .into_iter()
        .map(|r| {
            let change = tracker.percent_change(&r.match_label, r.price);
            MatchOdds {
                match_label: r.match_label,
                odds: r.price,
                change,
                status: classify(change),
            }
        })
        .collect()
}

/// Annotate in-play events. Exchange quotes get back/lay directions;
/// bookmaker quotes pass through unchanged.
pub fn annotate_live(events: Vec<LiveEventOdds>, tracker: &ChangeTracker) -> Vec<LiveMatch> {
    events
        .into_iter()
        .map(|event| {
            let markets = event
                .quotes
                .into_iter()
                .map(|quote| match quote {
                    LiveQuote::Betfair { team, back, lay } => {
                        let back_dir = tracker.direction(&live_key(&event.event_id, &team, "back"), back);
                        let lay_dir = tracker.direction(&live_key(&event.event_id, &team, "lay"), lay);
                        LiveMarket::Betfair {
                            team,
                            back,
                            lay,
                            back_dir,
                            lay_dir,
                            source: Source::Betfair,
                        }
                    }
                    LiveQuote::Bookmaker { team, odds } => LiveMarket::Bookmaker {
                        team,
                        odds,
                        source: Source::Bookmaker,
                    },
                })
                .collect();

            LiveMatch {
                match_label: event.match_label,
                markets,
            }
        })
        .collect()
}
