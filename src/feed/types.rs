use serde::{Deserialize, Deserializer, Serialize};

/// Normalized internal types used by the engine (provider-agnostic).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Bookmaker,
    Betfair,
}

/// One pre-match price, as served by a bookmaker.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsRecord {
    pub match_label: String,
    pub team: Option<String>,
    pub price: f64, // decimal odds
    pub source: Source,
}

/// A single in-play quote for one team.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveQuote {
    Betfair { team: String, back: f64, lay: f64 },
    Bookmaker { team: String, odds: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveEventOdds {
    pub event_id: String,
    pub match_label: String,
    pub quotes: Vec<LiveQuote>,
}

/// the-odds-api.com v4 response: top-level array of events
#[derive(Debug, Deserialize)]
pub struct TheOddsApiEvent {
    #[serde(default)]
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<TheOddsApiBookmaker>,
}

#[derive(Debug, Deserialize)]
pub struct TheOddsApiBookmaker {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markets: Vec<TheOddsApiMarket>,
}

#[derive(Debug, Deserialize)]
pub struct TheOddsApiMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<TheOddsApiOutcome>,
}

#[derive(Debug, Deserialize)]
pub struct TheOddsApiOutcome {
    pub name: String,
    pub price: f64,
}

/// BetsAPI envelope: `{"success": 1, "results": ...}`
#[derive(Debug, Deserialize)]
pub struct BetsApiResponse<T> {
    #[serde(default)]
    pub success: i64,
    pub results: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct BetsApiTeam {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct InplayEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub home: BetsApiTeam,
    pub away: BetsApiTeam,
    #[serde(default)]
    pub in_play: Option<bool>,
    /// "1" while the event is in play.
    #[serde(default)]
    pub time_status: Option<String>,
}

impl InplayEvent {
    /// An explicit `in_play` flag wins over `time_status`.
    pub fn is_live(&self) -> bool {
        self.in_play
            .unwrap_or_else(|| self.time_status.as_deref() == Some("1"))
    }

    pub fn match_label(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }
}

/// Per-event odds lookup: exchange back/lay runners plus bookmaker prices.
#[derive(Debug, Default, Deserialize)]
pub struct EventOdds {
    #[serde(default)]
    pub betfair: Vec<BetfairRunner>,
    #[serde(default)]
    pub bookmaker: Vec<BookmakerPrice>,
}

#[derive(Debug, Deserialize)]
pub struct BetfairRunner {
    pub team: String,
    #[serde(deserialize_with = "price")]
    pub back: f64,
    #[serde(deserialize_with = "price")]
    pub lay: f64,
}

#[derive(Debug, Deserialize)]
pub struct BookmakerPrice {
    pub team: String,
    #[serde(deserialize_with = "price")]
    pub odds: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Num(f64),
    Text(String),
}

/// BetsAPI sends prices as either `1.85` or `"1.85"`.
fn price<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match RawScalar::deserialize(d)? {
        RawScalar::Num(n) => Ok(n),
        RawScalar::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match RawScalar::deserialize(d)? {
        RawScalar::Num(n) if n.fract() == 0.0 => Ok(format!("{}", n as i64)),
        RawScalar::Num(n) => Ok(n.to_string()),
        RawScalar::Text(s) => Ok(s),
    }
}
