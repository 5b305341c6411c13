use serde::Serialize;

/// Move above this magnitude (percent) is an alert.
const ALERT_THRESHOLD: f64 = 15.0;
/// Move above this magnitude (percent) is worth watching.
const WATCH_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    Watch,
    Alert,
}

/// Map a percent change to a status tier. Sign is ignored.
pub fn classify(change_pct: f64) -> Status {
    let magnitude = change_pct.abs();
    if magnitude > ALERT_THRESHOLD {
        Status::Alert
    } else if magnitude > WATCH_THRESHOLD {
        Status::Watch
    } else {
        Status::Normal
    }
}
