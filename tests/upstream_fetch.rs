// Integration tests for the upstream feeds against local fake providers

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use odds_watch::config::{LiveFeedConfig, OddsFeedConfig};
    use odds_watch::feed::betsapi::BetsApi;
    use odds_watch::feed::the_odds_api::TheOddsApi;
    use odds_watch::feed::types::LiveQuote;
    use odds_watch::feed::{fetch_live, fetch_odds, FetchOutcome};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn epl_events(n: usize) -> Value {
        let events: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "id": format!("ev{}", i),
                    "sport_key": "soccer_epl",
                    "home_team": format!("Home{}", i),
                    "away_team": format!("Away{}", i),
                    "bookmakers": [{
                        "key": "paddypower",
                        "title": "Paddy Power",
                        "markets": [{
                            "key": "h2h",
                            "outcomes": [
                                {"name": format!("Home{}", i), "price": 1.5 + i as f64},
                                {"name": format!("Away{}", i), "price": 4.0}
                            ]
                        }]
                    }]
                })
            })
            .collect();
        Value::Array(events)
    }

    /// Fake the-odds-api: rejects requests that don't carry the fixed params.
    async fn odds_handler(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
        let expected = [
            ("apiKey", "test-key"),
            ("regions", "uk"),
            ("markets", "h2h"),
            ("oddsFormat", "decimal"),
        ];
        for (k, v) in expected {
            if q.get(k).map(String::as_str) != Some(v) {
                return (StatusCode::UNAUTHORIZED, Json(json!({"message": format!("bad {}", k)})));
            }
        }
        (StatusCode::OK, Json(epl_events(15)))
    }

    fn odds_config(base_url: String) -> OddsFeedConfig {
        OddsFeedConfig {
            base_url,
            ..OddsFeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_the_odds_api_truncates_in_order() {
        let base = spawn(Router::new().route("/v4/sports/:sport/odds", get(odds_handler))).await;
        let feed = TheOddsApi::new(Some("test-key".to_string()), &odds_config(base)).unwrap();

        let records = fetch_odds(&feed, "soccer_epl", 10).await.into_vec();
        assert_eq!(records.len(), 10);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.match_label, format!("Home{} vs Away{}", i, i));
            assert!((r.price - (1.5 + i as f64)).abs() < f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn test_the_odds_api_rejected_key_is_failed() {
        let base = spawn(Router::new().route("/v4/sports/:sport/odds", get(odds_handler))).await;
        let feed = TheOddsApi::new(Some("wrong-key".to_string()), &odds_config(base)).unwrap();
        assert_eq!(fetch_odds(&feed, "soccer_epl", 15).await, FetchOutcome::Failed);
    }

    #[tokio::test]
    async fn test_the_odds_api_missing_key_is_failed() {
        let base = spawn(Router::new().route("/v4/sports/:sport/odds", get(odds_handler))).await;
        let feed = TheOddsApi::new(None, &odds_config(base)).unwrap();
        assert!(fetch_odds(&feed, "cricket", 10).await.is_failed());
    }

    #[tokio::test]
    async fn test_the_odds_api_slow_upstream_times_out() {
        let app = Router::new().fallback(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            Json(json!([]))
        });
        let base = spawn(app).await;
        let config = OddsFeedConfig {
            request_timeout_ms: 200,
            ..odds_config(base)
        };
        let feed = TheOddsApi::new(Some("test-key".to_string()), &config).unwrap();
        assert!(fetch_odds(&feed, "soccer_epl", 15).await.is_failed());
    }

    async fn inplay_handler(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        if q.get("token").map(String::as_str) != Some("tok") {
            return Json(json!({"success": 0, "error": "PERMISSION_DENIED"}));
        }
        Json(json!({
            "success": 1,
            "results": [
                {"id": "1", "home": {"name": "India"}, "away": {"name": "Australia"}, "time_status": "1"},
                {"id": "2", "home": {"name": "England"}, "away": {"name": "Pakistan"}, "in_play": false},
                {"id": "5", "home": {"name": "Yorkshire"}, "away": {"name": "Lancashire"}, "time_status": "1"},
                {"id": "3", "home": {"name": "Kent"}, "away": {"name": "Essex"}, "time_status": "1"},
                {"id": "4", "home": {"name": "Surrey"}, "away": {"name": "Sussex"}, "time_status": "1"}
            ]
        }))
    }

    async fn event_odds_handler(Query(q): Query<HashMap<String, String>>) -> impl IntoResponse {
        let results = match q.get("event_id").map(String::as_str) {
            Some("1") => json!({
                "betfair": [{"team": "India", "back": "1.85", "lay": "1.87"}],
                "bookmaker": [{"team": "India", "odds": 1.8}]
            }),
            // live, but nobody is pricing it
            Some("3") => json!({"betfair": [], "bookmaker": []}),
            Some("4") => json!({"bookmaker": [{"team": "Surrey", "odds": "2.2"}]}),
            // "5" is live but its odds lookup 404s
            _ => return (StatusCode::NOT_FOUND, Json(json!({"success": 0}))),
        };
        (StatusCode::OK, Json(json!({"success": 1, "results": results})))
    }

    fn betsapi_app() -> Router {
        Router::new()
            .route("/v1/events/inplay", get(inplay_handler))
            .route("/v1/event/odds", get(event_odds_handler))
    }

    fn live_config(base_url: String) -> LiveFeedConfig {
        LiveFeedConfig {
            base_url,
            ..LiveFeedConfig::default()
        }
    }

    #[tokio::test]
    async fn test_betsapi_filters_and_skips() {
        let base = spawn(betsapi_app()).await;
        let feed = BetsApi::new(Some("tok".to_string()), &live_config(base)).unwrap();

        let events = fetch_live(&feed, 10).await.into_vec();
        let labels: Vec<&str> = events.iter().map(|e| e.match_label.as_str()).collect();
        assert_eq!(labels, vec!["India vs Australia", "Surrey vs Sussex"]);

        assert_eq!(
            events[0].quotes,
            vec![
                LiveQuote::Betfair { team: "India".to_string(), back: 1.85, lay: 1.87 },
                LiveQuote::Bookmaker { team: "India".to_string(), odds: 1.8 },
            ]
        );
        assert_eq!(
            events[1].quotes,
            vec![LiveQuote::Bookmaker { team: "Surrey".to_string(), odds: 2.2 }]
        );
    }

    #[tokio::test]
    async fn test_betsapi_failed_lookup_skips_only_that_event() {
        let base = spawn(betsapi_app()).await;
        let feed = BetsApi::new(Some("tok".to_string()), &live_config(base)).unwrap();

        let outcome = fetch_live(&feed, 10).await;
        assert!(!outcome.is_failed());
        let ids: Vec<String> = outcome.into_vec().into_iter().map(|e| e.event_id).collect();
        assert_eq!(ids, vec!["1".to_string(), "4".to_string()]);
    }

    #[tokio::test]
    async fn test_betsapi_limit_applies_to_live_events() {
        let base = spawn(betsapi_app()).await;
        let feed = BetsApi::new(Some("tok".to_string()), &live_config(base)).unwrap();

        let events = fetch_live(&feed, 1).await.into_vec();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_id, "1");
    }

    #[tokio::test]
    async fn test_betsapi_bad_token_is_failed() {
        let base = spawn(betsapi_app()).await;
        let feed = BetsApi::new(Some("nope".to_string()), &live_config(base)).unwrap();
        assert!(fetch_live(&feed, 10).await.is_failed());
    }
}
