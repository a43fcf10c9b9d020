//! Live status checker

use tracing::{debug, error};

use super::io_traits::{fetch_typed, JsonFetcher};
use super::protocol::{ApiEndpoints, LiveResponse};
use super::types::PlayerName;

/// Whether `player` is in one of the currently running ranked matches
///
/// Fails closed: any fetch or decode error reports the player as not live.
pub fn is_player_live<F: JsonFetcher + ?Sized>(
    fetcher: &F,
    endpoints: &ApiEndpoints,
    player: &PlayerName,
) -> bool {
    let url = endpoints.live_matches();
    debug!(player = %player, url = %url, "[live] Checking live matches");

    let response: LiveResponse = match fetch_typed(fetcher, &url) {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "[live] No live api data");
            return false;
        }
    };

    let live_matches = &response.data.live_matches;
    debug!(count = live_matches.len(), "[live] Matches going on right now");

    let found = live_matches.iter().enumerate().find(|(_, m)| {
        m.players
            .iter()
            .any(|p| player.matches(&p.nickname))
    });

    match found {
        Some((index, live_match)) => {
            debug!(
                player = %player,
                match_number = index + 1,
                current_time_ms = ?live_match.current_time,
                "[live] Found player in match"
            );
            true
        }
        None => {
            debug!(player = %player, "[live] Not in a match right now");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io_traits::mocks::MockFetcher;
    use crate::core::io_traits::FetchError;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn live_fetcher(live_matches: Value) -> (MockFetcher, ApiEndpoints) {
        let fetcher = MockFetcher::new();
        let endpoints = ApiEndpoints::default();
        fetcher.respond(
            &endpoints.live_matches(),
            json!({"status": "success", "data": {"players": {}, "liveMatches": live_matches}}),
        );
        (fetcher, endpoints)
    }

    fn two_matches() -> Value {
        json!([
            {"currentTime": 120000, "players": [{"nickname": "Alice"}, {"nickname": "Bob"}]},
            {"currentTime": 45000, "players": [{"nickname": "Feinberg"}, {"nickname": "Couriway"}]}
        ])
    }

    #[rstest]
    #[case("Feinberg")]
    #[case("feinberg")]
    #[case("FEINBERG")]
    fn test_player_found_any_case(#[case] player: &str) {
        let (fetcher, endpoints) = live_fetcher(two_matches());
        assert!(is_player_live(&fetcher, &endpoints, &PlayerName::new(player)));
    }

    #[test]
    fn test_player_not_in_any_match() {
        let (fetcher, endpoints) = live_fetcher(two_matches());
        assert!(!is_player_live(&fetcher, &endpoints, &PlayerName::new("Dave")));
    }

    #[test]
    fn test_no_live_matches() {
        let (fetcher, endpoints) = live_fetcher(json!([]));
        assert!(!is_player_live(&fetcher, &endpoints, &PlayerName::new("Alice")));
    }

    #[test]
    fn test_fetch_failure_is_not_live() {
        let fetcher = MockFetcher::new();
        let endpoints = ApiEndpoints::default();
        let url = endpoints.live_matches();
        fetcher.fail(
            &url,
            FetchError::Decode {
                url: url.clone(),
                message: "expected value at line 1 column 1".to_string(),
            },
        );
        assert!(!is_player_live(&fetcher, &endpoints, &PlayerName::new("Alice")));
        assert_eq!(fetcher.request_count(), 1);
    }

    #[test]
    fn test_malformed_payload_is_not_live() {
        let fetcher = MockFetcher::new();
        let endpoints = ApiEndpoints::default();
        fetcher.respond(&endpoints.live_matches(), json!({"data": null}));
        assert!(!is_player_live(&fetcher, &endpoints, &PlayerName::new("Alice")));
    }
}
