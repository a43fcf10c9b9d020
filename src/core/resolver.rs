//! Match result resolver
//!
//! Turns a player's recent ranked matches into Win/Loss/Draw outcomes,
//! most recent first.

use tracing::{debug, error};

use super::io_traits::{fetch_typed, Fetched, JsonFetcher};
use super::protocol::{ApiEndpoints, MatchRecord, MatchesResponse};
use super::types::{outcome_summary, MatchOutcome, PlayerName};

/// Fetch the last `count` ranked matches of `player` and classify them
///
/// On success the returned vector always has `count` entries; slots past the
/// last returned match are `Unknown`. Zero matches yields `Fetched::Empty`.
pub fn recent_results<F: JsonFetcher + ?Sized>(
    fetcher: &F,
    endpoints: &ApiEndpoints,
    player: &PlayerName,
    count: usize,
) -> Fetched<Vec<MatchOutcome>> {
    debug!(player = %player, count, "[results] Getting recent matches");

    let url = endpoints.recent_matches(player, count);
    let response: MatchesResponse = match fetch_typed(fetcher, &url) {
        Ok(response) => response,
        Err(e) => {
            error!(player = %player, error = %e, "[results] No recent matches data");
            return Fetched::Failed(e);
        }
    };

    if response.data.is_empty() {
        error!(player = %player, "[results] Empty recent matches, does the player exist?");
        return Fetched::Empty;
    }

    let outcomes = classify_matches(&response.data, player, count);
    debug!(player = %player, outcomes = %outcome_summary(&outcomes), "[results] Resolved");
    Fetched::Ready(outcomes)
}

/// Classify matches in API order, padding with `Unknown` up to `count`
pub fn classify_matches(
    matches: &[MatchRecord],
    player: &PlayerName,
    count: usize,
) -> Vec<MatchOutcome> {
    let mut outcomes: Vec<MatchOutcome> = matches
        .iter()
        .take(count)
        .map(|record| classify_match(record, player))
        .collect();
    outcomes.resize(count, MatchOutcome::Unknown);
    outcomes
}

/// Outcome of a single match for `player`
///
/// A winner uuid that matches no participant counts as a loss: the winner is
/// someone other than the player.
pub fn classify_match(record: &MatchRecord, player: &PlayerName) -> MatchOutcome {
    let Some(winner_uuid) = record.winner_uuid() else {
        return MatchOutcome::Draw;
    };

    match record.participant(winner_uuid) {
        Some(winner) if player.matches(&winner.nickname) => MatchOutcome::Win,
        _ => MatchOutcome::Loss,
    }
}
