//! MCSR Ranked API types
//!
//! Response shapes for the two endpoints the overlay reads, plus URL
//! construction. Only the fields the overlay uses are modelled; everything
//! else in the payload is ignored.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::constants::{API_BASE_URL, RANKED_MATCH_TYPE};
use super::types::PlayerName;

// =============================================================================
// ENDPOINTS
// =============================================================================

/// URL builder for the ranked API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base_url: String,
}

impl ApiEndpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Most recent ranked matches for a player, decayed matches excluded
    ///
    /// The player name is percent-encoded as a single path segment.
    pub fn recent_matches(&self, player: &PlayerName, count: usize) -> String {
        let query = [
            ("type", RANKED_MATCH_TYPE.to_string()),
            ("count", count.to_string()),
            ("excludedecay", "true".to_string()),
        ];
        self.build(&["users", player.as_str(), "matches"], &query)
    }

    /// Matches currently being played
    pub fn live_matches(&self) -> String {
        self.build(&["live"], &[])
    }

    fn build(&self, segments: &[&str], query: &[(&str, String)]) -> String {
        let Ok(mut url) = Url::parse(&self.base_url) else {
            // Unusable base: the request fails and is logged by the fetcher
            return format!("{}/{}", self.base_url, segments.join("/"));
        };
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url.to_string()
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

// =============================================================================
// RECENT MATCHES (GET /users/{player}/matches)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub data: Vec<MatchRecord>,
}

/// One finished match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Absent or without a winner uuid for a draw
    #[serde(default)]
    pub result: Option<MatchResultInfo>,
    #[serde(default)]
    pub players: Vec<MatchParticipant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResultInfo {
    /// Winner's uuid, null on a draw
    #[serde(default)]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub uuid: String,
    pub nickname: String,
}

impl MatchRecord {
    /// Winner uuid, `None` for a draw
    pub fn winner_uuid(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.uuid.as_deref())
            .filter(|uuid| !uuid.is_empty())
    }

    pub fn participant(&self, uuid: &str) -> Option<&MatchParticipant> {
        self.players.iter().find(|p| p.uuid == uuid)
    }
}

// =============================================================================
// LIVE MATCHES (GET /live)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveResponse {
    pub data: LiveData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveData {
    #[serde(rename = "liveMatches")]
    pub live_matches: Vec<LiveMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    /// Elapsed match time in milliseconds
    #[serde(rename = "currentTime", default)]
    pub current_time: Option<u64>,
    #[serde(default)]
    pub players: Vec<LivePlayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePlayer {
    pub nickname: String,
}
