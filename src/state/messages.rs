use betfeed_api::NormalizedMatch;

/// Which backend listing a poll reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Live,
    Today,
}

impl Feed {
    pub fn label(self) -> &'static str {
        match self {
            Feed::Live => "live",
            Feed::Today => "today",
        }
    }
}

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadMatches { feed: Feed },
    /// Same fetch as `LoadMatches`, sent by the refresher.
    RefreshMatches { feed: Feed },
}

#[derive(Debug)]
pub enum NetworkResponse {
    MatchesLoaded { feed: Feed, matches: Vec<NormalizedMatch> },
    Error { message: String },
}
