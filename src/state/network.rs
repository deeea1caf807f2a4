use crate::state::messages::{Feed, NetworkRequest, NetworkResponse};
use betfeed_api::client::{ApiError, BetfeedApi};
use betfeed_api::kickoff;
use chrono::Utc;
use log::{debug, error};
use tokio::sync::mpsc;

pub struct NetworkWorker {
    client: BetfeedApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        client: BetfeedApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, requests, responses }
    }

    /// Serve requests until the request channel closes or nobody listens
    /// for responses any more.
    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let result = match request {
                NetworkRequest::LoadMatches { feed } => self.handle_load_matches(feed).await,
                NetworkRequest::RefreshMatches { feed } => {
                    debug!("refreshing {} matches", feed.label());
                    self.handle_load_matches(feed).await
                }
            };

            debug!("network request complete");

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_matches(&self, feed: Feed) -> Result<NetworkResponse, ApiError> {
        debug!("loading {} matches from {}", feed.label(), self.client.base_url());
        let matches = match feed {
            Feed::Live => self.client.fetch_live().await?,
            Feed::Today => {
                let today = Utc::now().with_timezone(&kickoff::display_tz()).date_naive();
                self.client.fetch_day(today).await?
            }
        };
        Ok(NetworkResponse::MatchesLoaded { feed, matches })
    }
}
