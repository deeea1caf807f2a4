use crate::state::messages::{Feed, NetworkRequest};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-requests one feed at a fixed interval until the worker goes away.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    feed: Feed,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, feed: Feed, period: Duration) -> Self {
        Self { network_requests, feed, period }
    }

    pub async fn run(self) {
        let mut matches_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        matches_interval.tick().await;

        loop {
            matches_interval.tick().await;
            let request = NetworkRequest::RefreshMatches { feed: self.feed };
            if self.network_requests.send(request).await.is_err() {
                break;
            }
        }
    }
}
