//! Periodic and manual snapshot refresh.
//!
//! Each refresh runs as its own task and publishes a whole new snapshot when
//! it completes. Refreshes may overlap; whichever finishes last is the value
//! subscribers see. Superseded refreshes are not cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::routing::RateRouter;
use crate::MarketSnapshot;

/// Shortest accepted period for [`RefreshHandle::spawn_periodic`].
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// `None` until the first refresh completes.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<MarketSnapshot>>>;

#[derive(Clone)]
pub struct RefreshHandle {
    router: Arc<RateRouter>,
    sender: Arc<watch::Sender<Option<Arc<MarketSnapshot>>>>,
}

impl RefreshHandle {
    pub fn new(router: Arc<RateRouter>) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            router,
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.sender.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<MarketSnapshot>> {
        self.sender.borrow().clone()
    }

    /// Starts one refresh in the background. Must be called inside a Tokio runtime.
    pub fn refresh_now(&self) -> JoinHandle<Arc<MarketSnapshot>> {
        let router = Arc::clone(&self.router);
        let sender = Arc::clone(&self.sender);

        tokio::spawn(async move {
            let snapshot = Arc::new(router.resolve().await);
            debug!(label = %snapshot.last_update_label, "publishing snapshot");
            sender.send_replace(Some(Arc::clone(&snapshot)));
            snapshot
        })
    }

    /// Refreshes immediately and then on every tick of `period`.
    ///
    /// Ticks do not wait for the previous refresh. Periods shorter than
    /// [`MIN_REFRESH_PERIOD`] are raised to it. Abort the returned handle to
    /// stop the loop.
    pub fn spawn_periodic(&self, period: Duration) -> JoinHandle<()> {
        let handle = self.clone();
        let period = if period < MIN_REFRESH_PERIOD {
            warn!(
                requested_ms = period.as_millis() as u64,
                "refresh period too short, using the minimum"
            );
            MIN_REFRESH_PERIOD
        } else {
            period
        };

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                drop(handle.refresh_now());
            }
        })
    }
}
