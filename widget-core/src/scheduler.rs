use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    OverlapPolicy, config::DEFAULT_REFRESH_INTERVAL_SECS, provider::WeatherSource,
    state::WidgetState,
};

/// Fetches once immediately, then once per `interval`, until cancelled.
///
/// Each tick spawns its own fetch task, so a slow response may still be in
/// flight when the next tick fires. [`OverlapPolicy`] decides what happens
/// to it. Cancelling the scheduler stops the ticks only.
#[derive(Debug)]
pub struct FetchScheduler {
    source: Arc<dyn WeatherSource>,
    state: Arc<watch::Sender<WidgetState>>,
    interval: Duration,
    overlap: OverlapPolicy,
}

impl FetchScheduler {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        state: Arc<watch::Sender<WidgetState>>,
        interval: Duration,
        overlap: OverlapPolicy,
    ) -> Self {
        // tokio's interval panics on a zero period.
        let interval = if interval.is_zero() {
            warn!(
                fallback_secs = DEFAULT_REFRESH_INTERVAL_SECS,
                "zero refresh interval, using default"
            );
            Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS)
        } else {
            interval
        };

        Self { source, state, interval, overlap }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut in_flight: Option<CancellationToken> = None;

            info!(interval_secs = self.interval.as_secs(), "weather refresh started");

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let stale = match self.overlap {
                            OverlapPolicy::LastResolvedWins => None,
                            OverlapPolicy::CancelStale => {
                                if let Some(previous) = in_flight.take() {
                                    previous.cancel();
                                }
                                let token = CancellationToken::new();
                                in_flight = Some(token.clone());
                                Some(token)
                            }
                        };

                        tokio::spawn(fetch_once(
                            Arc::clone(&self.source),
                            Arc::clone(&self.state),
                            stale,
                        ));
                    }
                }
            }

            info!("weather refresh stopped");
        })
    }
}

/// One fetch cycle: mark loading, fetch, publish the outcome.
///
/// With a `superseded` token, a fetch that gets cancelled before resolving
/// leaves the state alone.
pub async fn fetch_once(
    source: Arc<dyn WeatherSource>,
    state: Arc<watch::Sender<WidgetState>>,
    superseded: Option<CancellationToken>,
) {
    state.send_modify(WidgetState::begin_fetch);
    debug!("fetching weather");

    let result = match superseded {
        Some(token) => tokio::select! {
            _ = token.cancelled() => {
                debug!("weather fetch superseded by a newer one");
                return;
            }
            result = source.fetch() => result,
        },
        None => source.fetch().await,
    };

    match &result {
        Ok(_) => debug!("weather fetch succeeded"),
        Err(err) => warn!(error = %err, "weather fetch failed"),
    }

    state.send_modify(|s| s.finish_fetch(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::WeatherSnapshot, provider::FetchError};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct EmptySource;

    #[async_trait]
    impl WeatherSource for EmptySource {
        async fn fetch(&self) -> Result<WeatherSnapshot, FetchError> {
            Ok(WeatherSnapshot::default())
        }
    }

    fn scheduler(interval: Duration) -> FetchScheduler {
        let (tx, _) = watch::channel(WidgetState::default());
        FetchScheduler::new(
            Arc::new(EmptySource),
            Arc::new(tx),
            interval,
            OverlapPolicy::default(),
        )
    }

    #[test]
    fn zero_interval_uses_default() {
        let expected = Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS);
        assert_eq!(scheduler(Duration::ZERO).interval(), expected);
    }

    #[test]
    fn non_zero_interval_is_kept() {
        let interval = Duration::from_secs(30);
        assert_eq!(scheduler(interval).interval(), interval);
    }
}
