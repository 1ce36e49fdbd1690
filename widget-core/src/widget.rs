use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    SourceConfig, WidgetConfig,
    provider::WeatherSource,
    scheduler::FetchScheduler,
    state::{WidgetState, WidgetView},
};

/// The weather pill: owns the UI state and the refresh timer.
///
/// The timer only exists while the host's [`WidgetConfig`] says enabled.
/// Changing the config, calling [`WeatherWidget::shutdown`] or dropping the
/// widget cancels it. Fetches already in flight are left to finish.
#[derive(Debug)]
pub struct WeatherWidget {
    source: Arc<dyn WeatherSource>,
    settings: SourceConfig,
    config: Option<WidgetConfig>,
    state: Arc<watch::Sender<WidgetState>>,
    timer: Option<(CancellationToken, JoinHandle<()>)>,
}

impl WeatherWidget {
    pub fn new(source: Arc<dyn WeatherSource>, settings: SourceConfig) -> Self {
        let (state, _) = watch::channel(WidgetState::default());

        Self {
            source,
            settings,
            config: None,
            state: Arc::new(state),
            timer: None,
        }
    }

    /// Apply the host config. Must be called from within a tokio runtime.
    ///
    /// An unchanged config is a no-op; any change restarts the timer, which
    /// fetches right away when enabled.
    pub fn configure(&mut self, config: Option<WidgetConfig>) {
        if config == self.config && (self.is_running() || !self.is_enabled()) {
            return;
        }

        self.stop_timer();
        self.config = config;

        if !self.is_enabled() {
            debug!("weather widget disabled");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = FetchScheduler::new(
            Arc::clone(&self.source),
            Arc::clone(&self.state),
            self.settings.refresh_interval(),
            self.settings.overlap,
        )
        .start(cancel.clone());

        self.timer = Some((cancel, handle));
    }

    pub fn is_enabled(&self) -> bool {
        WidgetConfig::is_enabled(self.config.as_ref())
    }

    /// Whether the refresh timer is currently alive.
    pub fn is_running(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|(cancel, handle)| !cancel.is_cancelled() && !handle.is_finished())
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> WidgetState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> WidgetView {
        if !self.is_enabled() {
            return WidgetView::Hidden;
        }
        self.state.borrow().view()
    }

    /// Pointer entered (`true`) or left (`false`) the pill.
    pub fn set_hovering(&self, hovering: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.hovering != hovering;
            s.set_hovering(hovering);
            changed
        });
    }

    /// Tear down: cancels the refresh timer. Idempotent.
    pub fn shutdown(&mut self) {
        if self.timer.is_some() {
            info!("weather widget shutting down");
        }
        self.stop_timer();
    }

    fn stop_timer(&mut self) {
        if let Some((cancel, _)) = self.timer.take() {
            cancel.cancel();
        }
    }
}

impl Drop for WeatherWidget {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
