//! Periodic mid-market refresh.
//!
//! One background task owns the timer and the rate source. Each successful
//! fetch replaces the two mid legs of the shared [`TransferInputs`] and
//! publishes a fully recomputed [`Comparison`]; nothing is updated
//! incrementally. A failed fetch keeps the previous inputs and only records
//! the error text.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::FetchError;
use crate::models::Comparison;
use crate::rates::{MidRates, RateSource};
use crate::snapshot::TransferInputs;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub base: String,
    pub intermediate: String,
    pub target: String,
    pub interval: Duration,
    /// While off, ticks and manual refreshes fetch nothing.
    pub auto_fetch: bool,
}

impl From<&Settings> for PollerConfig {
    fn from(s: &Settings) -> Self {
        Self {
            base: s.base_currency.clone(),
            intermediate: s.intermediate_currency.clone(),
            target: s.target_currency.clone(),
            interval: Duration::from_secs(s.poll_interval_secs.max(1)),
            auto_fetch: s.auto_fetch,
        }
    }
}

/// Latest published view: the inputs it was computed from and fetch status.
#[derive(Debug, Clone, PartialEq)]
pub struct PollState {
    pub inputs: TransferInputs,
    pub comparison: Comparison,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl PollState {
    fn new(inputs: TransferInputs) -> Self {
        Self {
            comparison: inputs.evaluate(),
            inputs,
            last_updated: None,
            last_error: None,
        }
    }
}

struct Shared {
    inputs: RwLock<TransferInputs>,
    state: watch::Sender<PollState>,
    wake: Notify,
    auto_fetch: AtomicBool,
}

pub struct RatePoller {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl RatePoller {
    /// Starts polling; the first fetch happens right away.
    pub fn spawn(
        source: Arc<dyn RateSource>,
        inputs: TransferInputs,
        config: PollerConfig,
    ) -> Self {
        let (state, _) = watch::channel(PollState::new(inputs.clone()));
        let shared = Arc::new(Shared {
            inputs: RwLock::new(inputs),
            state,
            wake: Notify::new(),
            auto_fetch: AtomicBool::new(config.auto_fetch),
        });

        let task = tokio::spawn(run(shared.clone(), source, config));
        info!("poller: started");
        Self { shared, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> PollState {
        self.shared.state.borrow().clone()
    }

    /// Fetches now instead of waiting for the next tick. Ignored while auto-fetch is off.
    pub fn refresh_now(&self) {
        self.shared.wake.notify_one();
    }

    /// Pauses or resumes fetching. Resuming fetches right away.
    pub fn set_auto_fetch(&self, enabled: bool) {
        let was = self.shared.auto_fetch.swap(enabled, Ordering::SeqCst);
        if enabled && !was {
            self.shared.wake.notify_one();
        }
        info!("poller: auto-fetch {}", if enabled { "on" } else { "off" });
    }

    pub fn auto_fetch(&self) -> bool {
        self.shared.auto_fetch.load(Ordering::SeqCst)
    }

    /// Edits the input snapshot and republishes a recomputed comparison.
    pub async fn update_inputs<F>(&self, edit: F)
    where
        F: FnOnce(&mut TransferInputs),
    {
        let mut guard = self.shared.inputs.write().await;
        edit(&mut guard);
        publish(&self.shared, guard.clone(), |_| {});
    }

    /// Stops the timer. A fetch still in flight is dropped; the last state stays readable.
    pub fn stop(&self) {
        self.task.abort();
        info!("poller: stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for RatePoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(shared: Arc<Shared>, source: Arc<dyn RateSource>, config: PollerConfig) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shared.wake.notified() => {
                debug!("poller: manual refresh");
                ticker.reset();
            }
        }
        if !shared.auto_fetch.load(Ordering::SeqCst) {
            continue;
        }
        refresh(&shared, source.as_ref(), &config).await;
    }
}

async fn refresh(shared: &Shared, source: &dyn RateSource, config: &PollerConfig) {
    match fetch_mid(source, config).await {
        Ok(mid) => {
            let mut guard = shared.inputs.write().await;
            guard.apply_mid_rates(mid);
            publish(shared, guard.clone(), |s| {
                s.last_updated = Some(Utc::now());
                s.last_error = None;
            });
            info!(
                "exchange rates updated: {}/{} = {}, {}/{} = {}",
                config.base,
                config.intermediate,
                mid.source_per_intermediate,
                config.target,
                config.intermediate,
                mid.target_per_intermediate
            );
        }
        Err(e) => {
            warn!("failed to fetch exchange rates: {}", e);
            shared
                .state
                .send_modify(|s| s.last_error = Some(e.to_string()));
        }
    }
}

async fn fetch_mid(source: &dyn RateSource, config: &PollerConfig) -> Result<MidRates, FetchError> {
    let table = source.latest(&config.base).await?;
    table.mid_rates(&config.intermediate, &config.target)
}

fn publish(shared: &Shared, inputs: TransferInputs, status: impl FnOnce(&mut PollState)) {
    let comparison = inputs.evaluate();
    shared.state.send_modify(|s| {
        s.inputs = inputs;
        s.comparison = comparison;
        status(s);
    });
}
