//! Periodic refresh scheduler
//!
//! Drives refresh cycles on a fixed interval. At most one cycle runs at a
//! time: a tick that finds a cycle still in flight is dropped, never queued.
//! Each cycle refreshes every configured city concurrently and waits for all
//! of them before the next cycle may start.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use application::RefreshService;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Non-blocking guard allowing a single holder at a time
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    busy: Arc<AtomicBool>,
}

impl SingleFlight {
    /// Create an idle guard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard if nobody holds it; never waits
    pub fn try_acquire(&self) -> Option<FlightPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Whether a permit is currently held
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held while a cycle runs; releases the guard on drop
#[derive(Debug)]
pub struct FlightPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Counts from one refresh cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Cities the cycle covered
    pub cities: usize,
    /// Cities whose aggregate was saved
    pub refreshed: usize,
    /// Cities left unchanged because no source succeeded or the refresh failed
    pub skipped: usize,
}

/// Periodically refreshes a fixed set of cities
pub struct RefreshScheduler {
    service: Arc<RefreshService>,
    cities: Arc<[String]>,
    interval: Duration,
    flight: SingleFlight,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("cities", &self.cities)
            .field("interval", &self.interval)
            .field("busy", &self.flight.is_busy())
            .finish_non_exhaustive()
    }
}

impl RefreshScheduler {
    /// Create a scheduler for `cities`, ticking every `interval`
    ///
    /// A zero interval is raised to one millisecond; `tokio::time::interval`
    /// rejects a zero period.
    pub fn new(service: Arc<RefreshService>, cities: Vec<String>, interval: Duration) -> Self {
        Self {
            service,
            cities: cities.into(),
            interval: interval.max(Duration::from_millis(1)),
            flight: SingleFlight::new(),
        }
    }

    /// The guard cycles run under
    pub const fn flight(&self) -> &SingleFlight {
        &self.flight
    }

    /// Cities refreshed each cycle
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Start the loop on the runtime.
    ///
    /// The first cycle starts immediately, later ones every interval. When
    /// `token` is cancelled the loop stops issuing cycles; a cycle already in
    /// flight runs to completion on its own task.
    pub fn spawn(self, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!(
                cities = self.cities.len(),
                interval_secs = self.interval.as_secs(),
                "Refresh scheduler started"
            );

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        info!("Refresh scheduler stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.tick();
                    }
                }
            }
        })
    }

    /// Start a cycle on its own task unless one is already running.
    ///
    /// Returns `None` when the tick was dropped.
    pub fn tick(&self) -> Option<JoinHandle<CycleSummary>> {
        let Some(permit) = self.flight.try_acquire() else {
            debug!("Previous refresh cycle still running, skipping tick");
            return None;
        };

        let service = Arc::clone(&self.service);
        let cities = Arc::clone(&self.cities);
        Some(tokio::spawn(async move {
            let _permit = permit;
            run_cycle(service, cities).await
        }))
    }

    /// Run one cycle on the current task, ignoring the guard
    pub async fn run_cycle(&self) -> CycleSummary {
        run_cycle(Arc::clone(&self.service), Arc::clone(&self.cities)).await
    }
}

#[instrument(skip_all, fields(cities = cities.len()))]
async fn run_cycle(service: Arc<RefreshService>, cities: Arc<[String]>) -> CycleSummary {
    let mut tasks = JoinSet::new();
    for city in cities.iter().cloned() {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            let outcome = service.refresh_city(&city).await;
            (city, outcome)
        });
    }

    let mut summary = CycleSummary {
        cities: cities.len(),
        ..CycleSummary::default()
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(Some(_)))) => summary.refreshed += 1,
            Ok((city, Ok(None))) => {
                debug!(city = %city, "No provider succeeded, entry unchanged");
                summary.skipped += 1;
            },
            Ok((city, Err(e))) => {
                warn!(city = %city, error = %e, "City refresh failed");
                summary.skipped += 1;
            },
            Err(e) => {
                error!(error = %e, "City refresh task aborted");
                summary.skipped += 1;
            },
        }
    }

    info!(
        refreshed = summary.refreshed,
        skipped = summary.skipped,
        "Refresh cycle finished"
    );
    summary
}
