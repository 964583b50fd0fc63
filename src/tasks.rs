//! Refresh scheduling
//!
//! Each fetcher is a schedulable unit whose cadence is declared as data in
//! [`refresh_plan`], not buried in control flow. The only real timer is the
//! quote poll, modeled as a cancellable repeating task torn down
//! deterministically when its handle drops.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::Config;

/// The three data-acquisition routines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Quote,
    ShortTermSeries,
    HistoricalSeries,
}

/// What causes a job to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once, as part of the sequential startup pass
    Startup,
    /// On a fixed repeating timer
    Every(Duration),
    /// Whenever the timeframe selection changes
    OnTimeframeChange,
    /// On an explicit user action
    Manual,
}

/// One fetcher and its declared triggers
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub job: Job,
    pub triggers: Vec<Trigger>,
}

/// The full refresh plan: every job, every trigger, derived from config
pub fn refresh_plan(config: &Config) -> Vec<TaskSpec> {
    vec![
        TaskSpec {
            job: Job::Quote,
            triggers: vec![
                Trigger::Startup,
                Trigger::Every(Duration::from_secs(config.quote_poll_seconds)),
                Trigger::Manual,
            ],
        },
        TaskSpec {
            job: Job::ShortTermSeries,
            triggers: vec![Trigger::Startup, Trigger::OnTimeframeChange],
        },
        TaskSpec {
            job: Job::HistoricalSeries,
            triggers: vec![Trigger::Startup],
        },
    ]
}

/// The repeating interval declared for a job, if any
pub fn interval_for(plan: &[TaskSpec], job: Job) -> Option<Duration> {
    plan.iter()
        .filter(|spec| spec.job == job)
        .flat_map(|spec| spec.triggers.iter())
        .find_map(|trigger| match trigger {
            Trigger::Every(period) => Some(*period),
            _ => None,
        })
}

/// Cancellable repeating timer.
///
/// Sends a unit tick over the channel once per period. Aborted on drop, so
/// the timer's lifetime is bounded by its owner's.
#[derive(Debug)]
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    /// Spawn the timer task. The first tick fires one full period after
    /// spawn; the startup sequence has already fetched once by then.
    pub fn spawn(period: Duration, ticks: mpsc::Sender<()>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval yields immediately on the first tick
            interval.tick().await;
            loop {
                interval.tick().await;
                if ticks.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop the timer
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
