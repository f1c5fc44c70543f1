use std::time::Duration;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::runner::Event;

/// One countdown step.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Periodic tick source for timed games.
///
/// The clock never touches the session. Each firing is submitted to the
/// runner's event queue tagged with the clock's epoch; `stop` bumps the epoch,
/// so ticks already queued by an older run are dropped by the runner.
#[derive(Debug)]
pub struct CountdownClock {
    period: Duration,
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

impl CountdownClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            epoch: 0,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub(crate) fn start(&mut self, events: WeakUnboundedSender<Event>) {
        self.stop();

        let epoch = self.epoch;
        let period = self.period;
        log::debug!("Countdown clock started (epoch {epoch}, period {period:?})");

        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // runner gone, nobody left to tick for
                let Some(sender) = events.upgrade() else {
                    break;
                };
                if sender.send(Event::Tick { epoch }).is_err() {
                    break;
                }
            }
        }));
    }

    /// No tick from the current run is applied once this returns.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("Countdown clock stopped (epoch {})", self.epoch);
        }
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub(crate) fn accepts(&self, epoch: u64) -> bool {
        self.task.is_some() && epoch == self.epoch
    }
}

impl Default for CountdownClock {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Drop for CountdownClock {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
