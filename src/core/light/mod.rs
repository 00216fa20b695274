pub use crate::core::{
    config::LightConfig,
    dwell::DwellSampler,
    error::{LightError, Result},
    phase::{AtomicPhase, Phase},
    queue::MessageQueue,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Interruptible sleep shared by the cycle threads.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_stopped(&self) -> bool {
        *self.lock()
    }

    fn stop(&self) {
        *self.lock() = true;
        self.wake.notify_all();
    }

    /// Sleep until `deadline`, returning early with `true` once stopped.
    fn wait_until(&self, deadline: Instant) -> bool {
        let timeout = deadline.saturating_duration_since(Instant::now());
        let (stopped, _) = self
            .wake
            .wait_timeout_while(self.lock(), timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

/// State reachable from the cycle threads
#[derive(Default)]
struct Shared {
    phase: AtomicPhase,
    queue: MessageQueue<Phase>,
    stop: StopSignal,
    cycles: AtomicU64,
}

/// A single traffic light cycling between red and green on its own thread.
///
/// Share it between threads with `Arc<TrafficLight>`. Dropping the last
/// handle stops and joins the cycle threads.
pub struct TrafficLight {
    shared: Arc<Shared>,
    config: LightConfig,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TrafficLight {
    /// Light starting red, holding each phase 4–6 seconds
    pub fn new() -> Self {
        Self::from_valid_config(LightConfig::default())
    }

    /// Light with a custom dwell window
    pub fn with_config(config: LightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: LightConfig) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            config,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Phase at the moment of the call; not a synchronization point
    pub fn current_phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Start the phase cycle on a new thread and return immediately.
    ///
    /// Each call starts another independent cycle, so call it once.
    pub fn simulate(&self) -> Result<()> {
        // hold the task list so a concurrent stop() either rejects this call
        // or joins the thread it spawns
        let mut tasks = self.lock_tasks();
        if self.shared.stop.is_stopped() {
            return Err(LightError::Stopped);
        }
        let shared = Arc::clone(&self.shared);
        let dwell = DwellSampler::from_config(&self.config)?;
        let handle = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || cycle_through_phases(&shared, dwell))
            .map_err(LightError::Spawn)?;
        tasks.push(handle);
        Ok(())
    }

    /// Block until green is announced
    pub fn wait_for_green(&self) {
        self.wait_for_phase(Phase::Green);
    }

    /// Block until `target` is announced.
    ///
    /// Only announcements still in the queue count: a transition consumed
    /// by someone else, or made before the light started, is never replayed.
    pub fn wait_for_phase(&self, target: Phase) {
        loop {
            let phase = self.next_phase_change();
            if phase == target {
                trace!(%phase, "phase reached");
                return;
            }
        }
    }

    /// Like [`wait_for_phase`](Self::wait_for_phase) but bounded by `timeout`.
    ///
    /// A timeout too large to express as a deadline waits without bound.
    pub fn wait_for_phase_timeout(&self, target: Phase, timeout: Duration) -> Result<()> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait_for_phase(target);
            return Ok(());
        };
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.next_phase_change_timeout(remaining) {
                Some(phase) if phase == target => return Ok(()),
                Some(_) => {}
                None => {
                    return Err(LightError::WaitTimedOut {
                        phase: target,
                        waited: timeout,
                    });
                }
            }
        }
    }

    /// Take the oldest unconsumed announcement, blocking until there is one
    pub fn next_phase_change(&self) -> Phase {
        self.shared.queue.receive()
    }

    /// Oldest unconsumed announcement, or `None` if none arrives in time
    pub fn next_phase_change_timeout(&self, timeout: Duration) -> Option<Phase> {
        self.shared.queue.receive_timeout(timeout)
    }

    /// Transitions performed since construction
    pub fn cycle_count(&self) -> u64 {
        self.shared.cycles.load(Ordering::Relaxed)
    }

    /// Announcements not yet consumed by a waiter
    pub fn pending_announcements(&self) -> usize {
        self.shared.queue.len()
    }

    /// Whether any cycle thread is still alive
    pub fn is_running(&self) -> bool {
        self.lock_tasks().iter().any(|task| !task.is_finished())
    }

    /// Stop every cycle thread and wait for it to exit.
    ///
    /// The current phase is left as it was; later `simulate` calls fail.
    pub fn stop(&self) {
        self.shared.stop.stop();
        let tasks = std::mem::take(&mut *self.lock_tasks());
        for task in tasks {
            if task.join().is_err() {
                warn!("phase cycle thread panicked");
            }
        }
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of a cycle thread: hold the phase for a random dwell, flip it,
/// announce the new phase, repeat until stopped.
fn cycle_through_phases(shared: &Shared, mut dwell: DwellSampler) {
    info!(phase = %shared.phase.load(), "phase cycle started");
    let mut last_update = Instant::now();
    loop {
        let hold = dwell.next_dwell();
        if shared.stop.wait_until(last_update + hold) {
            break;
        }

        let phase = shared.phase.toggle();
        last_update = Instant::now();
        let cycle = shared.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            %phase,
            dwell_ms = u64::try_from(hold.as_millis()).unwrap_or(u64::MAX),
            cycle,
            "phase changed"
        );
        shared.queue.send(phase);
    }
    info!(cycles = shared.cycles.load(Ordering::Relaxed), "phase cycle stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_signal_times_out_when_not_stopped() {
        let signal = StopSignal::default();
        let start = Instant::now();
        assert!(!signal.wait_until(start + Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn stop_signal_wakes_sleeper_early() {
        let signal = Arc::new(StopSignal::default());
        let sleeper = Arc::clone(&signal);
        let start = Instant::now();
        let handle =
            thread::spawn(move || sleeper.wait_until(Instant::now() + Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(20));
        signal.stop();
        assert!(handle.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn past_deadline_returns_immediately() {
        let signal = StopSignal::default();
        assert!(!signal.wait_until(Instant::now()));
        signal.stop();
        assert!(signal.wait_until(Instant::now()));
    }

    #[test]
    fn new_light_is_red_and_idle() {
        let light = TrafficLight::new();
        assert_eq!(light.current_phase(), Phase::Red);
        assert_eq!(light.cycle_count(), 0);
        assert_eq!(light.pending_announcements(), 0);
        assert!(!light.is_running());
    }

    #[test]
    fn racing_simulate_and_stop_leaves_no_unjoined_thread() {
        for _ in 0..200 {
            let config = LightConfig::with_dwell(Duration::from_millis(5), Duration::from_millis(10));
            let light = Arc::new(TrafficLight::with_config(config).unwrap());
            let barrier = Arc::new(std::sync::Barrier::new(2));

            let starter = {
                let light = Arc::clone(&light);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    light.simulate()
                })
            };
            barrier.wait();
            light.stop();
            let started = starter.join().unwrap();

            // whichever side won, nothing is left behind once both returned
            assert!(started.is_ok() || matches!(started, Err(LightError::Stopped)));
            assert!(light.lock_tasks().is_empty());
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LightConfig::with_dwell(Duration::ZERO, Duration::from_millis(5));
        assert!(matches!(
            TrafficLight::with_config(config),
            Err(LightError::InvalidConfig { .. })
        ));
    }
}
