// taskd: Periodic Executor — simulates one periodic task's CPU demand

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};

use crate::catalog::TaskParameters;

fn millis(ms: f64) -> Duration {
    Duration::from_secs_f64(ms / 1000.0)
}

/// Spawns the worker for one admitted instance. Runs until `active` is
/// cleared, polling it only at the top of the loop — a deactivation issued
/// mid-period takes effect at the next release, which is acceptable because
/// the caller joins the handle and tolerates the wait.
pub fn spawn(name: String, params: TaskParameters, active: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let cost = millis(params.c);
        let period = millis(params.t);
        let deadline = millis(params.d);

        let mut next_release = Instant::now();
        let mut overruns: u64 = 0;

        while active.load(Ordering::SeqCst) {
            let start = Instant::now();
            sleep(cost).await; // simulated execution — no real CPU-bound work (Non-goal)
            let response = start.elapsed();

            if response > deadline {
                tracing::warn!(task = %name, response_ms = response.as_secs_f64() * 1000.0, deadline_ms = params.d, "deadline missed");
            } else {
                tracing::debug!(task = %name, response_ms = response.as_secs_f64() * 1000.0, "completed");
            }

            next_release += period;
            let now = Instant::now();
            if next_release > now {
                sleep_until(next_release).await;
            } else {
                overruns += 1;
                tracing::warn!(task = %name, overruns, "period overrun, next release already due");
            }
        }

        tracing::debug!(task = %name, "executor stopped");
    })
}
