//! Fixed-rate driver for the control cycle.
//!
//! Ticks never queue: when a tick overruns its period the missed deadlines
//! are dropped and the schedule is re-anchored at the current time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use super::cycle::ControlCycle;
use crate::common::CommandSink;

/// Counters collected by [`run_periodic`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerStats {
    pub ticks: u64,
    pub active_ticks: u64,
    pub overruns: u64,
    pub skipped_deadlines: u64,
}

/// Tick `cycle` every `period` until `stop` is set or `max_ticks` have run.
///
/// `period` defaults to the configured step time. Always finishes by
/// emitting a zero command.
pub fn run_periodic<R: Rng, S: CommandSink>(
    cycle: &mut ControlCycle<R>,
    sink: &mut S,
    period: Option<Duration>,
    stop: &AtomicBool,
    max_ticks: Option<u64>,
) -> RunnerStats {
    let period = period.unwrap_or_else(|| cycle.period());
    let mut stats = RunnerStats::default();
    let mut deadline = Instant::now();
    log::info!("Control loop started at {:?} period", period);

    while !stop.load(Ordering::Acquire) {
        if max_ticks.map_or(false, |max| stats.ticks >= max) {
            break;
        }

        let report = cycle.tick(sink);
        stats.ticks += 1;
        if report.emitted() {
            stats.active_ticks += 1;
        }

        deadline += period;
        let now = Instant::now();
        if now > deadline {
            let late = now - deadline;
            let missed = (late.as_nanos() / period.as_nanos().max(1)) as u64;
            stats.overruns += 1;
            stats.skipped_deadlines += missed;
            log::warn!(
                "Control tick overran its period by {:?} ({} deadlines skipped)",
                late,
                missed
            );
            deadline = now;
        } else {
            thread::sleep(deadline - now);
        }
    }

    cycle.shutdown(sink);
    log::info!("Control loop stopped after {} ticks", stats.ticks);
    stats
}
