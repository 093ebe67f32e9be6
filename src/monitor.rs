//! The polling loop: read the disk's diskstats line, fingerprint it, and
//! pulse the LED whenever the fingerprint moves.
//!
//! Per-tick failures are logged at debug level and never stop the loop.
//! Only [`preflight`] produces errors that stop the program.

use crate::collectors::diskstats::{self, RawDiskstat};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::led::{self, Actuator, SysfsLed};
use crate::models::fingerprint::{fingerprint, has_changed, Fingerprint};
use crate::models::summary::ActivitySummary;
use nix::unistd::{access, AccessFlags};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

/// Mutable state owned by the loop for the lifetime of one run.
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    /// Baseline for the next comparison; only ever replaced by a readable value.
    pub last_fingerprint: Fingerprint,
    pub activity_count:   u64,
    pub ticks:            u64,
    pub write_failures:   u64,
}

/// What a single tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Unchanged,
    /// Source or record missing this tick; nothing signalled, baseline kept.
    Unreadable,
    Activity { pulsed: bool },
}

/// Startup checks, in the order a user fixes them: LED, disk, readability.
pub fn preflight(config: &MonitorConfig) -> Result<()> {
    SysfsLed::new(&config.leds_dir, &config.led).probe()?;

    diskstats::find_record(&config.diskstats_path, &config.disk).map_err(|e| match e {
        MonitorError::RecordNotFound { key, path } => {
            MonitorError::Configuration(format!("Disk '{}' not found in {}", key, path.display()))
        }
        other => MonitorError::Configuration(other.to_string()),
    })?;

    access(&config.diskstats_path, AccessFlags::R_OK).map_err(|errno| {
        MonitorError::Configuration(format!("Cannot read {}: {}", config.diskstats_path.display(), errno))
    })
}

pub struct Monitor<A: Actuator> {
    config:   MonitorConfig,
    actuator: A,
    state:    LoopState,
    phase:    Phase,
}

impl<A: Actuator> Monitor<A> {
    /// Take the baseline reading. A zero (unreadable) baseline is fine: the
    /// first readable tick will then register as activity.
    pub fn new(config: MonitorConfig, actuator: A) -> Self {
        let mut monitor = Self {
            config,
            actuator,
            state: LoopState::default(),
            phase: Phase::Initializing,
        };
        monitor.state.last_fingerprint = monitor.read_fingerprint();
        debug!(baseline = %monitor.state.last_fingerprint, "baseline taken");
        monitor
    }

    pub fn state(&self) -> &LoopState { &self.state }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn actuator(&self) -> &A { &self.actuator }

    /// Fingerprint the current record, or the unreadable sentinel.
    pub fn read_fingerprint(&self) -> Fingerprint {
        self.read_record().map(|line| fingerprint(&line)).unwrap_or(Fingerprint::UNREADABLE)
    }

    fn read_record(&self) -> Option<String> {
        match diskstats::find_record(&self.config.diskstats_path, &self.config.disk) {
            Ok(line) => Some(line),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }

    /// One read-compare-signal step. Does not sleep.
    pub fn tick(&mut self) -> TickOutcome {
        self.state.ticks += 1;

        let line = match self.read_record() {
            Some(line) => line,
            None => return TickOutcome::Unreadable,
        };
        let current = fingerprint(&line);
        if current.is_unreadable() {
            return TickOutcome::Unreadable;
        }
        if !has_changed(self.state.last_fingerprint, current) {
            return TickOutcome::Unchanged;
        }

        self.state.activity_count += 1;
        info!("Disk activity detected on {} (count: {})", self.config.disk, self.state.activity_count);
        if let Some((_, stat)) = RawDiskstat::parse_line(&line) {
            debug!(
                reads = stat.reads_completed,
                writes = stat.writes_completed,
                in_flight = stat.ios_in_progress,
                "counters"
            );
        }

        let pulsed = match led::pulse(&mut self.actuator, self.config.on_brightness, self.config.pulse_width) {
            Ok(()) => true,
            Err(e) => {
                self.state.write_failures += 1;
                debug!("{}", e);
                false
            }
        };

        self.state.last_fingerprint = current;
        TickOutcome::Activity { pulsed }
    }

    /// Tick until `shutdown` is set, sleeping the poll interval after every tick.
    ///
    /// The flag is only looked at between ticks, so a pulse that has started
    /// always finishes with the LED off.
    pub fn run(&mut self, shutdown: &AtomicBool) -> ActivitySummary {
        let started_at = chrono::Local::now();
        let start = Instant::now();
        self.phase = Phase::Running;

        while !shutdown.load(Ordering::SeqCst) {
            self.tick();
            thread::sleep(self.config.poll_interval);
        }

        self.phase = Phase::ShuttingDown;
        info!("Termination requested, shutting down");

        let summary = ActivitySummary {
            disk:           self.config.disk.clone(),
            led:            self.config.led.clone(),
            activity_count: self.state.activity_count,
            ticks:          self.state.ticks,
            write_failures: self.state.write_failures,
            started_at:     started_at.to_rfc3339(),
            duration_ms:    start.elapsed().as_millis() as u64,
        };
        self.phase = Phase::Terminated;
        summary
    }
}
