//! Interval timer engine
//!
//! A pure state machine: the host calls [`IntervalTimer::tick`] once per
//! elapsed second while the timer is running and reacts to the returned
//! [`Cue`]. No timing or I/O happens here.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// TABATA work interval length in seconds
pub const TABATA_WORK_SECONDS: u32 = 20;
/// TABATA rest interval length in seconds
pub const TABATA_REST_SECONDS: u32 = 10;
/// EMOM round length in seconds
pub const EMOM_ROUND_SECONDS: u32 = 60;
/// Upper bound for the AMRAP countdown budget (24 hours)
pub const MAX_TARGET_MINUTES: u32 = 24 * 60;

/// Training discipline driving the transition function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    ForTime,
    Amrap,
    Emom,
    Tabata,
}

impl TimerMode {
    pub const ALL: [TimerMode; 4] = [
        TimerMode::ForTime,
        TimerMode::Amrap,
        TimerMode::Emom,
        TimerMode::Tabata,
    ];

    /// Label shown on the workout screen
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::ForTime => "FOR TIME",
            TimerMode::Amrap => "AMRAP",
            TimerMode::Emom => "EMOM",
            TimerMode::Tabata => "TABATA",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "fortime" => Ok(TimerMode::ForTime),
            "amrap" => Ok(TimerMode::Amrap),
            "emom" => Ok(TimerMode::Emom),
            "tabata" => Ok(TimerMode::Tabata),
            _ => {
                let expected: Vec<&str> = TimerMode::ALL.iter().map(TimerMode::label).collect();
                Err(format!(
                    "unknown timer mode '{}' (expected one of {})",
                    s,
                    expected.join(", ")
                ))
            }
        }
    }
}

/// Accepts the same spellings as `FromStr`, so `"FOR_TIME"` and `"for-time"` both work
impl<'de> Deserialize<'de> for TimerMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// TABATA sub-phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Work,
    Rest,
}

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerStatus {
    Ready,
    Running,
    Paused,
    Finished,
}

/// Discrete event emitted on a transition boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cue {
    RoundRollover,
    PhaseFlip,
    AmrapExpired,
}

/// Per-session configuration; only changes while the timer is idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub mode: TimerMode,
    pub target_minutes: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
}

impl TimerConfig {
    /// Build a config, clamping `target_minutes` to `1..=MAX_TARGET_MINUTES`
    pub fn new(mode: TimerMode, target_minutes: u32) -> Self {
        Self {
            mode,
            target_minutes: clamp_target(target_minutes),
            work_seconds: TABATA_WORK_SECONDS,
            rest_seconds: TABATA_REST_SECONDS,
        }
    }
}

fn clamp_target(minutes: u32) -> u32 {
    minutes.clamp(1, MAX_TARGET_MINUTES)
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(TimerMode::ForTime, 1)
    }
}

/// Serializable view of the timer for the host UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub status: TimerStatus,
    pub running: bool,
    pub elapsed_seconds: u32,
    pub round: u32,
    pub phase: Phase,
    pub target_minutes: u32,
    pub display: String,
}

/// Timer state for one workout screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    config: TimerConfig,
    running: bool,
    elapsed_seconds: u32,
    phase: Phase,
    round: u32,
    status: TimerStatus,
}

impl IntervalTimer {
    /// Create a READY timer for the given configuration
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            running: false,
            elapsed_seconds: 0,
            phase: Phase::Work,
            round: 1,
            status: TimerStatus::Ready,
        }
    }

    /// Switch discipline. Any running or paused session is discarded.
    pub fn configure(&mut self, mode: TimerMode) {
        self.reset();
        self.config.mode = mode;
    }

    /// Change the countdown budget. Accepted only while READY or FINISHED.
    pub fn set_target_minutes(&mut self, minutes: u32) -> bool {
        match self.status {
            TimerStatus::Ready | TimerStatus::Finished => {
                self.config.target_minutes = clamp_target(minutes);
                true
            }
            TimerStatus::Running | TimerStatus::Paused => false,
        }
    }

    /// Start or resume. Returns `false` if the timer was already running.
    pub fn start(&mut self) -> bool {
        match self.status {
            TimerStatus::Running => return false,
            TimerStatus::Paused => {}
            TimerStatus::Ready | TimerStatus::Finished => match self.config.mode {
                TimerMode::ForTime | TimerMode::Emom => {}
                TimerMode::Amrap => self.elapsed_seconds = self.config.target_minutes * 60,
                TimerMode::Tabata => self.phase = Phase::Work,
            },
        }

        self.running = true;
        self.status = TimerStatus::Running;
        true
    }

    /// Pause a running timer, keeping its counters
    pub fn pause(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        self.running = false;
        self.status = TimerStatus::Paused;
        true
    }

    /// Return to the freshly constructed state for the current mode
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_seconds = 0;
        self.round = 1;
        self.phase = Phase::Work;
        self.status = TimerStatus::Ready;
    }

    /// Advance by one second
    pub fn tick(&mut self) -> Option<Cue> {
        if !self.running {
            return None;
        }

        match self.config.mode {
            TimerMode::ForTime => self.tick_for_time(),
            TimerMode::Amrap => self.tick_amrap(),
            TimerMode::Emom => self.tick_emom(),
            TimerMode::Tabata => self.tick_tabata(),
        }
    }

    fn tick_for_time(&mut self) -> Option<Cue> {
        self.elapsed_seconds += 1;
        None
    }

    fn tick_amrap(&mut self) -> Option<Cue> {
        if self.elapsed_seconds == 0 {
            return None;
        }

        self.elapsed_seconds -= 1;
        if self.elapsed_seconds == 0 {
            self.running = false;
            self.status = TimerStatus::Finished;
            return Some(Cue::AmrapExpired);
        }
        None
    }

    fn tick_emom(&mut self) -> Option<Cue> {
        if self.elapsed_seconds < EMOM_ROUND_SECONDS - 1 {
            self.elapsed_seconds += 1;
            None
        } else {
            self.elapsed_seconds = 0;
            self.round += 1;
            Some(Cue::RoundRollover)
        }
    }

    fn tick_tabata(&mut self) -> Option<Cue> {
        let phase_len = match self.phase {
            Phase::Work => self.config.work_seconds,
            Phase::Rest => self.config.rest_seconds,
        };

        if self.elapsed_seconds + 1 < phase_len {
            self.elapsed_seconds += 1;
            return None;
        }

        self.elapsed_seconds = 0;
        match self.phase {
            Phase::Work => self.phase = Phase::Rest,
            Phase::Rest => {
                self.phase = Phase::Work;
                self.round += 1;
            }
        }
        Some(Cue::PhaseFlip)
    }

    /// `MM:SS` rendering of `elapsed_seconds`
    pub fn display_string(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }

    pub fn mode(&self) -> TimerMode {
        self.config.mode
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.config.mode,
            status: self.status,
            running: self.running,
            elapsed_seconds: self.elapsed_seconds,
            round: self.round,
            phase: self.phase,
            target_minutes: self.config.target_minutes,
            display: self.display_string(),
        }
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
