//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::state::{TimerConfig, TimerMode};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "teamw-timer")]
#[command(about = "Interval timer service for Team W workout sessions")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial timer mode (for-time, amrap, emom, tabata)
    #[arg(short, long, default_value = "for-time")]
    pub mode: TimerMode,

    /// AMRAP countdown budget in minutes
    #[arg(short, long, default_value = "10")]
    pub target_minutes: u32,

    /// JSON file of workout plans to serve
    #[arg(long)]
    pub plans: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timer configuration for a new session
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::new(self.mode, self.target_minutes)
    }
}
