//! Tagged console logger for launchbot
//!
//! Colored, timestamped output with one tag per subsystem. Debug output is
//! gated per module via `--debug-<module>` command-line flags.
use crate::arguments;
use chrono::Utc;
use colored::*;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    Startup,
    Api,
    Discovery,
    Filtering,
    Database,
    Poller,
    Alerts,
    Notify,
}

impl LogTag {
    fn label(&self) -> &'static str {
        match self {
            LogTag::Startup => "STARTUP",
            LogTag::Api => "API",
            LogTag::Discovery => "DISCOVERY",
            LogTag::Filtering => "FILTERING",
            LogTag::Database => "DATABASE",
            LogTag::Poller => "POLLER",
            LogTag::Alerts => "ALERTS",
            LogTag::Notify => "NOTIFY",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            LogTag::Startup => "🤖",
            LogTag::Api => "🌐",
            LogTag::Discovery => "🔎",
            LogTag::Filtering => "🧹",
            LogTag::Database => "🗄️",
            LogTag::Poller => "🔄",
            LogTag::Alerts => "🔔",
            LogTag::Notify => "📨",
        }
    }

    fn debug_enabled(&self) -> bool {
        match self {
            LogTag::Api => arguments::is_debug_api_enabled(),
            LogTag::Discovery => arguments::is_debug_discovery_enabled(),
            LogTag::Filtering => arguments::is_debug_filtering_enabled(),
            LogTag::Database => arguments::is_debug_database_enabled(),
            LogTag::Alerts | LogTag::Notify => arguments::is_debug_alerts_enabled(),
            _ => false,
        }
    }
}

fn timestamp() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

fn write_line(tag: LogTag, colored_label: ColoredString, message: &str) {
    println!(
        "{} {} {} {}",
        tag.icon(),
        colored_label,
        format!("[{}]", timestamp()).dimmed(),
        message
    );
    let _ = io::stdout().flush();
}

pub fn info(tag: LogTag, message: &str) {
    write_line(tag, tag.label().cyan().bold(), message);
}

pub fn warn(tag: LogTag, message: &str) {
    write_line(tag, tag.label().yellow().bold(), &message.yellow().to_string());
}

pub fn error(tag: LogTag, message: &str) {
    write_line(tag, tag.label().red().bold(), &message.red().to_string());
}

/// Only printed when the matching `--debug-<module>` flag is set
pub fn debug(tag: LogTag, message: &str) {
    if tag.debug_enabled() {
        write_line(tag, tag.label().purple().bold(), &message.dimmed().to_string());
    }
}

pub fn header(title: &str) {
    println!();
    println!(
        "{} {} {}",
        "🤖".green().bold(),
        "LaunchBot".green().bold(),
        format!("- {}", title).bright_white().bold()
    );
    println!("{}", "─".repeat(50).dimmed());
    let _ = io::stdout().flush();
}
