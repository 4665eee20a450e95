#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Concrete display, messaging and storage collaborators for the monitor.

pub mod console;
pub mod error;
pub mod influx;
pub mod message;
pub mod telegram;

pub use console::{ConsoleDisplay, LogNotifier};
pub use error::SinkError;
pub use influx::{InfluxConfig, InfluxStore, line_protocol};
pub use message::format_alert;
pub use telegram::{TelegramConfig, TelegramNotifier, send_message_url};
