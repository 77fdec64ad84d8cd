//! Polls the Prolific studies API and alerts the user when the list of
//! available studies changes.

pub mod activity_log;
pub mod client;
pub mod config;
pub mod desktop;
pub mod effects;
pub mod error;
pub mod poller;

pub use client::{ListingSource, ProlificClient};
pub use config::{Cli, PollerConfig};
pub use desktop::{Desktop, SystemDesktop};
pub use poller::Poller;
