//! Per-cycle planning.
//!
//! A cycle first turns its fetch result into a [`CyclePlan`], a list of
//! side effects to carry out, and only then executes them. Planning is pure
//! apart from updating the [`PollState`], so the change-detection rules can
//! be tested without a desktop or network.

use crate::config::NotificationSettings;
use crate::error::FetchError;
use chrono::NaiveTime;
use shared_types::StudyListing;
use std::time::Duration;

const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    NewStudies,
    NetworkError,
    BearerError,
}

impl NotificationKind {
    pub fn message(&self) -> &'static str {
        match self {
            NotificationKind::NewStudies => "New studies available!",
            NotificationKind::NetworkError => "Network error!",
            NotificationKind::BearerError => "Bearer error!",
        }
    }

    fn title_prefix(&self) -> &'static str {
        match self {
            NotificationKind::NewStudies => "Prolific update",
            NotificationKind::NetworkError | NotificationKind::BearerError => {
                "Prolific update error"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub app_name: String,
    pub message: String,
    pub icon: String,
    pub timeout: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, at: NaiveTime, settings: &NotificationSettings) -> Self {
        Self {
            kind,
            title: format!("{} {}", kind.title_prefix(), at.format(TIME_FORMAT)),
            app_name: settings.app_name.clone(),
            message: kind.message().to_string(),
            icon: settings.icon.clone(),
            timeout: settings.timeout,
        }
    }
}

/// One activity log record: `HH:MM:SS\n<listing>\n\n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub time: String,
    pub body: String,
}

impl LogEntry {
    pub fn new(at: NaiveTime, listing: &StudyListing) -> Self {
        Self {
            time: at.format(TIME_FORMAT).to_string(),
            body: listing.to_log_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("{}\n{}\n\n", self.time, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notification),
    OpenBrowser(String),
    Reserve(String),
    AppendLog(LogEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePlan {
    /// Whether the fetched listing was non-empty
    pub found: bool,
    pub effects: Vec<Effect>,
}

/// Most recently observed listing. Lives only as long as the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollState {
    pub last_listing: StudyListing,
}

/// Fixed inputs to planning that do not change between cycles
#[derive(Debug, Clone)]
pub struct PlanSettings {
    pub studies_url: String,
    pub reserve: bool,
    pub notifications: NotificationSettings,
}

/// Decide what a cycle should do and record the new listing in `state`.
///
/// A failed fetch stores an empty listing, so the next successful fetch is
/// reported as a change even if the studies are the same as before.
pub fn plan_cycle(
    state: &mut PollState,
    fetched: Result<StudyListing, &FetchError>,
    at: NaiveTime,
    settings: &PlanSettings,
) -> CyclePlan {
    let listing = match fetched {
        Ok(listing) => listing,
        Err(err) => {
            let kind = match err {
                FetchError::Network(_) => NotificationKind::NetworkError,
                FetchError::Api { .. } => NotificationKind::BearerError,
            };
            state.last_listing = StudyListing::empty();
            return CyclePlan {
                found: false,
                effects: vec![Effect::Notify(Notification::new(
                    kind,
                    at,
                    &settings.notifications,
                ))],
            };
        }
    };

    let mut effects = Vec::new();
    let found = !listing.is_empty();

    if found && listing != state.last_listing {
        effects.push(Effect::Notify(Notification::new(
            NotificationKind::NewStudies,
            at,
            &settings.notifications,
        )));
        effects.push(Effect::OpenBrowser(settings.studies_url.clone()));

        if settings.reserve {
            match listing.first_study_id() {
                Some(study_id) => effects.push(Effect::Reserve(study_id)),
                None => tracing::warn!("First study has no id, skipping reservation"),
            }
        }
    }

    effects.push(Effect::AppendLog(LogEntry::new(at, &listing)));
    state.last_listing = listing;

    CyclePlan { found, effects }
}
