//! The polling loop.
//!
//! Each cycle fetches the listing, plans its side effects against the
//! previous listing and then carries them out. Nothing that goes wrong
//! inside a cycle stops the loop.

use crate::activity_log::ActivityLog;
use crate::client::ListingSource;
use crate::config::{PollerConfig, Schedule};
use crate::desktop::Desktop;
use crate::effects::{plan_cycle, Effect, PlanSettings, PollState};
use crate::error::FetchError;
use chrono::Local;

pub struct Poller<S, D> {
    source: S,
    desktop: D,
    log: ActivityLog,
    settings: PlanSettings,
    schedule: Schedule,
    state: PollState,
}

impl<S: ListingSource, D: Desktop> Poller<S, D> {
    pub fn new(source: S, desktop: D, config: &PollerConfig) -> Self {
        Self {
            source,
            desktop,
            log: ActivityLog::new(config.log_file.clone()),
            settings: PlanSettings {
                studies_url: config.studies_url.clone(),
                reserve: config.participant_id.is_some(),
                notifications: config.notifications.clone(),
            },
            schedule: config.schedule,
            state: PollState::default(),
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Run one fetch-compare-act cycle. Returns true if any studies are listed.
    pub async fn run_cycle(&mut self) -> bool {
        let fetched = self.source.fetch_listings().await;
        let at = Local::now().time();

        let plan = match fetched {
            Ok(listing) => plan_cycle(&mut self.state, Ok(listing), at, &self.settings),
            Err(err) => {
                report_fetch_error(&err);
                plan_cycle(&mut self.state, Err(&err), at, &self.settings)
            }
        };

        for effect in plan.effects {
            self.perform(effect).await;
        }

        plan.found
    }

    /// Poll forever, sleeping between cycles according to the schedule.
    pub async fn run(&mut self) {
        tracing::info!(
            "Polling started (found delay: {:?}, idle delay: {:?})",
            self.schedule.found_delay,
            self.schedule.idle_delay
        );

        loop {
            let found = self.run_cycle().await;
            let delay = self.schedule.delay_after(found);
            tracing::debug!("Next poll in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn perform(&self, effect: Effect) {
        let result = match effect {
            Effect::Notify(notification) => {
                tracing::info!("{}: {}", notification.title, notification.message);
                self.desktop.notify(&notification)
            }
            Effect::OpenBrowser(url) => self.desktop.open_url(&url),
            Effect::Reserve(study_id) => {
                self.source.attempt_reservation(&study_id).await;
                Ok(())
            }
            Effect::AppendLog(entry) => self.log.append(&entry),
        };

        if let Err(e) = result {
            tracing::warn!("{}", e);
        }
    }
}

fn report_fetch_error(err: &FetchError) {
    match err {
        FetchError::Network(e) => tracing::error!("Network error: {}", e),
        FetchError::Api { status, reason } => {
            tracing::error!("Response error {} {}", status.as_u16(), reason)
        }
    }
}
