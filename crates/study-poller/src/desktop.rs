//! Desktop side effects: notifications and the default browser.

use crate::effects::Notification;
use crate::error::EffectError;

pub trait Desktop {
    fn notify(&self, notification: &Notification) -> Result<(), EffectError>;

    fn open_url(&self, url: &str) -> Result<(), EffectError>;
}

/// The user's actual desktop session
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn notify(&self, notification: &Notification) -> Result<(), EffectError> {
        let timeout_ms = u32::try_from(notification.timeout.as_millis()).unwrap_or(u32::MAX);

        notify_rust::Notification::new()
            .summary(&notification.title)
            .appname(&notification.app_name)
            .body(&notification.message)
            .icon(&notification.icon)
            .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
            .show()
            .map(|_| ())
            .map_err(|e| EffectError::Notification(e.to_string()))
    }

    fn open_url(&self, url: &str) -> Result<(), EffectError> {
        webbrowser::open(url).map_err(EffectError::Browser)
    }
}
