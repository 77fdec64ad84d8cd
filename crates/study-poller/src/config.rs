use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LOG_FILE_NAME: &str = "prolific.log";

#[derive(Parser, Debug, Clone)]
#[command(name = "study-poller")]
#[command(about = "Keep updated with new studies on Prolific")]
#[command(
    long_about = "Polls the Prolific studies API and alerts you when the list of \
    available studies changes.\n\n\
    On every change a desktop notification is shown and the studies page is opened \
    in your browser. Every successful poll is appended to a log file."
)]
pub struct Cli {
    /// Bearer token used to authenticate against the API.
    ///
    /// Copy it from the Authorization header of a logged-in browser session.
    /// The "Bearer " prefix is optional.
    #[arg(short, long, env = "PROLIFIC_BEARER", hide_env_values = true)]
    pub bearer: String,

    /// Participant id. When set, the first new study is reserved automatically.
    #[arg(short = 'i', long = "id", env = "PROLIFIC_PARTICIPANT_ID")]
    pub participant_id: Option<String>,

    /// Base URL of the studies API.
    #[arg(
        long,
        env = "PROLIFIC_API_BASE_URL",
        default_value = "https://www.prolific.co/api/v1"
    )]
    pub api_base_url: String,

    /// Page opened in the browser when new studies appear.
    #[arg(
        long,
        env = "PROLIFIC_STUDIES_URL",
        default_value = "https://app.prolific.co/studies"
    )]
    pub studies_url: String,

    /// Log file for raw listings. Defaults to prolific.log next to the executable.
    #[arg(long, env = "STUDY_POLLER_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Seconds to wait after a poll that found studies.
    #[arg(long, env = "STUDY_POLLER_FOUND_DELAY_SECS", default_value_t = 15)]
    pub found_delay_secs: u64,

    /// Seconds to wait after a poll that found nothing or failed.
    #[arg(long, env = "STUDY_POLLER_IDLE_DELAY_SECS", default_value_t = 5)]
    pub idle_delay_secs: u64,

    /// Seconds a desktop notification stays visible.
    #[arg(long, env = "STUDY_POLLER_NOTIFICATION_TIMEOUT_SECS", default_value_t = 50)]
    pub notification_timeout_secs: u64,

    /// Notification icon. Relative paths are resolved against the install directory.
    #[arg(
        long,
        env = "STUDY_POLLER_ICON",
        default_value = "Paomedia-Small-N-Flat-Bell.ico"
    )]
    pub icon: String,

    /// Run a single poll cycle and exit (status 0 if studies were found).
    #[arg(long)]
    pub once: bool,
}

/// Authorization header value, immutable for the process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: &str) -> Result<Self> {
        let token = token.trim();
        let bare = match token.strip_prefix("Bearer") {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => token,
        };
        if bare.is_empty() {
            bail!("Bearer token must not be empty");
        }
        Ok(Credential(format!("Bearer {}", bare)))
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(Bearer ***)")
    }
}

/// Delays between cycles.
///
/// Polls slower while studies are listed and faster while nothing is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub found_delay: Duration,
    pub idle_delay: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            found_delay: Duration::from_secs(15),
            idle_delay: Duration::from_secs(5),
        }
    }
}

impl Schedule {
    pub fn delay_after(&self, found: bool) -> Duration {
        if found {
            self.found_delay
        } else {
            self.idle_delay
        }
    }
}

/// Settings for outgoing desktop notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub app_name: String,
    pub icon: String,
    pub timeout: Duration,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            app_name: "Prolific updater".to_string(),
            icon: "Paomedia-Small-N-Flat-Bell.ico".to_string(),
            timeout: Duration::from_secs(50),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub credential: Credential,
    pub participant_id: Option<String>,
    pub api_base_url: String,
    pub studies_url: String,
    pub log_file: PathBuf,
    pub schedule: Schedule,
    pub notifications: NotificationSettings,
}

impl PollerConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let install_dir = install_dir();

        let participant_id = cli
            .participant_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let log_file = cli
            .log_file
            .clone()
            .unwrap_or_else(|| install_dir.join(LOG_FILE_NAME));

        Ok(Self {
            credential: Credential::new(&cli.bearer).context("Invalid --bearer")?,
            participant_id,
            api_base_url: cli.api_base_url.trim_end_matches('/').to_string(),
            studies_url: cli.studies_url.clone(),
            log_file,
            schedule: Schedule {
                found_delay: Duration::from_secs(cli.found_delay_secs),
                idle_delay: Duration::from_secs(cli.idle_delay_secs),
            },
            notifications: NotificationSettings {
                icon: resolve_icon(&install_dir, &cli.icon),
                timeout: Duration::from_secs(cli.notification_timeout_secs),
                ..NotificationSettings::default()
            },
        })
    }

    pub fn listings_url(&self) -> String {
        format!("{}/studies/", self.api_base_url)
    }

    pub fn reservation_url(&self) -> String {
        format!("{}/submissions/", self.api_base_url)
    }
}

/// Directory of the running executable, falling back to the working directory.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_icon(install_dir: &Path, icon: &str) -> String {
    let path = Path::new(icon);
    if path.is_absolute() || !icon.contains('.') {
        // Absolute paths and freedesktop icon names are used as given
        icon.to_string()
    } else {
        install_dir.join(path).to_string_lossy().into_owned()
    }
}
