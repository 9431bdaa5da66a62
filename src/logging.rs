/// Tracing setup
///
/// Applications embedding the registry call `init_tracing` once at startup.
/// Logs go to the console and, when a directory is given, to a daily rotated
/// file named `sound-cue.YYYY-MM-DD.log`.
use std::path::PathBuf;

use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,

    /// Directory for rotated log files; console only when `None`
    pub log_dir: Option<PathBuf>,

    /// Mirror logs to stdout
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            log_dir: None,
            console: true,
        }
    }
}

impl LogSettings {
    /// Log directory in the user config folder
    pub fn default_log_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("SoundCue").join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = Some(dir);
        self
    }
}

fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(settings: &LogSettings) -> anyhow::Result<()> {
    let file_layer = match &settings.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = rolling::daily(log_dir, "sound-cue.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    let console_layer = settings.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(build_filter(&settings.default_filter))
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    if let Some(log_dir) = &settings.log_dir {
        tracing::info!("Log directory: {}", log_dir.display());
    }
    Ok(())
}
