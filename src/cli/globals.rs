use crate::{
    cli::commands::{ARG_API_URL, ARG_SESSION_FILE, ARG_TIMEOUT_MS},
    config::{AppConfig, ConfigOverrides},
};
use clap::ArgMatches;
use std::{path::PathBuf, time::Duration};

/// Config values given on the command line, shared by every subcommand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl GlobalArgs {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            api_url: matches.get_one::<String>(ARG_API_URL).cloned(),
            session_file: matches.get_one::<PathBuf>(ARG_SESSION_FILE).cloned(),
            timeout: matches
                .get_one::<u64>(ARG_TIMEOUT_MS)
                .map(|ms| Duration::from_millis(*ms)),
        }
    }

    /// Defaults, then environment, then these flags.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        AppConfig::load().with_overrides(ConfigOverrides {
            api_base_url: self.api_url.clone(),
            session_file: self.session_file.clone(),
            request_timeout: self.timeout,
        })
    }
}
