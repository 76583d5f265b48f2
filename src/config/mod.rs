//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.boathouse.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `BOATHOUSE_SERVICE_URL`,
//!    `BOATHOUSE_TOKEN`, ...
//! 4. **Command-line arguments** – `--service-url`/`-u`, `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! service_url = "https://boats.example.com/api"
//! token = "00Dxx-session"
//! boat_type = "a01Sailboat"
//! boat_id = "a02WindDancer"
//! request_timeout_seconds = 30
//! log_level = "debug"
//! ```

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::data::{BoatTypeFilter, DataError, HttpGatewayConfig, RecordId};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 20;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `BOATHOUSE_SERVICE_URL` or `--service-url`: Data service base URL
/// - `BOATHOUSE_TOKEN` or `--token`: Bearer token
/// - `BOATHOUSE_BOAT_TYPE` or `--boat-type`: Boat type to list
/// - `BOATHOUSE_BOAT_ID` or `--boat-id`: Boat whose reviews to show
/// - `BOATHOUSE_REQUEST_TIMEOUT_SECONDS`: Per-request timeout
/// - `BOATHOUSE_LOG_LEVEL` or `--log-level`: Default log filter
///
/// # Example
///
/// ```no_run
/// use boathouse::BoathouseConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = BoathouseConfig::load().expect("failed to load configuration");
/// let url = config.require_service_url().expect("service URL required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BOATHOUSE",
    discovery(
        dotfile_name = ".boathouse.toml",
        config_file_name = "boathouse.toml",
        app_name = "boathouse"
    )
)]
pub struct BoathouseConfig {
    /// Base URL of the boat data service.
    ///
    /// Can be provided via:
    /// - CLI: `--service-url <URL>` or `-u <URL>`
    /// - Environment: `BOATHOUSE_SERVICE_URL`
    /// - Config file: `service_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub service_url: Option<String>,

    /// Bearer token sent to the data service.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `BOATHOUSE_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Boat type identifier to search for; empty or absent lists every boat.
    ///
    /// Can be provided via:
    /// - CLI: `--boat-type <ID>` or `-b <ID>`
    /// - Environment: `BOATHOUSE_BOAT_TYPE`
    /// - Config file: `boat_type = "..."`
    #[ortho_config(cli_short = 'b')]
    pub boat_type: Option<String>,

    /// Boat to select after the search, showing its reviews.
    ///
    /// Can be provided via:
    /// - CLI: `--boat-id <ID>` or `-i <ID>`
    /// - Environment: `BOATHOUSE_BOAT_ID`
    /// - Config file: `boat_id = "..."`
    #[ortho_config(cli_short = 'i')]
    pub boat_id: Option<String>,

    /// Per-request timeout, in seconds. Defaults to 20.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Writes telemetry events to stderr as JSON lines.
    ///
    /// Can be provided via:
    /// - CLI: `--telemetry`
    /// - Config file: `telemetry = true`
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so `BOATHOUSE_TELEMETRY` is ignored.
    #[ortho_config()]
    pub telemetry: bool,

    /// Log filter used when `RUST_LOG` is unset. Defaults to `info`.
    #[ortho_config()]
    pub log_level: String,
}

impl Default for BoathouseConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            token: None,
            boat_type: None,
            boat_id: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            telemetry: false,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl BoathouseConfig {
    /// Returns the data service URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Configuration`] when no URL is configured.
    pub fn require_service_url(&self) -> Result<&str, DataError> {
        self.service_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DataError::Configuration {
                message: "data service URL is required (use --service-url or -u)".to_owned(),
            })
    }

    /// Filter for the configured boat type.
    #[must_use]
    pub fn boat_type_filter(&self) -> BoatTypeFilter {
        BoatTypeFilter::from_raw(self.boat_type.as_deref().unwrap_or_default())
    }

    /// Boat to select, ignoring blank values.
    #[must_use]
    pub fn selected_boat(&self) -> Option<RecordId> {
        self.boat_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(RecordId::from)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Gateway settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Configuration`] when no URL is configured.
    pub fn gateway_config(&self) -> Result<HttpGatewayConfig, DataError> {
        let base_url = self.require_service_url()?;
        Ok(HttpGatewayConfig::new(base_url)
            .with_token(self.token.clone())
            .with_timeout(self.request_timeout()))
    }
}
