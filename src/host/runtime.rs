//! Overlay runtime - wires config, logging, HTTP, timers and a host together
//!
//! The runtime owns the session and dispatches every callback on the thread
//! that calls `pump`/`run`, one at a time.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use super::config::{Config, ConfigError};
use super::http::HttpJsonClient;
use super::logging::init_logging;
use super::ticker::ThreadTicker;
use crate::core::session::{OverlaySession, OverlaySettings, SessionIo};
use crate::core::traits::{OverlayHost, TimerKind};

const PUMP_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub struct OverlayRuntime<H: OverlayHost> {
    config: Config,
    host: H,
    fetcher: HttpJsonClient,
    ticker: ThreadTicker,
    session: OverlaySession<H::Source>,
}

impl<H: OverlayHost> OverlayRuntime<H> {
    /// Load the config file, start logging and build the runtime
    pub fn from_config_file(path: &Path, host: H) -> Result<Self, RuntimeError> {
        let config = Config::load(path)?;
        init_logging(config.logging.console, config.log_file_path());
        Self::new(config, host)
    }

    pub fn new(config: Config, host: H) -> Result<Self, RuntimeError> {
        let fetcher = HttpJsonClient::new(&config.api.user_agent, config.api.timeout())?;
        let ticker = ThreadTicker::new();
        let session = OverlaySession::new(config.session_options());
        Ok(Self {
            config,
            host,
            fetcher,
            ticker,
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn session(&self) -> &OverlaySession<H::Source> {
        &self.session
    }

    /// Apply the settings from the config file
    pub fn start(&mut self) {
        info!("[runtime] Starting");
        let settings = self.config.overlay.clone();
        self.update_settings(settings);
    }

    pub fn update_settings(&mut self, settings: OverlaySettings) {
        let io = SessionIo::new(&self.fetcher, &self.host, &self.ticker);
        self.session.apply_settings(settings, &io);
    }

    /// Apply settings from the host's JSON settings object
    pub fn update_settings_json(&mut self, json: &str) -> Result<(), RuntimeError> {
        let settings = OverlaySettings::from_host_json(json)?;
        self.update_settings(settings);
        Ok(())
    }

    pub fn generate_layout(&mut self) {
        let io = SessionIo::new(&self.fetcher, &self.host, &self.ticker);
        self.session.generate_layout(&io);
    }

    /// Wait up to `timeout` for one tick and handle it
    ///
    /// Returns whether a tick was handled.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        let Some(timer) = self.ticker.next_tick(timeout) else {
            return false;
        };

        let io = SessionIo::new(&self.fetcher, &self.host, &self.ticker);
        match timer {
            TimerKind::Slow => self.session.on_slow_tick(&io),
            TimerKind::Fast => self.session.on_fast_tick(&io),
        };
        true
    }

    /// Handle ticks until `shutdown` is set, then unload
    pub fn run(&mut self, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::SeqCst) {
            self.pump(PUMP_TIMEOUT);
        }
        self.unload();
    }

    pub fn unload(&mut self) {
        let io = SessionIo::new(&self.fetcher, &self.host, &self.ticker);
        self.session.unload(&io);
        self.ticker.shutdown();
        // Drop ticks posted before the threads stopped
        let stale = self.ticker.discard_pending();
        if stale > 0 {
            debug!(stale, "[runtime] Discarded pending ticks");
        }
    }
}
