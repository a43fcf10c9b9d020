//! Tracing subscriber setup for the overlay
//!
//! Output goes to an optional log file and optionally stdout, both through
//! non-blocking writers. `RUST_LOG` overrides the default filter.

use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::Layer as FmtLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Writer guards; dropping them would lose buffered lines
static WRITER_GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

const CRATE_DIRECTIVE: &str = "xbro_overlay=debug";

/// Install the global subscriber
///
/// `log_file_path`'s parent directory is created if needed. A second call,
/// or a call after another subscriber was installed, leaves logging as is.
pub fn init_logging(enable_console: bool, log_file_path: Option<PathBuf>) {
    let mut guards = Vec::new();

    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    if let Ok(directive) = CRATE_DIRECTIVE.parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    let file_layer = log_file_path.and_then(|path| {
        let dir = path.parent()?;
        let file_name = path.file_name()?.to_str()?;
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).ok()?;
        }
        let appender = tracing_appender::rolling::never(dir, file_name);
        Some(plain_layer(appender, &mut guards))
    });

    let console_layer = enable_console.then(|| plain_layer(std::io::stdout(), &mut guards));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        let _ = WRITER_GUARDS.set(guards);
    }
}

/// Uncolored fmt layer over a non-blocking writer; keeps its guard
fn plain_layer<S, W>(
    writer: W,
    guards: &mut Vec<WorkerGuard>,
) -> FmtLayer<S, DefaultFields, Format, NonBlocking>
where
    W: Write + Send + 'static,
{
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
    guards.push(guard);
    tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_crate_directive_parses() {
        assert!(CRATE_DIRECTIVE.parse::<Directive>().is_ok());
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let dir = tempdir().unwrap();
        init_logging(false, Some(dir.path().join("nested").join("overlay.log")));
        init_logging(true, None);
        assert!(dir.path().join("nested").is_dir());
    }
}
