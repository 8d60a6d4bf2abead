//! Log settings handed explicitly to the subscriber and the dispatcher.
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Emit per-item detail while listing certificates and profiles.
    pub verbose: bool,
}

impl LogSettings {
    pub fn default_directive(self) -> &'static str {
        if self.verbose {
            "devportal=debug,info"
        } else {
            "warn"
        }
    }
}

/// Install the global subscriber on stderr; stdout is reserved for the envelope.
///
/// `RUST_LOG` wins over the verbosity-derived default when set.
pub fn init(settings: LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
