//! Tracing subscriber setup for the binary

use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter directive
pub const LOG_ENV: &str = "RELIEF_LOG";

/// Pick the filter directive: `RELIEF_LOG` or config, then `-v`, then `warn`
pub fn filter_directive(configured: Option<&str>, verbose: bool) -> String {
    match configured.filter(|d| !d.trim().is_empty()) {
        Some(directive) => directive.to_string(),
        None if verbose => "debug".to_string(),
        None => "warn".to_string(),
    }
}

/// Install a stderr subscriber. Safe to call more than once.
pub fn init_tracing(configured: Option<&str>, verbose: bool) {
    let directive = filter_directive(configured, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_precedence() {
        assert_eq!(filter_directive(Some("relief=trace"), true), "relief=trace");
        assert_eq!(filter_directive(None, true), "debug");
        assert_eq!(filter_directive(Some("  "), false), "warn");
        assert_eq!(filter_directive(None, false), "warn");
    }
}
