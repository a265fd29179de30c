use tracing_subscriber::{fmt, EnvFilter};

/// Info for the CLI plus the engine and storage crates that log writes.
pub const DEFAULT_LOG_FILTER: &str = "zbb_budget=info,zbb_core=info,zbb_storage_json=info";

/// Installs the global `fmt` subscriber writing to stderr so command output
/// on stdout stays machine readable.
pub fn init_tracing(filter: Option<&str>) {
    let directive = filter
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LOG_FILTER);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // Another subscriber may already be installed by an embedding process.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_engine_and_storage_targets() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        let directives: Vec<&str> = DEFAULT_LOG_FILTER.split(',').collect();
        for target in ["zbb_budget=info", "zbb_core=info", "zbb_storage_json=info"] {
            assert!(directives.contains(&target), "missing {target}");
        }
    }
}
