use std::sync::Once;

static INIT: Once = Once::new();

/// Filter directives for a level: `RUST_LOG` wins when set, otherwise the
/// level applies to this crate only
pub fn filter_directives(level: &str, rust_log: Option<String>) -> String {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ => format!("connection_wallet_core={}", level.trim().to_lowercase()),
    }
}

/// Install the `env_logger` backend for the `log` facade. Later calls are
/// no-ops.
pub fn init_logging(level: &str) {
    INIT.call_once(|| {
        let directives = filter_directives(level, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&directives).format_timestamp_secs();

        if let Err(e) = builder.try_init() {
            eprintln!("Failed to initialize logger: {e}");
        }
    });
}
