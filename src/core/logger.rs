/// Installs env_logger at `info`; `RUST_LOG` directives take precedence.
pub fn setup_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
