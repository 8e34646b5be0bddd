//! Logging setup. Output goes to stderr so `--tokens` stays pipeable.

/// Installs the global logger; `verbose` adds resolution details.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}
