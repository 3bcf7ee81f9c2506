use bcore_logger::{LevelFilter, Logger};
use tracing::Level;

#[test]
fn explicit_directives_replace_the_base_level() {
    let logger = Logger::builder()
        .name("bcore-filter")
        .level(LevelFilter::WARN)
        .env_filter("bcore=debug")
        .init()
        .expect("logger should initialize");

    assert!(logger.guard().is_none(), "console output needs no background writer");
    assert!(tracing::enabled!(target: "bcore", Level::DEBUG));
    assert!(tracing::enabled!(target: "bcore::config", Level::DEBUG));
    assert!(!tracing::enabled!(target: "bcore", Level::TRACE));
    assert!(!tracing::enabled!(target: "elsewhere", Level::TRACE));
}
