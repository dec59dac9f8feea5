use std::path::Path;

use tracing::subscriber::SetGlobalDefaultError;

/// Logs go to an hourly rolling file because the dashboard owns stdout.
pub fn setup_logger(log_dir: &Path) -> Result<(), SetGlobalDefaultError> {
    let file_appender = tracing_appender::rolling::hourly(log_dir, "banned_ip_map.log");
    let subscriber = tracing_subscriber::fmt::fmt()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
