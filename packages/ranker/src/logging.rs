use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the non-blocking file writer flushing until dropped
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// Console output goes to stderr so stdout stays free for judgment prompts.
/// With `log_dir` set, a daily rolling `memorank.log` is written there too.
pub fn init_tracing(log_level: &str, log_dir: Option<&Path>) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(env_filter).with(console).init();
        return None;
    };

    if let Err(err) = std::fs::create_dir_all(dir) {
        tracing_subscriber::registry().with(env_filter).with(console).init();
        tracing::warn!(error = %err, dir = %dir.display(), "file logging disabled");
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, dir, "memorank.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Some(FileLogGuard { _guard: guard })
}
