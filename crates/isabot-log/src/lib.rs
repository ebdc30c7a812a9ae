// ABOUTME: Shared logging setup for isabot binaries
// ABOUTME: init_for() sets up crate-filtered stderr output plus an optional debug log file

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Crate-filtered logging. Stderr gets INFO for the named crates and WARN for
/// everything else; the log file, when given, gets DEBUG for the named crates.
/// RUST_LOG overrides both. If the file can't be opened, prints a warning to
/// stderr and continues with stderr only.
pub fn init_for(crate_names: &[&str], log_file: Option<&Path>) {
    let file_layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(crate_filter(crate_names, tracing::Level::DEBUG)),
        ),
        Err(e) => {
            eprintln!("Warning: failed to open log file {}: {e}", path.display());
            None
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(crate_filter(crate_names, tracing::Level::INFO)))
        .with(file_layer)
        .init();
}

fn crate_filter(crate_names: &[&str], level: tracing::Level) -> EnvFilter {
    crate_names.iter().fold(
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        |filter, name| {
            let directive = format!("{name}={level}");
            filter.add_directive(directive.parse().unwrap_or_else(|_| level.into()))
        },
    )
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
