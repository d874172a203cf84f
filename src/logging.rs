use std::path::PathBuf;

use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};

use crate::config;

pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = log_dir()?;

    // File logs at debug, stderr gets info+ so the per-corpus run report is
    // visible without digging into the log directory.
    Logger::try_with_str("debug")?
        .log_to_file(FileSpec::default().directory(log_dir).basename(config::logging::LOG_FILE_NAME))
        .rotate(
            Criterion::Size(config::logging::LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config::logging::LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Info)
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    log::info!("{}", "=".repeat(60));
    log::info!("Voynich vector builder starting");
    log::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    log::info!("Platform: {}", std::env::consts::OS);
    log::info!("{}", "=".repeat(60));

    Ok(())
}

fn log_dir() -> anyhow::Result<PathBuf> {
    let dir = PathBuf::from(config::logging::LOG_DIR_REL);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed creating log dir {}", dir.display()))?;
    Ok(dir)
}
