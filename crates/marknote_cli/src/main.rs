//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `marknote_core` linkage and open the configured store.
//! - Keep output deterministic for quick local sanity checks.

use log::error;
use marknote_core::db::open_db;
use marknote_core::{init_logging, CoreConfig, NoteStore, SqliteKvBackend, UuidIdSupplier};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("marknote_core ping={}", marknote_core::ping());
    println!("marknote_core version={}", marknote_core::core_version());

    let config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("marknote config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is best-effort for this smoke binary; store errors still go to stderr.
    if let Err(err) = init_logging(&config) {
        eprintln!("marknote logging disabled: {err}");
    }

    match summarize(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_summary module=cli status=error error={err}");
            eprintln!("marknote store error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(config: &CoreConfig) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&config.db_path)?;
    let backend = SqliteKvBackend::try_new(&conn)?;
    let store = NoteStore::open(backend, UuidIdSupplier)?;

    let notes = store.list_enriched_notes();
    let tagged = notes.iter().filter(|note| !note.tags.is_empty()).count();
    println!("marknote db_path={}", config.db_path.display());
    println!(
        "marknote notes={} tagged_notes={} tags={}",
        notes.len(),
        tagged,
        store.tags().len()
    );
    Ok(())
}
