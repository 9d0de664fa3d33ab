//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `timeblock_core` wiring end to
//!   end against an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;

use timeblock_core::db::open_db_in_memory;
use timeblock_core::{CalendarService, Priority, SqliteBlockRepository, TimeBlock};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("timeblock_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("timeblock_core version={}", timeblock_core::core_version());

    let mut conn = open_db_in_memory()?;
    let service = CalendarService::new(SqliteBlockRepository::new(&mut conn));

    // 14:00-15:00 standup vs an overlapping 14:30-15:30 review: the
    // higher-priority review displaces the standup.
    let hour_ms: i64 = 60 * 60 * 1000;
    let standup = TimeBlock::new("standup", 14 * hour_ms, 15 * hour_ms, Priority::Important);
    service.schedule(&standup)?;

    let review = TimeBlock::new(
        "incident review",
        14 * hour_ms + 30 * 60 * 1000,
        15 * hour_ms + 30 * 60 * 1000,
        Priority::UrgentImportant,
    );
    let resolution = service.schedule(&review)?;

    println!(
        "placed `{}` at [{}, {})",
        resolution.placed.title, resolution.placed.start_ms, resolution.placed.end_ms
    );
    for moved in &resolution.displaced {
        println!(
            "displaced `{}` to [{}, {})",
            moved.title, moved.start_ms, moved.end_ms
        );
    }

    Ok(())
}
