use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use ansi_term::Colour;
use rusqlite::Connection;

/// ANSI color per operation kind
fn color_for_operation(op: &str) -> Colour {
    match op {
        "run" => Colour::Blue,
        "run_complete" => Colour::Green,
        "run_failed" | "sheet_failure" => Colour::Red,
        "schema_mismatch" | "ambiguous" | "duplicate" | "unresolved" | "skipped_sheet" => {
            Colour::Yellow
        }
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print } = cmd else {
        return Ok(());
    };
    if !*print {
        return Ok(());
    }

    if cfg.database == ":memory:" {
        warning("The repository is in-memory; run with a file-backed --db to keep a log");
        return Ok(());
    }

    let conn = Connection::open(&cfg.database)?;
    db::ensure_log_table(&conn)?;
    let entries = db::load_log(&conn)?;

    if entries.is_empty() {
        println!("📜 Operational log is empty");
        return Ok(());
    }

    let id_w = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
    let op_w = entries
        .iter()
        .map(|e| op_target(e).len())
        .max()
        .unwrap_or(10);

    println!("📜 Operational log:\n");
    for entry in &entries {
        let color = color_for_operation(&entry.operation);
        let label = op_target(entry);
        let padding = " ".repeat(op_w.saturating_sub(label.len()));
        println!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            entry.id,
            entry.date,
            color.paint(label),
            padding,
            entry.message,
            id_w = id_w,
            date_w = date_w
        );
    }

    Ok(())
}

fn op_target(entry: &db::LogEntry) -> String {
    if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    }
}
