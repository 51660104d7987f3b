use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db;
use crate::errors::AppResult;
use rusqlite::Connection;

pub fn handle(cli: &Cli) -> AppResult<()> {
    let config = Config::init_all(cli.db.clone(), cli.test)?;

    // A file-backed repository gets its log table up front so `log --print`
    // works before the first run.
    if config.database != ":memory:" {
        let conn = Connection::open(&config.database)?;
        db::ensure_log_table(&conn)?;
        db::log_operation(&conn, "init", &config.database, "repository initialized")?;
    }

    Ok(())
}
