use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::fs;

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        check,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();

    if *print_config {
        if path.exists() {
            println!("{}", fs::read_to_string(&path)?);
        } else {
            warning(format!("No config file at {:?}; defaults in effect", path));
        }
    }

    if *check {
        if !path.exists() {
            warning(format!("No config file at {:?}; nothing to check", path));
            return Ok(());
        }
        let content = fs::read_to_string(&path)?;
        let parsed: Config =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        parsed.validate()?;
        success(format!("Config file {:?} is valid", path));
    }

    Ok(())
}
