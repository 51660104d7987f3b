use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Repository path. `:memory:` keeps the registry ephemeral for the run.
    pub database: String,
    #[serde(default = "default_report_year")]
    pub report_year: i32,
    #[serde(default = "default_report_month")]
    pub report_month: u32,
    /// First and last day of the reporting window, inclusive.
    #[serde(default = "default_window_first_day")]
    pub window_first_day: u32,
    #[serde(default = "default_window_last_day")]
    pub window_last_day: u32,
    #[serde(default = "default_week_length")]
    pub week_length: u32,
    /// Sentinel string a survey checkbox cell carries when ticked.
    #[serde(default = "default_checked_marker")]
    pub checked_marker: String,
    #[serde(default)]
    pub strict_duplicates: bool,
    #[serde(default = "default_create_missing")]
    pub create_missing_workers: bool,
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

fn default_report_year() -> i32 {
    2024
}
fn default_report_month() -> u32 {
    10
}
fn default_window_first_day() -> u32 {
    12
}
fn default_window_last_day() -> u32 {
    30
}
fn default_week_length() -> u32 {
    7
}
fn default_checked_marker() -> String {
    "Checked".to_string()
}
fn default_create_missing() -> bool {
    true
}
fn default_output_file() -> String {
    "WorkerAvailability.xlsx".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: ":memory:".to_string(),
            report_year: default_report_year(),
            report_month: default_report_month(),
            window_first_day: default_window_first_day(),
            window_last_day: default_window_last_day(),
            week_length: default_week_length(),
            checked_marker: default_checked_marker(),
            strict_duplicates: false,
            create_missing_workers: default_create_missing(),
            output_file: default_output_file(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("pollsched")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".pollsched")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("pollsched.conf")
    }

    /// Default path of a file-backed repository
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("pollsched.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();
        if path.exists() {
            let content = fs::read_to_string(&path).expect("❌ Failed to read configuration file");
            serde_yaml::from_str(&content).expect("❌ Failed to parse configuration file")
        } else {
            Config::default()
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if !(1..=12).contains(&self.report_month) {
            return Err(AppError::Config(format!(
                "report_month {} is not a calendar month",
                self.report_month
            )));
        }
        if self.window_first_day > self.window_last_day {
            return Err(AppError::Config(format!(
                "reporting window starts on day {} but ends on day {}",
                self.window_first_day, self.window_last_day
            )));
        }
        if NaiveDate::from_ymd_opt(self.report_year, self.report_month, self.window_last_day)
            .is_none()
        {
            return Err(AppError::Config(format!(
                "day {} does not exist in {}-{:02}",
                self.window_last_day, self.report_year, self.report_month
            )));
        }
        if self.week_length == 0 {
            return Err(AppError::Config("week_length must be at least 1".to_string()));
        }
        if self.checked_marker.trim().is_empty() {
            return Err(AppError::Config("checked_marker must not be blank".to_string()));
        }
        Ok(())
    }

    /// Initialize configuration and repository files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // Repository path: user provided or in-memory default
        let config = match custom_db {
            Some(name) => {
                let p = std::path::Path::new(&name);
                let db_path = if name == ":memory:" || p.is_absolute() {
                    PathBuf::from(&name)
                } else {
                    dir.join(p)
                };
                Config {
                    database: db_path.to_string_lossy().to_string(),
                    ..Config::default()
                }
            }
            None => Config::default(),
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        println!("✅ Repository:  {}", config.database);

        Ok(config)
    }
}
