use clap::{Parser, Subcommand};

/// Command-line interface definition for pollsched
/// CLI application to reconcile poll worker surveys with SQLite
#[derive(Parser)]
#[command(
    name = "pollsched",
    version = env!("CARGO_PKG_VERSION"),
    about = "Reconcile poll worker rosters and availability surveys into calendar-grid schedules",
    long_about = None
)]
pub struct Cli {
    /// Override repository path (useful for tests or file-backed runs)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the repository and configuration
    Init,

    /// Reconcile survey workbooks and write the availability report
    Run {
        /// Availability workbook (one sheet per calendar date, MM-DD sheet names)
        availability: String,

        #[arg(long = "roster", value_name = "FILE", help = "Roster workbook with worker details")]
        roster: Option<String>,

        #[arg(
            long = "out",
            value_name = "FILE",
            help = "Report path (default: WorkerAvailability.xlsx next to the availability workbook)"
        )]
        out: Option<String>,

        #[arg(
            long = "strict",
            help = "Abort a sheet when the same worker/date availability arrives twice"
        )]
        strict: bool,

        #[arg(
            long = "no-create",
            help = "Skip availability rows naming workers missing from the registry"
        )]
        no_create: bool,

        #[arg(long = "summary", value_name = "FILE", help = "Write run counters as JSON")]
        summary: Option<String>,
    },

    /// Manage the configuration file (view or check)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check the configuration file for invalid fields")]
        check: bool,
    },

    /// Print or manage the operational log table
    Log {
        #[arg(long = "print", help = "Print rows from the operational log table")]
        print: bool,
    },
}
