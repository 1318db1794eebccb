use clap::{Parser, Subcommand};
use lapse_core::{PanelPreferences, TimerMode, TimerPanel};

mod scenarios;

#[derive(Parser)]
#[command(version, about = "Lapse timer panel demos")]
struct Cli {
    /// Decimal places for formatted durations
    #[arg(long)]
    precision: Option<usize>,

    /// Disable ANSI colors in the report
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Named, titled and auto-keyed timers plus an accumulating loop
    Basic,
    /// Sum and stack mode walkthrough
    Modes,
    /// Time sleep cycles under one key in any mode
    Sleep {
        /// Timer mode: default, sum or stack
        #[arg(long, default_value = "default")]
        mode: String,

        /// Timer key; generated when omitted
        #[arg(long)]
        key: Option<String>,

        /// Milliseconds slept per cycle
        #[arg(long, default_value_t = 75)]
        ms: u64,

        /// Number of start/stop cycles
        #[arg(long, default_value_t = 1)]
        cycles: u32,
    },
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();

    let mut preferences = PanelPreferences::default();
    if let Some(precision) = cli.precision {
        preferences.precision = precision;
    }
    if cli.no_color {
        preferences.colors = false;
    }

    let mut panel = TimerPanel::with_preferences(preferences);
    match cli.command {
        Commands::Basic => scenarios::basic(&mut panel),
        Commands::Modes => scenarios::modes(&mut panel),
        Commands::Sleep {
            mode,
            key,
            ms,
            cycles,
        } => {
            let mode = mode.parse::<TimerMode>().map_err(|e| e.to_string())?;
            scenarios::cycles(&mut panel, mode, key.as_deref(), ms, cycles)
        }
    }
    .map_err(|e| e.to_string())?;

    println!("{}", panel.tab());
    println!();
    print!("{}", panel.panel());
    Ok(())
}
