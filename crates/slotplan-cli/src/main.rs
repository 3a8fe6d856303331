use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "slotplan", version, about = "Energy-aware research task scheduler")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan tasks into daily schedules
    Plan(commands::plan::PlanArgs),
    /// Suggest adjustments for one planned day
    Suggest(commands::suggest::SuggestArgs),
    /// Export one planned day as JSON or text
    Export(commands::export::ExportArgs),
    /// Insights over completed tasks
    Insights(commands::insights::InsightsArgs),
    /// Show an energy curve
    Energy(commands::energy::EnergyArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Insights(args) => commands::insights::run(args),
        Commands::Energy(args) => commands::energy::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "slotplan", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
