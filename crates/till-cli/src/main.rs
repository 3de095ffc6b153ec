#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "till: a point-of-sale register for the terminal",
    long_about = None
)]
struct Cli {
    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for --format json).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Run as if till was started in this directory.
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a till register",
        long_about = "Initialize a till register in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a register in the current directory\n    till init\n\n    # Start over with an empty register\n    till init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Ring up a product",
        long_about = "Add a product row to the open sale, opening a fresh sale when none is open.",
        after_help = "EXAMPLES:\n    # Two cartons of milk at $3.50 each\n    till add \"Milk\" 3.50 2\n\n    # Emit machine-readable output\n    till add \"Milk\" 3.50 2 --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the open sale",
        long_about = "Show the open sale: its number, every row, and the running total.",
        after_help = "EXAMPLES:\n    # What is rung up so far?\n    till status\n\n    # Emit machine-readable output\n    till status --json"
    )]
    Status,

    #[command(
        next_help_heading = "Read",
        about = "Print the running total",
        long_about = "Print the running total of the open sale. Zero when no sale is open.",
        after_help = "EXAMPLES:\n    # Just the amount\n    till total\n\n    # Emit machine-readable output\n    till total --json"
    )]
    Total,

    #[command(
        next_help_heading = "Lifecycle",
        about = "Finalize the open sale",
        long_about = "Finalize the open sale: compute the total, seal the sale, and print the receipt.",
        after_help = "EXAMPLES:\n    # Close out the current sale\n    till checkout\n\n    # Emit machine-readable output\n    till checkout --json"
    )]
    Checkout,

    #[command(
        next_help_heading = "Lifecycle",
        about = "Discard the open sale",
        long_about = "Discard the open sale and all of its rows. Closed sales are untouched.",
        after_help = "EXAMPLES:\n    # Abandon the current sale\n    till void"
    )]
    Void,

    #[command(
        next_help_heading = "Read",
        about = "List past sales",
        long_about = "List every sale on this register, oldest first.",
        after_help = "EXAMPLES:\n    # All sales\n    till history\n\n    # Emit machine-readable output\n    till history --json"
    )]
    History,

    #[command(
        next_help_heading = "Read",
        about = "Show one sale by number",
        long_about = "Show the full receipt for a single sale, looked up by its number.",
        after_help = "EXAMPLES:\n    # Show a receipt\n    till show K7Q2M9X1\n\n    # Emit machine-readable output\n    till show K7Q2M9X1 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Interactive",
        about = "Open the register screen",
        long_about = "Open the full-screen register: type product, price, and quantity; F1 adds, F2 checks out, F5 voids.",
        after_help = "EXAMPLES:\n    # Run the register\n    till ui"
    )]
    Ui,

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    till completions bash\n\n    # Generate zsh completions\n    till completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TILL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "till_cli=debug,till_core=debug,info"
        } else {
            "till_cli=info,till_core=info,warn"
        })
    });

    let format = env::var("TILL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let project_root = match cli.dir {
        Some(ref dir) => dir.clone(),
        None => env::current_dir()?,
    };

    let user_config = till_core::config::load_user_config()?;
    let output = output::resolve_output_mode(cli.format, cli.json, user_config.output.as_deref());

    match cli.command {
        Commands::Init(args) => cmd::init::run_init(&args, output, &project_root),
        Commands::Add(ref args) => cmd::add::run_add(args, output, cli.quiet, &project_root),
        Commands::Status => cmd::status::run_status(output, &project_root),
        Commands::Total => cmd::total::run_total(output, &project_root),
        Commands::Checkout => cmd::checkout::run_checkout(output, &project_root),
        Commands::Void => cmd::void::run_void(output, cli.quiet, &project_root),
        Commands::History => cmd::history::run_history(output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_root),
        Commands::Ui => cmd::ui::run_ui(output, &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
