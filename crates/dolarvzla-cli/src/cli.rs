//! CLI argument definitions for DolarVZLA.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rates` | Resolve and print the current snapshot |
//! | `convert` | Convert an amount between VES, USD, EUR and USDT |
//! | `ask` | Ask the assistant a question about the current rates |
//! | `watch` | Refresh periodically and print every snapshot |
//! | `sources` | Show the configured source chain |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | env or `8000` | Per-request timeout in ms |
//! | `-v, --verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! dolarvzla rates --format table
//! dolarvzla convert 100 --from usd --to ves
//! dolarvzla ask "¿Conviene cambiar euros hoy?"
//! dolarvzla watch --interval-secs 60 --count 3
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// DolarVZLA - Venezuelan bolívar exchange rates
///
/// Official BCV dollar and euro rates plus the USDT market rate, with
/// fallback across several public sources.
#[derive(Debug, Parser)]
#[command(
    name = "dolarvzla",
    author,
    version,
    about = "Venezuelan bolívar exchange rates (BCV and USDT)",
    long_about = "dolarvzla resolves the official BCV rates for the dollar and the euro, plus \
the USDT market rate, trying several public sources in order.\n\
\n\
  • DolarVzla, then DolarApi, then a web-search grounded Gemini lookup\n\
  • USDT market rate from Yadio\n\
  • Conversion calculator and gap analysis\n\
  • Financial assistant (requires DOLARVZLA_API_KEY)\n\
\n\
Use 'dolarvzla <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds. Overrides DOLARVZLA_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log source attempts and fallbacks to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned key/value lines for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the official and market rates once.
    Rates,

    /// Convert an amount using the current rates.
    ///
    /// Currency keys: ves (or bs), usd (or usd_bcv), eur (or eur_bcv), usdt.
    Convert(ConvertArgs),

    /// Ask the financial assistant a question.
    Ask(AskArgs),

    /// Refresh periodically and print every new snapshot.
    ///
    /// With --count, the exit status follows the last snapshot printed.
    Watch(WatchArgs),

    /// Show the configured source chain.
    Sources,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Amount to convert.
    pub amount: f64,

    /// Source currency key.
    #[arg(long, default_value = "usd")]
    pub from: String,

    /// Target currency key.
    #[arg(long, default_value = "ves")]
    pub to: String,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Question, in any language.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes. Defaults to DOLARVZLA_REFRESH_SECS or 300.
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Stop after this many snapshots. Runs until interrupted when omitted.
    #[arg(long)]
    pub count: Option<usize>,
}
