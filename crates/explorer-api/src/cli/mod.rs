//! CLI command definitions for the `explorer` binary.
//!
//! Uses clap derive macros for argument parsing. Resource commands follow a
//! noun-verb pattern (e.g., `explorer provider verify <id>`).

pub mod admin;
pub mod commission;
pub mod provider;
pub mod revenue;
pub mod seed;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use explorer_observe::LogFormat;

/// Travel marketplace backend: REST API and administration.
#[derive(Parser)]
#[command(name = "explorer", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty, global = true)]
    pub log_format: LogFormatArg,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "EXPLORER_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn,explorer=info,tower_http=info",
            1 => "info,explorer=debug,explorer_core=debug,explorer_infra=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Create the demo admin and tourist accounts if they are missing.
    Seed,

    /// Manage administrator accounts.
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },

    /// Manage user accounts.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Manage service providers.
    Provider {
        #[command(subcommand)]
        action: ProviderCommand,
    },

    /// Manage commissions.
    Commission {
        #[command(subcommand)]
        action: CommissionCommand,
    },

    /// Show paid revenue for the platform or one provider.
    Revenue {
        /// Provider ID (omit for platform revenue).
        #[arg(long)]
        provider: Option<String>,

        /// Range start (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        to: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Create a verified administrator.
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Password (prompted when omitted).
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// List all accounts.
    #[command(alias = "ls")]
    List,

    /// Mark an account as verified so it can log in.
    Verify {
        /// Account email.
        email: String,
    },
}

#[derive(Subcommand)]
pub enum ProviderCommand {
    /// List providers.
    #[command(alias = "ls")]
    List {
        /// Filter by verification status (pending, verified, rejected).
        #[arg(long)]
        status: Option<String>,

        /// Filter by service type (hotel, car_rental, guide).
        #[arg(long = "type")]
        service_type: Option<String>,
    },

    /// Approve a provider.
    Verify {
        /// Provider ID.
        id: String,
    },

    /// Reject a provider.
    Reject {
        /// Provider ID.
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CommissionCommand {
    /// List commissions awaiting payment.
    Pending,

    /// Mark a commission as paid.
    Pay {
        /// Commission ID.
        id: String,
    },
}
