use clap::Parser;

/// A terminal key-input engine: decodes raw escape sequences into logical
/// keys and expands user-registered macros on top of them.
/// Reads raw bytes from stdin (or a device fd), resolves them through the
/// two-stage cascade, and writes the resulting logical keys to stdout.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "A terminal key-input engine: decodes raw escape sequences into logical keys \
and expands user-registered macros on top of them.\n\
\n\
EXAMPLES:\n\
  # Echo decoded keys from a terminal in raw mode:\n\
  kui-probe < /dev/tty\n\
\n\
  # Load macro mappings from a file (one 'trigger = replacement' per line):\n\
  kui-probe --map-file macros.kui\n\
\n\
  # Register a single macro ad hoc:\n\
  kui-probe --map '<C-a>=hello'\n\
\n\
  # Dump stats as JSON on exit:\n\
  kui-probe --stats-json\n\
\n\
See README for more details and the key-syntax reference."
)]
pub struct Args {
    /// Read timeout for the terminal-decoding layer, in milliseconds.
    /// Short, since it only needs to wait long enough to tell a real
    /// multi-byte escape sequence from a lone Esc press. (Default: 40ms)
    #[arg(long, default_value = "40", value_name = "MS")]
    pub terminal_timeout_ms: u64,

    /// Read timeout for the user-macro layer, in milliseconds. Governs
    /// how long `kui-probe` blocks waiting for the next logical key.
    /// (Default: 1000ms)
    #[arg(long, default_value = "1000", value_name = "MS")]
    pub user_timeout_ms: u64,

    /// Maximum number of keys a single match attempt may buffer before
    /// giving up with a resource-exhaustion error. (Default: 4096)
    #[arg(long, default_value = "4096", value_name = "N")]
    pub lookahead_max: usize,

    /// One or more macro mappings, each as `trigger=replacement` using
    /// the `<Tag>` key-syntax (e.g. `<C-a>=hello`). May be repeated.
    #[arg(long = "map", value_name = "TRIGGER=REPLACEMENT")]
    pub maps: Vec<String>,

    /// Load macro mappings from a file, one `trigger=replacement` per
    /// non-empty, non-comment (`#`) line.
    #[arg(long, value_name = "PATH")]
    pub map_file: Option<String>,

    /// Echo decoded keys back to stdout as their `<Tag>` names instead of
    /// raw bytes. Useful for interactively discovering key syntax.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub echo_names: bool,

    /// `tracing_subscriber::EnvFilter` directive string. (Default: "info")
    #[arg(long, default_value = "info", value_name = "FILTER")]
    pub log_filter: String,

    /// Emit verbose per-key tracing at the matcher level.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,

    /// Output statistics as JSON to stderr on exit.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub stats_json: bool,

    /// Enable OpenTelemetry OTLP export of traces and metrics.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub otel: bool,

    /// OTLP collector endpoint, used only when `--otel` is set.
    #[arg(long, value_name = "URL")]
    pub otel_endpoint: Option<String>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
