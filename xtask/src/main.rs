use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use clap_complete_nushell::Nushell;
use clap_mangen::Man;
use kui_engine::cli::Args;

use std::io::Write;
use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct XtaskArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate man page and shell completions.
    GenerateDocs,
    /// Run cargo check.
    Check,
    /// Run cargo test.
    Test,
    /// Run cargo clippy.
    Clippy,
    /// Run cargo fmt --check.
    FmtCheck,
}

fn main() -> Result<()> {
    let args = XtaskArgs::parse();

    match args.command {
        Commands::GenerateDocs => generate_docs().context("Failed to generate docs"),
        Commands::Check => run_cargo("check", &[]).context("cargo check failed"),
        Commands::Test => run_cargo("test", &[]).context("cargo test failed"),
        Commands::Clippy => {
            run_cargo("clippy", &["--", "-D", "warnings"]).context("cargo clippy failed")
        }
        Commands::FmtCheck => run_cargo("fmt", &["--", "--check"]).context("cargo fmt failed"),
    }
}

fn run_cargo(command: &str, args: &[&str]) -> Result<()> {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let mut cmd = Command::new(cargo);
    cmd.arg(command);
    cmd.args(args);
    // Run in the workspace root
    cmd.current_dir(project_root());

    let status = cmd
        .status()
        .context(format!("Failed to execute cargo {command}"))?;

    if !status.success() {
        anyhow::bail!("cargo {command} command failed");
    }
    Ok(())
}

fn project_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .unwrap()
        .to_path_buf()
}

fn generate_docs() -> Result<()> {
    let root_dir = project_root();
    let docs_dir = root_dir.join("docs");
    let man_dir = docs_dir.join("man");
    let completions_dir = docs_dir.join("completions");

    fs::create_dir_all(&man_dir).context("Failed to create man directory")?;
    fs::create_dir_all(&completions_dir).context("Failed to create completions directory")?;

    let cmd = Args::command();
    let bin_name = cmd.get_name().to_string();

    // --- Generate Man Page ---
    let man_path = man_dir.join(format!("{bin_name}.1"));
    println!("Generating man page: {man_path:?}");
    generate_man_page(&cmd, &man_path)?;

    // --- Generate Shell Completions ---
    generate_completions(&cmd, &completions_dir)?;

    println!(
        "Successfully generated man page and completions in: {}",
        docs_dir.display()
    );
    Ok(())
}

// --- Man Page Content Constants ---
// Note: Using roff formatting. \fB...\fR = bold, \fI...\fR = italic, \- = hyphen, \(bu = bullet

// clap_mangen generates the DESCRIPTION section from the command's about/long_about.

const MAN_KEY_SYNTAX: &str = r#"
.B Alphabet
.PP
\fB{bin_name}\fR matches against a stream of key codes, not bytes with modifiers bolted on. Raw bytes (1\-255) are read straight off the input fd; symbolic keys (cursor keys, function keys, a lone \fIEsc\fR press) only ever appear as the \fIoutput\fR of terminal\-sequence decoding, never as input.
.PP
.B Trigger/Replacement Text
.PP
Both sides of a mapping are written in the same \fB<Tag>\fR syntax: plain ASCII characters stand for themselves, and bracketed tags name a single key. Supported tags include \fB<Esc>\fR, \fB<CR>\fR/\fB<Enter>\fR, \fB<Tab>\fR, \fB<Space>\fR, \fB<BS>\fR, \fB<Del>\fR, \fB<Up>\fR/\fB<Down>\fR/\fB<Left>\fR/\fB<Right>\fR, \fB<Home>\fR/\fB<End>\fR, \fB<PageUp>\fR/\fB<PageDown>\fR, \fB<Insert>\fR, \fB<F1>\fR through \fB<F12>\fR, \fB<C\-x>\fR for a control chord over a letter, and bare numeric literals such as \fB<27>\fR or \fB<0x1b>\fR.
.IP \(bu 4
\fB\-\-map '<C\-a>=hello'\fR registers a single trigger/replacement pair.
.IP \(bu 4
\fB\-\-map\-file PATH\fR loads one \fItrigger\fR=\fIreplacement\fR pair per non\-empty, non\-comment line.
"#;

const MAN_MATCHING: &str = r#"
.B Longest Match, Last Writer Wins
.PP
When more than one registered trigger could still match the bytes read so far, \fB{bin_name}\fR keeps reading until only one candidate remains live, then commits to the \fIlongest\fR complete match rather than the first one found. Bytes read past the winning trigger are pushed back and reconsidered on the next call, so a trigger that turns out to be only a prefix match still leaves the rest of the stream intact.
.PP
If two mapping sets would complete a match of the same length on the same input, the set registered \fIlast\fR wins. This lets user macros shadow the built\-in terminal key database without needing to edit it.
.PP
.B Idle Cutoff
.PP
Each layer of the cascade has its own read timeout. If no further byte arrives before the timeout elapses, matching stops with whatever has been read so far; an incomplete prefix is emitted key\-by\-key rather than held forever, so a lone \fIEsc\fR press (never followed by a bracket byte) is never mistaken for the start of a cursor\-key sequence you are still waiting on.
"#;

const MAN_EXAMPLES: &str = r#"
.PP
.B Echo decoded keys from a terminal in raw mode:
.IP
.nf
{bin_name} < /dev/tty
.fi
.PP
Put the terminal in raw mode first (e.g. via \fBstty raw \-echo\fR) and watch decoded key names go by.
.PP
.B Register a macro ad hoc:
.IP
.nf
{bin_name} \-\-map '<C\-a>=hello'
.fi
.PP
Typing Ctrl\-A now emits the literal text \fIhello\fR instead of the control byte.
.PP
.B Load macros from a file:
.IP
.nf
{bin_name} \-\-map\-file ~/.config/kui/macros.kui
.fi
.PP
One \fItrigger\fR=\fIreplacement\fR pair per line; blank lines and \fB#\fR comments are ignored.
.PP
.B Dump statistics as JSON on exit:
.IP
.nf
{bin_name} \-\-stats\-json > /dev/null 2> stats.json
.fi
"#;

const MAN_CASCADE: &str = r#"
\fB{bin_name}\fR resolves keys through a two\-stage cascade rather than a single flat table.
.PP
.B Terminal Layer
.PP
The innermost context reads raw bytes directly from the input fd and matches them against a fixed built\-in table of xterm/VT220 escape sequences (cursor keys, function keys, Home/End/PageUp/PageDown, Insert/Delete, and the lone \fIEsc\fR press). Its output is a stream of logical keys: ordinary bytes pass through unchanged, and each recognized escape sequence collapses to one symbolic key code.
.PP
.B User Layer
.PP
The outer context's upstream is the terminal layer itself, not the raw fd. It asks the terminal layer for a buffered key first; only if none is available does it check whether more raw bytes are ready before asking the terminal layer to decode one. This keeps a long user\-macro timeout from forcing every terminal read to wait that long. Once it has a logical key, it applies whatever macro mapping sets the caller registered.
.PP
Applications only ever call the outer (user) layer's \fBGetKey\fR; the terminal layer is an implementation detail they never see directly.
"#;

const MAN_STATISTICS: &str = r#"
\fB{bin_name}\fR collects run statistics as it resolves keys, printed once on exit.
.PP
.B Metrics Reported (Human-Readable):
.IP "\fBRuntime\fR" 4
Wall-clock time since the process started resolving keys.
.IP "\fBKeys Resolved\fR" 4
Total logical keys returned to the caller (pass-through bytes plus expansions).
.IP "\fBPass-Through Bytes\fR" 4
Raw bytes that matched no trigger in either layer and were returned unchanged.
.IP "\fBTerminal-Sequence Decodes\fR" 4
Escape sequences the terminal layer collapsed into a single symbolic key.
.IP "\fBUser-Macro Expansions\fR" 4
Triggers matched against a caller-registered mapping set, broken down per trigger.
.IP "\fBIdle Ticks\fR" 4
Times \fBGetKey\fR returned idle because no input arrived before the configured timeout.
.PP
.B JSON Output (\-\-stats\-json):
.IP
Emits the same counts as a single JSON object to standard error, with per-trigger expansion counts as a nested object, suitable for scripting.
"#;

const MAN_LOGGING: &str = r#"
\fB{bin_name}\fR provides several logging options for debugging and monitoring, written to standard error:
.PP
.B Log Flags:
.IP "\fB\-\-verbose\fR" 4
Enable verbose per-key tracing at the matcher level. Sets the default log filter to a more detailed level if \fBRUST_LOG\fR is not set.
.IP "\fB\-\-echo\-names\fR" 4
Print decoded keys as their \fB<Tag>\fR name (e.g. \fB<Up>\fR) instead of raw bytes. Useful for interactively discovering key syntax.
.PP
.B Environment Variable: RUST_LOG
.IP
Provides fine-grained control over logging using the \fBtracing_subscriber::EnvFilter\fR format. Overrides the default level set by \fB\-\-log\-filter\fR. Examples:
.RS 4
.IP "\fBRUST_LOG=info\fR" 4
Show INFO level messages and above (the default).
.IP "\fBRUST_LOG=debug\fR" 4
Show DEBUG level messages and above, including per-pass matcher state transitions.
.IP "\fBRUST_LOG=trace\fR" 4
Show all messages, including TRACE level (very verbose, one line per fed key).
.IP "\fBRUST_LOG=kui_engine::mapset=trace\fR" 4
Set INFO level globally, but TRACE level for the matcher module only.
.RE
.IP
See the \fBtracing_subscriber\fR documentation for the full filter syntax.
"#;

const MAN_SIGNALS: &str = r#"
\fB{bin_name}\fR handles the following signals gracefully to ensure clean shutdown and reporting of final statistics:
.IP \(bu 4
SIGINT (Interrupt, typically Ctrl+C)
.IP \(bu 4
SIGTERM (Termination signal)
.IP \(bu 4
SIGQUIT (Quit signal)
.PP
When any of these signals are received, the program will:
.IP 1. 4
Stop the main key-resolution loop.
.IP 2. 4
Signal the logger thread to stop processing queued messages.
.IP 3. 4
Wait for the logger thread to finish and return the final cumulative statistics.
.IP 4. 4
Print the final cumulative statistics to standard error (or JSON with \fB\-\-stats\-json\fR).
.IP 5. 4
Exit cleanly (typically with status 0).
"#;

const MAN_EXIT_STATUS: &str = r#"
.IP 0 4
Success. The program completed normally or was terminated cleanly by a handled signal (SIGINT, SIGTERM, SIGQUIT). Final statistics were printed.
.IP 1 4
Runtime error: failure resolving a key (upstream I/O error), or the logger thread panicked.
.IP 2 4
Configuration error: a \fB\-\-map\fR or \fB\-\-map\-file\fR entry failed to decode, or the map file could not be read.
"#;

const MAN_ENVIRONMENT: &str = r#"
.TP
.B RUST_LOG
Controls the logging verbosity and filtering, overriding defaults set by \fB\-\-log\-filter\fR. See the LOGGING section for details and examples. Uses the \fBtracing_subscriber::EnvFilter\fR format.
.TP
.B RUST_BACKTRACE
Set to \fB1\fR or \fBfull\fR to enable backtraces on panic, which can be helpful for debugging crashes.
"#;

const MAN_PERFORMANCE: &str = r#"
\fB{bin_name}\fR is designed for low-latency interactive key resolution, not batch throughput.
.PP
.B Architecture:
.IP \(bu 4
\fBMain Thread\fR: Calls the manager's \fBGetKey\fR in a loop, writes resolved keys to stdout, and forwards a lightweight resolution record to the logger thread via a bounded \fBcrossbeam-channel\fR using a non-blocking send.
.IP \(bu 4
\fBLogger Thread\fR: Receives resolution records, updates a \fBStatsCollector\fR, and performs tracing to stderr. If the channel fills up, records are dropped rather than blocking key resolution.
.PP
.B Latency Considerations:
.IP \(bu 4
The terminal layer's read timeout should stay short (tens of milliseconds) since it only needs to distinguish a lone \fIEsc\fR press from the start of a longer escape sequence; the user layer's timeout can be much longer since it governs how long the application is willing to wait for the next logical key.
.IP \(bu 4
Each mapping set is matched independently per \fBFindKey\fR pass with its own cursor; registering very large mapping sets increases the per-key comparison cost roughly logarithmically, not linearly, thanks to the sorted-container cursor advance.
.PP
.B Benchmarking:
.IP
Use \fBcargo bench\fR to run microbenchmarks of the matcher's hot path (\fBMatcher::feed\fR) under varying mapping-set sizes and match depths.
"#;

const MAN_BUGS: &str = r#"
Please report bugs, issues, or feature requests via the project's issue tracker.
"#;

const MAN_SEE_ALSO: &str = r#"
\fBterminfo\fR(5), \fBstty\fR(1), \fBtermios\fR(3)
"#;

const MAN_TROUBLESHOOTING: &str = r#"
.TP
.B A macro never fires:
Check that the trigger text decodes the way you expect — run with \fB\-\-echo\-names\fR and press the key combination to see exactly what key sequence was read, then compare it against your \fB\-\-map\fR or \fB\-\-map\-file\fR entry.
.TP
.B Arrow keys or function keys pass through as raw bytes:
The terminal's escape sequence may not be in the built-in table (it covers the common xterm/VT220 sequences). Use \fB\-\-echo\-names\fR and \fB\-\-verbose\fR to see what bytes actually arrive.
.TP
.B A short macro seems to "eat" a longer one:
Registration order matters only for tie-breaking between \fIdifferent mapping sets\fR on a same-length match; within a single mapping set the longest match always wins regardless of registration order.
.TP
.B Resource exhaustion error:
Raise \fB\-\-lookahead\-max\fR if a registered trigger is unusually long, or check for an unbounded mapping-set construction bug.
"#;

const MAN_THEORY_OF_OPERATION: &str = r#"
\fB{bin_name}\fR resolves input through an incremental longest-match matcher layered into a two-stage cascade.
.PP
.B Matcher:
.IP 1. 4
Entries in a mapping set are kept sorted by trigger, so a shorter trigger always sorts before any trigger it is a prefix of.
.IP 2. 4
Feeding a key advances a cursor through the sorted entries using the previous position's bounds as an anchor, skipping any entry that is definitively "too small" for the bytes read so far.
.IP 3. 4
As soon as no registered trigger could still extend the keys read so far, the match is resolved in favor of the longest complete trigger seen along the way; any surplus bytes are pushed back for the next pass.
.PP
.B Cascade:
.IP 1. 4
The terminal-decoding context owns the real input fd and matches against a fixed table of escape sequences.
.IP 2. 4
The user-macro context's upstream is the terminal context, consulted non-speculatively: pushback first, then a readiness probe, then a decode call.
.IP 3. 4
A shared, reference-counted handle (rather than a borrowed reference) ties the two contexts together, since the user context needs to call back into the terminal context on every read.
.PP
.B Threads:
.IP \(bu 4
The main thread owns the manager and writes resolved keys to stdout.
.IP \(bu 4
A dedicated logger thread receives resolution records over a bounded channel and updates statistics without blocking key resolution.
.IP \(bu 4
A signal-handling thread sets shutdown flags on SIGINT/SIGTERM/SIGQUIT.
"#;

/// Generates the man page with custom sections.
fn generate_man_page(cmd: &clap::Command, path: &Path) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    // Format date like 'Month Day, Year' e.g., "July 18, 2024"
    let date = chrono::Local::now().format("%B %d, %Y").to_string();
    let app_name_uppercase = cmd.get_name().to_uppercase();
    let bin_name = cmd.get_name();

    let mut buffer: Vec<u8> = Vec::new();

    // Render the standard sections (NAME, SYNOPSIS, DESCRIPTION, OPTIONS, AUTHOR) using clap_mangen
    // Note: clap_mangen uses the command's `about` for NAME and `long_about` (or `about`) for DESCRIPTION.
    // It doesn't include the .TH header automatically, so we add it manually first.
    writeln!(
        // Keep explicit args for .TH format
        buffer,
        r#".TH "{app_name_uppercase}" 1 "{date}" "{version}" "User Commands""#
    )?;
    Man::new(cmd.clone()).render(&mut buffer)?;

    // --- Append Custom Sections ---
    // These will appear *after* the standard sections generated by clap_mangen.
    // clap_mangen handles: NAME, SYNOPSIS, DESCRIPTION (from command's about/long_about), OPTIONS, VERSION, AUTHOR
    let custom_sections = [
        ("KEY SYNTAX", MAN_KEY_SYNTAX),
        ("MATCHING", MAN_MATCHING),
        ("EXAMPLES", MAN_EXAMPLES),
        ("CASCADE", MAN_CASCADE),
        ("STATISTICS", MAN_STATISTICS),
        ("LOGGING", MAN_LOGGING),
        ("SIGNALS", MAN_SIGNALS),
        ("THEORY OF OPERATION", MAN_THEORY_OF_OPERATION),
        ("PERFORMANCE", MAN_PERFORMANCE),
        ("TROUBLESHOOTING", MAN_TROUBLESHOOTING),
        ("EXIT STATUS", MAN_EXIT_STATUS),
        ("ENVIRONMENT", MAN_ENVIRONMENT),
        ("BUGS", MAN_BUGS),
        ("SEE ALSO", MAN_SEE_ALSO),
    ];

    for (title, content_template) in custom_sections {
        writeln!(buffer, ".SH {title}")?;
        // Format the content, replacing {bin_name} placeholder
        let formatted_content = content_template.replace("{bin_name}", bin_name);
        writeln!(buffer, "{formatted_content}")?;
    }

    // AUTHOR section is included by clap_mangen's render method.

    // Write the complete buffer (standard sections + custom sections) to the file
    fs::write(path, buffer).with_context(|| format!("Failed to write man page to {path:?}"))?;
    Ok(())
}

/// Generates shell completion files.
fn generate_completions(cmd: &clap::Command, completions_dir: &Path) -> Result<()> {
    let bin_name = cmd.get_name();
    // --- Generate Shell Completions ---
    let shells = [
        Shell::Bash,
        Shell::Elvish,
        Shell::Fish,
        Shell::PowerShell,
        Shell::Zsh,
    ];

    for shell in shells {
        let ext = match shell {
            Shell::Bash => "bash",
            Shell::Elvish => "elv",
            Shell::Fish => "fish",
            Shell::PowerShell => "ps1",
            Shell::Zsh => "zsh",
            _ => continue, // Should not happen
        };
        let completions_path = completions_dir.join(format!("{bin_name}.{ext}"));
        println!("Generating completion file: {completions_path:?}");
        let mut file = fs::File::create(&completions_path)
            .with_context(|| format!("Failed to create completion file: {completions_path:?}"))?;
        generate(shell, &mut cmd.clone(), bin_name, &mut file);
    }

    // Generate Nushell Completion
    let nu_path = completions_dir.join(format!("{bin_name}.nu"));
    println!("Generating Nushell completion file: {nu_path:?}");
    let mut nu_file = fs::File::create(&nu_path)
        .with_context(|| format!("Failed to create Nushell completion file: {nu_path:?}"))?;
    generate(Nushell, &mut cmd.clone(), bin_name, &mut nu_file);

    Ok(())
}
