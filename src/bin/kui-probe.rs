// Main application entry point.
// Orchestrates command-line parsing, a logger thread, the main get-key
// loop, signal handling, and final shutdown/stats reporting.

use std::fs;
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use colored::Colorize;
use crossbeam_channel::{bounded, Receiver, Sender};
use signal_hook::consts::signal::*;
use signal_hook::iterator::Signals;

use kui_engine::cli;
use kui_engine::config::Config;
use kui_engine::context::KeyResult;
use kui_engine::keycode::{describe, KeyCode};
use kui_engine::manager::KuiManager;
use kui_engine::mapset::MappingSet;
use kui_engine::stats::{Outcome, StatsCollector};

/// Messages the main loop forwards to the dedicated logger thread so
/// that per-key tracing never blocks key resolution.
enum LogMessage {
    Resolved { trigger_text: Option<String>, output: KeyCode },
    Idle,
}

fn run_logger(receiver: Receiver<LogMessage>, running: Arc<AtomicBool>) -> StatsCollector {
    let mut stats = StatsCollector::new();
    loop {
        match receiver.recv_timeout(std::time::Duration::from_millis(200)) {
            Ok(LogMessage::Resolved { trigger_text, output }) => {
                match trigger_text {
                    Some(t) if t.starts_with('<') && t.contains("Esc") => {
                        stats.record(Outcome::TerminalExpansion);
                    }
                    Some(t) => stats.record_user_expansion(&t),
                    None => stats.record(Outcome::PassThrough),
                }
                tracing::trace!(output = %describe(output), "key resolved");
            }
            Ok(LogMessage::Idle) => stats.record(Outcome::Idle),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }
    // Drain anything still queued after the sender side hung up.
    while let Ok(msg) = receiver.try_recv() {
        match msg {
            LogMessage::Resolved { trigger_text, .. } => match trigger_text {
                Some(t) => stats.record_user_expansion(&t),
                None => stats.record(Outcome::PassThrough),
            },
            LogMessage::Idle => stats.record(Outcome::Idle),
        }
    }
    stats
}

fn load_map_sets(args: &cli::Args) -> io::Result<MappingSet> {
    let mut set = MappingSet::new();
    if let Some(path) = &args.map_file {
        let contents = fs::read_to_string(path)?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((trigger, replacement)) = line.split_once('=') {
                if let Err(e) = set.register(trigger.trim(), replacement.trim()) {
                    eprintln!("{} {line:?}: {e}", "warning: skipping malformed mapping".yellow());
                }
            } else {
                eprintln!("{} {line:?}", "warning: expected 'trigger=replacement' in".yellow());
            }
        }
    }
    for spec in &args.maps {
        if let Some((trigger, replacement)) = spec.split_once('=') {
            if let Err(e) = set.register(trigger, replacement) {
                eprintln!("{} {spec:?}: {e}", "warning: skipping malformed --map".yellow());
            }
        } else {
            eprintln!("{} {spec:?}", "warning: expected 'trigger=replacement' in --map".yellow());
        }
    }
    Ok(set)
}

fn main() -> io::Result<()> {
    let args = cli::parse_args();
    let config = Config::from(&args);

    let _otel_meter = kui_engine::logging::init_tracing(&config);

    let stdin_fd = io::stdin().as_raw_fd();
    let mut manager = KuiManager::create(stdin_fd, &config);

    match load_map_sets(&args) {
        Ok(set) => manager.add_map_set(set),
        Err(e) => {
            eprintln!("{} {e}", "error loading macro mappings:".red().bold());
            exit(2);
        }
    }

    let running = Arc::new(AtomicBool::new(true));
    let logger_running = Arc::new(AtomicBool::new(true));
    let (log_sender, log_receiver): (Sender<LogMessage>, Receiver<LogMessage>) = bounded(1024);

    let logger_running_for_thread = Arc::clone(&logger_running);
    let logger_handle = thread::spawn(move || run_logger(log_receiver, logger_running_for_thread));

    let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT])?;
    let running_for_signal = Arc::clone(&running);
    let logger_running_for_signal = Arc::clone(&logger_running);
    thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            eprintln!("\n{} {sig}", "received signal:".yellow().bold());
            running_for_signal.store(false, Ordering::SeqCst);
            logger_running_for_signal.store(false, Ordering::SeqCst);
        }
    });

    let stdout = io::stdout();
    let mut stdout_lock = stdout.lock();

    while running.load(Ordering::SeqCst) {
        match manager.get_key() {
            Ok(KeyResult::Key(key)) => {
                let _ = log_sender.try_send(LogMessage::Resolved {
                    trigger_text: None,
                    output: key,
                });
                if args.echo_names {
                    if let Err(e) = writeln!(stdout_lock, "{}", describe(key)) {
                        if e.kind() == io::ErrorKind::BrokenPipe {
                            break;
                        }
                        eprintln!("{} {e}", "error writing output:".red().bold());
                        break;
                    }
                } else if key <= kui_engine::keycode::RAW_BYTE_MAX {
                    if let Err(e) = stdout_lock.write_all(&[key as u8]) {
                        if e.kind() == io::ErrorKind::BrokenPipe {
                            break;
                        }
                        eprintln!("{} {e}", "error writing output:".red().bold());
                        break;
                    }
                }
            }
            Ok(KeyResult::Idle) => {
                let _ = log_sender.try_send(LogMessage::Idle);
            }
            Err(e) => {
                eprintln!("{} {e}", "error resolving key:".red().bold());
                break;
            }
        }
    }

    logger_running.store(false, Ordering::SeqCst);
    drop(log_sender);
    let stats = logger_handle.join().unwrap_or_else(|_| {
        eprintln!("{}", "logger thread panicked".red().bold());
        StatsCollector::new()
    });

    if config.stats_json() {
        stats.print_json();
    } else {
        stats.print_to_stderr();
    }

    Ok(())
}
