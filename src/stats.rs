//! Run statistics: a single collector fed incrementally as the engine
//! runs, printed once at exit either as a colored human summary or as
//! JSON.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use colored::Colorize;
use serde::Serialize;

/// What happened to one `GetKey` call, for statistics purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A raw byte passed through both layers unmatched.
    PassThrough,
    /// The terminal layer decoded an escape sequence.
    TerminalExpansion,
    /// A user-registered macro expanded.
    UserExpansion(&'static str),
    /// `GetKey` returned idle.
    Idle,
}

#[derive(Debug, Default)]
pub struct StatsCollector {
    started: Option<Instant>,
    pass_through: u64,
    terminal_expansions: u64,
    user_expansions: u64,
    idle_ticks: u64,
    per_trigger: HashMap<String, u64>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            started: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PassThrough => self.pass_through += 1,
            Outcome::TerminalExpansion => self.terminal_expansions += 1,
            Outcome::UserExpansion(trigger_text) => {
                self.user_expansions += 1;
                *self.per_trigger.entry(trigger_text.to_string()).or_insert(0) += 1;
            }
            Outcome::Idle => self.idle_ticks += 1,
        }
    }

    /// Record a user expansion when the trigger text is only known at
    /// runtime (loaded from a config file or `--map` flag).
    pub fn record_user_expansion(&mut self, trigger_text: &str) {
        self.user_expansions += 1;
        *self.per_trigger.entry(trigger_text.to_string()).or_insert(0) += 1;
    }

    pub fn runtime(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    pub fn total_keys(&self) -> u64 {
        self.pass_through + self.terminal_expansions + self.user_expansions
    }

    pub fn print_to_stderr(&self) {
        eprintln!("{}", "--- kui-probe statistics ---".bold());
        eprintln!(
            "  {}: {}",
            "runtime".cyan(),
            crate::util::format_duration(self.runtime())
        );
        eprintln!("  {}: {}", "keys resolved".cyan(), self.total_keys());
        eprintln!("  {}: {}", "pass-through bytes".cyan(), self.pass_through);
        eprintln!(
            "  {}: {}",
            "terminal-sequence decodes".cyan(),
            self.terminal_expansions
        );
        eprintln!("  {}: {}", "user-macro expansions".cyan(), self.user_expansions);
        eprintln!("  {}: {}", "idle ticks".cyan(), self.idle_ticks);
        if !self.per_trigger.is_empty() {
            eprintln!("  {}:", "per-trigger expansion counts".cyan());
            let mut entries: Vec<_> = self.per_trigger.iter().collect();
            entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (trigger, count) in entries {
                eprintln!("    {:<24} {}", trigger.yellow(), count);
            }
        }
    }

    pub fn print_json(&self) {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            runtime_ms: u128,
            keys_resolved: u64,
            pass_through: u64,
            terminal_expansions: u64,
            user_expansions: u64,
            idle_ticks: u64,
            per_trigger: &'a HashMap<String, u64>,
        }
        let out = JsonOutput {
            runtime_ms: self.runtime().as_millis(),
            keys_resolved: self.total_keys(),
            pass_through: self.pass_through,
            terminal_expansions: self.terminal_expansions,
            user_expansions: self.user_expansions,
            idle_ticks: self.idle_ticks,
            per_trigger: &self.per_trigger,
        };
        if let Err(e) = serde_json::to_writer_pretty(std::io::stderr(), &out) {
            eprintln!("failed to write stats JSON: {e}");
        } else {
            eprintln!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_counts_by_outcome() {
        let mut s = StatsCollector::new();
        s.record(Outcome::PassThrough);
        s.record(Outcome::TerminalExpansion);
        s.record(Outcome::UserExpansion("<Up>"));
        s.record(Outcome::UserExpansion("<Up>"));
        s.record(Outcome::Idle);
        assert_eq!(s.pass_through, 1);
        assert_eq!(s.terminal_expansions, 1);
        assert_eq!(s.user_expansions, 2);
        assert_eq!(s.idle_ticks, 1);
        assert_eq!(s.per_trigger.get("<Up>"), Some(&2));
        assert_eq!(s.total_keys(), 4);
    }
}
