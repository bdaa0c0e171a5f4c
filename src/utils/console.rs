// src/utils/console.rs

//! Console report formatting with server-style prefixes.
//!
//! Diagnostics go through the `log` facade; this module prints the human-facing
//! reports (headers, steps, per-paper blocks, summaries) the CLI shows.

use std::sync::OnceLock;

use chrono::Local;

/// Output verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

static VERBOSITY: OnceLock<Verbosity> = OnceLock::new();

/// Set output verbosity once at startup.
pub fn init(verbosity: Verbosity) {
    let _ = VERBOSITY.set(verbosity);
}

fn enabled(min: Verbosity) -> bool {
    VERBOSITY.get().copied().unwrap_or(Verbosity::Normal) >= min
}

/// Format a line with a time prefix and a tag
fn format_line(tag: &str, message: &str) -> String {
    format!("[{}] [{}] {}", Local::now().format("%H:%M:%S"), tag, message)
}

/// Print a header
pub fn header(title: &str) {
    if enabled(Verbosity::Normal) {
        let border = "═".repeat(64);
        println!();
        println!("{}", border);
        println!("  {}", title);
        println!("{}", border);
    }
}

/// Print a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    if enabled(Verbosity::Normal) {
        println!(
            "{}",
            format_line(&format!("STEP {}/{}", step_num, total), message)
        );
    }
}

/// Print a success line
pub fn success(message: &str) {
    if enabled(Verbosity::Normal) {
        println!("{}", format_line("OK", &format!("✓ {}", message)));
    }
}

/// Print a failure line to stderr, regardless of verbosity
pub fn failure(message: &str) {
    eprintln!("{}", format_line("FAIL", &format!("✗ {}", message)));
}

/// Print a plain line
pub fn line(message: &str) {
    if enabled(Verbosity::Normal) {
        println!("{}", message);
    }
}

/// Print an indented sub-item
pub fn sub_item(message: &str) {
    if enabled(Verbosity::Normal) {
        println!("    {}", message);
    }
}

/// Print an indented sub-item only in verbose mode
pub fn detail(message: &str) {
    if enabled(Verbosity::Verbose) {
        println!("      {}", message);
    }
}

/// Print a separator line
pub fn separator() {
    if enabled(Verbosity::Normal) {
        println!("{}", "─".repeat(64));
    }
}

/// Print a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    if enabled(Verbosity::Normal) {
        println!();
        println!("{}", format_line("SUMMARY", title));
        for (key, value) in items {
            println!("    {}: {}", key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn test_format_line_has_tag() {
        let line = format_line("STEP 1/3", "Fetch");
        assert!(line.contains("[STEP 1/3] Fetch"));
    }
}
