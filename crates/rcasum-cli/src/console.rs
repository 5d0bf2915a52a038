//! CLI console utilities

use colored::*;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use rcasum_core::worker::RunReport;
use std::time::Duration;

const MIN_RULE_WIDTH: usize = 20;

/// Console for formatted output
pub struct RcaConsole {
    term: Term,
}

impl RcaConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a full-width horizontal rule with a centered title
    pub fn rule(&self, title: &str) {
        let (_, columns) = self.term.size();
        println!("{}", rule_line(title, usize::from(columns)).bold());
    }

    /// Start a steady spinner on stderr
    pub fn spinner(&self, message: String) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.magenta} {msg:.magenta} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Print the outcome of a refresh run
    pub fn print_report(&self, report: &RunReport) {
        println!();
        println!("{}", "Refresh summary".bold().underline());
        for line in report_lines(report) {
            println!("  {}", line);
        }

        if report.is_clean() {
            self.success(&format!("{} summaries updated", report.summarized));
            return;
        }
        self.warn(&format!(
            "{} of {} refreshed incidents failed",
            report.failed,
            report.attempted()
        ));
        for failure in &report.failures {
            self.error(&failure.to_string());
        }
    }
}

fn rule_line(title: &str, width: usize) -> String {
    let width = width.max(MIN_RULE_WIDTH);
    let label = format!(" {} ", title);
    let fill = width.saturating_sub(label.chars().count());
    let left = fill / 2;
    format!("{}{}{}", "─".repeat(left), label, "─".repeat(fill - left))
}

fn report_lines(report: &RunReport) -> Vec<String> {
    vec![
        format!("{:<11}{}", "total", report.total),
        format!("{:<11}{}", "summarized", report.summarized),
        format!("{:<11}{}", "skipped", report.skipped),
        format!("{:<11}{}", "failed", report.failed),
    ]
}
