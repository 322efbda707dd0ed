//! Run summary reporting.

use console::style;

use crate::pipeline::{Outcome, RunReport};

/// Print the outcome of every stage.
pub fn print_run_report(report: &RunReport) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Run {}:", report.token)).bold()
    );
    for (stage, outcome) in &report.stages {
        let label = match outcome {
            Outcome::Success => style(outcome.to_string()).green(),
            Outcome::Skipped(_) => style(outcome.to_string()).yellow(),
            Outcome::Failed(_) => style(outcome.to_string()).red(),
        };
        println!("  {:<22} {}", stage.to_string(), label);
    }
    if let Some(published) = &report.published {
        println!("  Image:    {}", published.image.display());
        println!("  Playlist: {}", published.playlist.display());
    }
    if report.failures() > 0 {
        println!("  Failed:   {}", style(report.failures()).red());
    }
    println!("{}", style("═".repeat(50)).dim());
}
