//! Pull request listing output.

mod format;

pub use format::OutputFormat;

use crate::types::PrMap;
use std::io::{self, Write};
use tracing::info;

/// Prints the listing in the requested format.
///
/// Terminal output goes through the log; Discord output is written to `out`
/// so it can be copied without log decorations. Repositories are listed in
/// key order, pull requests in collection order.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn print_pr_list<W: Write>(prs: &PrMap, format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Terminal => {
            info!("Pull Requests:");
            info!("");
            for line in render_terminal_lines(prs) {
                info!("{line}");
            }
            Ok(())
        }
        OutputFormat::Discord => {
            info!("Copy paste the below into discord");
            writeln!(out)?;
            out.write_all(render_discord(prs).as_bytes())?;
            out.flush()
        }
    }
}

/// Renders the listing as Discord markdown, one block per repository.
#[must_use]
pub fn render_discord(prs: &PrMap) -> String {
    let mut text = String::new();
    for (key, repo_prs) in prs {
        text.push_str(&format!("**{key}**:\n"));
        for pr in repo_prs {
            // Angle brackets stop Discord from embedding a preview per link.
            text.push_str(&format!("- #{}: [{}](<{}>)\n", pr.number, pr.title, pr.html_url));
        }
        text.push('\n');
    }
    text
}

/// Renders the listing as log lines, with a blank line after each repository.
#[must_use]
pub fn render_terminal_lines(prs: &PrMap) -> Vec<String> {
    let mut lines = Vec::new();
    for (key, repo_prs) in prs {
        lines.push(format!("{key}:"));
        for pr in repo_prs {
            lines.push(format!("#{}: {} ({})", pr.number, pr.title, pr.html_url));
        }
        lines.push(String::new());
    }
    lines
}
