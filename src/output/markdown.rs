//! Markdown summary generation
//!
//! Writes a human-readable markdown report of a finished crawl: run
//! information, totals, and the outcome of every URL.

use crate::output::summary::CrawlSummary;
use crate::output::OutputResult;
use crate::state::VisitState;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary and writes it to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Ripple-Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", summary.start_url));
    md.push_str(&format!("- **Max Depth**: {}\n", summary.max_depth));
    md.push_str(&format!(
        "- **Started**: {}\n",
        summary.started_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        summary.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {} ms\n\n",
        summary.duration_millis()
    ));

    md.push_str("## Totals\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Fetched | {} |\n", summary.fetched));
    md.push_str(&format!("| Failed | {} |\n", summary.failed));
    if summary.in_progress > 0 {
        md.push_str(&format!("| Unfinished | {} |\n", summary.in_progress));
    }
    md.push_str(&format!("| **Total** | {} |\n\n", summary.total()));
    md.push_str(&format!(
        "Success rate: {:.2}%\n\n",
        summary.success_rate()
    ));

    md.push_str("## URLs\n\n");
    if summary.outcomes.is_empty() {
        md.push_str("_No URLs were fetched._\n");
        return md;
    }

    md.push_str("| URL | Result |\n");
    md.push_str("|-----|--------|\n");
    for outcome in &summary.outcomes {
        let result = match &outcome.state {
            VisitState::Success => "fetched".to_string(),
            VisitState::Failure(reason) => format!("failed: {}", escape_cell(reason)),
            VisitState::InProgress => "unfinished".to_string(),
        };
        md.push_str(&format!("| {} | {} |\n", escape_cell(&outcome.url), result));
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
