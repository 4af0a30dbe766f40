// Formatters for displaying command outcomes, notices and errors.
use std::fmt::Display;

use colored::*;
use comfy_table::{presets, Table};

use crate::chroma_client_trait::Metadata;
use crate::constants::PREVIEW_CHARS;
use crate::error::{ChromaBenchError, Result};
use crate::utils::truncate_chars;

use super::commands::CommandOutcome;
use super::create::CreatedCollection;
use super::list::CollectionList;
use super::peek::PeekResult;
use super::search::SearchResult;
use super::stats::CollectionStats;

/// Exit status for a successful command, including "nothing found" notices.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for operational and usage errors.
pub const EXIT_FAILURE: i32 = 1;

pub const NO_COLLECTIONS_NOTICE: &str = "No collections found";
pub const EMPTY_COLLECTION_NOTICE: &str = "Collection is empty";
pub const NO_RESULTS_NOTICE: &str = "No results found";
pub const UNKNOWN_DIMENSIONS: &str = "Unknown (empty collection)";

/// A rendered outcome: either a plain notice or formatted output.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Success(String),
    Notice(String),
    Output(String),
}

/// Truncates a document for table display: anything longer than 100 characters is cut
/// and suffixed with an ellipsis.
pub fn document_preview(document: &str) -> String {
    truncate_chars(document, PREVIEW_CHARS)
}

fn metadata_cell(metadata: Option<&Metadata>) -> String {
    match metadata {
        Some(m) if !m.is_empty() => {
            serde_json::to_string_pretty(m).unwrap_or_else(|_| format!("{:?}", m))
        }
        _ => String::new(),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(header);
    table
}

pub fn created_lines(created: &CreatedCollection) -> Vec<String> {
    let mut lines = vec![
        format!("Created collection '{}':", created.name),
        format!("  Distance metric: {}", created.settings.distance),
    ];
    if let Some(provider) = created.settings.embedding_provider {
        lines.push(format!("  Embedding provider: {}", provider));
    }
    if let Some(model) = &created.settings.embedding_model {
        lines.push(format!("  Embedding model: {}", model));
    }
    lines
}

pub fn collections_table(list: &CollectionList) -> Table {
    let mut table = new_table(vec!["Name", "Count"]);
    for summary in &list.collections {
        table.add_row(vec![summary.name.clone(), summary.count.to_string()]);
    }
    table
}

pub fn peek_table(peek: &PeekResult) -> Table {
    let mut table = new_table(vec!["ID", "Metadata", "Document Preview"]);
    for record in &peek.records {
        table.add_row(vec![
            record.id.clone(),
            metadata_cell(record.metadata.as_ref()),
            record.document.as_deref().map(document_preview).unwrap_or_default(),
        ]);
    }
    table
}

pub fn search_table(search: &SearchResult) -> Table {
    let mut table = new_table(vec!["ID", "Distance", "Document Preview"]);
    for hit in &search.hits {
        table.add_row(vec![
            hit.id.clone(),
            format!("{:.4}", hit.distance),
            hit.document.as_deref().map(document_preview).unwrap_or_default(),
        ]);
    }
    table
}

/// Renders the stats summary as a titled, bordered panel.
pub fn stats_panel(stats: &CollectionStats) -> String {
    let dimensions = stats
        .embedding_dimensions
        .map(|d| d.to_string())
        .unwrap_or_else(|| UNKNOWN_DIMENSIONS.to_string());

    let mut body = Table::new();
    body.load_preset(presets::NOTHING);
    body.add_row(vec!["Total Items".to_string(), stats.total_items.to_string()]);
    body.add_row(vec!["Embedding Dimensions".to_string(), dimensions]);
    body.add_row(vec!["Distance Metric".to_string(), stats.distance_metric.clone()]);

    panel(&format!("Collection Stats: {}", stats.name), &body.to_string())
}

fn panel(title: &str, body: &str) -> String {
    let lines: Vec<&str> = body.lines().map(str::trim_end).collect();
    let title_width = title.chars().count();
    let width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title_width + 1);

    let mut out = String::new();
    out.push_str(&format!(
        "╭─ {} {}╮\n",
        title,
        "─".repeat(width + 2 - title_width - 3)
    ));
    for line in lines {
        let pad = width - line.chars().count();
        out.push_str(&format!("│ {}{} │\n", line, " ".repeat(pad)));
    }
    out.push_str(&format!("╰{}╯", "─".repeat(width + 2)));
    out
}

/// Turns an outcome into text. No colour is applied here.
pub fn render_outcome(outcome: &CommandOutcome) -> Rendered {
    match outcome {
        CommandOutcome::Created(created) => Rendered::Success(created_lines(created).join("\n")),
        CommandOutcome::Deleted(deleted) => {
            Rendered::Success(format!("Deleted collection '{}'", deleted.name))
        }
        CommandOutcome::Collections(list) if list.collections.is_empty() => {
            Rendered::Notice(NO_COLLECTIONS_NOTICE.to_string())
        }
        CommandOutcome::Collections(list) => Rendered::Output(collections_table(list).to_string()),
        CommandOutcome::Peek(peek) if peek.is_empty() => {
            Rendered::Notice(EMPTY_COLLECTION_NOTICE.to_string())
        }
        CommandOutcome::Peek(peek) => Rendered::Output(format!(
            "{}\n\nShowing {} of {} total items",
            peek_table(peek),
            peek.records.len(),
            peek.total
        )),
        CommandOutcome::Search(search) if search.hits.is_empty() => {
            Rendered::Notice(NO_RESULTS_NOTICE.to_string())
        }
        CommandOutcome::Search(search) => Rendered::Output(search_table(search).to_string()),
        CommandOutcome::Stats(stats) => Rendered::Output(stats_panel(stats)),
    }
}

/// Prints a notice on stderr, used for informational messages that are not results.
pub fn print_notice(message: impl Display) {
    eprintln!("{}", message.to_string().yellow());
}

/// Prints a single error line on stderr.
pub fn print_error(error: impl Display) {
    eprintln!("{}", format!("Error: {}", error).red());
}

/// Prints the outcome of a command (or its error) and returns the process exit status.
pub fn report(result: Result<CommandOutcome>, json_output: bool) -> i32 {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            print_error(&e);
            return EXIT_FAILURE;
        }
    };

    if json_output {
        return match serde_json::to_string_pretty(&outcome) {
            Ok(json) => {
                println!("{}", json);
                EXIT_SUCCESS
            }
            Err(e) => {
                print_error(ChromaBenchError::from(e));
                EXIT_FAILURE
            }
        };
    }

    match render_outcome(&outcome) {
        Rendered::Success(text) => println!("{}", text.green()),
        Rendered::Notice(text) => println!("{}", text.yellow()),
        Rendered::Output(text) => println!("{}", text),
    }
    EXIT_SUCCESS
}
