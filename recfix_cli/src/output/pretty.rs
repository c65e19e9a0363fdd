//! Pretty formatter for terminal output.
//!
//! Bold titles, dimmed metadata, candidates in a table sized to the terminal.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use recfix_core::models::VideoCandidate;
use serde_json::Value;

/// Terminal width for formatting (default fallback)
const DEFAULT_WIDTH: usize = 80;

/// Rows shown before the table is cut off.
const MAX_ROWS: usize = 50;

/// Candidates as a numbered table: title, channel, published date, link.
pub fn format_candidates(items: &[VideoCandidate]) -> String {
    let width = terminal_width();
    let title_width = width.saturating_sub(60).max(20);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width as u16)
        .set_header(
            ["#", "Title", "Channel", "Published", "Link"]
                .iter()
                .map(|h| Cell::new(h.cyan().bold().to_string())),
        );

    for (i, c) in items.iter().take(MAX_ROWS).enumerate() {
        let published = c
            .published_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new((i + 1).to_string()),
            Cell::new(truncate_str(&c.title, title_width)),
            Cell::new(truncate_str(&c.channel, 24)),
            Cell::new(published.dimmed().to_string()),
            Cell::new(format_hyperlink(&c.url, c.id.as_str())),
        ]);
    }

    let mut output = table.to_string();
    output.push('\n');
    if items.len() > MAX_ROWS {
        output.push_str(
            &format!("... and {} more\n", items.len() - MAX_ROWS)
                .dimmed()
                .to_string(),
        );
    }
    output
}

/// Key/value listing of a JSON object, nested objects indented.
pub fn format_pretty(value: &Value) -> String {
    let mut output = String::new();
    format_value(value, &mut output, 1);
    output.trim_end().to_string()
}

fn format_value(value: &Value, output: &mut String, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            let key_width = map.keys().map(|k| k.len()).max().unwrap_or(0);
            for (key, val) in map {
                match val {
                    Value::Object(_) => {
                        output.push_str(&format!("{}{}\n", indent, key.bold()));
                        format_value(val, output, depth + 1);
                    }
                    _ => output.push_str(&format!(
                        "{}{:width$}  {}\n",
                        indent,
                        key.dimmed(),
                        format_scalar(val),
                        width = key_width
                    )),
                }
            }
        }
        other => output.push_str(&format!("{}{}\n", indent, format_scalar(other))),
    }
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".dimmed().to_string(),
        Value::Bool(b) => {
            if *b {
                "true".green().to_string()
            } else {
                "false".red().to_string()
            }
        }
        Value::Number(n) => n.yellow().to_string(),
        Value::String(s) => s.to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{}...}}", obj.len()),
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

fn truncate_str(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or(s);

    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// OSC 8 hyperlink; terminals without support show the text only.
fn format_hyperlink(url: &str, display_text: &str) -> String {
    format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, display_text)
}
