use crate::cli::OutputFormat;
use crate::commands::Result;
use recfix_core::models::{AggregateStats, SaveSummary, VideoCandidate};
use recfix_core::resolver::ResolvedInputs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod pretty;
pub use pretty::{format_candidates, format_pretty};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    Resolved(ResolvedInputs),
    Candidates {
        source: String,
        items: Vec<VideoCandidate>,
    },
    Recommendations {
        items: Vec<VideoCandidate>,
        stats: AggregateStats,
    },
    PlaylistSaved(SaveSummary),
    AuthInfo(Value),
    ConfigInfo(Value),
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Text => {
            print!("{}", render_text(data)?);
        }
        OutputFormat::Pretty => {
            format_pretty_output(data)?;
        }
    }
    Ok(())
}

/// Tab-separated, one record per line, suitable for piping.
fn render_text(data: &OutputData) -> Result<String> {
    let mut out = String::new();
    match data {
        OutputData::Resolved(resolved) => {
            for id in &resolved.ids {
                out.push_str(&format!("{}\n", id));
            }
            for rejected in &resolved.rejected {
                out.push_str(&format!("# rejected\t{}\n", rejected));
            }
        }
        OutputData::Candidates { items, .. } | OutputData::Recommendations { items, .. } => {
            for c in items {
                out.push_str(&format!("{}\t{}\t{}\t{}\n", c.id, c.title, c.channel, c.url));
            }
        }
        OutputData::PlaylistSaved(summary) => {
            out.push_str(&format!(
                "{}\t{}\t{}/{} added\n",
                summary.playlist_id, summary.playlist_url, summary.succeeded, summary.total
            ));
            for failure in &summary.failures {
                out.push_str(&format!("# failed\t{}\t{}\n", failure.video_id, failure.error));
            }
        }
        OutputData::AuthInfo(value) | OutputData::ConfigInfo(value) => {
            out.push_str(&serde_json::to_string_pretty(value)?);
            out.push('\n');
        }
    }
    Ok(out)
}

fn format_pretty_output(data: &OutputData) -> Result<()> {
    use owo_colors::OwoColorize;

    match data {
        OutputData::Resolved(resolved) => {
            println!("{}", "Resolved Videos".cyan().bold());
            println!();
            for id in &resolved.ids {
                println!("  {} {}", "✓".green(), id.bold());
            }
            for rejected in &resolved.rejected {
                println!("  {} {}", "✗".red(), rejected.dimmed());
            }
        }
        OutputData::Candidates { source, items } => {
            println!(
                "{} {} {}",
                items.len().to_string().green().bold(),
                "videos".dimmed(),
                source.cyan()
            );
            println!();
            print!("{}", format_candidates(items));
        }
        OutputData::Recommendations { items, stats } => {
            println!("{}", "Recommendations".cyan().bold());
            println!();
            print!("{}", format_candidates(items));
            println!();
            println!(
                "{} {} seeds, {} produced results, {} failed",
                "Seeds:".dimmed(),
                stats.total,
                stats.processed.to_string().green(),
                if stats.failed > 0 {
                    stats.failed.to_string().yellow().to_string()
                } else {
                    stats.failed.to_string()
                }
            );
        }
        OutputData::PlaylistSaved(summary) => {
            println!("{}", "Playlist created".green().bold());
            println!();
            println!("  {} {}", "Playlist:".dimmed(), summary.playlist_url.cyan());
            println!(
                "  {} {} of {} videos",
                "Added:".dimmed(),
                summary.succeeded.to_string().green().bold(),
                summary.total
            );
            for failure in &summary.failures {
                println!(
                    "  {} {} {}",
                    "✗".red(),
                    failure.video_id.yellow(),
                    failure.error.dimmed()
                );
            }
        }
        OutputData::AuthInfo(value) => {
            println!("{}", "Authentication".cyan().bold());
            println!();
            println!("{}", format_pretty(value));
        }
        OutputData::ConfigInfo(value) => {
            println!("{}", "Configuration".cyan().bold());
            println!();
            println!("{}", format_pretty(value));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_per_candidate() {
        let data = OutputData::Candidates {
            source: "page.html".into(),
            items: vec![
                VideoCandidate::new("a".into(), "Alpha", "Chan"),
                VideoCandidate::new("b".into(), "Beta", "Chan"),
            ],
        };
        let text = render_text(&data).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "a\tAlpha\tChan\thttps://www.youtube.com/watch?v=a"
        );
    }

    #[test]
    fn test_json_is_tagged() {
        let data = OutputData::Resolved(ResolvedInputs::default());
        let v = serde_json::to_value(&data).unwrap();
        assert_eq!(v["type"], "Resolved");
        assert!(v["data"]["ids"].as_array().unwrap().is_empty());
    }
}
