use crate::cli::Cli;
use crate::commands::{bearer, client, load_config, spinner, CommandError, Result};
use crate::output::{format_output, OutputData};
use recfix_core::playlist::PlaylistWriter;
use recfix_core::resolver::resolve_all;
use std::sync::Arc;

pub async fn run(cli: &Cli, videos: &[String], token: Option<&str>) -> Result<()> {
    let resolved = resolve_all(videos, true);
    if !resolved.rejected.is_empty() {
        return Err(CommandError::InvalidInput(format!(
            "not YouTube videos: {}",
            resolved.rejected.join(", ")
        )));
    }

    let config = load_config()?;
    let token = bearer(token).await?;
    let writer = PlaylistWriter::new(Arc::new(client(&config)?))
        .with_retry(config.retry_policy())
        .with_item_pacing(config.item_pacing());

    let progress = spinner(format!(
        "Adding {} videos to a new playlist...",
        resolved.ids.len()
    ));
    let summary = writer.save_playlist(&resolved.ids, &token).await;
    progress.finish_and_clear();

    format_output(&OutputData::PlaylistSaved(summary?), &cli.format())
}
