use crate::cli::Cli;
use crate::commands::{bearer, client, load_config, spinner, CommandError, Result};
use crate::output::{format_output, OutputData};
use recfix_core::cache::RelatedCache;
use recfix_core::fetcher::RelatedFetcher;
use recfix_core::models::VideoId;
use recfix_core::orchestrator::BatchOrchestrator;
use recfix_core::playlist::PlaylistWriter;
use recfix_core::ranker::rank_with_limit;
use recfix_core::resolver::resolve_all;
use recfix_core::scrape::{HtmlPageSource, VideoSource};
use std::path::Path;
use std::sync::Arc;

pub async fn run(
    cli: &Cli,
    seeds: &[String],
    limit: Option<usize>,
    from_page: Option<&Path>,
    save: bool,
    token: Option<&str>,
) -> Result<()> {
    let seeds = collect_seeds(seeds, from_page)?;
    let config = load_config()?;
    // Resolve the credential before spending quota on the ranking.
    let token = if save { Some(bearer(token).await?) } else { None };

    let platform = Arc::new(client(&config)?);
    let fetcher = RelatedFetcher::with_cache(platform.clone(), RelatedCache::new(config.cache_ttl()))
        .limits(config.fetch_limits());
    let orchestrator = BatchOrchestrator::new(fetcher)
        .with_retry(config.retry_policy())
        .with_config(config.batch_config());

    let progress = spinner(format!("Finding related videos for {} seeds...", seeds.len()));
    let report = orchestrator.aggregate_report(&seeds).await;
    progress.finish_and_clear();

    let ranked = rank_with_limit(&report.candidates, limit.unwrap_or(config.rank_limit))?;
    format_output(
        &OutputData::Recommendations {
            items: ranked.clone(),
            stats: report.stats,
        },
        &cli.format(),
    )?;

    if let Some(token) = token {
        let ids: Vec<VideoId> = ranked.into_iter().map(|c| c.id).collect();
        let writer = PlaylistWriter::new(platform)
            .with_retry(config.retry_policy())
            .with_item_pacing(config.item_pacing());

        let progress = spinner(format!("Adding {} videos to a new playlist...", ids.len()));
        let summary = writer.save_playlist(&ids, &token).await;
        progress.finish_and_clear();
        format_output(&OutputData::PlaylistSaved(summary?), &cli.format())?;
    }
    Ok(())
}

fn collect_seeds(seeds: &[String], from_page: Option<&Path>) -> Result<Vec<VideoId>> {
    let mut inputs: Vec<String> = seeds.to_vec();
    if let Some(path) = from_page {
        let videos = HtmlPageSource::from_file(path)?.scrape_visible_videos()?;
        tracing::info!(count = videos.len(), page = %path.display(), "Seeds scraped from page");
        inputs.extend(videos.into_iter().map(|v| v.id.into_inner()));
    }

    let resolved = resolve_all(&inputs, true);
    for rejected in &resolved.rejected {
        tracing::warn!(input = %rejected, "Ignoring input that is not a YouTube video");
    }
    if resolved.ids.is_empty() {
        return Err(CommandError::InvalidInput(
            "No valid YouTube URLs found. Pass video URLs/ids or --from-page.".to_string(),
        ));
    }
    Ok(resolved.ids)
}
