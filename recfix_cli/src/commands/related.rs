use crate::cli::Cli;
use crate::commands::{client, load_config, spinner, CommandError, Result};
use crate::output::{format_output, OutputData};
use recfix_core::cache::RelatedCache;
use recfix_core::fetcher::RelatedFetcher;
use recfix_core::resolver::resolve_all;
use std::sync::Arc;

pub async fn run(cli: &Cli, seed: &str) -> Result<()> {
    let seed = resolve_all([seed], true)
        .ids
        .into_iter()
        .next()
        .ok_or_else(|| CommandError::InvalidInput(format!("'{}' is not a YouTube video", seed)))?;

    let config = load_config()?;
    let fetcher = RelatedFetcher::with_cache(
        Arc::new(client(&config)?),
        RelatedCache::new(config.cache_ttl()),
    )
    .limits(config.fetch_limits());

    let progress = spinner(format!("Fetching videos related to {}...", seed));
    let result = fetcher.fetch_related(&seed).await;
    progress.finish_and_clear();

    let output = OutputData::Candidates {
        source: format!("related to {}", seed),
        items: result?,
    };
    format_output(&output, &cli.format())
}
