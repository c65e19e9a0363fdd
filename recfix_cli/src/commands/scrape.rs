use crate::cli::Cli;
use crate::commands::Result;
use crate::output::{format_output, OutputData};
use recfix_core::scrape::{HtmlPageSource, VideoSource};
use std::path::Path;

pub async fn run(cli: &Cli, file: &Path) -> Result<()> {
    let videos = HtmlPageSource::from_file(file)?.scrape_visible_videos()?;
    let output = OutputData::Candidates {
        source: file.display().to_string(),
        items: videos,
    };
    format_output(&output, &cli.format())
}
