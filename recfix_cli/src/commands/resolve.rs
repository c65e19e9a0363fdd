use crate::cli::Cli;
use crate::commands::Result;
use crate::output::{format_output, OutputData};
use recfix_core::resolver::resolve_all;

pub async fn run(cli: &Cli, inputs: &[String], allow_ids: bool) -> Result<()> {
    let resolved = resolve_all(inputs, allow_ids);
    format_output(&OutputData::Resolved(resolved), &cli.format())
}
