use crate::commands::{load_config, Result};
use recfix_core::credentials::StoredCredential;
use recfix_core::ops::RecFixService;
use recfix_core::transport::StdioTransport;
use std::sync::Arc;

pub async fn run() -> Result<()> {
    let config = load_config()?;
    let service = RecFixService::from_config(&config)?
        .with_credentials(Arc::new(StoredCredential::new_default()));
    StdioTransport::new(service).run().await?;
    Ok(())
}
