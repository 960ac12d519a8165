//! Configuration commands.

use std::path::Path;

use crate::config::{ClientConfig, KeysFile, resolve_credentials};
use crate::error::ClientResult;

/// Validate that Graph credentials resolve from the configured sources.
pub fn validate(config: &ClientConfig, keys_file: &Path) -> ClientResult<()> {
    let keys = KeysFile::load(keys_file)?;
    if keys.is_some() {
        println!("keys file: {}", keys_file.display());
    }

    let credentials =
        resolve_credentials(&config.graph, keys.as_ref(), |var| std::env::var(var).ok())?;
    println!("Graph credentials resolve for tenant {}.", credentials.tenant_id);

    let graph = config.graph.to_provider_config();
    println!("graph: {} (page size {})", graph.graph_base, graph.page_size);

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    let config_path = ClientConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}
