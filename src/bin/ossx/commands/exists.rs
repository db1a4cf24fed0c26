// Exists command implementation

use anyhow::{anyhow, Result};
use ossx::oss::ObjectStorageClient;

use crate::cli::ExistsArgs;

/// Execute the exists command
///
/// Prints `true` or `false`. A failed check is an error, not `false`.
pub async fn execute_exists(args: &ExistsArgs, client: &ObjectStorageClient) -> Result<()> {
    let exists = client
        .probe_file(&args.key)
        .await
        .map_err(|e| anyhow!("Failed to check {}: {}", args.key, e))?;
    println!("{}", exists);
    Ok(())
}
