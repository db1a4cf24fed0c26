// Remove command implementation

use anyhow::Result;
use ossx::oss::ObjectStorageClient;

use crate::cli::RmArgs;

/// Execute the rm command
pub async fn execute_rm(args: &RmArgs, client: &ObjectStorageClient) -> Result<()> {
    client.remove_file(&args.key).await?;
    println!("delete: {}/{}", client.bucket(), args.key);
    Ok(())
}
