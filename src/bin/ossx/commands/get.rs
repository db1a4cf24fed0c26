// Get command implementation

use anyhow::Result;
use ossx::oss::ObjectStorageClient;

use crate::cli::GetArgs;

/// Execute the get command
pub async fn execute_get(args: &GetArgs, client: &ObjectStorageClient) -> Result<()> {
    let path = client
        .fetch_file(&args.key, args.destination.as_deref())
        .await?;
    println!(
        "download: {}/{} to {}",
        client.bucket(),
        args.key,
        path.display()
    );
    Ok(())
}
