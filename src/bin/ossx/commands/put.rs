// Put command implementation

use anyhow::Result;
use ossx::oss::ObjectStorageClient;

use crate::cli::PutArgs;

/// Execute the put command
pub async fn execute_put(args: &PutArgs, client: &ObjectStorageClient) -> Result<()> {
    let key = client.send_file(&args.source, args.key.as_deref()).await?;
    println!(
        "upload: {} to {}/{}",
        args.source.display(),
        client.bucket(),
        key
    );
    Ok(())
}
