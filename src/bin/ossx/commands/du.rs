// Disk usage command implementation

use anyhow::Result;
use ossx::oss::ObjectStorageClient;

use crate::cli::DuArgs;
use crate::format::format_size;

/// Execute the du command
pub async fn execute_du(args: &DuArgs, client: &ObjectStorageClient) -> Result<()> {
    let total = client.try_get_bucket_size().await?;

    if args.bytes {
        println!("{}\t{}", total, client.bucket());
    } else {
        println!("{}\t{}", format_size(total), client.bucket());
    }

    Ok(())
}
