// List command implementation

use anyhow::Result;
use ossx::oss::ObjectStorageClient;

/// Execute the ls command
pub async fn execute_ls(client: &ObjectStorageClient) -> Result<()> {
    let keys = client.try_list_files().await?;

    for key in &keys {
        println!("{}", key);
    }

    Ok(())
}
