use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::log::Logger;
use crate::oss::{
    fold_pages, AwsS3ConnectionFactory, ConnectionFactory, ObjectStorageConfig, ObjectStoreError,
    ScopedConnection, Traversal,
};

/// S3 兼容对象存储客户端
///
/// 绑定到配置中的单个存储桶。每个操作都会通过工厂获取一个独立的连接，
/// 操作结束（包括出错和被取消）时释放，客户端自身不保存任何可变状态，
/// 因此可以在多个任务中并发使用同一个实例。
///
/// 单对象操作返回 `Result`；`file_exists`、`list_files`、`get_bucket_size`
/// 在失败时记录日志并返回 `false`、空列表、`0`，需要区分失败的调用方可以使用
/// `probe_file`、`try_list_files`、`try_get_bucket_size`
pub struct ObjectStorageClient {
    config: ObjectStorageConfig,
    factory: Arc<dyn ConnectionFactory>,
    logger: Arc<Logger>,
}

impl ObjectStorageClient {
    /// 创建连接 S3 兼容服务的客户端
    pub async fn new(
        config: ObjectStorageConfig,
        logger: Arc<Logger>,
    ) -> Result<Self, ObjectStoreError> {
        let factory = AwsS3ConnectionFactory::new(&config).await?;
        Self::with_factory(config, Arc::new(factory), logger)
    }

    /// 使用自定义连接工厂创建客户端
    pub fn with_factory(
        config: ObjectStorageConfig,
        factory: Arc<dyn ConnectionFactory>,
        logger: Arc<Logger>,
    ) -> Result<Self, ObjectStoreError> {
        config.check()?;

        Ok(Self {
            config,
            factory,
            logger,
        })
    }

    pub fn config(&self) -> &ObjectStorageConfig {
        &self.config
    }

    /// 客户端绑定的存储桶
    pub fn bucket(&self) -> &str {
        &self.config.container
    }

    async fn connect(&self) -> Result<ScopedConnection, ObjectStoreError> {
        ScopedConnection::acquire(self.factory.as_ref()).await
    }

    /// 上传本地文件
    ///
    /// `target_name` 为空时使用本地文件名。文件在建立连接之前读入内存，
    /// 读取失败直接返回 [`ObjectStoreError::LocalIo`]，不会发起任何网络请求。
    /// 返回写入的对象 key
    pub async fn send_file(
        &self,
        local_source: impl AsRef<Path>,
        target_name: Option<&str>,
    ) -> Result<String, ObjectStoreError> {
        let local_source = local_source.as_ref();

        let key = match target_name {
            Some(name) => name.to_string(),
            None => {
                let name = base_name(local_source)?;
                let _ = crate::warn!(
                    self.logger,
                    "Target name is none, using local file name",
                    "key" => &name
                );
                name
            }
        };
        validate_key(&key)?;

        let body = match tokio::fs::read(local_source).await {
            Ok(body) => Bytes::from(body),
            Err(e) => {
                let err = ObjectStoreError::local_io(local_source, e);
                let _ = crate::error!(
                    self.logger,
                    format!("Failed to send {}: {}", key, err),
                    "key" => &key,
                    "class" => err.class().to_string()
                );
                return Err(err);
            }
        };
        let size = body.len() as u64;

        let result = async {
            let conn = self.connect().await?;
            conn.put_object(self.bucket(), &key, body).await
        }
        .await;

        match result {
            Ok(()) => {
                let _ = crate::info!(
                    self.logger,
                    format!("Sent: {}", key),
                    "key" => &key,
                    "bytes" => size
                );
                Ok(key)
            }
            Err(err) => {
                let _ = crate::error!(
                    self.logger,
                    format!("Failed to send {}: {}", key, err),
                    "key" => &key,
                    "class" => err.class().to_string()
                );
                Err(err)
            }
        }
    }

    /// 下载对象到本地文件
    ///
    /// `local_target` 为空时使用 key 的最后一段作为文件名，写入时创建或截断文件。
    /// 对象内容会完整读入内存后再写盘，因此只适用于能放入内存的对象。
    /// 对象不存在时返回 [`ObjectStoreError::NotFound`]，本地文件不会被创建或修改。
    /// 返回写入的本地路径
    pub async fn fetch_file(
        &self,
        remote_name: &str,
        local_target: Option<&Path>,
    ) -> Result<PathBuf, ObjectStoreError> {
        validate_key(remote_name)?;

        let target = match local_target {
            Some(path) => path.to_path_buf(),
            None => {
                let name = base_name(Path::new(remote_name))?;
                let _ = crate::info!(
                    self.logger,
                    format!("Local target not specified, using: {}", name),
                    "key" => remote_name
                );
                PathBuf::from(name)
            }
        };

        let result = async {
            let body = {
                let conn = self.connect().await?;
                conn.get_object(self.bucket(), remote_name).await?
            };
            tokio::fs::write(&target, &body)
                .await
                .map_err(|e| ObjectStoreError::local_io(&target, e))?;
            Ok::<u64, ObjectStoreError>(body.len() as u64)
        }
        .await;

        match result {
            Ok(size) => {
                let _ = crate::info!(
                    self.logger,
                    format!("Retrieved: {}", remote_name),
                    "key" => remote_name,
                    "path" => target.display().to_string(),
                    "bytes" => size
                );
                Ok(target)
            }
            Err(err) => {
                let _ = crate::error!(
                    self.logger,
                    format!("Could not retrieve {}: {}", remote_name, err),
                    "key" => remote_name,
                    "class" => err.class().to_string()
                );
                Err(err)
            }
        }
    }

    /// 删除对象
    ///
    /// 删除不存在的 key 与删除存在的 key 结果相同，不做存在性预检查
    pub async fn remove_file(&self, remote_name: &str) -> Result<(), ObjectStoreError> {
        validate_key(remote_name)?;

        let result = async {
            let conn = self.connect().await?;
            conn.delete_object(self.bucket(), remote_name).await
        }
        .await;

        match result {
            Ok(()) => {
                let _ = crate::info!(self.logger, format!("Removed: {}", remote_name), "key" => remote_name);
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                let _ = crate::info!(
                    self.logger,
                    format!("Removed: {} (already absent)", remote_name),
                    "key" => remote_name
                );
                Ok(())
            }
            Err(err) => {
                let _ = crate::error!(
                    self.logger,
                    format!("Failed to remove {}: {}", remote_name, err),
                    "key" => remote_name,
                    "class" => err.class().to_string()
                );
                Err(err)
            }
        }
    }

    async fn head(&self, remote_name: &str) -> Result<bool, ObjectStoreError> {
        validate_key(remote_name)?;

        let conn = self.connect().await?;
        match conn.head_object(self.bucket(), remote_name).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// 检查对象是否存在
    ///
    /// 对象不存在和检查失败都返回 `false`，二者通过日志区分：
    /// 前者记录 INFO，后者记录 ERROR 并带上错误分类
    pub async fn file_exists(&self, remote_name: &str) -> bool {
        match self.head(remote_name).await {
            Ok(true) => {
                let _ = crate::debug!(self.logger, format!("Exists: {}", remote_name), "key" => remote_name);
                true
            }
            Ok(false) => {
                let _ = crate::info!(
                    self.logger,
                    format!("Not found: {}", remote_name),
                    "key" => remote_name,
                    "class" => "not_found"
                );
                false
            }
            Err(err) => {
                let _ = crate::error!(
                    self.logger,
                    format!("Existence check failed for {}: {}", remote_name, err),
                    "key" => remote_name,
                    "class" => err.class().to_string()
                );
                false
            }
        }
    }

    /// 检查对象是否存在，检查失败时返回错误而不是 `false`
    pub async fn probe_file(&self, remote_name: &str) -> Result<bool, ObjectStoreError> {
        let result = self.head(remote_name).await;
        if let Err(err) = &result {
            let _ = crate::error!(
                self.logger,
                format!("Existence check failed for {}: {}", remote_name, err),
                "key" => remote_name,
                "class" => err.class().to_string()
            );
        }
        result
    }

    async fn traverse<T, F>(&self, init: T, fold: F) -> Result<Traversal<T>, ObjectStoreError>
    where
        F: FnMut(T, crate::oss::ObjectMeta) -> T,
    {
        let conn = self.connect().await?;
        fold_pages(&*conn, self.bucket(), init, fold).await
    }

    /// 列出存储桶中所有对象的 key（按服务端返回顺序）
    ///
    /// 任意一页失败时返回错误，不返回部分结果
    pub async fn try_list_files(&self) -> Result<Vec<String>, ObjectStoreError> {
        let result = self
            .traverse(Vec::new(), |mut keys, obj| {
                keys.push(obj.key);
                keys
            })
            .await;

        match result {
            Ok(Traversal { value, pages }) => {
                let _ = crate::info!(
                    self.logger,
                    format!("Listed {} objects", value.len()),
                    "bucket" => self.bucket(),
                    "count" => value.len(),
                    "pages" => pages
                );
                Ok(value)
            }
            Err(err) => {
                let _ = crate::error!(
                    self.logger,
                    format!("Failed to list objects: {}", err),
                    "bucket" => self.bucket(),
                    "class" => err.class().to_string()
                );
                Err(err)
            }
        }
    }

    /// 列出存储桶中所有对象的 key，失败时返回空列表（错误已记录日志）
    pub async fn list_files(&self) -> Vec<String> {
        self.try_list_files().await.unwrap_or_default()
    }

    /// 计算存储桶中所有对象的总字节数
    ///
    /// 任意一页失败时返回错误，已累加的部分总数被丢弃
    pub async fn try_get_bucket_size(&self) -> Result<u64, ObjectStoreError> {
        let result = self
            .traverse(0u64, |total, obj| total.saturating_add(obj.size))
            .await;

        match result {
            Ok(Traversal { value, pages }) => {
                let _ = crate::info!(
                    self.logger,
                    format!("Bucket size: {} bytes", value),
                    "bucket" => self.bucket(),
                    "bytes" => value,
                    "pages" => pages
                );
                Ok(value)
            }
            Err(err) => {
                let _ = crate::error!(
                    self.logger,
                    format!("Failed to compute bucket size: {}", err),
                    "bucket" => self.bucket(),
                    "class" => err.class().to_string()
                );
                Err(err)
            }
        }
    }

    /// 计算存储桶总字节数，失败时返回 `0`（错误已记录日志），不会返回部分总数
    pub async fn get_bucket_size(&self) -> u64 {
        self.try_get_bucket_size().await.unwrap_or(0)
    }
}

fn validate_key(key: &str) -> Result<(), ObjectStoreError> {
    if key.is_empty() {
        return Err(ObjectStoreError::InvalidInput(
            "object key must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// 路径的最后一段，用作默认的对象 key 或本地文件名
fn base_name(path: &Path) -> Result<String, ObjectStoreError> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            ObjectStoreError::InvalidInput(format!("path has no file name: {}", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oss::MemoryConnectionFactory;
    use serial_test::serial;

    fn client(factory: MemoryConnectionFactory) -> ObjectStorageClient {
        ObjectStorageClient::with_factory(
            ObjectStorageConfig::new("ak", "sk", "http://127.0.0.1:9000", "bucket"),
            Arc::new(factory),
            Arc::new(Logger::discard()),
        )
        .unwrap()
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/tmp/data/report.csv")).unwrap(), "report.csv");
        assert_eq!(base_name(Path::new("photos/2024/cat.jpg")).unwrap(), "cat.jpg");
        assert!(base_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_with_factory_rejects_invalid_config() {
        let result = ObjectStorageClient::with_factory(
            ObjectStorageConfig::new("ak", "", "http://127.0.0.1:9000", "bucket"),
            Arc::new(MemoryConnectionFactory::new()),
            Arc::new(Logger::discard()),
        );
        assert!(matches!(result, Err(ObjectStoreError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_empty_key_rejected_without_connecting() {
        let factory = MemoryConnectionFactory::new();
        let client = client(factory.clone());

        assert!(matches!(
            client.remove_file("").await,
            Err(ObjectStoreError::InvalidInput(_))
        ));
        assert!(!client.file_exists("").await);
        assert_eq!(factory.connections_opened(), 0);
    }

    #[tokio::test]
    async fn test_fetch_to_explicit_target() {
        let factory = MemoryConnectionFactory::new();
        let client = client(factory);
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("notes.txt");
        tokio::fs::write(&source, b"hello").await.unwrap();

        let key = client.send_file(&source, Some("docs/notes.txt")).await.unwrap();
        assert_eq!(key, "docs/notes.txt");

        let target = dir.path().join("copy.txt");
        let written = client.fetch_file(&key, Some(&target)).await.unwrap();
        assert_eq!(written, target);
        assert_eq!(tokio::fs::read(&target).await.unwrap(), b"hello");
    }

    #[tokio::test]
    #[serial]
    async fn test_fetch_default_target_uses_key_base_name() {
        let client = client(MemoryConnectionFactory::new());
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("upload.txt");
        tokio::fs::write(&source, b"hi").await.unwrap();
        client.send_file(&source, Some("docs/notes.txt")).await.unwrap();

        let workdir = tempfile::TempDir::new().unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(workdir.path()).unwrap();
        let result = client.fetch_file("docs/notes.txt", None).await;
        std::env::set_current_dir(previous).unwrap();

        let written = result.unwrap();
        assert_eq!(written, PathBuf::from("notes.txt"));
        assert_eq!(
            tokio::fs::read(workdir.path().join("notes.txt")).await.unwrap(),
            b"hi"
        );
    }
}
