//! 对象存储模块
//!
//! 面向单个 S3 兼容存储桶的客户端。每个操作独立获取并释放连接，
//! 传输层通过 [`ConnectionFactory`] 抽象，内置 AWS S3 与内存两种实现。

mod aws_s3_connection;
mod config;
mod connection;
mod error;
mod memory_connection;
mod object_storage_client;
mod object_store_types;
mod pagination;

pub use aws_s3_connection::{AwsS3Connection, AwsS3ConnectionFactory};
pub use config::{
    ObjectStorageConfig, ENV_CONTAINER, ENV_ENDPOINT, ENV_KEY_ID, ENV_REGION, ENV_SECRET,
};
pub use connection::{Connection, ConnectionFactory, ScopedConnection};
pub use error::{classify, ErrorClass, ObjectStoreError};
pub use memory_connection::{MemoryConnection, MemoryConnectionFactory};
pub use object_storage_client::ObjectStorageClient;
pub use object_store_types::{ContinuationToken, ObjectMeta, ObjectPage};
pub use pagination::{fold_pages, Traversal};
