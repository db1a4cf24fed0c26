use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Deref;

use crate::oss::{ContinuationToken, ObjectPage, ObjectStoreError};

/// 一次操作使用的传输句柄
///
/// 对应 S3 兼容服务的最小接口集合。句柄只在单个操作内存活，
/// 不会在并发操作之间共享
#[async_trait]
pub trait Connection: Send + Sync {
    /// 上传对象，已存在则覆盖
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes)
        -> Result<(), ObjectStoreError>;

    /// 获取对象的完整内容
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectStoreError>;

    /// 删除对象（幂等）
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError>;

    /// 仅探测元数据，对象不存在时返回 [`ObjectStoreError::NotFound`]
    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError>;

    /// 获取一页列举结果，`token` 为 `None` 时从头开始
    async fn list_objects_page(
        &self,
        bucket: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<ObjectPage, ObjectStoreError>;

    /// 释放句柄，由 [`ScopedConnection`] 在作用域结束时调用且只调用一次
    fn release(&mut self) {}
}

/// 连接工厂
///
/// 工厂本身在构造后只读，可以被多个并发操作同时使用
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    /// 创建一个新的已认证连接
    async fn connect(&self) -> Result<Box<dyn Connection>, ObjectStoreError>;
}

/// 作用域连接
///
/// 持有一个 [`Connection`]，在 drop 时释放。无论操作正常返回、
/// 通过 `?` 提前返回，还是所在 future 被取消，释放都会执行
pub struct ScopedConnection {
    inner: Box<dyn Connection>,
}

impl ScopedConnection {
    pub fn new(connection: Box<dyn Connection>) -> Self {
        Self { inner: connection }
    }

    /// 从工厂获取连接并包装
    pub async fn acquire(factory: &dyn ConnectionFactory) -> Result<Self, ObjectStoreError> {
        Ok(Self::new(factory.connect().await?))
    }
}

impl Deref for ScopedConnection {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        self.inner.release();
    }
}
