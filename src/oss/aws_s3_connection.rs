use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream, Client};
use bytes::Bytes;

use crate::oss::{
    Connection, ConnectionFactory, ContinuationToken, ObjectMeta, ObjectPage,
    ObjectStorageConfig, ObjectStoreError,
};

/// 基于 aws-sdk-s3 的连接工厂
///
/// 工厂只持有共享的 [`SdkConfig`]（相当于会话），每次 [`connect`](ConnectionFactory::connect)
/// 都会构建一个新的 [`Client`]，连接释放时随之丢弃，不做复用
#[derive(Clone)]
pub struct AwsS3ConnectionFactory {
    sdk_config: SdkConfig,
    endpoint: String,
    force_path_style: bool,
}

impl AwsS3ConnectionFactory {
    /// 根据配置加载会话，配置不合法时返回 [`ObjectStoreError::Configuration`]
    pub async fn new(config: &ObjectStorageConfig) -> Result<Self, ObjectStoreError> {
        config.check()?;

        let credentials = Credentials::new(
            &config.key_id,
            &config.secret,
            None,
            None,
            "ossx-static",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Ok(Self {
            sdk_config,
            endpoint: config.endpoint.clone(),
            force_path_style: config.force_path_style,
        })
    }

    fn build_client(&self) -> Client {
        let s3_config = aws_sdk_s3::config::Builder::from(&self.sdk_config)
            .endpoint_url(&self.endpoint)
            .force_path_style(self.force_path_style)
            .build();

        Client::from_conf(s3_config)
    }
}

#[async_trait]
impl ConnectionFactory for AwsS3ConnectionFactory {
    async fn connect(&self) -> Result<Box<dyn Connection>, ObjectStoreError> {
        Ok(Box::new(AwsS3Connection {
            client: Some(self.build_client()),
        }))
    }
}

/// 单次操作使用的 S3 连接
pub struct AwsS3Connection {
    client: Option<Client>,
}

impl AwsS3Connection {
    fn client(&self, operation: &str) -> Result<&Client, ObjectStoreError> {
        self.client.as_ref().ok_or_else(|| ObjectStoreError::Transport {
            operation: operation.to_string(),
            message: "connection already released".to_string(),
            source: None,
        })
    }
}

#[async_trait]
impl Connection for AwsS3Connection {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<(), ObjectStoreError> {
        self.client("put_object")?
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| ObjectStoreError::from_sdk_error(e, "put_object", key))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, ObjectStoreError> {
        let output = self
            .client("get_object")?
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ObjectStoreError::from_sdk_error(e, "get_object", key))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ObjectStoreError::transport(e, "get_object"))?
            .into_bytes();

        Ok(bytes)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        self.client("delete_object")?
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ObjectStoreError::from_sdk_error(e, "delete_object", key))?;

        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        self.client("head_object")?
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| ObjectStoreError::from_sdk_error(e, "head_object", key))?;

        Ok(())
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<ObjectPage, ObjectStoreError> {
        let mut builder = self.client("list_objects")?.list_objects_v2().bucket(bucket);

        if let Some(token) = token {
            builder = builder.continuation_token(token.as_str());
        }

        let output = builder
            .send()
            .await
            .map_err(|e| ObjectStoreError::from_sdk_list_error(e, bucket))?;

        // 没有 key 的条目无法寻址，直接跳过
        let objects = output
            .contents()
            .iter()
            .filter_map(|obj| {
                obj.key()
                    .map(|key| ObjectMeta::new(key, obj.size().unwrap_or(0).max(0) as u64))
            })
            .collect();

        Ok(ObjectPage {
            objects,
            next: output.next_continuation_token().map(ContinuationToken::from),
        })
    }

    fn release(&mut self) {
        self.client.take();
    }
}
