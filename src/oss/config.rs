use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::oss::ObjectStoreError;

/// 读取配置的环境变量名
pub const ENV_KEY_ID: &str = "KEY_ID";
pub const ENV_SECRET: &str = "SECRET";
pub const ENV_ENDPOINT: &str = "ENDPOINT";
pub const ENV_CONTAINER: &str = "CONTAINER";
pub const ENV_REGION: &str = "REGION";

/// 对象存储客户端配置
///
/// `key_id`、`secret`、`endpoint`、`container` 均为必填，
/// 任何一项为空都会在构造客户端时失败
#[derive(Deserialize, Serialize, SmartDefault, Clone, PartialEq, Validate)]
#[serde(default)]
pub struct ObjectStorageConfig {
    /// Access Key ID
    #[garde(length(min = 1))]
    pub key_id: String,

    /// Secret Access Key
    #[garde(length(min = 1))]
    pub secret: String,

    /// 服务端点，如 `https://s3.storage.example.com`
    #[garde(length(min = 1), pattern(r"^https?://"))]
    pub endpoint: String,

    /// 存储桶（容器）名称
    #[garde(length(min = 1))]
    pub container: String,

    /// 签名使用的区域，S3 兼容存储通常忽略该值
    #[garde(length(min = 1))]
    #[default = "us-east-1"]
    pub region: String,

    /// 是否使用 path-style URL，兼容存储大多需要开启
    #[garde(skip)]
    #[default = true]
    pub force_path_style: bool,
}

impl std::fmt::Debug for ObjectStorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorageConfig")
            .field("key_id", &self.key_id)
            .field("secret", &"***")
            .field("endpoint", &self.endpoint)
            .field("container", &self.container)
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl ObjectStorageConfig {
    pub fn new(
        key_id: impl Into<String>,
        secret: impl Into<String>,
        endpoint: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            secret: secret.into(),
            endpoint: endpoint.into(),
            container: container.into(),
            ..Default::default()
        }
    }

    /// 从环境变量 `KEY_ID`、`SECRET`、`ENDPOINT`、`CONTAINER`（可选 `REGION`）读取配置
    ///
    /// 缺失的变量会在同一个错误中全部列出
    pub fn from_env() -> Result<Self, ObjectStoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过自定义查找函数读取配置，便于测试和嵌入其他配置源
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ObjectStoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let key_id = required(ENV_KEY_ID);
        let secret = required(ENV_SECRET);
        let endpoint = required(ENV_ENDPOINT);
        let container = required(ENV_CONTAINER);

        if !missing.is_empty() {
            return Err(ObjectStoreError::Configuration(format!(
                "缺少环境变量: {}",
                missing.join(", ")
            )));
        }

        let mut config = Self::new(key_id, secret, endpoint, container);
        if let Some(region) = lookup(ENV_REGION).filter(|r| !r.trim().is_empty()) {
            config.region = region;
        }

        config.check()?;
        Ok(config)
    }

    /// 使用 garde 校验配置
    pub fn check(&self) -> Result<(), ObjectStoreError> {
        self.validate()
            .map_err(|errors| ObjectStoreError::Configuration(format!("{}", errors)))
    }
}
