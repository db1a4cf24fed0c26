use std::collections::HashSet;

use crate::oss::{Connection, ContinuationToken, ObjectMeta, ObjectPage, ObjectStoreError};

/// 分页遍历结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal<T> {
    /// 折叠后的值
    pub value: T,
    /// 实际请求的页数
    pub pages: usize,
}

/// 按续传令牌顺序遍历存储桶的所有分页，并把每个对象折叠进累加器
///
/// 页与页之间严格串行：第 N 页的令牌决定第 N+1 页。任意一页失败时
/// 直接返回错误，已经累加的部分结果随之丢弃，调用方不会拿到残缺的值。
/// 服务端返回本次遍历中已经出现过的令牌时视为传输错误，避免死循环
pub async fn fold_pages<T, F>(
    connection: &dyn Connection,
    bucket: &str,
    init: T,
    mut fold: F,
) -> Result<Traversal<T>, ObjectStoreError>
where
    F: FnMut(T, ObjectMeta) -> T,
{
    let mut acc = init;
    let mut token: Option<ContinuationToken> = None;
    let mut seen: HashSet<ContinuationToken> = HashSet::new();
    let mut pages = 0;

    loop {
        let ObjectPage { objects, next } =
            connection.list_objects_page(bucket, token.as_ref()).await?;
        pages += 1;

        acc = objects.into_iter().fold(acc, &mut fold);

        match next {
            None => return Ok(Traversal { value: acc, pages }),
            Some(next) if seen.contains(&next) => {
                return Err(ObjectStoreError::Transport {
                    operation: "list_objects".to_string(),
                    message: format!(
                        "pagination did not advance past token {}",
                        next.as_str()
                    ),
                    source: None,
                });
            }
            Some(next) => {
                seen.insert(next.clone());
                token = Some(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// 按脚本依次返回分页，并记录每次请求带的令牌
    struct ScriptedConnection {
        pages: Mutex<Vec<Result<ObjectPage, ObjectStoreError>>>,
        seen_tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedConnection {
        fn new(mut pages: Vec<Result<ObjectPage, ObjectStoreError>>) -> Self {
            pages.reverse();
            Self {
                pages: Mutex::new(pages),
                seen_tokens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Connection for ScriptedConnection {
        async fn put_object(&self, _: &str, _: &str, _: Bytes) -> Result<(), ObjectStoreError> {
            unimplemented!()
        }

        async fn get_object(&self, _: &str, _: &str) -> Result<Bytes, ObjectStoreError> {
            unimplemented!()
        }

        async fn delete_object(&self, _: &str, _: &str) -> Result<(), ObjectStoreError> {
            unimplemented!()
        }

        async fn head_object(&self, _: &str, _: &str) -> Result<(), ObjectStoreError> {
            unimplemented!()
        }

        async fn list_objects_page(
            &self,
            _: &str,
            token: Option<&ContinuationToken>,
        ) -> Result<ObjectPage, ObjectStoreError> {
            self.seen_tokens
                .lock()
                .unwrap()
                .push(token.map(|t| t.as_str().to_string()));
            self.pages.lock().unwrap().pop().expect("no more scripted pages")
        }
    }

    fn page(objects: &[(&str, u64)], next: Option<&str>) -> Result<ObjectPage, ObjectStoreError> {
        Ok(ObjectPage {
            objects: objects.iter().map(|(k, s)| ObjectMeta::new(*k, *s)).collect(),
            next: next.map(ContinuationToken::from),
        })
    }

    #[tokio::test]
    async fn test_fold_follows_tokens_in_order() {
        let conn = ScriptedConnection::new(vec![
            page(&[("a", 1), ("b", 2)], Some("t1")),
            page(&[("c", 3)], Some("t2")),
            page(&[], None),
        ]);

        let traversal = fold_pages(&conn, "bucket", Vec::new(), |mut keys, obj| {
            keys.push(obj.key);
            keys
        })
        .await
        .unwrap();

        assert_eq!(traversal.value, vec!["a", "b", "c"]);
        assert_eq!(traversal.pages, 3);
        assert_eq!(
            *conn.seen_tokens.lock().unwrap(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fold_discards_partial_on_failure() {
        let conn = ScriptedConnection::new(vec![
            page(&[("a", 100)], Some("t1")),
            Err(ObjectStoreError::Transport {
                operation: "list_objects".to_string(),
                message: "connection reset".to_string(),
                source: None,
            }),
        ]);

        let result = fold_pages(&conn, "bucket", 0u64, |total, obj| total + obj.size).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fold_rejects_repeated_token() {
        let conn = ScriptedConnection::new(vec![
            page(&[("a", 1)], Some("t1")),
            page(&[("a", 1)], Some("t1")),
        ]);

        let err = fold_pages(&conn, "bucket", 0u64, |total, obj| total + obj.size)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not advance"));
    }

    #[tokio::test]
    async fn test_fold_rejects_token_cycle() {
        let conn = ScriptedConnection::new(vec![
            page(&[("a", 1)], Some("A")),
            page(&[("b", 1)], Some("B")),
            page(&[("c", 1)], Some("A")),
        ]);

        let err = fold_pages(&conn, "bucket", Vec::new(), |mut keys, obj| {
            keys.push(obj.key);
            keys
        })
        .await
        .unwrap_err();

        assert!(err.to_string().contains("did not advance"));
        assert_eq!(
            *conn.seen_tokens.lock().unwrap(),
            vec![None, Some("A".to_string()), Some("B".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fold_single_empty_page() {
        let conn = ScriptedConnection::new(vec![page(&[], None)]);

        let traversal = fold_pages(&conn, "bucket", 0u64, |total, obj| total + obj.size)
            .await
            .unwrap();
        assert_eq!(traversal, Traversal { value: 0, pages: 1 });
    }
}
