//! HTTP 오브젝트 저장소
//!
//! `PUT {endpoint}/{bucket}/{key}` 요청으로 오브젝트를 기록합니다.
//! 익명 쓰기를 허용하는 S3 호환 게이트웨이나 사내 스토리지 프록시를 대상으로 합니다.
//!
//! 키는 `/` 단위로 나누어 세그먼트마다 퍼센트 인코딩합니다. `log_type`에 들어온
//! `#`, `?`, `%`가 프래그먼트나 쿼리로 해석되지 않고 경로에 그대로 남습니다.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Url;
use tracing::debug;

use logvault_core::error::StorageError;

use super::{ObjectStore, validate_key};

/// 거부 응답 본문에서 에러 메시지로 옮길 최대 길이
const MAX_REJECT_BODY: usize = 256;

/// HTTP PUT 기반 저장소
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpObjectStore {
    /// 엔드포인트와 버킷으로 저장소를 생성합니다.
    ///
    /// `timeout`은 요청 하나의 전체 제한 시간입니다.
    pub fn new(endpoint: &str, bucket: &str, timeout: Duration) -> Result<Self, StorageError> {
        let mut base_url = Url::parse(endpoint)
            .map_err(|e| StorageError::Connection(format!("invalid endpoint {endpoint}: {e}")))?;
        base_url
            .path_segments_mut()
            .map_err(|()| {
                StorageError::Connection(format!("endpoint cannot carry a path: {endpoint}"))
            })?
            .pop_if_empty()
            .push(bucket);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Connection(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// 키에 대응하는 URL
    ///
    /// 세그먼트마다 인코딩하므로 키의 `/`만 경로 구분자로 쓰입니다.
    pub fn url_for(&self, key: &str) -> Result<Url, StorageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::InvalidKey {
                key: key.to_owned(),
                reason: "endpoint cannot carry a path".to_owned(),
            })?
            .extend(key.split('/'));
        Ok(url)
    }
}

impl ObjectStore for HttpObjectStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        let url = self.url_for(key)?;
        let response = self
            .client
            .put(url.clone())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StorageError::Timeout {
                        timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    }
                } else {
                    StorageError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(MAX_REJECT_BODY).collect();
            return Err(StorageError::Rejected {
                key: key.to_owned(),
                reason: if detail.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {detail}")
                },
            });
        }

        debug!(url = %url, status = %status, "object uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CONTENT_TYPE_JSON;

    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::routing::put;

    type Captured = Arc<Mutex<Vec<(String, String, Vec<u8>)>>>;

    async fn spawn_server(status: StatusCode, delay: Duration) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/{*path}",
                put(
                    move |State(captured): State<Captured>,
                          uri: Uri,
                          headers: HeaderMap,
                          body: Bytes| async move {
                        tokio::time::sleep(delay).await;
                        let content_type = headers
                            .get("content-type")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_owned();
                        captured
                            .lock()
                            .unwrap()
                            .push((uri.path().to_owned(), content_type, body.to_vec()));
                        (status, "denied by policy")
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    #[tokio::test]
    async fn put_sends_object_under_bucket() {
        let (endpoint, captured) = spawn_server(StatusCode::OK, Duration::ZERO).await;
        let store = HttpObjectStore::new(&endpoint, "audit", Duration::from_secs(5)).unwrap();

        store
            .put("logs/info/t.json", Bytes::from_static(b"{}"), CONTENT_TYPE_JSON)
            .await
            .unwrap();

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].0, "/audit/logs/info/t.json");
        assert_eq!(captured[0].1, CONTENT_TYPE_JSON);
        assert_eq!(captured[0].2, b"{}");
    }

    #[tokio::test]
    async fn url_metacharacters_in_key_stay_in_path() {
        let (endpoint, captured) = spawn_server(StatusCode::OK, Duration::ZERO).await;
        let store = HttpObjectStore::new(&endpoint, "audit", Duration::from_secs(5)).unwrap();

        for log_type in ["a#b", "a?b", "a%b"] {
            let key = format!("logs/{log_type}/2024-01-15T12:00:00.000000Z.json");
            store
                .put(&key, Bytes::from_static(b"{}"), CONTENT_TYPE_JSON)
                .await
                .unwrap();
        }

        let paths: Vec<String> = captured
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _, _)| path.clone())
            .collect();
        assert_eq!(
            paths,
            [
                "/audit/logs/a%23b/2024-01-15T12:00:00.000000Z.json",
                "/audit/logs/a%3Fb/2024-01-15T12:00:00.000000Z.json",
                "/audit/logs/a%25b/2024-01-15T12:00:00.000000Z.json",
            ]
        );
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let (endpoint, _captured) = spawn_server(StatusCode::OK, Duration::from_secs(5)).await;
        let store = HttpObjectStore::new(&endpoint, "audit", Duration::from_millis(100)).unwrap();

        let err = store
            .put("logs/info/t.json", Bytes::from_static(b"{}"), CONTENT_TYPE_JSON)
            .await
            .unwrap_err();
        assert!(
            matches!(err, StorageError::Timeout { timeout_ms: 100 }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn non_success_status_is_rejected_with_detail() {
        let (endpoint, _captured) = spawn_server(StatusCode::FORBIDDEN, Duration::ZERO).await;
        let store = HttpObjectStore::new(&endpoint, "audit", Duration::from_secs(5)).unwrap();

        let err = store
            .put("logs/info/t.json", Bytes::from_static(b"{}"), CONTENT_TYPE_JSON)
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, StorageError::Rejected { .. }));
        assert!(msg.contains("403"), "{msg}");
        assert!(msg.contains("denied by policy"), "{msg}");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_connection_error() {
        // 바인드 후 바로 닫아 거절되는 포트를 얻음
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store =
            HttpObjectStore::new(&format!("http://{addr}"), "audit", Duration::from_secs(2))
                .unwrap();
        let err = store
            .put("logs/info/t.json", Bytes::from_static(b"{}"), CONTENT_TYPE_JSON)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
    }

    #[test]
    fn url_joins_endpoint_bucket_and_key() {
        let store =
            HttpObjectStore::new("http://minio:9000/", "logs-bucket", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            store.url_for("logs/info/t.json").unwrap().as_str(),
            "http://minio:9000/logs-bucket/logs/info/t.json"
        );
    }

    #[test]
    fn endpoint_must_be_absolute_url() {
        let err = HttpObjectStore::new("minio:9000", "audit", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)), "{err:?}");
    }
}
