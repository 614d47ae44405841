//! 내구성 저장소 추상화
//!
//! [`ObjectStore`] trait은 키 기반 오브젝트 저장소에 대한 쓰기를 추상화합니다.
//! 운영 환경에서는 [`FsObjectStore`] 또는 [`HttpObjectStore`]를 사용하고,
//! 테스트에서는 `MockObjectStore`를 사용합니다.
//!
//! # 보장해야 하는 의미
//!
//! - 키 단위 원자적 쓰기 (부분 오브젝트가 관찰되지 않음)
//! - 같은 키에 대한 덮어쓰기는 조용히 허용
//! - 모든 실패는 원인을 담은 [`StorageError`] 하나로 표현

mod fs;
mod http;

use std::future::Future;

use bytes::Bytes;

use logvault_core::config::StorageConfig;
use logvault_core::error::{LogvaultError, StorageError};

pub use fs::FsObjectStore;
pub use http::HttpObjectStore;

/// JSON 오브젝트 콘텐츠 타입
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 키 기반 오브젝트 저장소
///
/// 상태를 갖지 않으며 여러 호출에서 동시에 재사용할 수 있어야 합니다.
pub trait ObjectStore: Send + Sync + 'static {
    /// 백엔드 이름 (로그/메트릭 레이블용)
    fn name(&self) -> &str;

    /// `key`에 `body`를 기록합니다. 기존 오브젝트는 덮어씁니다.
    fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// 설정으로 선택되는 저장소 백엔드
pub enum StoreBackend {
    /// 로컬 파일시스템
    Fs(FsObjectStore),
    /// HTTP PUT
    Http(HttpObjectStore),
}

impl StoreBackend {
    /// `[storage]` 설정에서 백엔드를 생성합니다.
    pub fn from_config(config: &StorageConfig) -> Result<Self, LogvaultError> {
        match config.backend.as_str() {
            "fs" => Ok(Self::Fs(FsObjectStore::new(
                std::path::Path::new(&config.root_dir).join(&config.bucket),
            ))),
            "http" => Ok(Self::Http(HttpObjectStore::new(
                &config.endpoint,
                &config.bucket,
                std::time::Duration::from_millis(config.timeout_ms),
            )?)),
            other => Err(logvault_core::error::ConfigError::InvalidValue {
                field: "storage.backend".to_owned(),
                reason: format!("unsupported backend '{other}'"),
            }
            .into()),
        }
    }
}

impl ObjectStore for StoreBackend {
    fn name(&self) -> &str {
        match self {
            Self::Fs(store) => store.name(),
            Self::Http(store) => store.name(),
        }
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        match self {
            Self::Fs(store) => store.put(key, body, content_type).await,
            Self::Http(store) => store.put(key, body, content_type).await,
        }
    }
}

/// 오브젝트 키를 검증합니다.
///
/// 상대 경로여야 하며, 빈 세그먼트, `.`/`..` 세그먼트, NUL 문자를 허용하지 않습니다.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let reject = |reason: &str| StorageError::InvalidKey {
        key: key.to_owned(),
        reason: reason.to_owned(),
    };

    if key.is_empty() {
        return Err(reject("key must not be empty"));
    }
    if key.starts_with('/') {
        return Err(reject("key must be relative"));
    }
    if key.contains('\0') {
        return Err(reject("key must not contain NUL"));
    }
    for segment in key.split('/') {
        match segment {
            "" => return Err(reject("key must not contain empty segments")),
            "." | ".." => return Err(reject("key must not contain '.' or '..' segments")),
            _ => {}
        }
    }
    Ok(())
}

/// 테스트용 Mock 저장소
///
/// 기록된 오브젝트를 메모리에 보관하며, 실패나 지연을 시뮬레이션할 수 있습니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockObjectStore {
    /// 기록된 (키, 본문, 콘텐츠 타입)
    pub writes: std::sync::Mutex<Vec<(String, Bytes, String)>>,
    /// 쓰기 시 반환할 실패 메시지
    pub fail_with: Option<String>,
    /// 쓰기 전 지연
    pub delay: Option<std::time::Duration>,
}

#[cfg(test)]
impl MockObjectStore {
    /// 항상 성공하는 mock 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 쓰기가 실패하도록 설정합니다.
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    /// 쓰기 전에 지연하도록 설정합니다.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 성공한 쓰기 횟수
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| w.len()).unwrap_or(0)
    }
}

#[cfg(test)]
impl ObjectStore for MockObjectStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.fail_with {
            return Err(StorageError::Connection(reason.clone()));
        }
        self.writes
            .lock()
            .map_err(|_| StorageError::Connection("mock lock poisoned".to_owned()))?
            .push((key.to_owned(), body, content_type.to_owned()));
        Ok(())
    }
}
