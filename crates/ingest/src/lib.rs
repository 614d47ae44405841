//! logvault 수집 핸들러
//!
//! 로그 제출 하나를 받아 다음 순서로 처리합니다:
//!
//! ```text
//! raw bytes -> LogSubmission::decode -> validate -> stamp
//!           -> ObjectStore::put -> classify -> (Notifier::publish) -> IngestResponse
//! ```
//!
//! # 모듈 구성
//!
//! - [`record`]: 페이로드 디코딩과 필수 필드 검증
//! - [`classifier`]: `log_type` 기반 알림 판정
//! - [`store`]: [`ObjectStore`] trait과 파일시스템/HTTP 구현
//! - [`notify`]: [`Notifier`] trait과 로그/webhook 구현
//! - [`handler`]: [`IngestHandler`] -- 위 단계를 묶는 오케스트레이터
//!
//! # 사용 예시
//!
//! ```ignore
//! use logvault_ingest::{IngestConfig, IngestHandler, LogNotifier, FsObjectStore};
//!
//! let handler = IngestHandler::new(
//!     FsObjectStore::new("/var/lib/logvault/logvault-logs"),
//!     LogNotifier::new("security-alerts"),
//!     IngestConfig::default(),
//! );
//! let response = handler.handle(br#"{"log_type":"info","message":"hi"}"#).await;
//! assert_eq!(response.status, 200);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod handler;
pub mod notify;
pub mod record;
pub mod store;

// 핸들러
pub use handler::{IngestHandler, IngestResponse, SUCCESS_MESSAGE};

// 설정 / 에러
pub use config::{IngestConfig, IngestConfigBuilder};
pub use error::IngestError;

// 의존성 추상화
pub use notify::{LogNotifier, Notifier, NotifierBackend, WebhookNotifier};
pub use store::{FsObjectStore, HttpObjectStore, ObjectStore, StoreBackend};

// 분류
pub use classifier::{classify, is_critical};
