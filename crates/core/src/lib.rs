//! logvault 공통 크레이트
//!
//! 수집 핸들러와 데몬이 공유하는 도메인 타입, 에러, 설정, 메트릭 이름을 정의합니다.
//!
//! - [`types`]: [`LogRecord`], [`AlertMessage`], [`AlertDecision`]
//! - [`error`]: 의존성 실패([`StorageError`], [`NotificationError`])와 설정 에러
//! - [`config`]: `logvault.toml` + 환경변수 설정
//! - [`metrics`]: Prometheus 메트릭 이름 상수

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, LogvaultError, NotificationError, StorageError};

// 설정
pub use config::LogvaultConfig;

// 도메인 타입
pub use types::{AlertDecision, AlertMessage, LogRecord};
