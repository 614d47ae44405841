//! 에러 타입 — 도메인별 에러 정의
//!
//! 외부 의존성(스토어, 알림 채널)의 실패는 각각 하나의 균일한 에러 타입으로
//! 표현되며, 원인 메시지를 그대로 담습니다.

/// logvault 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogvaultError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스토리지 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// 알림 전송 에러
    #[error("notification error: {0}")]
    Notification(#[from] NotificationError),

    /// 잘못된 입력 (파싱/검증 실패)
    #[error("invalid input: {0}")]
    Input(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스토리지 에러
///
/// 권한, 네트워크, 용량 등 모든 쓰기 실패를 포괄합니다.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 스토어가 쓰기를 거부함 (HTTP 상태 등)
    #[error("write rejected for '{key}': {reason}")]
    Rejected { key: String, reason: String },

    /// 허용되지 않는 오브젝트 키
    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// 제한 시간 초과
    #[error("write timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// 파일시스템 I/O 실패
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 알림 전송 에러
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 채널이 메시지를 거부함
    #[error("publish rejected by '{channel}': {reason}")]
    Rejected { channel: String, reason: String },

    /// 제한 시간 초과
    #[error("publish timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}
