//! 수집 에러 타입
//!
//! [`IngestError`]는 한 번의 수집 호출이 끝날 수 있는 모든 실패를 표현합니다.
//! 입력 에러(`MalformedInput`, `Validation`)는 클라이언트 에러 응답이 되고,
//! 의존성 에러(`Storage`, `Notification`)는 서버 에러 응답이 됩니다.
//! `From<IngestError> for LogvaultError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use logvault_core::error::{LogvaultError, NotificationError, StorageError};

/// 필수 필드 누락 메시지
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required log fields.";

/// 수집 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// 페이로드가 구조화된 데이터로 해석되지 않음
    #[error("{0}")]
    MalformedInput(String),

    /// 필수 필드(`log_type`, `message`) 누락 또는 빈 값
    #[error("Missing required log fields.")]
    Validation,

    /// 저장소 쓰기 실패
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// 알림 발행 실패 (레코드는 이미 저장된 상태)
    #[error("{0}")]
    Notification(#[from] NotificationError),
}

impl IngestError {
    /// 응답 상태 코드 (HTTP 의미)
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// 호출자의 입력 문제인지 여부
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedInput(_) | Self::Validation)
    }

    /// 메트릭 레이블용 결과 이름
    pub fn result_label(&self) -> &'static str {
        if self.is_client_error() {
            "client_error"
        } else {
            "server_error"
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::MalformedInput(err.to_string())
    }
}

impl From<IngestError> for LogvaultError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Storage(e) => LogvaultError::Storage(e),
            IngestError::Notification(e) => LogvaultError::Notification(e),
            other => LogvaultError::Input(other.to_string()),
        }
    }
}
