//! 도메인 타입 — 수집 경로 전체에서 공유하는 데이터 구조
//!
//! [`LogRecord`]는 한 번의 수집 호출에서 생성되어 저장소에 기록된 뒤 폐기됩니다.
//! 호출 간에 유지되는 상태는 없습니다.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// 저장 키의 고정 네임스페이스
pub const STORAGE_NAMESPACE: &str = "logs";

/// 알림 제목/본문 접두어
const ALERT_PREFIX: &str = "Security Alert";

/// 수집된 로그 레코드
///
/// `log_type`과 `message`는 검증을 통과한 비어 있지 않은 문자열이며,
/// `timestamp`는 수신 시각(UTC)으로 핸들러가 부여합니다.
/// 직렬화 필드 순서는 `timestamp`, `log_type`, `message`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 수신 시각 (RFC 3339, 마이크로초, `Z` 접미어)
    pub timestamp: String,
    /// 로그 분류
    pub log_type: String,
    /// 로그 본문
    pub message: String,
}

impl LogRecord {
    /// 주어진 시각으로 레코드를 생성합니다.
    pub fn new(log_type: impl Into<String>, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: format_timestamp(at),
            log_type: log_type.into(),
            message: message.into(),
        }
    }

    /// 현재 UTC 시각으로 레코드를 생성합니다.
    pub fn stamp(log_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(log_type, message, Utc::now())
    }

    /// 저장 키를 반환합니다: `logs/{log_type}/{timestamp}.json`
    pub fn storage_key(&self) -> String {
        format!(
            "{}/{}/{}.json",
            STORAGE_NAMESPACE, self.log_type, self.timestamp
        )
    }

    /// 저장용 JSON 바이트로 직렬화합니다.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// 이 레코드에 대한 알림 메시지를 만듭니다.
    pub fn alert_message(&self) -> AlertMessage {
        AlertMessage {
            subject: format!("{} - {}", ALERT_PREFIX, self.log_type),
            body: format!("{}: {}", ALERT_PREFIX, self.message),
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp, self.log_type, self.message)
    }
}

/// 알림 채널로 보낼 메시지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    /// 제목 (`log_type` 포함)
    pub subject: String,
    /// 본문 (원본 `message` 포함)
    pub body: String,
}

/// 분류 결과
///
/// 치명적 타입이면 알림을 발송하고, 그 외에는 저장만 합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertDecision {
    /// 정보성 — 알림 없음
    #[default]
    Informational,
    /// 알림 대상
    Alert,
}

impl AlertDecision {
    /// 알림 대상 여부
    pub fn is_alert(self) -> bool {
        matches!(self, Self::Alert)
    }

    /// 메트릭/로그 레이블용 소문자 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Alert => "alert",
        }
    }
}

impl fmt::Display for AlertDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 타임스탬프를 RFC 3339 (마이크로초, `Z`) 형식으로 변환합니다.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
