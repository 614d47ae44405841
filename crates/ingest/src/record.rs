//! 페이로드 디코딩 및 필드 검증
//!
//! 원시 입력을 [`LogSubmission`]으로 해석하고, 필수 필드를 확인한 뒤
//! [`ValidSubmission`]으로 승격합니다. 검증을 통과하지 못한 입력은
//! 저장/알림 단계에 도달하지 않습니다.

use serde::Deserialize;

use logvault_core::types::LogRecord;

use crate::error::IngestError;

/// 디코딩된 수집 요청
///
/// 알 수 없는 필드는 무시됩니다. 호출자가 보낸 `timestamp`도 여기서 버려집니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogSubmission {
    /// 로그 분류
    #[serde(default)]
    pub log_type: Option<String>,
    /// 로그 본문
    #[serde(default)]
    pub message: Option<String>,
}

impl LogSubmission {
    /// 원시 바이트를 디코딩합니다.
    ///
    /// 빈 본문(공백만 있는 경우 포함)은 `{}`로 취급합니다.
    /// JSON 객체가 아니거나 필드 값이 문자열이 아니면 `MalformedInput`입니다.
    pub fn decode(raw: &[u8]) -> Result<Self, IngestError> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: serde_json::Value = serde_json::from_slice(raw)?;
        if !value.is_object() {
            return Err(IngestError::MalformedInput(format!(
                "expected a JSON object, found {}",
                json_kind(&value)
            )));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// 필수 필드가 모두 존재하고 비어 있지 않은지 확인합니다.
    pub fn validate(self) -> Result<ValidSubmission, IngestError> {
        match (self.log_type, self.message) {
            (Some(log_type), Some(message)) if !log_type.is_empty() && !message.is_empty() => {
                Ok(ValidSubmission { log_type, message })
            }
            _ => Err(IngestError::Validation),
        }
    }
}

/// 검증을 통과한 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    log_type: String,
    message: String,
}

impl ValidSubmission {
    /// 로그 분류
    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    /// 로그 본문
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 현재 UTC 시각을 부여하여 레코드를 만듭니다.
    pub fn stamp(self) -> LogRecord {
        LogRecord::stamp(self.log_type, self.message)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
