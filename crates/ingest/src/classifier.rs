//! 로그 분류 -- `log_type`이 알림 대상인지 판정합니다.

use logvault_core::types::AlertDecision;

/// 알림을 발송하는 로그 분류 (소문자)
pub const CRITICAL_TYPES: [&str; 3] = ["security", "error", "critical"];

/// `log_type`을 분류합니다.
///
/// 대소문자를 구분하지 않으며, 알 수 없는 분류는 정보성으로 취급합니다.
pub fn classify(log_type: &str) -> AlertDecision {
    if is_critical(log_type) {
        AlertDecision::Alert
    } else {
        AlertDecision::Informational
    }
}

/// 치명적 분류 여부
pub fn is_critical(log_type: &str) -> bool {
    CRITICAL_TYPES
        .iter()
        .any(|critical| critical.eq_ignore_ascii_case(log_type))
}
