//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않았으면 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logvault_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, client_error, server_error)
pub const LABEL_RESULT: &str = "result";

/// 분류 레이블 키 (alert, informational)
pub const LABEL_DECISION: &str = "decision";

/// 백엔드 레이블 키 (fs, http, log, webhook)
pub const LABEL_BACKEND: &str = "backend";

// ─── Ingest 메트릭 ──────────────────────────────────────────────────

/// Ingest: 수신된 요청 수 (counter, label: result)
pub const INGEST_REQUESTS_TOTAL: &str = "logvault_ingest_requests_total";

/// Ingest: 저장된 레코드 수 (counter, label: decision)
pub const INGEST_RECORDS_STORED_TOTAL: &str = "logvault_ingest_records_stored_total";

/// Ingest: 저장 실패 수 (counter, label: backend)
pub const INGEST_STORE_FAILURES_TOTAL: &str = "logvault_ingest_store_failures_total";

/// Ingest: 발송된 알림 수 (counter)
pub const INGEST_ALERTS_SENT_TOTAL: &str = "logvault_ingest_alerts_sent_total";

/// Ingest: 알림 발송 실패 수 (counter, label: backend)
pub const INGEST_ALERT_FAILURES_TOTAL: &str = "logvault_ingest_alert_failures_total";

/// Ingest: 요청 처리 지연 시간 (histogram, 초)
pub const INGEST_PROCESSING_DURATION_SECONDS: &str =
    "logvault_ingest_processing_duration_seconds";

// ─── Daemon 메트릭 ──────────────────────────────────────────────────

/// Daemon: 가동 시간 (gauge, 초)
pub const DAEMON_UPTIME_SECONDS: &str = "logvault_daemon_uptime_seconds";

/// Daemon: 빌드 정보 (gauge, 항상 1, label: version)
pub const DAEMON_BUILD_INFO: &str = "logvault_daemon_build_info";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 요청 처리 지연 시간 히스토그램 버킷 (초)
///
/// 1ms ~ 10s 범위 (스토어 쓰기와 알림 발행 포함)
pub const PROCESSING_DURATION_BUCKETS: [f64; 10] =
    [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 10.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        INGEST_REQUESTS_TOTAL,
        "Total number of ingestion requests by result"
    );
    describe_counter!(
        INGEST_RECORDS_STORED_TOTAL,
        "Total number of log records written to the durable store"
    );
    describe_counter!(
        INGEST_STORE_FAILURES_TOTAL,
        "Total number of failed durable store writes"
    );
    describe_counter!(
        INGEST_ALERTS_SENT_TOTAL,
        "Total number of alert notifications accepted by the channel"
    );
    describe_counter!(
        INGEST_ALERT_FAILURES_TOTAL,
        "Total number of failed alert notification publishes"
    );
    describe_histogram!(
        INGEST_PROCESSING_DURATION_SECONDS,
        "Time to process a single ingestion request in seconds"
    );

    describe_gauge!(DAEMON_UPTIME_SECONDS, "logvault daemon uptime in seconds");
    describe_gauge!(
        DAEMON_BUILD_INFO,
        "Build information (always 1, with version label)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        INGEST_REQUESTS_TOTAL,
        INGEST_RECORDS_STORED_TOTAL,
        INGEST_STORE_FAILURES_TOTAL,
        INGEST_ALERTS_SENT_TOTAL,
        INGEST_ALERT_FAILURES_TOTAL,
        INGEST_PROCESSING_DURATION_SECONDS,
        DAEMON_UPTIME_SECONDS,
        DAEMON_BUILD_INFO,
    ];

    #[test]
    fn all_metrics_start_with_logvault_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("logvault_"),
                "Metric '{}' does not start with 'logvault_' prefix",
                name
            );
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        // 레코더 없이 호출해도 패닉하지 않아야 함
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_RESULT, LABEL_DECISION, LABEL_BACKEND] {
            assert_eq!(label.to_lowercase(), label);
        }
    }

    #[test]
    fn processing_duration_buckets_are_sorted() {
        let buckets = PROCESSING_DURATION_BUCKETS;
        for i in 1..buckets.len() {
            assert!(buckets[i] > buckets[i - 1]);
        }
    }
}
