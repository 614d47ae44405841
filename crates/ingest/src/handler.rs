//! 수집 핸들러
//!
//! [`IngestHandler`]는 한 번의 수집 호출을 다음 순서로 처리합니다:
//!
//! ```text
//! Received -> Parsed -> Validated -> Stamped -> Persisted -> (Notified) -> Responded
//! ```
//!
//! 입력 에러는 `Parsed`/`Validated` 단계에서 클라이언트 에러 응답으로 끝나고,
//! 저장 이후의 실패는 모두 서버 에러 응답이 됩니다. 재시도나 보상 동작은 없습니다.
//! 저장 성공 후 알림이 실패하면 레코드는 저장된 채로 500을 반환합니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use serde_json::json;
use tracing::{Instrument, Span, error, info, warn};
use uuid::Uuid;

use logvault_core::error::{NotificationError, StorageError};
use logvault_core::metrics as m;
use logvault_core::types::LogRecord;

use crate::classifier::classify;
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::notify::Notifier;
use crate::record::LogSubmission;
use crate::store::{CONTENT_TYPE_JSON, ObjectStore};

/// 성공 응답 메시지
pub const SUCCESS_MESSAGE: &str = "Log processed successfully";

/// 수집 호출 결과 응답
///
/// 상태 코드는 HTTP 의미를 따르며, 본문은 항상 JSON 객체입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResponse {
    /// 상태 코드 (200, 400, 500)
    pub status: u16,
    /// 응답 본문
    pub body: serde_json::Value,
}

impl IngestResponse {
    /// 성공 응답: `200 {"message": "Log processed successfully"}`
    pub fn ok() -> Self {
        Self {
            status: 200,
            body: json!({ "message": SUCCESS_MESSAGE }),
        }
    }

    /// 에러 응답: `{"error": "<detail>"}`
    pub fn from_error(err: &IngestError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }

    /// 성공 여부
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

impl From<Result<LogRecord, IngestError>> for IngestResponse {
    fn from(result: Result<LogRecord, IngestError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(err) => Self::from_error(&err),
        }
    }
}

/// 수집 핸들러
///
/// 저장소와 알림 채널을 `Arc`로 공유하므로 복제 비용이 작고,
/// 복제본은 서로 다른 task에서 동시에 호출할 수 있습니다.
pub struct IngestHandler<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    config: IngestConfig,
}

impl<S, N> Clone for IngestHandler<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
            config: self.config.clone(),
        }
    }
}

impl<S: ObjectStore, N: Notifier> IngestHandler<S, N> {
    /// 저장소, 알림 채널, 설정으로 핸들러를 생성합니다.
    pub fn new(store: S, notifier: N, config: IngestConfig) -> Self {
        Self::from_shared(Arc::new(store), Arc::new(notifier), config)
    }

    /// 이미 공유 중인 의존성으로 핸들러를 생성합니다.
    pub fn from_shared(store: Arc<S>, notifier: Arc<N>, config: IngestConfig) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// 저장소
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 알림 채널
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// 핸들러 설정
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// 원시 페이로드 하나를 처리하고 응답을 만듭니다.
    ///
    /// 어떤 입력이든 정확히 하나의 응답으로 끝납니다.
    pub async fn handle(&self, raw: &[u8]) -> IngestResponse {
        let trace_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "ingest",
            %trace_id,
            log_type = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let started = Instant::now();
        let result = self.process(raw).instrument(span.clone()).await;
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(_) => "success",
            Err(err) => err.result_label(),
        };
        span.record("outcome", outcome);

        metrics::counter!(m::INGEST_REQUESTS_TOTAL, m::LABEL_RESULT => outcome).increment(1);
        metrics::histogram!(m::INGEST_PROCESSING_DURATION_SECONDS)
            .record(elapsed.as_secs_f64());

        IngestResponse::from(result)
    }

    /// 처리 단계를 수행하고 저장된 레코드를 반환합니다.
    ///
    /// 검증 실패 시 저장소와 알림 채널은 호출되지 않습니다.
    /// 저장 실패 시 알림 채널은 호출되지 않습니다.
    pub async fn process(&self, raw: &[u8]) -> Result<LogRecord, IngestError> {
        info!(bytes = raw.len(), "log submission received");

        let submission = LogSubmission::decode(raw)
            .and_then(LogSubmission::validate)
            .inspect_err(|err| warn!(error = %err, "rejected log submission"))?;
        Span::current().record("log_type", submission.log_type());

        let record = submission.stamp();
        let key = record.storage_key();
        self.persist(&key, &record).await?;

        let decision = classify(&record.log_type);
        metrics::counter!(
            m::INGEST_RECORDS_STORED_TOTAL,
            m::LABEL_DECISION => decision.as_str()
        )
        .increment(1);
        info!(key = %key, decision = %decision, "log record stored");

        if decision.is_alert() {
            self.notify(&record).await?;
        }

        Ok(record)
    }

    async fn persist(&self, key: &str, record: &LogRecord) -> Result<(), IngestError> {
        let body = record
            .to_json_bytes()
            .map(Bytes::from)
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;

        let limit = self.config.store_timeout;
        let result = match tokio::time::timeout(limit, self.store.put(key, body, CONTENT_TYPE_JSON))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout {
                timeout_ms: millis(limit),
            }),
        };

        result.map_err(|err| {
            error!(key = %key, backend = self.store.name(), error = %err, "store write failed");
            metrics::counter!(
                m::INGEST_STORE_FAILURES_TOTAL,
                m::LABEL_BACKEND => self.store.name().to_owned()
            )
            .increment(1);
            IngestError::from(err)
        })
    }

    async fn notify(&self, record: &LogRecord) -> Result<(), IngestError> {
        let alert = record.alert_message();

        let limit = self.config.publish_timeout;
        let result =
            match tokio::time::timeout(limit, self.notifier.publish(&alert.subject, &alert.body))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(NotificationError::Timeout {
                    timeout_ms: millis(limit),
                }),
            };

        match result {
            Ok(()) => {
                metrics::counter!(m::INGEST_ALERTS_SENT_TOTAL).increment(1);
                info!(subject = %alert.subject, backend = self.notifier.name(), "alert sent");
                Ok(())
            }
            Err(err) => {
                error!(
                    subject = %alert.subject,
                    backend = self.notifier.name(),
                    error = %err,
                    "alert publish failed after record was stored"
                );
                metrics::counter!(
                    m::INGEST_ALERT_FAILURES_TOTAL,
                    m::LABEL_BACKEND => self.notifier.name().to_owned()
                )
                .increment(1);
                Err(err.into())
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
