//! Webhook 알림 채널
//!
//! `POST {endpoint}`로 `{"topic", "subject", "message"}` JSON을 전송합니다.
//! 2xx 응답이면 채널이 수락한 것으로 봅니다.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use logvault_core::error::NotificationError;

use super::Notifier;

/// 거부 응답 본문에서 에러 메시지로 옮길 최대 길이
const MAX_REJECT_BODY: usize = 256;

/// webhook 요청 본문
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    topic: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// HTTP webhook 알림 채널
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
    channel: String,
    timeout: Duration,
}

impl WebhookNotifier {
    /// 엔드포인트와 채널 이름으로 생성합니다.
    pub fn new(
        endpoint: &str,
        channel: &str,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NotificationError::Connection(format!("failed to build http client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            channel: channel.to_owned(),
            timeout,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        let payload = WebhookPayload {
            topic: &self.channel,
            subject,
            message: body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Timeout {
                        timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    }
                } else {
                    NotificationError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(MAX_REJECT_BODY).collect();
            return Err(NotificationError::Rejected {
                channel: self.channel.clone(),
                reason: if detail.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {detail}")
                },
            });
        }

        debug!(channel = %self.channel, status = %status, "webhook accepted alert");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;

    type Captured = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn spawn_hook(status: StatusCode, delay: Duration) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route(
                "/hook",
                post(
                    move |State(captured): State<Captured>, Json(body): Json<serde_json::Value>| async move {
                        tokio::time::sleep(delay).await;
                        captured.lock().unwrap().push(body);
                        status
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/hook"), captured)
    }

    #[tokio::test]
    async fn publish_posts_topic_subject_and_message() {
        let (endpoint, captured) = spawn_hook(StatusCode::ACCEPTED, Duration::ZERO).await;
        let notifier =
            WebhookNotifier::new(&endpoint, "security-alerts", Duration::from_secs(5)).unwrap();

        notifier
            .publish("Security Alert - Security", "Security Alert: breach")
            .await
            .unwrap();

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0]["topic"], "security-alerts");
        assert_eq!(captured[0]["subject"], "Security Alert - Security");
        assert_eq!(captured[0]["message"], "Security Alert: breach");
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let (endpoint, _captured) =
            spawn_hook(StatusCode::SERVICE_UNAVAILABLE, Duration::ZERO).await;
        let notifier =
            WebhookNotifier::new(&endpoint, "security-alerts", Duration::from_secs(5)).unwrap();

        let err = notifier.publish("s", "b").await.unwrap_err();
        assert!(matches!(err, NotificationError::Rejected { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn slow_channel_times_out() {
        let (endpoint, _captured) = spawn_hook(StatusCode::OK, Duration::from_secs(5)).await;
        let notifier =
            WebhookNotifier::new(&endpoint, "security-alerts", Duration::from_millis(100))
                .unwrap();

        let err = notifier.publish("s", "b").await.unwrap_err();
        assert!(
            matches!(err, NotificationError::Timeout { timeout_ms: 100 }),
            "{err:?}"
        );
    }
}
