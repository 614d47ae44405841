//! 알림 채널 추상화
//!
//! [`Notifier`] trait은 이름 있는 알림 채널로의 짧은 메시지 발행을 추상화합니다.
//! 채널이 메시지를 수락하면 성공이며, 전달 확인이나 재시도는 하지 않습니다.

mod log;
mod webhook;

use std::future::Future;

use logvault_core::config::NotificationConfig;
use logvault_core::error::{ConfigError, LogvaultError, NotificationError};

pub use self::log::LogNotifier;
pub use self::webhook::WebhookNotifier;

/// 알림 채널 클라이언트
///
/// 상태를 갖지 않으며 여러 호출에서 동시에 재사용할 수 있어야 합니다.
pub trait Notifier: Send + Sync + 'static {
    /// 백엔드 이름 (로그/메트릭 레이블용)
    fn name(&self) -> &str;

    /// 알림을 발행합니다.
    fn publish(
        &self,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// 설정으로 선택되는 알림 백엔드
pub enum NotifierBackend {
    /// 구조화 로그로만 기록
    Log(LogNotifier),
    /// HTTP webhook
    Webhook(WebhookNotifier),
}

impl NotifierBackend {
    /// `[notification]` 설정에서 백엔드를 생성합니다.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, LogvaultError> {
        match config.backend.as_str() {
            "log" => Ok(Self::Log(LogNotifier::new(&config.channel))),
            "webhook" => Ok(Self::Webhook(WebhookNotifier::new(
                &config.endpoint,
                &config.channel,
                std::time::Duration::from_millis(config.timeout_ms),
            )?)),
            other => Err(ConfigError::InvalidValue {
                field: "notification.backend".to_owned(),
                reason: format!("unsupported backend '{other}'"),
            }
            .into()),
        }
    }
}

impl Notifier for NotifierBackend {
    fn name(&self) -> &str {
        match self {
            Self::Log(notifier) => notifier.name(),
            Self::Webhook(notifier) => notifier.name(),
        }
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        match self {
            Self::Log(notifier) => notifier.publish(subject, body).await,
            Self::Webhook(notifier) => notifier.publish(subject, body).await,
        }
    }
}

/// 테스트용 Mock 알림 채널
#[cfg(test)]
#[derive(Default)]
pub struct MockNotifier {
    /// 발행된 (제목, 본문)
    pub published: std::sync::Mutex<Vec<(String, String)>>,
    /// 발행 시 반환할 실패 메시지
    pub fail_with: Option<String>,
    /// 발행 전 지연
    pub delay: Option<std::time::Duration>,
}

#[cfg(test)]
impl MockNotifier {
    /// 항상 성공하는 mock 채널을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 발행이 실패하도록 설정합니다.
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    /// 발행 전에 지연하도록 설정합니다.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 성공한 발행 횟수
    pub fn publish_count(&self) -> usize {
        self.published.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[cfg(test)]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.fail_with {
            return Err(NotificationError::Connection(reason.clone()));
        }
        self.published
            .lock()
            .map_err(|_| NotificationError::Connection("mock lock poisoned".to_owned()))?
            .push((subject.to_owned(), body.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_from_default_config_is_log() {
        let backend = NotifierBackend::from_config(&NotificationConfig::default()).unwrap();
        assert_eq!(backend.name(), "log");
    }

    #[test]
    fn backend_webhook_from_config() {
        let config = NotificationConfig {
            backend: "webhook".to_owned(),
            endpoint: "http://127.0.0.1:9999/hook".to_owned(),
            ..Default::default()
        };
        let backend = NotifierBackend::from_config(&config).unwrap();
        assert_eq!(backend.name(), "webhook");
    }

    #[test]
    fn backend_rejects_unknown() {
        let config = NotificationConfig {
            backend: "pager".to_owned(),
            ..Default::default()
        };
        assert!(NotifierBackend::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn log_backend_publish_succeeds() {
        let backend = NotifierBackend::from_config(&NotificationConfig::default()).unwrap();
        backend
            .publish("Security Alert - error", "Security Alert: disk full")
            .await
            .unwrap();
    }
}
