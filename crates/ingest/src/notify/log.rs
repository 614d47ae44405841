//! 로그 알림 채널 -- 알림을 `logvault::alert` 타깃의 구조화 이벤트로 기록합니다.

use logvault_core::error::NotificationError;

use super::Notifier;

/// 구조화 로그 알림 채널
///
/// 외부 엔드포인트가 없을 때 사용합니다. 로그 수집기가 `logvault::alert`
/// 타깃을 구독하여 알림으로 전달하는 배포를 전제로 합니다.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    channel: String,
}

impl LogNotifier {
    /// 채널 이름으로 생성합니다.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    /// 채널 이름
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        tracing::warn!(
            target: "logvault::alert",
            channel = %self.channel,
            subject,
            body,
            "alert published"
        );
        Ok(())
    }
}
