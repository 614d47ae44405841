//! 수집 핸들러 설정
//!
//! [`IngestConfig`]는 core의 [`LogvaultConfig`](logvault_core::config::LogvaultConfig)에서
//! 핸들러가 직접 사용하는 값(외부 호출 제한 시간)만 추려 담습니다.
//!
//! # 사용 예시
//! ```ignore
//! use logvault_core::config::LogvaultConfig;
//! use logvault_ingest::config::IngestConfig;
//!
//! let core_config = LogvaultConfig::default();
//! let config = IngestConfig::from_core(&core_config);
//! ```

use std::time::Duration;

use logvault_core::config::LogvaultConfig;
use logvault_core::error::ConfigError;

/// 외부 호출 제한 시간 상한
const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// 수집 핸들러 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// 저장소 쓰기 제한 시간
    pub store_timeout: Duration,
    /// 알림 발행 제한 시간
    pub publish_timeout: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            publish_timeout: Duration::from_secs(5),
        }
    }
}

impl IngestConfig {
    /// core 설정에서 핸들러 설정을 생성합니다.
    pub fn from_core(core: &LogvaultConfig) -> Self {
        Self {
            store_timeout: Duration::from_millis(core.storage.timeout_ms),
            publish_timeout: Duration::from_millis(core.notification.timeout_ms),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("store_timeout", self.store_timeout),
            ("publish_timeout", self.publish_timeout),
        ] {
            if value.is_zero() || value > MAX_TIMEOUT {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: format!("must be between 1ms and {}s", MAX_TIMEOUT.as_secs()),
                });
            }
        }
        Ok(())
    }
}

/// 핸들러 설정 빌더
#[derive(Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장소 쓰기 제한 시간을 설정합니다.
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.config.store_timeout = timeout;
        self
    }

    /// 알림 발행 제한 시간을 설정합니다.
    pub fn publish_timeout(mut self, timeout: Duration) -> Self {
        self.config.publish_timeout = timeout;
        self
    }

    /// 설정을 검증하고 `IngestConfig`를 생성합니다.
    pub fn build(self) -> Result<IngestConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
