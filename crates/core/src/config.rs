//! 설정 관리 — logvault.toml 파싱 및 런타임 설정
//!
//! [`LogvaultConfig`]는 데몬과 수집 핸들러의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGVAULT_STORAGE_BUCKET=my-bucket` 형식)
//! 3. 설정 파일 (`logvault.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 저장 대상은 `LOGS_BUCKET`, 알림 채널은 `SNS_TOPIC_ARN` 또는 `ALERT_CHANNEL`
//! 짧은 이름으로도 지정할 수 있습니다. 우선순위는 `SNS_TOPIC_ARN` <
//! `ALERT_CHANNEL` < `LOGVAULT_*` 입니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logvault_core::error::LogvaultError> {
//! use logvault_core::config::LogvaultConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogvaultConfig::load("logvault.toml").await?;
//!
//! // 파일 없이 기본값 + 환경변수만 사용
//! let config = LogvaultConfig::from_env()?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogvaultError};

/// 지원하는 스토리지 백엔드
pub const STORAGE_BACKENDS: &[&str] = &["fs", "http"];
/// 지원하는 알림 백엔드
pub const NOTIFICATION_BACKENDS: &[&str] = &["log", "webhook"];

/// logvault 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogvaultConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 수신 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl LogvaultConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogvaultError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 기본값에 환경변수 오버라이드만 적용합니다.
    pub fn from_env() -> Result<Self, LogvaultError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogvaultError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogvaultError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogvaultError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogvaultError> {
        toml::from_str(toml_str).map_err(|e| {
            LogvaultError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGVAULT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGVAULT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGVAULT_GENERAL_LOG_FORMAT");

        // Server
        override_string(&mut self.server.bind, "LOGVAULT_SERVER_BIND");
        override_usize(
            &mut self.server.max_body_bytes,
            "LOGVAULT_SERVER_MAX_BODY_BYTES",
        );

        // Storage (짧은 이름 먼저, LOGVAULT_* 가 우선)
        override_string(&mut self.storage.bucket, "LOGS_BUCKET");
        override_string(&mut self.storage.backend, "LOGVAULT_STORAGE_BACKEND");
        override_string(&mut self.storage.bucket, "LOGVAULT_STORAGE_BUCKET");
        override_string(&mut self.storage.root_dir, "LOGVAULT_STORAGE_ROOT_DIR");
        override_string(&mut self.storage.endpoint, "LOGVAULT_STORAGE_ENDPOINT");
        override_u64(&mut self.storage.timeout_ms, "LOGVAULT_STORAGE_TIMEOUT_MS");

        // Notification
        override_string(&mut self.notification.channel, "SNS_TOPIC_ARN");
        override_string(&mut self.notification.channel, "ALERT_CHANNEL");
        override_string(
            &mut self.notification.backend,
            "LOGVAULT_NOTIFICATION_BACKEND",
        );
        override_string(
            &mut self.notification.channel,
            "LOGVAULT_NOTIFICATION_CHANNEL",
        );
        override_string(
            &mut self.notification.endpoint,
            "LOGVAULT_NOTIFICATION_ENDPOINT",
        );
        override_u64(
            &mut self.notification.timeout_ms,
            "LOGVAULT_NOTIFICATION_TIMEOUT_MS",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "LOGVAULT_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "LOGVAULT_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "LOGVAULT_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogvaultError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        check_one_of("general.log_level", &self.general.log_level, &valid_levels)?;

        let valid_formats = ["json", "pretty"];
        check_one_of("general.log_format", &self.general.log_format, &valid_formats)?;

        if self.server.bind.is_empty() {
            return Err(invalid("server.bind", "bind address must not be empty"));
        }
        if self.server.max_body_bytes == 0 {
            return Err(invalid("server.max_body_bytes", "must be greater than 0"));
        }

        check_one_of("storage.backend", &self.storage.backend, STORAGE_BACKENDS)?;
        if self.storage.bucket.is_empty() {
            return Err(invalid("storage.bucket", "bucket must not be empty"));
        }
        if self.storage.timeout_ms == 0 {
            return Err(invalid("storage.timeout_ms", "must be greater than 0"));
        }
        match self.storage.backend.as_str() {
            "fs" if self.storage.root_dir.is_empty() => {
                return Err(invalid(
                    "storage.root_dir",
                    "root_dir must not be empty when backend is 'fs'",
                ));
            }
            "http" if self.storage.endpoint.is_empty() => {
                return Err(invalid(
                    "storage.endpoint",
                    "endpoint must not be empty when backend is 'http'",
                ));
            }
            _ => {}
        }

        check_one_of(
            "notification.backend",
            &self.notification.backend,
            NOTIFICATION_BACKENDS,
        )?;
        if self.notification.channel.is_empty() {
            return Err(invalid("notification.channel", "channel must not be empty"));
        }
        if self.notification.timeout_ms == 0 {
            return Err(invalid("notification.timeout_ms", "must be greater than 0"));
        }
        if self.notification.backend == "webhook" && self.notification.endpoint.is_empty() {
            return Err(invalid(
                "notification.endpoint",
                "endpoint must not be empty when backend is 'webhook'",
            ));
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(invalid("metrics.port", "must be greater than 0"));
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// HTTP 수신 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인드 주소
    pub bind: String,
    /// 요청 본문 최대 크기 (바이트)
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_owned(),
            max_body_bytes: 64 * 1024, // 64KB
        }
    }
}

/// 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 백엔드 (fs, http)
    pub backend: String,
    /// 저장 대상 식별자 (버킷 이름)
    pub bucket: String,
    /// fs 백엔드의 루트 디렉토리 (버킷은 그 하위 디렉토리)
    pub root_dir: String,
    /// http 백엔드 엔드포인트 (예: `http://minio:9000`)
    pub endpoint: String,
    /// 쓰기 제한 시간 (밀리초)
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "fs".to_owned(),
            bucket: "logvault-logs".to_owned(),
            root_dir: "/var/lib/logvault".to_owned(),
            endpoint: String::new(),
            timeout_ms: 5_000,
        }
    }
}

/// 알림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// 백엔드 (log, webhook)
    pub backend: String,
    /// 알림 채널 식별자
    pub channel: String,
    /// webhook 백엔드 엔드포인트
    pub endpoint: String,
    /// 발행 제한 시간 (밀리초)
    pub timeout_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            backend: "log".to_owned(),
            channel: "security-alerts".to_owned(),
            endpoint: String::new(),
            timeout_ms: 5_000,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 리스닝 주소
    pub listen_addr: String,
    /// 리스닝 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
        }
    }
}

// --- 검증 헬퍼 ---

fn invalid(field: &str, reason: &str) -> LogvaultError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), LogvaultError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: format!("must be one of: {}", allowed.join(", ")),
    }
    .into())
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
