use chrono_tz::Tz;

use crate::procurement::ReconcileConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub request_timeout_ms: u64,
    pub environment: String,
    /// 业务时区 - 期间窗口 ("YYYY-MM") 按此时区切分
    pub timezone: Tz,
    /// 对账参数 (容差、开票宽限、期望交付周期)
    pub reconcile: ReconcileConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = ReconcileConfig::default();
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/supply".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Europe::Madrid),
            reconcile: ReconcileConfig {
                invoice_tolerance_pct: std::env::var("INVOICE_TOLERANCE_PCT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.invoice_tolerance_pct),
                late_invoice_days: std::env::var("LATE_INVOICE_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.late_invoice_days),
                expected_lead_time_days: std::env::var("EXPECTED_LEAD_TIME_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.expected_lead_time_days),
            },
        }
    }

    /// Create a config with custom overrides
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
