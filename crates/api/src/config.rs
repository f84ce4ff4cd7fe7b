use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory for stored uploads (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Root directory for staged step snapshots (default: `staging`).
    pub staging_dir: PathBuf,
    /// Mounted NAS share; `None` selects the no-op mirror.
    pub nas_mount_path: Option<PathBuf>,
    /// Operator recipient for completion notifications.
    pub operator_email: String,
    /// Base URL used in notification links.
    pub base_url: String,
    /// Upper bound for one notification send, in seconds (default: `10`).
    pub notify_timeout_secs: u64,
    /// Shared secret for the reminder-scan endpoint, compared for exact
    /// equality against the presented bearer token.
    pub cron_secret: String,
    /// Staleness threshold for reminders, in days (default: `3`).
    pub reminder_stale_days: i64,
    /// Interval for the in-process reminder sweep; `None`/`0` disables it
    /// (use the `/cron/reminders` endpoint from an external scheduler
    /// instead).
    pub reminder_scan_interval_secs: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `UPLOAD_DIR`                 | `uploads`               |
    /// | `STAGING_DIR`                | `staging`               |
    /// | `NAS_MOUNT_PATH`             | unset                   |
    /// | `ADMIN_EMAIL`                | `admin@intake.local`    |
    /// | `BASE_URL`                   | `http://localhost:3000` |
    /// | `NOTIFY_TIMEOUT_SECS`        | `10`                    |
    /// | `CRON_SECRET`                | `dev-cron-secret`       |
    /// | `REMINDER_STALE_DAYS`        | `3`                     |
    /// | `REMINDER_SCAN_INTERVAL_SECS`| unset (disabled)        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));
        let staging_dir =
            PathBuf::from(std::env::var("STAGING_DIR").unwrap_or_else(|_| "staging".into()));

        let nas_mount_path = std::env::var("NAS_MOUNT_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let operator_email =
            std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@intake.local".into());

        let base_url =
            std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let notify_timeout_secs: u64 = std::env::var("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("NOTIFY_TIMEOUT_SECS must be a valid u64");

        let cron_secret =
            std::env::var("CRON_SECRET").unwrap_or_else(|_| "dev-cron-secret".into());

        let reminder_stale_days: i64 = std::env::var("REMINDER_STALE_DAYS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("REMINDER_STALE_DAYS must be a valid i64");

        let reminder_scan_interval_secs = std::env::var("REMINDER_SCAN_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            staging_dir,
            nas_mount_path,
            operator_email,
            base_url,
            notify_timeout_secs,
            cron_secret,
            reminder_stale_days,
            reminder_scan_interval_secs,
        }
    }
}
