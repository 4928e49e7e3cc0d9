//! 应用配置

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_NOTIFY_MS: u64 = 3000;

/// 管理端配置, 由 [`ConfigArgs`] 从命令行参数与环境变量构建
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HR_API_URL | http://localhost:8080 | HR 后端地址 |
/// | HR_API_TIMEOUT_SECS | 15 | 请求超时(秒), 0 视为默认值 |
/// | HR_DATA_DIR | $HOME/.config/gv-rh | 会话文件目录 |
/// | HR_EXPORT_DIR | . | 导出文件目录 |
/// | HR_PAGE_SIZE | 20 | 每页条数 (最大 100) |
/// | HR_LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | HR_LOG_DIR | - | 按天滚动的日志目录 |
/// | HR_NOTIFY_MS | 3000 | 通知自动隐藏时间(毫秒) |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    /// 会话文件 (session.json) 所在目录
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub page_size: u32,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub notify_ms: u64,
}

/// `$HOME/.config/gv-rh`, or `./.gv-rh` without a home directory
fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join("gv-rh"))
        .unwrap_or_else(|| PathBuf::from(".gv-rh"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: hr_client::config::DEFAULT_BASE_URL.to_string(),
            timeout_secs: hr_client::config::DEFAULT_TIMEOUT_SECS,
            data_dir: default_data_dir(),
            export_dir: PathBuf::from("."),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
            log_dir: None,
            notify_ms: DEFAULT_NOTIFY_MS,
        }
    }
}

/// 全局命令行参数, 未指定时读取对应环境变量
///
/// 未设置或空白的值使用 [`AppConfig::default`]
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    #[arg(long, global = true, env = "HR_API_URL", help = "HR backend base URL")]
    pub api_url: Option<String>,

    #[arg(long, global = true, env = "HR_API_TIMEOUT_SECS", help = "Request timeout in seconds, 0 means default")]
    pub timeout_secs: Option<u64>,

    #[arg(long, global = true, env = "HR_DATA_DIR", help = "Directory holding session.json")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "HR_EXPORT_DIR", help = "Directory for exports and fichas")]
    pub export_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "HR_PAGE_SIZE", help = "Rows per page, at most 100")]
    pub page_size: Option<u32>,

    #[arg(long, global = true, env = "HR_LOG_LEVEL", help = "Log level (RUST_LOG wins)")]
    pub log_level: Option<String>,

    #[arg(long, global = true, env = "HR_LOG_DIR", help = "Directory for daily rolling log files")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "HR_NOTIFY_MS", help = "Notification auto-hide delay in ms")]
    pub notify_ms: Option<u64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

impl From<ConfigArgs> for AppConfig {
    fn from(args: ConfigArgs) -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            api_url: non_blank(args.api_url).unwrap_or(defaults.api_url),
            timeout_secs: args.timeout_secs.unwrap_or(defaults.timeout_secs),
            data_dir: non_empty_path(args.data_dir).unwrap_or(defaults.data_dir),
            export_dir: non_empty_path(args.export_dir).unwrap_or(defaults.export_dir),
            page_size: args.page_size.unwrap_or(defaults.page_size),
            log_level: non_blank(args.log_level).unwrap_or(defaults.log_level),
            log_dir: non_empty_path(args.log_dir),
            notify_ms: args.notify_ms.unwrap_or(defaults.notify_ms),
        }
        .normalized()
    }
}

impl AppConfig {
    fn normalized(mut self) -> Self {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self.normalized()
    }

    pub fn with_notify_ms(mut self, ms: u64) -> Self {
        self.notify_ms = ms;
        self
    }

    pub fn client_config(&self) -> hr_client::ClientConfig {
        hr_client::ClientConfig::new(&self.api_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn notify_duration(&self) -> Duration {
        Duration::from_millis(self.notify_ms)
    }
}
