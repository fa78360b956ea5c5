//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! # 使用示例
//!
//! ```no_run
//! use tutorial_render::core::{log, config::LogLevel};
//!
//! // 初始化日志系统
//! log::init_logger(LogLevel::Info, false, None);
//!
//! // 结构化日志
//! tracing::info!(width = 1280, height = 720, "Window created");
//! ```

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

use super::config::LogLevel;

/// 默认日志文件名
const DEFAULT_LOG_FILE: &str = "tutorial_render.log";

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否同时输出到文件（按天滚动）
/// * `log_file_path` - 日志文件路径（可选，默认为 "tutorial_render.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    let filter = EnvFilter::new(filter_directive(level));

    if file_output {
        // 解析日志文件路径
        let log_path = log_file_path.unwrap_or(DEFAULT_LOG_FILE);
        let path = Path::new(log_path);
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_LOG_FILE);

        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            directory,
            filename
        );

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)  // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// 日志级别对应的过滤指令
///
/// wgpu 内部日志非常多，在 info 以上级别时把 wgpu / naga 压到 warn。
fn filter_directive(level: LogLevel) -> String {
    match level {
        LogLevel::Trace => "trace".to_string(),
        LogLevel::Debug => "debug,wgpu_core=info,wgpu_hal=info,naga=info".to_string(),
        LogLevel::Info => "info,wgpu_core=warn,wgpu_hal=warn,naga=warn".to_string(),
        LogLevel::Warn => "warn".to_string(),
        LogLevel::Error => "error".to_string(),
    }
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_filter_directive_parses() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert!(EnvFilter::try_new(filter_directive(level)).is_ok());
        }
        assert!(filter_directive(LogLevel::Info).starts_with("info"));
    }
}
