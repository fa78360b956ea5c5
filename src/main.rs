//! tutorial_render 可执行程序
//!
//! # 使用方法
//!
//! ```bash
//! # 使用 config.toml（不存在时使用默认配置，存在但有误时报错退出），运行彩色三角形
//! cargo run
//!
//! # 选择教程阶段
//! cargo run -- --stage clear
//!
//! # 使用软件适配器、指定配置文件
//! cargo run -- --software --config my_config.toml
//! ```

use anyhow::Context;
use tracing::{error, info};

use tutorial_render::core::{log, Config};
use tutorial_render::Game;

const DEFAULT_CONFIG: &str = "config.toml";

/// 应用程序入口点
///
/// 启动过程中的任何错误都会输出诊断信息，并以非零状态退出。
fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// 初始化流程
///
/// 1. 加载配置文件（`--config` 指定的文件必须存在）
/// 2. 应用命令行参数覆盖并验证配置
/// 3. 初始化日志系统
/// 4. 启动 `Game`，运行消息循环，释放资源
fn run() -> anyhow::Result<()> {
    let mut config = match Config::config_path_from_args(std::env::args()) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::from_file_or_default(DEFAULT_CONFIG)
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG))?,
    };
    config.apply_args(std::env::args());
    config.validate().context("Invalid configuration")?;

    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!(version = env!("CARGO_PKG_VERSION"), "tutorial_render starting...");
    info!(
        stage = config.graphics.stage.name(),
        width = config.window.width,
        height = config.window.height,
        vsync = config.graphics.vsync,
        driver = config.graphics.driver.name(),
        "Configuration loaded"
    );

    let mut game = Game::new(&config).context("Startup failed")?;
    let result = game.run().context("Main loop failed");
    game.dispose();
    result
}
