//! 配置管理模块
//!
//! 提供程序配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//! 配置文件不存在时使用默认值（1280x720，彩色三角形阶段）。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 720
//! title = "My first wgpu game"
//!
//! [graphics]
//! stage = "colored_triangle"  # window, clear, triangle, colored_triangle
//! vsync = true
//! driver = "hardware"         # 或 "software"
//! clear_color = [32, 103, 178, 255]
//!
//! [shaders]
//! directory = "shaders"
//! vertex_entry = "main"
//! vertex_profile = "vs_4_0"
//! pixel_entry = "main"
//! pixel_profile = "ps_4_0"
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result, TutorialError};

/// 程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// 着色器配置
    #[serde(default)]
    pub shaders: ShaderConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 窗口配置
///
/// 客户区尺寸在创建后固定，窗口不可调整大小。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 客户区宽度（像素）
    #[serde(default = "default_width")]
    pub width: u32,

    /// 客户区高度（像素）
    #[serde(default = "default_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_title")]
    pub title: String,
}

/// 图形配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 要运行的教程阶段
    #[serde(default = "default_stage")]
    pub stage: TutorialStage,

    /// 垂直同步（呈现时等待 1 次刷新）
    #[serde(default = "default_vsync")]
    pub vsync: bool,

    /// 适配器类型
    #[serde(default = "default_driver")]
    pub driver: DriverType,

    /// 背景清除颜色（RGBA，0-255）
    #[serde(default = "default_clear_color")]
    pub clear_color: [u8; 4],
}

/// 教程阶段
///
/// 每个阶段在前一个阶段的基础上增加一个功能。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorialStage {
    /// 只创建窗口并运行消息循环
    Window,
    /// 创建设备和交换链，每帧清屏
    Clear,
    /// 编译着色器并绘制单色三角形（顶点只有位置）
    Triangle,
    /// 绘制顶点颜色插值的三角形（位置 + 颜色）
    ColoredTriangle,
}

/// 适配器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverType {
    /// 硬件加速适配器
    Hardware,
    /// 软件（回退）适配器，只在显式配置时使用
    Software,
}

/// 着色器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// 着色器根目录，各阶段的源文件位于其子目录中
    #[serde(default = "default_shader_dir")]
    pub directory: String,

    /// 顶点着色器入口函数
    #[serde(default = "default_entry")]
    pub vertex_entry: String,

    /// 顶点着色器 profile
    #[serde(default = "default_vertex_profile")]
    pub vertex_profile: String,

    /// 像素着色器入口函数
    #[serde(default = "default_entry")]
    pub pixel_entry: String,

    /// 像素着色器 profile
    #[serde(default = "default_pixel_profile")]
    pub pixel_profile: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_width() -> u32 { 1280 }
fn default_height() -> u32 { 720 }
fn default_title() -> String { "My first wgpu game".to_string() }
fn default_stage() -> TutorialStage { TutorialStage::ColoredTriangle }
fn default_vsync() -> bool { true }
fn default_driver() -> DriverType { DriverType::Hardware }
fn default_clear_color() -> [u8; 4] { [32, 103, 178, 255] }
fn default_shader_dir() -> String { "shaders".to_string() }
fn default_entry() -> String { "main".to_string() }
fn default_vertex_profile() -> String { "vs_4_0".to_string() }
fn default_pixel_profile() -> String { "ps_4_0".to_string() }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "tutorial_render.log".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            stage: default_stage(),
            vsync: default_vsync(),
            driver: default_driver(),
            clear_color: default_clear_color(),
        }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            directory: default_shader_dir(),
            vertex_entry: default_entry(),
            vertex_profile: default_vertex_profile(),
            pixel_entry: default_entry(),
            pixel_profile: default_pixel_profile(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use tutorial_render::core::Config;
    ///
    /// let config = Config::from_file("config.toml")?;
    /// # Ok::<(), tutorial_render::core::TutorialError>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path_str.clone()).into(),
            _ => TutorialError::Io(e),
        })?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，文件不存在时使用默认配置
    ///
    /// 文件存在但无法读取或解析时返回错误，不会悄悄退回默认值。
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::from_file(path) {
            Err(TutorialError::Config(ConfigError::FileNotFound(_))) => Ok(Self::default()),
            result => result,
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数中取出配置文件路径（`--config <path>`）
    pub fn config_path_from_args<I>(args: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let idx = args.iter().position(|a| a == "--config")?;
        args.get(idx + 1).cloned()
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--stage <name>`: 教程阶段（window, clear, triangle, colored_triangle）
    /// - `--width <value>` / `--height <value>`: 客户区尺寸
    /// - `--title <text>`: 窗口标题
    /// - `--no-vsync`: 关闭垂直同步
    /// - `--software`: 使用软件适配器
    ///
    /// 无法解析的值会被忽略，保留原配置。
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|idx| args.get(idx + 1))
        };

        if let Some(stage) = value_of("--stage").and_then(|s| TutorialStage::from_name(s)) {
            self.graphics.stage = stage;
        }

        if let Some(width) = value_of("--width").and_then(|s| s.parse().ok()) {
            self.window.width = width;
        }

        if let Some(height) = value_of("--height").and_then(|s| s.parse().ok()) {
            self.window.height = height;
        }

        if let Some(title) = value_of("--title") {
            self.window.title = title.clone();
        }

        if args.iter().any(|a| a == "--no-vsync") {
            self.graphics.vsync = false;
        }

        if args.iter().any(|a| a == "--software") {
            self.graphics.driver = DriverType::Software;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height".to_string(),
                reason: "Window dimensions must be greater than 0".to_string(),
            }.into());
        }

        if self.window.title.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "window.title".to_string(),
                reason: "Window title must not be empty".to_string(),
            }.into());
        }

        for (field, entry) in [
            ("shaders.vertex_entry", &self.shaders.vertex_entry),
            ("shaders.pixel_entry", &self.shaders.pixel_entry),
        ] {
            if entry.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "Entry point name must not be empty".to_string(),
                }.into());
            }
        }

        Ok(())
    }
}

impl TutorialStage {
    /// 按名称解析阶段
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "window" => Some(TutorialStage::Window),
            "clear" => Some(TutorialStage::Clear),
            "triangle" => Some(TutorialStage::Triangle),
            "colored_triangle" => Some(TutorialStage::ColoredTriangle),
            _ => None,
        }
    }

    /// 阶段名称
    pub fn name(&self) -> &'static str {
        match self {
            TutorialStage::Window => "window",
            TutorialStage::Clear => "clear",
            TutorialStage::Triangle => "triangle",
            TutorialStage::ColoredTriangle => "colored_triangle",
        }
    }

    /// 对应的教程章节编号
    pub fn part(&self) -> u32 {
        match self {
            TutorialStage::Window => 2,
            TutorialStage::Clear => 3,
            TutorialStage::Triangle => 4,
            TutorialStage::ColoredTriangle => 5,
        }
    }

    /// 是否需要创建图形设备
    pub fn needs_device(&self) -> bool {
        !matches!(self, TutorialStage::Window)
    }

    /// 着色器子目录；不绘制几何体的阶段返回 `None`
    pub fn shader_subdir(&self) -> Option<&'static str> {
        match self {
            TutorialStage::Window | TutorialStage::Clear => None,
            TutorialStage::Triangle => Some("position"),
            TutorialStage::ColoredTriangle => Some("position_color"),
        }
    }
}

impl ShaderConfig {
    /// 指定阶段的顶点着色器源文件
    pub fn vertex_path(&self, stage: TutorialStage) -> Option<PathBuf> {
        stage
            .shader_subdir()
            .map(|dir| Path::new(&self.directory).join(dir).join("vertex.wgsl"))
    }

    /// 指定阶段的像素着色器源文件
    pub fn pixel_path(&self, stage: TutorialStage) -> Option<PathBuf> {
        stage
            .shader_subdir()
            .map(|dir| Path::new(&self.directory).join(dir).join("pixel.wgsl"))
    }
}

impl DriverType {
    /// 获取适配器类型名称
    pub fn name(&self) -> &'static str {
        match self {
            DriverType::Hardware => "hardware",
            DriverType::Software => "software",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.graphics.stage, TutorialStage::ColoredTriangle);
        assert_eq!(config.graphics.driver, DriverType::Hardware);
        assert_eq!(config.graphics.clear_color, [32, 103, 178, 255]);
        assert!(config.graphics.vsync);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window.title = "   ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.shaders.pixel_entry.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [window]
            title = "Part 4"

            [graphics]
            stage = "triangle"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Part 4");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.graphics.stage, TutorialStage::Triangle);
        assert_eq!(config.shaders.vertex_profile, "vs_4_0");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[graphics]\nstage = \"wireframe\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "tutorial_render", "--stage", "clear", "--width", "640", "--height", "abc",
            "--no-vsync", "--software",
        ]);

        assert_eq!(config.graphics.stage, TutorialStage::Clear);
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert!(!config.graphics.vsync);
        assert_eq!(config.graphics.driver, DriverType::Software);
    }

    #[test]
    fn test_config_path_from_args() {
        assert_eq!(
            Config::config_path_from_args(["app", "--config", "part3.toml"]),
            Some("part3.toml".to_string())
        );
        assert_eq!(Config::config_path_from_args(["app", "--config"]), None);
        assert_eq!(Config::config_path_from_args(["app"]), None);
    }

    #[test]
    fn test_shader_paths_per_stage() {
        let shaders = ShaderConfig::default();
        assert_eq!(shaders.vertex_path(TutorialStage::Clear), None);
        assert_eq!(
            shaders.vertex_path(TutorialStage::Triangle),
            Some(Path::new("shaders").join("position").join("vertex.wgsl"))
        );
        assert_eq!(
            shaders.pixel_path(TutorialStage::ColoredTriangle),
            Some(Path::new("shaders").join("position_color").join("pixel.wgsl"))
        );
    }

    #[test]
    fn test_stage_names_round_trip() {
        for stage in [
            TutorialStage::Window,
            TutorialStage::Clear,
            TutorialStage::Triangle,
            TutorialStage::ColoredTriangle,
        ] {
            assert_eq!(TutorialStage::from_name(stage.name()), Some(stage));
        }
        assert!(!TutorialStage::Window.needs_device());
        assert_eq!(TutorialStage::ColoredTriangle.part(), 5);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "tutorial_render_config_{}.toml",
            std::process::id()
        ));

        let mut config = Config::default();
        config.graphics.stage = TutorialStage::Clear;
        config.window.title = "Saved".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.graphics.stage, TutorialStage::Clear);
        assert_eq!(loaded.window.title, "Saved");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("tutorial_render_no_such_config.toml");
        let config = Config::from_file_or_default(&path).unwrap();
        assert_eq!(config.graphics.stage, TutorialStage::ColoredTriangle);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let path = std::env::temp_dir().join(format!(
            "tutorial_render_malformed_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[graphics]\nstage = \"colored_triangel\"\n").unwrap();

        let result = Config::from_file_or_default(&path);
        let _ = std::fs::remove_file(&path);

        let err = result.err().unwrap();
        assert!(matches!(err, TutorialError::Config(ConfigError::ParseError(_))), "{}", err);
    }
}
