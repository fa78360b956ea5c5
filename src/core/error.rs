//! 错误处理模块
//!
//! 定义了教程程序中使用的统一错误类型。
//!
//! 所有错误在启动阶段都是致命的：不会重试，也不会降级运行。
//! 错误沿调用链用 `?` 向上传播，最终由 `main` 输出诊断信息并以非零状态退出。
//!
//! # 错误分类
//!
//! - `Platform`：窗口 / 操作系统层面的错误
//! - `Graphics::DeviceCreation`：找不到可用的图形适配器
//! - `Graphics::ShaderCompile`：着色器源码或 profile 错误，携带编译器诊断
//! - `Graphics::LayoutMismatch`：输入布局与着色器签名不匹配

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, TutorialError>;

/// 顶层错误类型
#[derive(Debug)]
pub enum TutorialError {
    /// 配置错误
    Config(ConfigError),

    /// 窗口 / 平台错误
    Platform(PlatformError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// IO 错误
    Io(std::io::Error),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 窗口与事件循环相关的错误
#[derive(Debug)]
pub enum PlatformError {
    /// 事件循环创建失败
    EventLoop(String),

    /// 原生窗口创建失败
    WindowCreation(String),

    /// 事件循环已经运行过
    LoopConsumed,
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 设备创建失败（没有兼容的适配器或驱动）
    DeviceCreation(String),

    /// 交换链错误
    SwapChain(String),

    /// 着色器编译失败
    ShaderCompile {
        /// 着色器源文件（内联源码时为标签）
        source: PathBuf,
        /// 编译器诊断信息
        diagnostics: String,
    },

    /// 输入布局与顶点着色器签名不匹配
    LayoutMismatch(String),

    /// 资源创建失败
    ResourceCreation(String),
}

impl TutorialError {
    /// 是否为着色器编译错误
    pub fn is_shader_compile(&self) -> bool {
        matches!(self, TutorialError::Graphics(GraphicsError::ShaderCompile { .. }))
    }

    /// 是否为输入布局不匹配错误
    pub fn is_layout_mismatch(&self) -> bool {
        matches!(self, TutorialError::Graphics(GraphicsError::LayoutMismatch(_)))
    }

    /// 是否为设备创建错误
    pub fn is_device_creation(&self) -> bool {
        matches!(self, TutorialError::Graphics(GraphicsError::DeviceCreation(_)))
    }
}

impl fmt::Display for TutorialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TutorialError::Config(e) => write!(f, "Configuration error: {}", e),
            TutorialError::Platform(e) => write!(f, "Platform error: {}", e),
            TutorialError::Graphics(e) => write!(f, "Graphics error: {}", e),
            TutorialError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::EventLoop(msg) => write!(f, "Event loop failure: {}", msg),
            PlatformError::WindowCreation(msg) => write!(f, "Failed to create window: {}", msg),
            PlatformError::LoopConsumed => write!(f, "The run loop has already been started"),
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapChain(msg) => write!(f, "Swap chain error: {}", msg),
            GraphicsError::ShaderCompile { source, diagnostics } => {
                write!(f, "Shader compilation failed for '{}':\n{}", source.display(), diagnostics)
            }
            GraphicsError::LayoutMismatch(msg) => write!(f, "Input layout mismatch: {}", msg),
            GraphicsError::ResourceCreation(msg) => write!(f, "Resource creation failed: {}", msg),
        }
    }
}

impl std::error::Error for TutorialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TutorialError::Config(e) => Some(e),
            TutorialError::Platform(e) => Some(e),
            TutorialError::Graphics(e) => Some(e),
            TutorialError::Io(e) => Some(e),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for PlatformError {}
impl std::error::Error for GraphicsError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for TutorialError {
    fn from(err: std::io::Error) -> Self {
        TutorialError::Io(err)
    }
}

impl From<ConfigError> for TutorialError {
    fn from(err: ConfigError) -> Self {
        TutorialError::Config(err)
    }
}

impl From<PlatformError> for TutorialError {
    fn from(err: PlatformError) -> Self {
        TutorialError::Platform(err)
    }
}

impl From<GraphicsError> for TutorialError {
    fn from(err: GraphicsError) -> Self {
        TutorialError::Graphics(err)
    }
}
