//! 核心功能模块
//!
//! 本模块提供与具体图形对象无关的基础功能：配置、日志、错误处理和数学类型。
//!
//! # 模块组织
//!
//! - `config`：配置管理，支持从配置文件和命令行加载设置
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `error`：错误处理，定义统一的错误类型
//! - `math`：向量与颜色类型

pub mod config;
pub mod error;
pub mod log;
pub mod math;

// 重新导出常用类型，方便使用
pub use config::{Config, DriverType, TutorialStage};
pub use error::{Result, TutorialError};
pub use math::{Color, Vector3};
