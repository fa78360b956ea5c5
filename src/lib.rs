//! tutorial_render - 入门图形教程
//!
//! 按教程阶段逐步构建一个最小的渲染程序：
//! 创建窗口，创建设备和交换链并清屏，编译着色器，最后绘制一个三角形。
//!
//! # 模块结构
//!
//! - `core`：核心功能模块（配置、日志、错误处理、数学类型）
//! - `window`：窗口宿主和消息循环
//! - `gfx`：设备上下文、交换链、呈现目标和着色器
//! - `renderer`：顶点记录、顶点缓冲和帧渲染器
//!
//! # 使用示例
//!
//! ```no_run
//! use tutorial_render::core::Config;
//! use tutorial_render::Game;
//!
//! let config = Config::default();
//! let mut game = Game::new(&config)?;
//! game.run()?;
//! game.dispose();
//! # Ok::<(), tutorial_render::core::TutorialError>(())
//! ```

pub mod core;
pub mod gfx;
pub mod renderer;
pub mod window;

mod game;

pub use game::Game;
