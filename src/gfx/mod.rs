//! 图形模块
//!
//! 基于 wgpu 封装教程使用的图形对象：
//! - `context`：设备、立即上下文和交换链
//! - `target`：呈现目标（交换链后台缓冲 / 离屏纹理）和视口
//! - `shader`：着色器编译、输入签名和输入布局

pub mod context;
pub mod shader;
pub mod target;

pub use context::{DeviceContext, SwapChain, SwapChainDescription};
pub use shader::{CompiledShader, InputElement, InputLayout, ShaderStageSet};
pub use target::{OffscreenTarget, RenderTarget, TargetView, Viewport};
