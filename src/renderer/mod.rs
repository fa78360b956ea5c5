//! 渲染器模块
//!
//! - `vertex`：顶点记录类型和教程使用的三角形数据
//! - `geometry`：不可变的顶点缓冲
//! - `frame`：每帧执行清屏、绘制和呈现的帧渲染器

pub mod frame;
pub mod geometry;
pub mod vertex;

pub use frame::{FramePhase, FrameRenderer};
pub use geometry::VertexBuffer;
pub use vertex::{VertexPosition, VertexPositionColor, VertexRecord};
