//! 顶点数据定义
//!
//! 本模块定义了教程使用的两种顶点记录。
//!
//! # 设计说明
//!
//! - 使用 `#[repr(C)]` 确保字段按声明顺序紧密排列，没有填充
//! - 实现 `Pod` 和 `Zeroable` trait 以支持零拷贝上传到 GPU
//! - 通过 [`VertexRecord::ELEMENTS`] 声明字段与着色器输入位置的对应关系，
//!   字段顺序必须和着色器声明的输入顺序一致

use bytemuck::{Pod, Zeroable};

use crate::core::math::{Color, Vector3};
use crate::gfx::shader::InputElement;

/// 可以上传到顶点缓冲的记录类型
pub trait VertexRecord: Pod {
    /// 字段描述，按内存顺序排列
    const ELEMENTS: &'static [InputElement];

    /// 每条记录的字节数
    fn stride() -> u64 {
        std::mem::size_of::<Self>() as u64
    }
}

/// 只有位置的顶点（第 4 部分）
///
/// # 内存布局
///
/// - `position`：0..12 字节（3 个 f32）
///
/// 总大小：12 字节
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPosition {
    /// 顶点位置（标准化设备坐标）
    pub position: [f32; 3],
}

impl VertexPosition {
    pub fn new(position: Vector3) -> Self {
        Self {
            position: [position.x, position.y, position.z],
        }
    }
}

impl VertexRecord for VertexPosition {
    const ELEMENTS: &'static [InputElement] = &[
        InputElement::new("POSITION", 0, wgpu::VertexFormat::Float32x3),
    ];
}

/// 位置 + 颜色的顶点（第 5 部分）
///
/// # 内存布局
///
/// - `position`：0..12 字节（3 个 f32）
/// - `color`：12..28 字节（RGBA，4 个 f32，直通 alpha）
///
/// 总大小：28 字节
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl VertexPositionColor {
    pub fn new(position: Vector3, color: Color) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            color: color.to_array(),
        }
    }
}

impl VertexRecord for VertexPositionColor {
    const ELEMENTS: &'static [InputElement] = &[
        InputElement::new("POSITION", 0, wgpu::VertexFormat::Float32x3),
        InputElement::new("COLOR", 1, wgpu::VertexFormat::Float32x4),
    ];
}

/// 三角形的三个顶点位置（标准化设备坐标，顺时针）
fn triangle_corners() -> [Vector3; 3] {
    [
        Vector3::new(-0.5, 0.5, 0.0),
        Vector3::new(0.5, 0.5, 0.0),
        Vector3::new(0.0, -0.5, 0.0),
    ]
}

/// 单色三角形
pub fn triangle() -> [VertexPosition; 3] {
    triangle_corners().map(VertexPosition::new)
}

/// 彩色三角形：红、绿、蓝三个顶点
pub fn colored_triangle() -> [VertexPositionColor; 3] {
    let [a, b, c] = triangle_corners();
    [
        VertexPositionColor::new(a, Color::RED),
        VertexPositionColor::new(b, Color::GREEN),
        VertexPositionColor::new(c, Color::BLUE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(mem::size_of::<VertexPosition>(), 12, "position-only vertex should be 12 bytes");
        assert_eq!(mem::size_of::<VertexPositionColor>(), 28, "position+color vertex should be 28 bytes");
        assert_eq!(mem::align_of::<VertexPositionColor>(), 4);

        // 验证字段偏移量
        let vertex = VertexPositionColor::default();
        let vertex_ptr = &vertex as *const VertexPositionColor as usize;
        let color_ptr = &vertex.color as *const [f32; 4] as usize;
        assert_eq!(color_ptr - vertex_ptr, 12, "color should follow position directly");
    }

    #[test]
    fn test_elements_match_memory_layout() {
        fn packed_size(elements: &[InputElement]) -> u64 {
            elements.iter().map(|e| e.format.size()).sum()
        }

        assert_eq!(packed_size(VertexPosition::ELEMENTS), VertexPosition::stride());
        assert_eq!(packed_size(VertexPositionColor::ELEMENTS), VertexPositionColor::stride());
        assert_eq!(VertexPositionColor::ELEMENTS[1].location, 1);
    }

    #[test]
    fn test_triangle_vertices() {
        let vertices = triangle();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].position, [-0.5, 0.5, 0.0]);
        assert_eq!(vertices[1].position, [0.5, 0.5, 0.0]);
        assert_eq!(vertices[2].position, [0.0, -0.5, 0.0]);
    }

    #[test]
    fn test_colored_triangle_bytes() {
        let vertices = colored_triangle();
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(vertices[2].color, [0.0, 0.0, 1.0, 1.0]);

        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 3 * 28);
    }
}
