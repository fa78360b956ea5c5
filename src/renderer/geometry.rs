//! 几何缓冲
//!
//! 顶点记录上传到 GPU 后不可修改：没有更新或调整大小的操作。
//! 记录的步长和字段列表随缓冲保存，用于在创建管线前与输入布局比对。

use tracing::debug;
use wgpu::util::DeviceExt;

use crate::core::error::{GraphicsError, Result};
use crate::gfx::shader::{InputElement, InputLayout};
use crate::renderer::vertex::VertexRecord;

/// 顶点缓冲
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    stride: u64,
    count: u32,
    elements: &'static [InputElement],
}

impl VertexBuffer {
    /// 上传顶点记录
    pub fn upload<V: VertexRecord>(device: &wgpu::Device, records: &[V]) -> Result<Self> {
        if records.is_empty() {
            return Err(GraphicsError::ResourceCreation(
                "Vertex buffer needs at least one record".to_string(),
            )
            .into());
        }
        let count = u32::try_from(records.len()).map_err(|_| {
            GraphicsError::ResourceCreation(format!("Too many vertex records: {}", records.len()))
        })?;

        debug!(count, stride = V::stride(), "Creating vertex buffer");
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(records),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            buffer,
            stride: V::stride(),
            count,
            elements: V::ELEMENTS,
        })
    }

    /// 每条记录的字节数
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// 记录数量
    pub fn vertex_count(&self) -> u32 {
        self.count
    }

    /// 缓冲的字节数
    pub fn size(&self) -> u64 {
        self.buffer.size()
    }

    /// 整个缓冲（偏移 0）
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    /// 检查记录布局与输入布局一致
    pub fn validate_against(&self, layout: &InputLayout) -> Result<()> {
        layout.validate_records(self.stride, self.elements)
    }
}
