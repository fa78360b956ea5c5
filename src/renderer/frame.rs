//! 帧渲染器
//!
//! 每一帧无条件地执行：绑定渲染目标、清屏、绑定管线和顶点缓冲、
//! 一次绘制调用、呈现。整个过程是同步的，一帧完全结束后才开始下一帧。

use tracing::{debug, trace};

use crate::core::error::Result;
use crate::core::math::Color;
use crate::gfx::context::DeviceContext;
use crate::gfx::shader::ShaderStageSet;
use crate::gfx::target::RenderTarget;
use crate::renderer::geometry::VertexBuffer;
use crate::renderer::vertex::VertexRecord;

/// 帧阶段：`Idle -> Drawing -> Presented -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Idle,
    Drawing,
    Presented,
}

impl FramePhase {
    /// 下一个阶段
    pub fn next(self) -> Self {
        match self {
            FramePhase::Idle => FramePhase::Drawing,
            FramePhase::Drawing => FramePhase::Presented,
            FramePhase::Presented => FramePhase::Idle,
        }
    }
}

/// 一次绘制调用需要的管线和几何体
struct DrawCall {
    pipeline: wgpu::RenderPipeline,
    geometry: VertexBuffer,
}

/// 帧渲染器
pub struct FrameRenderer {
    clear_color: Color,
    draw: Option<DrawCall>,
    phase: FramePhase,
    frames_presented: u64,
}

impl FrameRenderer {
    /// 只清屏的渲染器
    pub fn clear_only(clear_color: Color) -> Self {
        Self {
            clear_color,
            draw: None,
            phase: FramePhase::Idle,
            frames_presented: 0,
        }
    }

    /// 绘制一组顶点记录的渲染器
    ///
    /// 按顺序：构建输入布局、上传顶点缓冲、校验缓冲布局、创建管线。
    pub fn with_geometry<V: VertexRecord>(
        context: &DeviceContext,
        shaders: &ShaderStageSet,
        target_format: wgpu::TextureFormat,
        clear_color: Color,
        records: &[V],
    ) -> Result<Self> {
        let layout = shaders.build_input_layout(V::ELEMENTS)?;
        let geometry = VertexBuffer::upload(context.device(), records)?;
        geometry.validate_against(&layout)?;
        let pipeline = shaders.create_pipeline(context.device(), &layout, target_format)?;

        debug!(
            vertices = geometry.vertex_count(),
            stride = geometry.stride(),
            bytes = geometry.size(),
            "Geometry bound"
        );

        Ok(Self {
            draw: Some(DrawCall { pipeline, geometry }),
            ..Self::clear_only(clear_color)
        })
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// 每帧绘制的顶点数（只清屏时为 0）
    pub fn vertex_count(&self) -> u32 {
        self.draw
            .as_ref()
            .map_or(0, |draw| draw.geometry.vertex_count())
    }

    /// 渲染并呈现一帧
    ///
    /// 目标要求跳过这一帧时返回 `false`。
    pub fn render_frame(&mut self, context: &DeviceContext, target: &mut dyn RenderTarget) -> Result<bool> {
        if self.phase == FramePhase::Presented {
            self.phase = self.phase.next();
        }
        self.phase = self.phase.next();

        let frame = match target.acquire(context) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.phase = FramePhase::Idle;
                return Ok(false);
            }
            Err(e) => {
                self.phase = FramePhase::Idle;
                return Err(e);
            }
        };

        // sRGB 目标在写入时编码，清除颜色按线性值给出
        let clear_color = if target.format().is_srgb() {
            self.clear_color.to_linear()
        } else {
            self.clear_color
        };

        let mut encoder = context.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: frame.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(viewport) = target.viewport() {
                render_pass.set_viewport(
                    viewport.x,
                    viewport.y,
                    viewport.width,
                    viewport.height,
                    viewport.min_depth,
                    viewport.max_depth,
                );
            }

            if let Some(draw) = &self.draw {
                render_pass.set_pipeline(&draw.pipeline);
                render_pass.set_vertex_buffer(0, draw.geometry.slice());
                render_pass.draw(0..draw.geometry.vertex_count(), 0..1);
            }
        }

        context.immediate_context().submit(std::iter::once(encoder.finish()));
        frame.present();

        self.phase = self.phase.next();
        self.frames_presented += 1;
        trace!(frame = self.frames_presented, "Frame presented");
        Ok(true)
    }
}
