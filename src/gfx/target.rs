//! 呈现目标
//!
//! 渲染目标视图的统一接口：
//! - [`SwapChain`]：交换链的当前后台缓冲，呈现到窗口
//! - [`OffscreenTarget`]：离屏纹理，渲染结果可以读回 CPU

use image::RgbaImage;
use tracing::{debug, warn};

use crate::core::error::{GraphicsError, Result};
use crate::gfx::context::{DeviceContext, SwapChain};

/// 光栅化视口
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// 覆盖整个目标的视口
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 一帧的渲染目标视图
///
/// 交换链视图在 [`TargetView::present`] 时交给显示器。
pub struct TargetView {
    view: wgpu::TextureView,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl TargetView {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// 呈现；垂直同步时阻塞到下一次刷新
    pub fn present(self) {
        let TargetView { view, surface_texture } = self;
        drop(view);
        if let Some(texture) = surface_texture {
            texture.present();
        }
    }
}

/// 呈现目标
pub trait RenderTarget {
    /// 目标格式
    fn format(&self) -> wgpu::TextureFormat;

    /// 光栅化视口（未设置时使用图形 API 的默认值）
    fn viewport(&self) -> Option<Viewport>;

    /// 获取当前后台缓冲的视图
    ///
    /// 返回 `None` 表示这一帧应当跳过。
    fn acquire(&mut self, context: &DeviceContext) -> Result<Option<TargetView>>;
}

impl RenderTarget for SwapChain {
    fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn acquire(&mut self, context: &DeviceContext) -> Result<Option<TargetView>> {
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // 后台缓冲被替换：按原描述重新配置，重新获取视图
                warn!("Back buffer lost or outdated, reconfiguring swap chain");
                self.reconfigure(context);
                self.surface.get_current_texture().map_err(|e| {
                    GraphicsError::SwapChain(format!("Failed to reacquire back buffer: {}", e))
                })?
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring back buffer, skipping frame");
                return Ok(None);
            }
            Err(e) => {
                return Err(GraphicsError::SwapChain(format!("Failed to acquire back buffer: {}", e)).into());
            }
        };

        let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Some(TargetView {
            view,
            surface_texture: Some(texture),
        }))
    }
}

/// 离屏渲染目标
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    viewport: Option<Viewport>,
}

impl OffscreenTarget {
    /// 默认的离屏目标格式
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// 创建默认格式的离屏目标
    pub fn new(context: &DeviceContext, width: u32, height: u32) -> Result<Self> {
        Self::with_format(context, width, height, Self::FORMAT)
    }

    /// 创建指定格式的离屏目标，只支持 8 位 RGBA（线性或 sRGB）
    pub fn with_format(
        context: &DeviceContext,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        if !matches!(
            format,
            wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb
        ) {
            return Err(GraphicsError::ResourceCreation(format!(
                "Offscreen target format {:?} cannot be read back as RGBA8",
                format
            ))
            .into());
        }
        if width == 0 || height == 0 {
            return Err(GraphicsError::ResourceCreation(format!(
                "Offscreen target must be non-empty, got {}x{}",
                width, height
            ))
            .into());
        }

        debug!(width, height, ?format, "Creating offscreen target");
        let texture = context.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        Ok(Self {
            texture,
            format,
            width,
            height,
            viewport: None,
        })
    }

    /// 设置光栅化视口
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// 把目标内容读回 CPU
    pub fn read_pixels(&self, context: &DeviceContext) -> Result<RgbaImage> {
        let unpadded_row = self.width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row = unpadded_row.div_ceil(align) * align;

        let device = context.device();
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: padded_row as u64 * self.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        context.immediate_context().submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device.poll(wgpu::Maintain::Wait);

        receiver
            .recv()
            .map_err(|e| GraphicsError::ResourceCreation(format!("Readback was dropped: {}", e)))?
            .map_err(|e| GraphicsError::ResourceCreation(format!("Failed to map readback buffer: {}", e)))?;

        let mut pixels = Vec::with_capacity((unpadded_row * self.height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks(padded_row as usize) {
                pixels.extend_from_slice(&row[..unpadded_row as usize]);
            }
        }
        buffer.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels).ok_or_else(|| {
            GraphicsError::ResourceCreation("Readback size does not match target".to_string()).into()
        })
    }
}

impl RenderTarget for OffscreenTarget {
    fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn acquire(&mut self, _context: &DeviceContext) -> Result<Option<TargetView>> {
        let view = self.texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Some(TargetView {
            view,
            surface_texture: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::context::test_context;

    #[test]
    fn test_full_viewport() {
        let viewport = Viewport::full(1280, 720);
        assert_eq!((viewport.x, viewport.y), (0.0, 0.0));
        assert_eq!((viewport.width, viewport.height), (1280.0, 720.0));
        assert_eq!((viewport.min_depth, viewport.max_depth), (0.0, 1.0));
    }

    #[test]
    fn test_offscreen_rejects_empty() {
        let Some(context) = test_context() else { return };
        assert!(OffscreenTarget::new(&context, 0, 16).is_err());
    }

    #[test]
    fn test_offscreen_format() {
        let Some(context) = test_context() else { return };
        let srgb =
            OffscreenTarget::with_format(&context, 4, 4, wgpu::TextureFormat::Rgba8UnormSrgb).unwrap();
        assert!(srgb.format().is_srgb());
        assert!(!OffscreenTarget::new(&context, 4, 4).unwrap().format().is_srgb());
        assert!(OffscreenTarget::with_format(&context, 4, 4, wgpu::TextureFormat::Rgba16Float).is_err());
    }

    #[test]
    fn test_offscreen_readback_size() {
        let Some(context) = test_context() else { return };
        // 宽度不是 64 的倍数，需要按行对齐
        let target = OffscreenTarget::new(&context, 10, 7).unwrap();
        let image = target.read_pixels(&context).unwrap();
        assert_eq!(image.dimensions(), (10, 7));
    }
}
