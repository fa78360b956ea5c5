//! 顶层应用对象
//!
//! `Game` 独占所有资源：窗口、设备、交换链、着色器管线和顶点缓冲。
//! 资源按依赖顺序创建，按相反顺序释放。

use tracing::{debug, info};

use crate::core::config::{Config, TutorialStage};
use crate::core::error::Result;
use crate::core::math::Color;
use crate::gfx::context::{DeviceContext, SwapChain};
use crate::gfx::shader::ShaderStageSet;
use crate::gfx::target::Viewport;
use crate::renderer::frame::FrameRenderer;
use crate::renderer::vertex::{colored_triangle, triangle};
use crate::window::{RedrawMode, WindowHost};

/// GPU 资源
///
/// 字段按释放顺序声明：渲染器（管线、顶点缓冲）、交换链、设备。
struct GpuResources {
    renderer: FrameRenderer,
    swap_chain: SwapChain,
    context: DeviceContext,
}

/// 应用对象
pub struct Game {
    resources: Option<GpuResources>,
    host: WindowHost,
    stage: TutorialStage,
}

impl Game {
    /// 启动：编译着色器、创建窗口、设备和交换链、上传几何体，最后显示窗口
    ///
    /// 着色器在窗口创建之前编译，编译失败时不会出现窗口。
    pub fn new(config: &Config) -> Result<Self> {
        let stage = config.graphics.stage;
        info!(stage = stage.name(), part = stage.part(), "Starting tutorial");

        let shaders = ShaderStageSet::for_stage(&config.shaders, stage)?;

        let host = WindowHost::create(&config.window)?;

        let resources = if stage.needs_device() {
            let (context, mut swap_chain) = DeviceContext::initialize(&host, &config.graphics)?;
            let clear_color = Color::from(config.graphics.clear_color);

            let adapter = context.adapter_info();
            let description = *swap_chain.description();
            info!(
                adapter = %adapter.name,
                backend = ?adapter.backend,
                format = ?swap_chain.format(),
                buffers = description.buffer_count,
                "Device ready"
            );
            let full_viewport = Viewport::full(description.width, description.height);

            let renderer = match (stage, shaders.as_ref()) {
                (TutorialStage::Triangle, Some(shaders)) => {
                    swap_chain.set_viewport(Some(full_viewport));
                    FrameRenderer::with_geometry(&context, shaders, swap_chain.format(), clear_color, &triangle())?
                }
                (TutorialStage::ColoredTriangle, Some(shaders)) => {
                    swap_chain.set_viewport(Some(full_viewport));
                    FrameRenderer::with_geometry(
                        &context,
                        shaders,
                        swap_chain.format(),
                        clear_color,
                        &colored_triangle(),
                    )?
                }
                _ => FrameRenderer::clear_only(clear_color),
            };

            Some(GpuResources {
                renderer,
                swap_chain,
                context,
            })
        } else {
            None
        };

        host.show();
        info!("Startup complete");

        Ok(Self {
            resources,
            host,
            stage,
        })
    }

    /// 已呈现的帧数（不创建设备的阶段为 0）
    pub fn frames_presented(&self) -> u64 {
        self.resources
            .as_ref()
            .map_or(0, |gpu| gpu.renderer.frames_presented())
    }

    /// 消息循环的重绘方式：没有设备的阶段不呈现，只在系统要求时重绘
    fn redraw_mode(&self) -> RedrawMode {
        if self.stage.needs_device() {
            RedrawMode::Continuous
        } else {
            RedrawMode::OnDemand
        }
    }

    /// 运行消息循环，直到窗口关闭或某一帧失败
    pub fn run(&mut self) -> Result<()> {
        let mode = self.redraw_mode();
        let resources = &mut self.resources;
        self.host.run(mode, || match resources.as_mut() {
            Some(gpu) => gpu
                .renderer
                .render_frame(&gpu.context, &mut gpu.swap_chain)
                .map(|_| ()),
            None => Ok(()),
        })
    }

    /// 按创建的相反顺序释放所有资源
    pub fn dispose(self) {
        info!(frames = self.frames_presented(), "Shutting down");
        let Game { resources, host, .. } = self;

        if let Some(GpuResources {
            renderer,
            swap_chain,
            context,
        }) = resources
        {
            drop(renderer);
            debug!("Pipeline and vertex buffer released");
            drop(swap_chain);
            debug!("Swap chain released");
            drop(context);
            debug!("Device released");
        }

        drop(host);
        info!("Window destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_entry_point_fails_before_window() {
        let mut config = Config::default();
        config.graphics.stage = TutorialStage::ColoredTriangle;
        config.shaders.directory = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("shaders")
            .to_string_lossy()
            .to_string();
        config.shaders.vertex_entry = "missing_main".to_string();

        // 着色器在事件循环之前编译，所以测试线程上不会创建窗口
        let err = Game::new(&config).err().unwrap();
        assert!(err.is_shader_compile(), "unexpected error: {}", err);
    }

    #[test]
    fn test_missing_shader_file_fails_before_window() {
        let mut config = Config::default();
        config.graphics.stage = TutorialStage::Triangle;
        config.shaders.directory = "does/not/exist".to_string();

        let err = Game::new(&config).err().unwrap();
        assert!(err.is_shader_compile(), "unexpected error: {}", err);
    }
}
