//! 窗口宿主
//!
//! 持有原生窗口和 winit 事件循环，提供阻塞式的运行循环。
//!
//! 客户区尺寸在创建时固定：窗口不可调整大小，
//! 平台仍然改变了尺寸时（例如窗口管理器强制平铺），宿主会把尺寸恢复回去。
//! 窗口创建时是隐藏的，启动流程全部成功后才调用 [`WindowHost::show`]。

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::core::config::WindowConfig;
use crate::core::error::{ConfigError, PlatformError, Result, TutorialError};

/// 固定的客户区尺寸（物理像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientArea {
    width: u32,
    height: u32,
}

impl ClientArea {
    /// 创建客户区尺寸，宽高必须大于 0
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height".to_string(),
                reason: format!("Client area must be non-empty, got {}x{}", width, height),
            }.into());
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn physical_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }

    /// 处理平台报告的新尺寸
    ///
    /// 返回需要恢复到的尺寸；尺寸未变化或窗口被最小化（0x0）时返回 `None`。
    pub fn reconcile(&self, reported: PhysicalSize<u32>) -> Option<PhysicalSize<u32>> {
        if reported.width == 0 || reported.height == 0 {
            return None;
        }
        if reported == self.physical_size() {
            None
        } else {
            Some(self.physical_size())
        }
    }
}

/// 消息循环的重绘方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawMode {
    /// 每轮事件处理完都请求重绘，帧率由呈现时的垂直同步限制
    Continuous,
    /// 只在系统要求时重绘，空闲时阻塞等待事件
    OnDemand,
}

impl RedrawMode {
    pub fn control_flow(self) -> ControlFlow {
        match self {
            RedrawMode::Continuous => ControlFlow::Poll,
            RedrawMode::OnDemand => ControlFlow::Wait,
        }
    }

    /// 事件处理完后是否主动请求下一次重绘
    pub fn requests_redraw(self) -> bool {
        self == RedrawMode::Continuous
    }
}

/// 窗口宿主
pub struct WindowHost {
    window: Arc<Window>,
    client_area: ClientArea,
    /// `run` 会消耗事件循环
    event_loop: Option<EventLoop<()>>,
}

impl WindowHost {
    /// 创建隐藏的、不可调整大小的窗口
    pub fn create(config: &WindowConfig) -> Result<Self> {
        let client_area = ClientArea::new(config.width, config.height)?;

        debug!("Creating event loop");
        let event_loop = EventLoop::new()
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        debug!(title = %config.title, width = config.width, height = config.height, "Creating window");
        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(client_area.physical_size())
            .with_resizable(false)
            .with_visible(false)
            .build(&event_loop)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        let actual = window.inner_size();
        if let Some(fixed) = client_area.reconcile(actual) {
            warn!(
                width = actual.width,
                height = actual.height,
                "Platform chose a different client size, requesting the fixed size"
            );
            let _ = window.request_inner_size(fixed);
        }

        info!(width = client_area.width(), height = client_area.height(), "Window created");

        Ok(Self {
            window: Arc::new(window),
            client_area,
            event_loop: Some(event_loop),
        })
    }

    /// 窗口引用（用于创建交换链表面）
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// 固定的客户区尺寸
    pub fn client_area(&self) -> ClientArea {
        self.client_area
    }

    /// 显示窗口
    pub fn show(&self) {
        self.window.set_visible(true);
    }

    /// 运行消息循环
    ///
    /// 阻塞当前线程，每次重绘时调用一次 `on_frame`，直到用户关闭窗口。
    /// `on_frame` 返回错误时循环结束，并把该错误返回给调用者。
    pub fn run<F>(&mut self, mode: RedrawMode, mut on_frame: F) -> Result<()>
    where
        F: FnMut() -> Result<()>,
    {
        let event_loop = self.event_loop.take().ok_or(PlatformError::LoopConsumed)?;
        let window = &self.window;
        let client_area = self.client_area;
        let mut frame_error: Option<TutorialError> = None;

        info!(?mode, "Entering main loop...");
        event_loop.set_control_flow(mode.control_flow());
        event_loop
            .run(|event, elwt| match event {
                Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                    WindowEvent::CloseRequested => {
                        info!("Close requested, shutting down...");
                        elwt.exit();
                    }
                    WindowEvent::Resized(size) => {
                        if let Some(fixed) = client_area.reconcile(size) {
                            debug!(
                                width = size.width,
                                height = size.height,
                                "Ignoring resize, restoring fixed client area"
                            );
                            let _ = window.request_inner_size(fixed);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(e) = on_frame() {
                            error!("Frame failed: {}", e);
                            frame_error = Some(e);
                            elwt.exit();
                        }
                    }
                    _ => (),
                },
                Event::AboutToWait if mode.requests_redraw() => window.request_redraw(),
                _ => (),
            })
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        match frame_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
