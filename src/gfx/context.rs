//! wgpu 设备上下文
//!
//! 本模块负责图形设备的初始化，包括：
//! - 创建 wgpu 实例
//! - 创建窗口表面（交换链）
//! - 选择图形适配器（默认只接受硬件适配器）
//! - 创建逻辑设备和命令队列（立即上下文）
//! - 按固定描述配置交换链
//!
//! 初始化中任何一步失败都直接返回错误，已创建的对象随作用域结束释放。

use tracing::{debug, info};

use crate::core::config::{DriverType, GraphicsConfig};
use crate::core::error::{GraphicsError, Result};
use crate::gfx::target::Viewport;
use crate::window::{ClientArea, WindowHost};

/// 刷新率（分子 / 分母）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

/// 交换链描述
///
/// 窗口模式、单个后台缓冲、8 位 RGBA 格式、60/1 刷新率、不使用多重采样。
/// wgpu 没有显式的缓冲数量，`buffer_count` 映射为最大帧延迟；
/// 刷新率在窗口模式下只作记录。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainDescription {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub refresh_rate: Rational,
    pub buffer_count: u32,
    pub sample_count: u32,
    pub windowed: bool,
    pub vsync: bool,
}

impl SwapChainDescription {
    /// 按客户区尺寸创建默认描述
    pub fn new(client_area: ClientArea, vsync: bool) -> Self {
        Self {
            width: client_area.width(),
            height: client_area.height(),
            format: wgpu::TextureFormat::Rgba8Unorm,
            refresh_rate: Rational { numerator: 60, denominator: 1 },
            buffer_count: 1,
            sample_count: 1,
            windowed: true,
            vsync,
        }
    }

    /// 从表面支持的格式中选择交换链格式
    ///
    /// 优先使用描述中的格式，其次依次尝试其他 8 位 RGBA/BGRA 格式。
    pub fn choose_format(&self, supported: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
        use wgpu::TextureFormat as F;

        [self.format, F::Rgba8Unorm, F::Bgra8Unorm, F::Rgba8UnormSrgb, F::Bgra8UnormSrgb]
            .into_iter()
            .find(|format| supported.contains(format))
    }

    /// 呈现模式：垂直同步时 FIFO（等待 1 次刷新）
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    /// 生成表面配置
    pub fn surface_configuration(
        &self,
        formats: &[wgpu::TextureFormat],
        alpha_modes: &[wgpu::CompositeAlphaMode],
    ) -> Result<wgpu::SurfaceConfiguration> {
        let format = self.choose_format(formats).ok_or_else(|| {
            GraphicsError::SwapChain(format!(
                "Surface supports none of the 8-bit RGBA formats: {:?}",
                formats
            ))
        })?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: self.width,
            height: self.height,
            present_mode: self.present_mode(),
            alpha_mode: alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: self.buffer_count,
        })
    }
}

/// 交换链
///
/// 绑定到窗口句柄的 wgpu 表面及其固定配置。
pub struct SwapChain {
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) description: SwapChainDescription,
    pub(crate) config: wgpu::SurfaceConfiguration,
    pub(crate) viewport: Option<Viewport>,
}

impl SwapChain {
    /// 交换链描述
    pub fn description(&self) -> &SwapChainDescription {
        &self.description
    }

    /// 实际使用的后台缓冲格式
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// 设置光栅化视口
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// 按原有描述重新配置表面（后台缓冲丢失或过期时）
    pub(crate) fn reconfigure(&self, context: &DeviceContext) {
        self.surface.configure(context.device(), &self.config);
    }
}

/// 设备上下文
///
/// 持有逻辑设备和立即上下文（命令队列）。
/// 其他 GPU 资源都通过它创建，并在它之前释放。
/// 字段按释放顺序声明。
pub struct DeviceContext {
    queue: wgpu::Queue,
    device: wgpu::Device,
    adapter: wgpu::Adapter,
    #[allow(dead_code)]
    instance: wgpu::Instance,
}

impl DeviceContext {
    /// 创建设备和绑定到窗口的交换链
    pub fn initialize(host: &WindowHost, config: &GraphicsConfig) -> Result<(Self, SwapChain)> {
        info!(driver = config.driver.name(), "Initializing device resources");

        let instance = create_instance();

        debug!("Creating surface");
        let surface = instance
            .create_surface(host.window().clone())
            .map_err(|e| GraphicsError::DeviceCreation(format!("Failed to create surface: {}", e)))?;

        let context = Self::create(instance, Some(&surface), config.driver)?;

        let description = SwapChainDescription::new(host.client_area(), config.vsync);
        let capabilities = surface.get_capabilities(&context.adapter);
        let surface_config =
            description.surface_configuration(&capabilities.formats, &capabilities.alpha_modes)?;

        debug!(
            format = ?surface_config.format,
            present_mode = ?surface_config.present_mode,
            buffers = description.buffer_count,
            "Configuring swap chain"
        );
        surface.configure(&context.device, &surface_config);

        let swap_chain = SwapChain {
            surface,
            description,
            config: surface_config,
            viewport: None,
        };

        info!("Device and swap chain created");
        Ok((context, swap_chain))
    }

    /// 创建不带交换链的设备（离屏渲染）
    pub fn headless(config: &GraphicsConfig) -> Result<Self> {
        info!(driver = config.driver.name(), "Initializing headless device");
        Self::create(create_instance(), None, config.driver)
    }

    fn create(
        instance: wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
        driver: DriverType,
    ) -> Result<Self> {
        debug!("Requesting adapter");
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: driver == DriverType::Software,
        }))
        .ok_or_else(|| {
            GraphicsError::DeviceCreation(format!("No compatible {} adapter found", driver.name()))
        })?;

        let adapter_info = adapter.get_info();
        check_driver(driver, &adapter_info)?;
        info!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "Selected adapter"
        );

        debug!("Requesting device and queue");
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
            },
            None,
        ))
        .map_err(|e| GraphicsError::DeviceCreation(format!("Failed to create device: {}", e)))?;

        Ok(Self {
            queue,
            device,
            adapter,
            instance,
        })
    }

    /// 逻辑设备
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// 立即上下文（命令提交队列）
    pub fn immediate_context(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// 适配器信息
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }
}

fn create_instance() -> wgpu::Instance {
    debug!("Creating wgpu instance");
    wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// 硬件模式下拒绝软件光栅化适配器
fn check_driver(driver: DriverType, info: &wgpu::AdapterInfo) -> Result<()> {
    if driver == DriverType::Hardware && info.device_type == wgpu::DeviceType::Cpu {
        return Err(GraphicsError::DeviceCreation(format!(
            "Adapter '{}' is a software rasterizer; set graphics.driver = \"software\" to use it",
            info.name
        ))
        .into());
    }
    Ok(())
}

/// 测试用的离屏设备；没有可用适配器时返回 `None`
#[cfg(test)]
pub(crate) fn test_context() -> Option<DeviceContext> {
    for driver in [DriverType::Hardware, DriverType::Software] {
        let config = GraphicsConfig {
            driver,
            ..GraphicsConfig::default()
        };
        if let Ok(context) = DeviceContext::headless(&config) {
            return Some(context);
        }
    }
    eprintln!("no graphics adapter available, skipping GPU test");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter_info(device_type: wgpu::DeviceType) -> wgpu::AdapterInfo {
        wgpu::AdapterInfo {
            name: "test adapter".to_string(),
            vendor: 0,
            device: 0,
            device_type,
            driver: String::new(),
            driver_info: String::new(),
            backend: wgpu::Backend::Vulkan,
        }
    }

    #[test]
    fn test_default_description() {
        let desc = SwapChainDescription::new(ClientArea::new(1280, 720).unwrap(), true);

        assert_eq!((desc.width, desc.height), (1280, 720));
        assert_eq!(desc.format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(desc.refresh_rate, Rational { numerator: 60, denominator: 1 });
        assert_eq!(desc.buffer_count, 1);
        assert_eq!(desc.sample_count, 1);
        assert!(desc.windowed);
        assert_eq!(desc.present_mode(), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn test_choose_format() {
        use wgpu::TextureFormat as F;
        let desc = SwapChainDescription::new(ClientArea::new(64, 64).unwrap(), true);

        assert_eq!(desc.choose_format(&[F::Bgra8Unorm, F::Rgba8Unorm]), Some(F::Rgba8Unorm));
        assert_eq!(desc.choose_format(&[F::Bgra8UnormSrgb, F::Bgra8Unorm]), Some(F::Bgra8Unorm));
        assert_eq!(desc.choose_format(&[F::Rgba16Float]), None);
    }

    #[test]
    fn test_surface_configuration() {
        use wgpu::TextureFormat as F;
        let desc = SwapChainDescription::new(ClientArea::new(1280, 720).unwrap(), false);

        let config = desc
            .surface_configuration(&[F::Rgba8Unorm], &[wgpu::CompositeAlphaMode::Opaque])
            .unwrap();
        assert_eq!(config.format, F::Rgba8Unorm);
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.desired_maximum_frame_latency, 1);
        assert_eq!(config.present_mode, wgpu::PresentMode::AutoNoVsync);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);

        let err = desc.surface_configuration(&[F::Rgba16Float], &[]).unwrap_err();
        assert!(err.to_string().contains("Swap chain error"));
    }

    #[test]
    fn test_hardware_driver_rejects_cpu_adapter() {
        let err = check_driver(DriverType::Hardware, &adapter_info(wgpu::DeviceType::Cpu))
            .unwrap_err();
        assert!(err.is_device_creation());

        assert!(check_driver(DriverType::Software, &adapter_info(wgpu::DeviceType::Cpu)).is_ok());
        assert!(
            check_driver(DriverType::Hardware, &adapter_info(wgpu::DeviceType::DiscreteGpu)).is_ok()
        );
    }

    #[test]
    fn test_headless_device() {
        let Some(context) = test_context() else { return };
        assert!(check_driver(DriverType::Software, &context.adapter_info()).is_ok());
        // 立即上下文可以提交空命令
        context.immediate_context().submit(std::iter::empty());
    }
}
