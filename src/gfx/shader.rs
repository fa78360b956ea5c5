//! 着色器阶段集合
//!
//! 本模块负责：
//! - 从磁盘读取 WGSL 源码并用 naga 编译、校验
//! - 按 profile（`vs_4_0`、`ps_4_0` 等）检查入口函数及其着色器阶段
//! - 从顶点着色器入口提取输入签名
//! - 用输入元素描述构建输入布局，并与签名逐项比对
//! - 创建绑定顶点着色器、像素着色器和输入布局的渲染管线
//!
//! 编译在启动时进行，任何错误都是致命的，不会带着不完整的管线继续运行。
//!
//! # 渲染管线
//!
//! ```text
//! 顶点缓冲 -> 输入布局 -> 顶点着色器 -> 光栅化 -> 像素着色器 -> 后台缓冲
//! ```

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::config::{ShaderConfig, TutorialStage};
use crate::core::error::{GraphicsError, Result};

/// 着色器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    fn naga(&self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Pixel => naga::ShaderStage::Fragment,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs",
            ShaderStage::Pixel => "ps",
        }
    }
}

/// 目标 profile，形如 `vs_4_0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProfile {
    stage: ShaderStage,
    major: u8,
    minor: u8,
}

impl ShaderProfile {
    /// 支持的着色器模型
    pub const SUPPORTED_MODELS: &'static [(u8, u8)] = &[(4, 0), (4, 1), (5, 0)];

    /// 解析 profile 字符串，不支持的 profile 返回 `None`
    pub fn parse(profile: &str) -> Option<Self> {
        let mut parts = profile.split('_');
        let stage = match parts.next()? {
            "vs" => ShaderStage::Vertex,
            "ps" => ShaderStage::Pixel,
            _ => return None,
        };
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        if parts.next().is_some() || !Self::SUPPORTED_MODELS.contains(&(major, minor)) {
            return None;
        }
        Some(Self { stage, major, minor })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl fmt::Display for ShaderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.stage.prefix(), self.major, self.minor)
    }
}

/// 顶点着色器签名中的一个输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderInput {
    pub location: u32,
    pub name: Option<String>,
    pub format: wgpu::VertexFormat,
}

/// 输入元素描述：顶点记录中的一个字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputElement {
    /// 语义名（只用于诊断信息）
    pub semantic: &'static str,
    /// 着色器输入位置
    pub location: u32,
    /// 字段格式
    pub format: wgpu::VertexFormat,
}

impl InputElement {
    pub const fn new(semantic: &'static str, location: u32, format: wgpu::VertexFormat) -> Self {
        Self { semantic, location, format }
    }
}

/// 编译后的着色器
#[derive(Debug, Clone)]
pub struct CompiledShader {
    source_path: PathBuf,
    source: String,
    entry_point: String,
    profile: ShaderProfile,
    inputs: Vec<ShaderInput>,
}

/// 从文件编译着色器
///
/// 文件不存在、语法错误、校验失败、profile 不支持、入口函数不存在或阶段不符，
/// 都返回携带诊断信息的 `ShaderCompile` 错误。
pub fn compile(source_path: impl AsRef<Path>, entry_point: &str, profile: &str) -> Result<CompiledShader> {
    let path = source_path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| GraphicsError::ShaderCompile {
        source: path.to_path_buf(),
        diagnostics: format!("cannot read shader source: {}", e),
    })?;
    compile_source(path, &source, entry_point, profile)
}

/// 编译内存中的着色器源码，`label` 用于诊断信息
pub fn compile_source(
    label: impl Into<PathBuf>,
    source: &str,
    entry_point: &str,
    profile: &str,
) -> Result<CompiledShader> {
    let source_path = label.into();
    let fail = |diagnostics: String| GraphicsError::ShaderCompile {
        source: source_path.clone(),
        diagnostics,
    };

    let profile = ShaderProfile::parse(profile).ok_or_else(|| {
        fail(format!(
            "unsupported target profile '{}' (expected vs_X_Y or ps_X_Y with model in {:?})",
            profile,
            ShaderProfile::SUPPORTED_MODELS
        ))
    })?;

    debug!(path = %source_path.display(), entry_point, %profile, "Compiling shader");

    let module = naga::front::wgsl::parse_str(source).map_err(|e| fail(e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| fail(format!("validation error: {}", e)))?;

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == entry_point)
        .ok_or_else(|| fail(format!("entry point '{}' not found", entry_point)))?;

    if entry.stage != profile.stage().naga() {
        return Err(fail(format!(
            "entry point '{}' is a {:?} shader, profile {} expects {:?}",
            entry_point,
            entry.stage,
            profile,
            profile.stage().naga()
        ))
        .into());
    }

    let inputs = match profile.stage() {
        ShaderStage::Vertex => vertex_inputs(&module, &entry.function).map_err(fail)?,
        ShaderStage::Pixel => Vec::new(),
    };

    Ok(CompiledShader {
        source_path: source_path.clone(),
        source: source.to_string(),
        entry_point: entry_point.to_string(),
        profile,
        inputs,
    })
}

/// 提取顶点入口的 `@location` 输入，按位置排序
fn vertex_inputs(module: &naga::Module, function: &naga::Function) -> std::result::Result<Vec<ShaderInput>, String> {
    let mut inputs = Vec::new();

    for argument in &function.arguments {
        match &argument.binding {
            Some(binding) => push_input(module, &mut inputs, argument.name.clone(), argument.ty, binding)?,
            None => {
                // 结构体参数：逐个成员展开
                if let naga::TypeInner::Struct { members, .. } = &module.types[argument.ty].inner {
                    for member in members {
                        if let Some(binding) = &member.binding {
                            push_input(module, &mut inputs, member.name.clone(), member.ty, binding)?;
                        }
                    }
                }
            }
        }
    }

    inputs.sort_by_key(|input| input.location);
    Ok(inputs)
}

fn push_input(
    module: &naga::Module,
    inputs: &mut Vec<ShaderInput>,
    name: Option<String>,
    ty: naga::Handle<naga::Type>,
    binding: &naga::Binding,
) -> std::result::Result<(), String> {
    // 内建输入（vertex_index 等）不来自顶点缓冲
    if let naga::Binding::Location { location, .. } = *binding {
        let format = vertex_format(&module.types[ty].inner).ok_or_else(|| {
            format!(
                "input at location {} has a type that cannot be read from a vertex buffer",
                location
            )
        })?;
        inputs.push(ShaderInput { location, name, format });
    }
    Ok(())
}

fn vertex_format(inner: &naga::TypeInner) -> Option<wgpu::VertexFormat> {
    use naga::{ScalarKind, TypeInner, VectorSize};
    use wgpu::VertexFormat as F;

    let (scalar, size) = match *inner {
        TypeInner::Scalar(scalar) => (scalar, None),
        TypeInner::Vector { size, scalar } => (scalar, Some(size)),
        _ => return None,
    };
    if scalar.width != 4 {
        return None;
    }

    let format = match (scalar.kind, size) {
        (ScalarKind::Float, None) => F::Float32,
        (ScalarKind::Float, Some(VectorSize::Bi)) => F::Float32x2,
        (ScalarKind::Float, Some(VectorSize::Tri)) => F::Float32x3,
        (ScalarKind::Float, Some(VectorSize::Quad)) => F::Float32x4,
        (ScalarKind::Sint, None) => F::Sint32,
        (ScalarKind::Sint, Some(VectorSize::Bi)) => F::Sint32x2,
        (ScalarKind::Sint, Some(VectorSize::Tri)) => F::Sint32x3,
        (ScalarKind::Sint, Some(VectorSize::Quad)) => F::Sint32x4,
        (ScalarKind::Uint, None) => F::Uint32,
        (ScalarKind::Uint, Some(VectorSize::Bi)) => F::Uint32x2,
        (ScalarKind::Uint, Some(VectorSize::Tri)) => F::Uint32x3,
        (ScalarKind::Uint, Some(VectorSize::Quad)) => F::Uint32x4,
        _ => return None,
    };
    Some(format)
}

impl CompiledShader {
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn profile(&self) -> ShaderProfile {
        self.profile
    }

    /// 顶点输入签名（像素着色器为空）
    pub fn input_signature(&self) -> &[ShaderInput] {
        &self.inputs
    }

    /// 创建 GPU 着色器模块
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        let label = self.source_path.to_string_lossy();
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label.as_ref()),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(&self.source)),
        })
    }
}

/// 输入布局
///
/// 顶点记录字段到着色器输入位置的映射。字段紧密排列，偏移依次累加。
#[derive(Debug, Clone, PartialEq)]
pub struct InputLayout {
    elements: Vec<InputElement>,
    attributes: Vec<wgpu::VertexAttribute>,
    stride: u64,
}

impl InputLayout {
    /// 按着色器签名构建输入布局
    ///
    /// 元素的数量、顺序（位置）和格式必须与签名完全一致。
    pub fn build(signature: &[ShaderInput], elements: &[InputElement]) -> Result<Self> {
        if signature.len() != elements.len() {
            return Err(GraphicsError::LayoutMismatch(format!(
                "shader declares {} inputs, layout describes {} elements",
                signature.len(),
                elements.len()
            ))
            .into());
        }

        let mut attributes = Vec::with_capacity(elements.len());
        let mut offset = 0;
        for (index, (input, element)) in signature.iter().zip(elements).enumerate() {
            if input.location != element.location {
                return Err(GraphicsError::LayoutMismatch(format!(
                    "element {} ({}) binds location {}, shader input {} is at location {}",
                    index,
                    element.semantic,
                    element.location,
                    index,
                    input.location
                ))
                .into());
            }
            if input.format != element.format {
                return Err(GraphicsError::LayoutMismatch(format!(
                    "element {} ({}) is {:?}, shader expects {:?} at location {}",
                    index, element.semantic, element.format, input.format, input.location
                ))
                .into());
            }

            attributes.push(wgpu::VertexAttribute {
                format: element.format,
                offset,
                shader_location: element.location,
            });
            offset += element.format.size();
        }

        Ok(Self {
            elements: elements.to_vec(),
            attributes,
            stride: offset,
        })
    }

    /// 每条顶点记录的字节数
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// 检查顶点缓冲的记录布局与输入布局一致
    pub fn validate_records(&self, stride: u64, elements: &[InputElement]) -> Result<()> {
        if stride != self.stride {
            return Err(GraphicsError::LayoutMismatch(format!(
                "vertex buffer stride is {} bytes, input layout expects {}",
                stride, self.stride
            ))
            .into());
        }
        if elements != self.elements.as_slice() {
            return Err(GraphicsError::LayoutMismatch(format!(
                "vertex buffer fields {:?} differ from input layout {:?}",
                elements.iter().map(|e| e.semantic).collect::<Vec<_>>(),
                self.elements.iter().map(|e| e.semantic).collect::<Vec<_>>()
            ))
            .into());
        }
        Ok(())
    }

    /// 顶点缓冲布局（步长 + 属性）
    pub fn vertex_buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// 着色器阶段集合：一个顶点着色器和一个像素着色器
#[derive(Debug, Clone)]
pub struct ShaderStageSet {
    vertex: CompiledShader,
    pixel: CompiledShader,
}

impl ShaderStageSet {
    /// 编译一对着色器
    pub fn compile(vertex_path: &Path, pixel_path: &Path, config: &ShaderConfig) -> Result<Self> {
        let vertex = compile(vertex_path, &config.vertex_entry, &config.vertex_profile)?;
        let pixel = compile(pixel_path, &config.pixel_entry, &config.pixel_profile)?;
        let set = Self::from_shaders(vertex, pixel)?;

        info!(
            vertex = %vertex_path.display(),
            pixel = %pixel_path.display(),
            inputs = set.vertex.input_signature().len(),
            "Shaders compiled"
        );
        Ok(set)
    }

    /// 组合已编译的着色器，检查各自的 profile 阶段
    pub fn from_shaders(vertex: CompiledShader, pixel: CompiledShader) -> Result<Self> {
        let profile_mismatch = |shader: &CompiledShader, expected: ShaderStage| {
            GraphicsError::ShaderCompile {
                source: shader.source_path().to_path_buf(),
                diagnostics: format!(
                    "profile {} is not a {:?} profile",
                    shader.profile(),
                    expected
                ),
            }
        };
        if vertex.profile().stage() != ShaderStage::Vertex {
            return Err(profile_mismatch(&vertex, ShaderStage::Vertex).into());
        }
        if pixel.profile().stage() != ShaderStage::Pixel {
            return Err(profile_mismatch(&pixel, ShaderStage::Pixel).into());
        }
        Ok(Self { vertex, pixel })
    }

    /// 编译教程阶段对应的着色器；不绘制几何体的阶段返回 `None`
    pub fn for_stage(config: &ShaderConfig, stage: TutorialStage) -> Result<Option<Self>> {
        match (config.vertex_path(stage), config.pixel_path(stage)) {
            (Some(vertex), Some(pixel)) => Self::compile(&vertex, &pixel, config).map(Some),
            _ => Ok(None),
        }
    }

    /// 按顶点着色器签名构建输入布局
    pub fn build_input_layout(&self, elements: &[InputElement]) -> Result<InputLayout> {
        InputLayout::build(self.vertex.input_signature(), elements)
    }

    /// 创建渲染管线：三角形列表，单个颜色目标，不使用深度和多重采样
    ///
    /// 两个阶段之间的接口（顶点输出与像素输入）只有在链接管线时才能检查，
    /// 链接失败返回携带驱动诊断的 `ShaderCompile` 错误。
    pub fn create_pipeline(
        &self,
        device: &wgpu::Device,
        layout: &InputLayout,
        target_format: wgpu::TextureFormat,
    ) -> Result<wgpu::RenderPipeline> {
        debug!("Creating render pipeline");
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = self.vertex.create_module(device);
        let pixel_module = self.pixel.create_module(device);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: self.vertex.entry_point(),
                buffers: &[layout.vertex_buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &pixel_module,
                entry_point: self.pixel.entry_point(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(GraphicsError::ShaderCompile {
                source: self.pixel.source_path().to_path_buf(),
                diagnostics: format!(
                    "{} and {} do not link: {}",
                    self.vertex.source_path().display(),
                    self.pixel.source_path().display(),
                    error
                ),
            }
            .into());
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITION_VS: &str = r#"
        @vertex
        fn main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0);
        }
    "#;

    const COLOR_VS: &str = r#"
        struct VertexInput {
            @location(1) color: vec4<f32>,
            @location(0) position: vec3<f32>,
        };

        struct VertexOutput {
            @builtin(position) position: vec4<f32>,
            @location(0) color: vec4<f32>,
        };

        @vertex
        fn main(input: VertexInput, @builtin(vertex_index) index: u32) -> VertexOutput {
            var output: VertexOutput;
            output.position = vec4<f32>(input.position, 1.0);
            output.color = input.color;
            return output;
        }
    "#;

    const SOLID_PS: &str = r#"
        @fragment
        fn main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    const POSITION: InputElement = InputElement::new("POSITION", 0, wgpu::VertexFormat::Float32x3);
    const COLOR: InputElement = InputElement::new("COLOR", 1, wgpu::VertexFormat::Float32x4);

    fn shader_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders")
    }

    #[test]
    fn test_profile_parse() {
        let vs = ShaderProfile::parse("vs_4_0").unwrap();
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(vs.to_string(), "vs_4_0");
        assert_eq!(ShaderProfile::parse("ps_5_0").unwrap().stage(), ShaderStage::Pixel);

        assert!(ShaderProfile::parse("gs_4_0").is_none());
        assert!(ShaderProfile::parse("vs_9_9").is_none());
        assert!(ShaderProfile::parse("vs_4").is_none());
        assert!(ShaderProfile::parse("vs_4_0_1").is_none());
        assert!(ShaderProfile::parse("version 4.0").is_none());
    }

    #[test]
    fn test_position_signature() {
        let shader = compile_source("inline.wgsl", POSITION_VS, "main", "vs_4_0").unwrap();
        assert_eq!(
            shader.input_signature(),
            &[ShaderInput {
                location: 0,
                name: Some("position".to_string()),
                format: wgpu::VertexFormat::Float32x3,
            }]
        );
    }

    #[test]
    fn test_struct_signature_sorted_and_builtins_skipped() {
        let shader = compile_source("inline.wgsl", COLOR_VS, "main", "vs_4_0").unwrap();
        let signature = shader.input_signature();
        assert_eq!(signature.len(), 2);
        assert_eq!(signature[0].location, 0);
        assert_eq!(signature[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(signature[1].location, 1);
        assert_eq!(signature[1].format, wgpu::VertexFormat::Float32x4);
    }

    #[test]
    fn test_pixel_shader_has_no_signature() {
        let shader = compile_source("inline.wgsl", SOLID_PS, "main", "ps_4_0").unwrap();
        assert!(shader.input_signature().is_empty());
        assert_eq!(shader.entry_point(), "main");
    }

    #[test]
    fn test_missing_entry_point() {
        let err = compile_source("inline.wgsl", POSITION_VS, "VS", "vs_4_0").unwrap_err();
        assert!(err.is_shader_compile());
        assert!(err.to_string().contains("entry point 'VS' not found"));
    }

    #[test]
    fn test_stage_mismatch() {
        let err = compile_source("inline.wgsl", SOLID_PS, "main", "vs_4_0").unwrap_err();
        assert!(err.is_shader_compile());
        assert!(err.to_string().contains("profile vs_4_0"));
    }

    #[test]
    fn test_syntax_error_carries_diagnostics() {
        let broken = "@vertex fn main( -> @builtin(position) vec4<f32> { }";
        let err = compile_source("broken.wgsl", broken, "main", "vs_4_0").unwrap_err();
        assert!(err.is_shader_compile());
        let text = err.to_string();
        assert!(text.contains("broken.wgsl"));
        assert!(text.lines().count() > 1, "diagnostics should be included: {}", text);
    }

    #[test]
    fn test_unknown_profile() {
        let err = compile_source("inline.wgsl", POSITION_VS, "main", "vs_2_0").unwrap_err();
        assert!(err.to_string().contains("unsupported target profile 'vs_2_0'"));
    }

    #[test]
    fn test_missing_file() {
        let err = compile(shader_dir().join("missing.wgsl"), "main", "vs_4_0").unwrap_err();
        assert!(err.is_shader_compile());
        assert!(err.to_string().contains("cannot read shader source"));
    }

    #[test]
    fn test_layout_matches_signature() {
        let shader = compile_source("inline.wgsl", COLOR_VS, "main", "vs_4_0").unwrap();
        let layout = InputLayout::build(shader.input_signature(), &[POSITION, COLOR]).unwrap();

        assert_eq!(layout.stride(), 28);
        let buffer_layout = layout.vertex_buffer_layout();
        assert_eq!(buffer_layout.array_stride, 28);
        assert_eq!(buffer_layout.attributes[0].offset, 0);
        assert_eq!(buffer_layout.attributes[1].offset, 12);
        assert_eq!(buffer_layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn test_layout_count_mismatch() {
        let shader = compile_source("inline.wgsl", COLOR_VS, "main", "vs_4_0").unwrap();
        let err = InputLayout::build(shader.input_signature(), &[POSITION]).unwrap_err();
        assert!(err.is_layout_mismatch());
    }

    #[test]
    fn test_layout_order_mismatch() {
        let shader = compile_source("inline.wgsl", COLOR_VS, "main", "vs_4_0").unwrap();
        let err = InputLayout::build(shader.input_signature(), &[COLOR, POSITION]).unwrap_err();
        assert!(err.is_layout_mismatch());
    }

    #[test]
    fn test_layout_format_mismatch() {
        let shader = compile_source("inline.wgsl", POSITION_VS, "main", "vs_4_0").unwrap();
        let wrong = InputElement::new("POSITION", 0, wgpu::VertexFormat::Float32x4);
        let err = InputLayout::build(shader.input_signature(), &[wrong]).unwrap_err();
        assert!(err.is_layout_mismatch());
        assert!(err.to_string().contains("Float32x3"));
    }

    #[test]
    fn test_validate_records() {
        let shader = compile_source("inline.wgsl", POSITION_VS, "main", "vs_4_0").unwrap();
        let layout = InputLayout::build(shader.input_signature(), &[POSITION]).unwrap();

        assert!(layout.validate_records(12, &[POSITION]).is_ok());
        assert!(layout.validate_records(16, &[POSITION]).unwrap_err().is_layout_mismatch());
        assert!(layout
            .validate_records(12, &[InputElement::new("TEXCOORD", 0, wgpu::VertexFormat::Float32x3)])
            .unwrap_err()
            .is_layout_mismatch());
    }

    #[test]
    fn test_bundled_shaders_compile() {
        let config = ShaderConfig {
            directory: shader_dir().to_string_lossy().to_string(),
            ..ShaderConfig::default()
        };

        assert!(ShaderStageSet::for_stage(&config, TutorialStage::Clear).unwrap().is_none());

        let triangle = ShaderStageSet::for_stage(&config, TutorialStage::Triangle)
            .unwrap()
            .unwrap();
        assert!(triangle.build_input_layout(&[POSITION]).is_ok());

        let colored = ShaderStageSet::for_stage(&config, TutorialStage::ColoredTriangle)
            .unwrap()
            .unwrap();
        assert_eq!(colored.build_input_layout(&[POSITION, COLOR]).unwrap().stride(), 28);
        assert!(colored.build_input_layout(&[POSITION]).unwrap_err().is_layout_mismatch());
    }

    #[test]
    fn test_swapped_profiles_rejected() {
        let config = ShaderConfig {
            directory: shader_dir().to_string_lossy().to_string(),
            vertex_profile: "ps_4_0".to_string(),
            ..ShaderConfig::default()
        };
        let err = ShaderStageSet::for_stage(&config, TutorialStage::Triangle).unwrap_err();
        assert!(err.is_shader_compile());
    }
}
