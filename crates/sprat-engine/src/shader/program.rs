use std::fmt;
use std::path::{Path, PathBuf};

/// The two programmable stages a program links together.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A shader program creation error.
///
/// Compile and link logs are raw diagnostics for the caller to report, not
/// parsed further. No retry path exists; any failure is terminal for the
/// program instance.
#[derive(Debug)]
pub enum ShaderError {
    /// A stage source file could not be read. Returned before any
    /// compilation is attempted.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A stage was rejected by the shader compiler.
    Compile { stage: ShaderStage, log: String },
    /// The compiled stages could not be linked into a pipeline.
    Link { log: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "failed to read shader source {}: {}", path.display(), source)
            }
            ShaderError::Compile { stage, log } => {
                write!(f, "{stage} shader compilation error:\n{log}")
            }
            ShaderError::Link { log } => write!(f, "shader program linking error:\n{log}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Link-time interface description for a program.
///
/// Describes the state the caller owns and binds alongside the program:
/// the color target it renders to, the bind group layouts it samples from
/// and the vertex buffer layout it consumes.
pub struct ProgramConfig<'a> {
    pub label: &'a str,
    pub color_format: wgpu::TextureFormat,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
}

/// A compiled and linked shader program.
///
/// Existence implies validity: construction returns `Err` on any compile,
/// link or read failure, so `activate` can never be called on a broken
/// program. The pipeline is owned exactly once and released on drop.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Reads both stage sources from disk, then compiles and links them.
    ///
    /// Read failures surface as `ShaderError::Io` before any GPU work.
    pub fn from_files(
        device: &wgpu::Device,
        vertex_path: &Path,
        fragment_path: &Path,
        config: ProgramConfig<'_>,
    ) -> Result<Self, ShaderError> {
        let vertex_source = read_source(vertex_path)?;
        let fragment_source = read_source(fragment_path)?;
        Self::from_sources(device, &vertex_source, &fragment_source, config)
    }

    /// Compiles each stage independently, then links them into a pipeline.
    ///
    /// Stage modules are dropped on return, success or failure: stages are
    /// only needed for linking, and a failed creation leaves no GPU objects
    /// behind.
    pub fn from_sources(
        device: &wgpu::Device,
        vertex_source: &str,
        fragment_source: &str,
        config: ProgramConfig<'_>,
    ) -> Result<Self, ShaderError> {
        let vertex = compile_stage(device, ShaderStage::Vertex, vertex_source, config.label)?;
        let fragment = compile_stage(device, ShaderStage::Fragment, fragment_source, config.label)?;

        // Pipeline creation is the link step; validation errors here are
        // interface mismatches between the two stages and the caller-owned
        // geometry/binding state described by `config`.
        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(config.label),
            bind_group_layouts: config.bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(config.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: config.vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(ShaderError::Link {
                log: err.to_string(),
            });
        }

        Ok(Self { pipeline })
    }

    /// Makes this program current for subsequent draws in the pass.
    pub fn activate(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Compiles one stage under a validation error scope.
///
/// An invalid module is reported through the scope rather than a panic; the
/// half-built module is dropped with the scope result.
fn compile_stage(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
    label: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} {stage} stage")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    if let Some(err) = pollster::block_on(error_scope.pop()) {
        return Err(ShaderError::Compile {
            stage,
            log: err.to_string(),
        });
    }

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── source reading ────────────────────────────────────────────────────

    #[test]
    fn read_source_missing_file_reports_the_path() {
        let path = Path::new("/nonexistent/sprat/missing.wgsl");
        let err = read_source(path).unwrap_err();
        match err {
            ShaderError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    #[test]
    fn compile_error_display_names_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "expected ';'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("vertex"));
        assert!(msg.contains("expected ';'"));
    }

    #[test]
    fn link_error_display_carries_the_raw_log() {
        let err = ShaderError::Link {
            log: "location 0 type mismatch".to_string(),
        };
        assert!(err.to_string().contains("location 0 type mismatch"));
    }

    #[test]
    fn io_error_exposes_a_source() {
        use std::error::Error;
        let err = read_source(Path::new("/nonexistent/sprat/missing.wgsl")).unwrap_err();
        assert!(err.source().is_some());
    }
}
