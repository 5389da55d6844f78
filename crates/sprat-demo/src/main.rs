//! Sprite-atlas demo binary.
//!
//! Opens a 400x600 window, builds a shader program from the two stage files
//! under `assets/shaders/`, loads the sprite atlas, and draws one sprite at
//! native pixel size until the window is closed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use sprat_engine::atlas::{AtlasLayout, SpriteAtlas};
use sprat_engine::core::{App, AppControl, FrameCtx, InitCtx};
use sprat_engine::device::GpuInit;
use sprat_engine::logging::{init_logging, LoggingConfig};
use sprat_engine::render::{QuadGeometry, SpriteVertex};
use sprat_engine::shader::{ProgramConfig, ShaderProgram};
use sprat_engine::window::{Runtime, RuntimeConfig};

const WINDOW_WIDTH: f64 = 400.0;
const WINDOW_HEIGHT: f64 = 600.0;

/// The demo atlas: a single row of 32x32 cells, 384 texels wide.
const ATLAS: AtlasLayout = AtlasLayout::single_row(32.0, 32.0, 384.0);

/// Which cell of the atlas to draw.
const SPRITE_INDEX: u32 = 10;

struct Resources {
    program: ShaderProgram,
    atlas: SpriteAtlas,
    quad: QuadGeometry,
}

#[derive(Default)]
struct SpriteDemo {
    resources: Option<Resources>,
}

impl App for SpriteDemo {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        let device = ctx.gpu.device();

        let atlas = SpriteAtlas::from_file(
            device,
            ctx.gpu.queue(),
            &asset_path("textures/atlas.png"),
            ATLAS,
        )
        .context("failed to create the sprite atlas")?;

        let program = ShaderProgram::from_files(
            device,
            &asset_path("shaders/sprite.vs.wgsl"),
            &asset_path("shaders/sprite.fs.wgsl"),
            ProgramConfig {
                label: "sprite program",
                color_format: ctx.gpu.surface_format(),
                bind_group_layouts: &[atlas.bind_group_layout()],
                vertex_buffers: &[SpriteVertex::layout()],
            },
        )
        .context("failed to create the sprite shader program")?;

        let quad = QuadGeometry::new(device);

        let (w, h) = atlas.size();
        log::info!("atlas ready ({w}x{h}); drawing sprite {SPRITE_INDEX}");

        self.resources = Some(Resources {
            program,
            atlas,
            quad,
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(res) = self.resources.as_ref() else {
            return AppControl::Exit;
        };

        ctx.render(wgpu::Color::BLACK, |rctx, target| {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            res.program.activate(&mut rpass);
            res.atlas.bind(&mut rpass);
            res.quad.bind(&mut rpass);
            res.atlas
                .draw_sprite(rctx.queue, &mut rpass, &res.quad, SPRITE_INDEX, rctx.viewport);
        })
    }
}

/// Resolves a path under this crate's `assets/` directory.
fn asset_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join(relative)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "sprat: sprite atlas demo".to_string(),
            initial_size: LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
        },
        GpuInit::default(),
        SpriteDemo::default(),
    )
}
