use std::fmt;
use std::path::{Path, PathBuf};

use winit::dpi::PhysicalSize;

use crate::render::{sprite_quad, QuadGeometry, QUAD_INDICES};

use super::layout::AtlasLayout;
use super::mipmap;

const ATLAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// An atlas texture creation error.
#[derive(Debug)]
pub enum AtlasError {
    /// The image file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The decoder rejected the file contents.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::Io { path, source } => {
                write!(f, "failed to read texture {}: {}", path.display(), source)
            }
            AtlasError::Decode { path, source } => {
                write!(f, "failed to decode texture {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtlasError::Io { source, .. } => Some(source),
            AtlasError::Decode { source, .. } => Some(source),
        }
    }
}

/// One sprite atlas on the GPU.
///
/// Existence implies a live, sampleable texture: creation returns `Err` on
/// read or decode failure before any GPU object is allocated, so `bind` and
/// `draw_sprite` cannot touch a broken atlas. Released exactly once on
/// drop.
pub struct SpriteAtlas {
    texture: wgpu::Texture,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    layout: AtlasLayout,
}

impl SpriteAtlas {
    /// Decodes an image file into a mipmapped GPU texture.
    ///
    /// The image is flipped vertically (v=0 addresses the bottom row, the
    /// way the quad maps it) and converted to RGBA. Wrap mode is repeat on
    /// both axes, filtering linear-mipmap-linear (minify) / linear
    /// (magnify). The decoded pixel buffer is dropped before returning.
    pub fn from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        layout: AtlasLayout,
    ) -> Result<Self, AtlasError> {
        log::info!("loading atlas texture from {}", path.display());
        let pixels = decode_atlas(path)?;
        Ok(Self::from_pixels(device, queue, &pixels, layout))
    }

    /// Uploads already-decoded RGBA pixels. Infallible: by this point the
    /// only remaining work is GPU object creation.
    pub fn from_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &image::RgbaImage,
        layout: AtlasLayout,
    ) -> Self {
        let (width, height) = pixels.dimensions();

        if width as f32 != layout.atlas_width || height as f32 != layout.atlas_height {
            log::warn!(
                "atlas layout says {}x{} but the image is {width}x{height}",
                layout.atlas_width,
                layout.atlas_height
            );
        }

        let mip_count = mipmap::mip_level_count(width, height);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprat atlas texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ATLAS_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        mipmap::generate_mipmaps(device, queue, &texture, ATLAS_FORMAT, mip_count);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprat atlas sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprat atlas bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprat atlas bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group_layout,
            bind_group,
            layout,
        }
    }

    pub fn layout(&self) -> AtlasLayout {
        self.layout
    }

    /// Layout the shader program links against (group 0: texture + sampler).
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Texture size in texels.
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    /// Binds the atlas to group 0 of the pass. The binding is scoped to the
    /// pass; ending the pass unbinds.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_bind_group(0, &self.bind_group, &[]);
    }

    /// Rewrites the caller-owned quad for `sprite_index` and issues the
    /// indexed draw.
    ///
    /// The quad is scaled by sprite size over `viewport` size so the sprite
    /// renders at native pixel size regardless of window size. Assumes the
    /// program, this atlas and `quad` are already bound to the pass. The
    /// vertex rewrite is staged on the queue and lands before this frame's
    /// commands at submit.
    pub fn draw_sprite(
        &self,
        queue: &wgpu::Queue,
        rpass: &mut wgpu::RenderPass<'_>,
        quad: &QuadGeometry,
        sprite_index: u32,
        viewport: PhysicalSize<u32>,
    ) {
        let (u_start, u_end) = self.layout.sprite_bounds(sprite_index);

        let scale_x = self.layout.sprite_width / viewport.width.max(1) as f32;
        let scale_y = self.layout.sprite_height / viewport.height.max(1) as f32;

        let vertices = sprite_quad(u_start, u_end, scale_x, scale_y);
        queue.write_buffer(quad.vertex_buffer(), 0, bytemuck::cast_slice(&vertices));

        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

/// Reads and decodes an atlas image into flipped RGBA pixels.
///
/// The source channel count only picks the upload format in APIs with a
/// 3-channel texture format; here everything widens to RGBA and the count
/// is logged for diagnostics.
fn decode_atlas(path: &Path) -> Result<image::RgbaImage, AtlasError> {
    let bytes = std::fs::read(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| AtlasError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "decoded atlas: {}x{}, {} channels",
        decoded.width(),
        decoded.height(),
        decoded.color().channel_count()
    );

    Ok(decoded.flipv().into_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── decode failures ───────────────────────────────────────────────────

    #[test]
    fn missing_file_is_an_io_error_with_the_path() {
        let path = Path::new("/nonexistent/sprat/atlas.png");
        match decode_atlas(path).unwrap_err() {
            AtlasError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let path = std::env::temp_dir().join("sprat-not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = decode_atlas(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, AtlasError::Decode { .. }), "got {err:?}");
    }

    // ── decode orientation ────────────────────────────────────────────────

    #[test]
    fn decode_flips_vertically() {
        // 1x2 image: red on top, blue on bottom. After the flip the first
        // row (v=0) must be the blue one.
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));

        let path = std::env::temp_dir().join("sprat-flip-check.png");
        img.save(&path).unwrap();

        let decoded = decode_atlas(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.get_pixel(0, 0), &image::Rgba([0, 0, 255, 255]));
        assert_eq!(decoded.get_pixel(0, 1), &image::Rgba([255, 0, 0, 255]));
    }

    // ── error display ─────────────────────────────────────────────────────

    #[test]
    fn io_error_display_names_the_file() {
        let err = decode_atlas(Path::new("/nonexistent/sprat/atlas.png")).unwrap_err();
        assert!(err.to_string().contains("atlas.png"));
    }
}
