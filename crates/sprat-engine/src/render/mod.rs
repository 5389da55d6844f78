//! GPU rendering support.
//!
//! Holds the renderer-facing context types and the caller-owned quad
//! geometry the sprite draw path rewrites each frame.
//!
//! Convention: quad positions are normalized device coordinates (+Y up),
//! texture coordinates are normalized with v=0 at the bottom of the image
//! (sources are flipped vertically at decode to match).

mod ctx;
mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{sprite_quad, QuadGeometry, SpriteVertex, QUAD_INDICES};
