//! Sprite-atlas texture.
//!
//! An atlas is a single image holding fixed-size sprite cells in one row.
//! `AtlasLayout` is the pure geometry (sprite index → normalized horizontal
//! bounds); `SpriteAtlas` owns the GPU texture, sampler and bind group and
//! issues the per-sprite quad rewrite + draw.

mod layout;
mod mipmap;
mod texture;

pub use layout::AtlasLayout;
pub use texture::{AtlasError, SpriteAtlas};
