//! Sprat engine crate.
//!
//! Owns the platform + GPU runtime pieces (window, device, frame loop) and
//! the two rendering components the demo composes: the shader program and
//! the sprite-atlas texture.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod shader;
pub mod atlas;
pub mod render;
