//! Shader program lifecycle.
//!
//! A program is built from two stage sources (vertex, fragment) read from
//! external WGSL files, compiled independently, then linked into one
//! render pipeline. Creation is fallible and all-or-nothing: a
//! `ShaderProgram` value always holds a valid, activatable pipeline.

mod program;

pub use program::{ProgramConfig, ShaderError, ShaderProgram, ShaderStage};
