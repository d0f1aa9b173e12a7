//! stitch-export library
//!
//! Converts authored scene documents into Whipstitch text assets. The pipeline is
//! exposed for tools that want to compile scenes in memory.

pub mod animation;
pub mod bounds;
pub mod coords;
pub mod error;
pub mod extract;
pub mod formats;
pub mod manifest;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod skeleton;
pub mod tokens;

// Re-export asset format constants from shared
pub use whipstitch_shared::WS_ASSET_FORMAT;

pub use error::{Condition, ExportError};
pub use pipeline::{compile_scene, export_scene, write_scene, CompiledScene, ExportOptions, ExportReport};
