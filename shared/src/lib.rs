//! Shared asset format definitions for the Whipstitch engine.
//!
//! Everything a tool needs to agree on with the runtime loader lives here:
//! version stamps, file extensions, file banners and the brace-block text
//! grammar used by `.wsMesh`, `.wsAnim` and `.wsModel` files.

pub mod asset_format;
pub mod text;

pub use asset_format::{
    AssetFormat, WS_ANIMATION_TYPE_SKELETAL, WS_ASSET_FORMAT, WS_TEXTURE_MAP_COLOR,
    WS_TEXTURE_MAP_NORMAL,
};
pub use text::{Float, TextWriter};
