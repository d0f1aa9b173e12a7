//! Asset format definitions for Whipstitch text assets.
//!
//! This module defines the `AssetFormat` struct which serves as the single source of truth
//! for all asset-file constants (version stamp, file extensions, file banners).
//!
//! # Example
//!
//! ```
//! use whipstitch_shared::WS_ASSET_FORMAT;
//!
//! // Version stamp written at the top of every asset
//! assert_eq!(WS_ASSET_FORMAT.version_string(), "0.9");
//!
//! // Asset extensions
//! assert_eq!(WS_ASSET_FORMAT.mesh_ext, "wsMesh");
//! assert_eq!(WS_ASSET_FORMAT.animation_ext, "wsAnim");
//! assert_eq!(WS_ASSET_FORMAT.model_ext, "wsModel");
//! ```

/// Version stamp, extensions and banners of the three asset kinds.
///
/// Defines the constants shared by the exporter and the runtime loader.
#[derive(Debug, Clone, Copy)]
pub struct AssetFormat {
    /// Major version of the text grammar
    pub version_major: u32,

    /// Minor version of the text grammar
    pub version_minor: u32,

    /// Mesh file extension without dot (e.g., "wsMesh")
    pub mesh_ext: &'static str,

    /// Animation file extension (e.g., "wsAnim")
    pub animation_ext: &'static str,

    /// Model manifest extension (e.g., "wsModel")
    pub model_ext: &'static str,

    /// Banner lines the loader scans past at the top of a mesh file
    pub mesh_banner: [&'static str; 3],

    /// Banner lines at the top of an animation file
    pub animation_banner: [&'static str; 3],

    /// Banner lines at the top of a model file
    pub model_banner: [&'static str; 3],
}

impl AssetFormat {
    /// `MAJOR.MINOR`, as written after `versionNumber`.
    pub fn version_string(&self) -> String {
        format!("{}.{}", self.version_major, self.version_minor)
    }
}

/// Texture map bit: material carries a color map.
pub const WS_TEXTURE_MAP_COLOR: u32 = 0x0001;

/// Texture map bit: material carries a normal map.
pub const WS_TEXTURE_MAP_NORMAL: u32 = 0x0002;

/// Animation type tag for skeletal keyframe animations.
pub const WS_ANIMATION_TYPE_SKELETAL: u32 = 1;

const CONTACT_LINE: &str = "//  For more information, email dsnettleton@whipstitchgames.com";

/// Whipstitch asset format.
///
/// Version 0.9 adds `defaultPos`, `hasSkeleton`, vertex `bounds`, the `maps` bit flag,
/// material `properties` and animation `bounds` on top of 0.8.
pub const WS_ASSET_FORMAT: AssetFormat = AssetFormat {
    version_major: 0,
    version_minor: 9,
    mesh_ext: "wsMesh",
    animation_ext: "wsAnim",
    model_ext: "wsModel",
    mesh_banner: [
        "//  Whipstitch Mesh File",
        "//  This mesh is for use with the Whipstitch Game Engine",
        CONTACT_LINE,
    ],
    animation_banner: [
        "//  Whipstitch Animation File",
        "//  This Animation is for use with the Whipstitch Game Engine",
        CONTACT_LINE,
    ],
    model_banner: [
        "//  Whipstitch Model File",
        "//  This model is for use with the Whipstitch Game Engine",
        CONTACT_LINE,
    ],
};
