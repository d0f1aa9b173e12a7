//! Text format writers for Whipstitch asset files
//!
//! Every writer emits one complete document top to bottom: banner, version stamp,
//! then the blocks in the order the runtime loader reads them.

mod animation;
mod mesh;
mod model;

pub use animation::write_ws_animation;
pub use mesh::write_ws_mesh;
pub use model::write_ws_model;

use std::io::{self, Write};

use glam::Quat;
use whipstitch_shared::{TextWriter, WS_ASSET_FORMAT};

/// `versionNumber MAJOR.MINOR`
fn write_version<W: Write>(out: &mut TextWriter<W>) -> io::Result<()> {
    out.field("versionNumber", WS_ASSET_FORMAT.version_string())
}

/// Quaternions are written `x y z w`.
fn quat_xyzw(q: Quat) -> [f32; 4] {
    [q.x, q.y, q.z, q.w]
}
