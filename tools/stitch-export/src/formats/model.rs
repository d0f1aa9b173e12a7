//! `.wsModel` writer

use anyhow::Result;
use std::io::Write;
use whipstitch_shared::{TextWriter, WS_ASSET_FORMAT};

use super::write_version;

/// Write the model manifest: one mesh plus `animation_count` animations.
pub fn write_ws_model<W: Write>(w: &mut W, model_name: &str, animation_count: usize) -> Result<()> {
    let mut out = TextWriter::new(w);

    out.banner(&WS_ASSET_FORMAT.model_banner)?;
    write_version(&mut out)?;
    out.field("modelName", model_name)?;
    out.blank()?;
    out.field("numMeshes", 1)?;
    out.field("numAnimations", animation_count)?;

    out.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_document() {
        let mut buf = Vec::new();
        write_ws_model(&mut buf, "hero", 3).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "//  Whipstitch Model File\n\
             //  This model is for use with the Whipstitch Game Engine\n\
             //  For more information, email dsnettleton@whipstitchgames.com\n\
             \n\
             versionNumber 0.9\n\
             modelName hero\n\
             \n\
             numMeshes 1\n\
             numAnimations 3\n"
        );
    }
}
