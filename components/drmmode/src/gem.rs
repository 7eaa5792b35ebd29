//! Buffer allocation helpers shared by backends

use drm_platform::{drm_mode_create_dumb, DrmDevice};

use crate::interface::{CreateGem, GemBuffer};
use crate::Result;

/// Allocate a dumb buffer for a generic create request
///
/// Dumb buffers carry no placement flags, so `create.buf_type` does not
/// reach the kernel.
pub fn create_dumb_gem(dev: &dyn DrmDevice, create: &CreateGem) -> Result<GemBuffer> {
    let mut arg = drm_mode_create_dumb {
        bpp: create.bpp,
        width: create.width,
        height: create.height,
        ..Default::default()
    };

    dev.create_dumb(&mut arg)?;

    Ok(GemBuffer {
        handle: arg.handle,
        pitch: arg.pitch,
        size: arg.size,
    })
}
