//! Allwinner sun4i display engine backend
//!
//! The cursor is an ordinary overlay plane. The kernel driver allocates
//! scanout memory through the generic dumb-buffer path.

use drm_platform::DrmDevice;

use crate::gem::create_dumb_gem;
use crate::interface::{
    CreateGem, CursorApi, CursorGeometry, DrmModeInterface, GemBuffer, InterfaceDescriptor,
    InterfaceFlags,
};
use crate::plane::raise_to_max_zpos;
use crate::Result;

// The overlay has no real size limit, but the X server always renders cursor
// images at the advertised maximum, so keep it small.
pub const CURSOR_WIDTH: u32 = 64;
pub const CURSOR_HEIGHT: u32 = 64;
pub const CURSOR_PADDING: u32 = 0;

pub static SUN4I_INTERFACE: InterfaceDescriptor = InterfaceDescriptor {
    driver_name: "sun4i-drm",
    flags: InterfaceFlags::PAGE_FLIP_EVENTS
        .union(InterfaceFlags::EARLY_DISPLAY)
        .union(InterfaceFlags::VBLANK_QUERY),
    cursor: CursorGeometry {
        width: CURSOR_WIDTH,
        height: CURSOR_HEIGHT,
        padding: CURSOR_PADDING,
    },
    cursor_api: CursorApi::Plane,
};

/// sun4i backend
#[derive(Debug, Clone, Copy, Default)]
pub struct Sun4i;

pub static SUN4I: Sun4i = Sun4i;

impl DrmModeInterface for Sun4i {
    fn descriptor(&self) -> &'static InterfaceDescriptor {
        &SUN4I_INTERFACE
    }

    /// Best effort: the cursor plane already sits above the primary plane,
    /// raising its `zpos` only makes that explicit. Always succeeds.
    fn init_plane_for_cursor(&self, dev: &dyn DrmDevice, plane_id: u32) -> Result<()> {
        raise_to_max_zpos(dev, plane_id);
        Ok(())
    }

    fn create_custom_gem(&self, dev: &dyn DrmDevice, create: &CreateGem) -> Result<GemBuffer> {
        create_dumb_gem(dev, create)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor() {
        let desc = Sun4i.descriptor();
        assert_eq!(desc.driver_name, "sun4i-drm");
        assert!(desc.use_page_flip_events());
        assert!(desc.use_early_display());
        assert!(desc.vblank_query_supported());
        assert_eq!(desc.cursor_api, CursorApi::Plane);
    }

    #[test]
    fn test_cursor_geometry() {
        let cursor = SUN4I.descriptor().cursor;
        assert_eq!(cursor.width, 64);
        assert_eq!(cursor.height, 64);
        assert_eq!(cursor.padding, 0);
    }

    #[test]
    fn test_name_follows_descriptor() {
        assert_eq!(SUN4I.name(), SUN4I_INTERFACE.driver_name);
    }
}
