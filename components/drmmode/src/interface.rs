//! Backend interface
//!
//! What a SoC backend hands to the host driver: a static capability
//! descriptor and two callbacks. The host holds backends as
//! `&'static dyn DrmModeInterface`, so a backend's callbacks exist for as
//! long as any driver instance can reach them.

use drm_platform::DrmDevice;

use crate::Result;

bitflags::bitflags! {
    /// Boolean capabilities of a backend
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InterfaceFlags: u32 {
        /// The kernel delivers page-flip completion events
        const PAGE_FLIP_EVENTS = 1 << 0;
        /// Scan out the initial framebuffer before the server is fully up
        const EARLY_DISPLAY = 1 << 1;
        /// `drmWaitVBlank` queries are supported
        const VBLANK_QUERY = 1 << 2;
    }
}

/// How the hardware cursor is composited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorApi {
    /// Cursor image lives on a dedicated overlay plane
    Plane,
    /// Legacy `drmModeSetCursor` path
    Standard,
    /// No hardware cursor
    None,
}

/// Cursor image dimensions, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorGeometry {
    pub width: u32,
    pub height: u32,
    /// Transparent border added on each side of the image
    pub padding: u32,
}

/// Static description of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    /// Kernel driver name this backend serves (`DRM_IOCTL_VERSION` name)
    pub driver_name: &'static str,
    pub flags: InterfaceFlags,
    pub cursor: CursorGeometry,
    pub cursor_api: CursorApi,
}

impl InterfaceDescriptor {
    pub fn use_page_flip_events(&self) -> bool {
        self.flags.contains(InterfaceFlags::PAGE_FLIP_EVENTS)
    }

    pub fn use_early_display(&self) -> bool {
        self.flags.contains(InterfaceFlags::EARLY_DISPLAY)
    }

    pub fn vblank_query_supported(&self) -> bool {
        self.flags.contains(InterfaceFlags::VBLANK_QUERY)
    }
}

/// Intended use of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferType {
    /// Can be scanned out by a CRTC
    #[default]
    Scanout,
    /// Off-screen only
    NonScanout,
}

/// Generic buffer-create request from the host driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateGem {
    pub bpp: u32,
    pub width: u32,
    pub height: u32,
    pub buf_type: BufferType,
}

impl CreateGem {
    pub fn new(bpp: u32, width: u32, height: u32) -> Self {
        Self {
            bpp,
            width,
            height,
            buf_type: BufferType::default(),
        }
    }
}

/// Buffer allocated for a [`CreateGem`] request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemBuffer {
    /// GEM handle, valid on the device it was created on
    pub handle: u32,
    /// Bytes per row
    pub pitch: u32,
    /// Total size in bytes
    pub size: u64,
}

/// A SoC-specific mode-setting backend
pub trait DrmModeInterface: Sync {
    /// Capability descriptor
    fn descriptor(&self) -> &'static InterfaceDescriptor;

    /// Kernel driver name this backend serves
    fn name(&self) -> &'static str {
        self.descriptor().driver_name
    }

    /// Prepare the plane assigned to the hardware cursor
    ///
    /// Called once per cursor plane when the host sets up its CRTCs.
    fn init_plane_for_cursor(&self, dev: &dyn DrmDevice, plane_id: u32) -> Result<()>;

    /// Allocate a buffer the way this SoC's kernel driver expects
    ///
    /// # Errors
    /// Returns the device error unchanged if allocation fails
    fn create_custom_gem(&self, dev: &dyn DrmDevice, create: &CreateGem) -> Result<GemBuffer>;
}
