//! armsoc mode-setting backends
//!
//! # Purpose
//! The armsoc X driver handles many ARM SoCs whose kernel DRM drivers
//! differ in small ways: cursor handling, buffer allocation, which optional
//! features work. Each SoC gets a backend here; the host driver asks the
//! registry for the one matching its device and then only talks to the
//! [`DrmModeInterface`] trait.
//!
//! # Integration Points
//! - Depends on: `drm-platform` (device access)
//! - Provides to: the host mode-setting driver, `drmmode-probe`
//!
//! # Architecture
//! - [`DrmModeInterface`]: descriptor + `init_plane_for_cursor` +
//!   `create_custom_gem`
//! - [`registry`]: compile-time set of backends, looked up by driver name
//! - [`plane`], [`gem`]: building blocks shared between backends
//! - [`sun4i`]: Allwinner display engine
//!
//! # Testing Strategy
//! - Unit tests: descriptor contents, property matching, registry lookup
//! - Integration tests: callbacks driven against `drm-mock`

use drm_platform::{DrmError, Errno};
use thiserror::Error;

mod config;
pub mod gem;
mod interface;
pub mod plane;
pub mod registry;
pub mod sun4i;

pub use interface::{
    BufferType, CreateGem, CursorApi, CursorGeometry, DrmModeInterface, GemBuffer,
    InterfaceDescriptor, InterfaceFlags,
};
pub use registry::{find_interface, interface_for_device, interfaces};

/// Error types for backend operations
#[derive(Debug, Error)]
pub enum DrmModeError {
    #[error("DRM device error: {0}")]
    Device(#[from] DrmError),

    #[error("No backend for DRM driver '{name}'")]
    UnsupportedDriver { name: String },
}

impl DrmModeError {
    /// Kernel error code behind a device failure
    pub fn errno(&self) -> Option<Errno> {
        match self {
            DrmModeError::Device(e) => e.errno(),
            DrmModeError::UnsupportedDriver { .. } => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, DrmModeError>;
