//! DRM Platform - Kernel mode-setting interface for armsoc backends
//!
//! # Purpose
//! Gives mode-setting backends a small, safe surface over the DRM/KMS
//! ioctls they actually use: driver version, object property enumeration,
//! property fetch/set and dumb-buffer creation.
//!
//! # Integration Points
//! - Depends on: Linux DRM uapi (`/dev/dri/cardN`)
//! - Provides to: `armsoc-drmmode` backends, `drmmode-probe`
//!
//! # Architecture
//! - [`abi`]: `#[repr(C)]` uapi mirrors and generated ioctl wrappers
//! - [`DrmDevice`]: the operations a backend may perform
//! - [`Card`]: kernel-backed implementation
//!
//! # Testing Strategy
//! - Unit tests: name/type matching, ABI layout (compile-time)
//! - Integration tests: backends run against `drm-mock`

use std::path::PathBuf;

use thiserror::Error;

pub mod abi;
mod card;
mod device;
mod property;

pub use abi::{drm_mode_create_dumb, PROP_NAME_LEN};
pub use card::{Card, DEFAULT_CARD};
pub use device::{DriverVersion, DrmDevice};
pub use nix::errno::Errno;
pub use property::{
    encode_name, property_name_eq, ObjectProperties, ObjectType, Property, PropertyEnum,
    PropertyFlags,
};

/// Error types for DRM device operations
#[derive(Debug, Error)]
pub enum DrmError {
    #[error("Failed to open DRM node {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{request} failed: {errno}")]
    Ioctl { request: &'static str, errno: Errno },
}

impl DrmError {
    /// The kernel error code, when the failure came from an ioctl
    pub fn errno(&self) -> Option<Errno> {
        match self {
            DrmError::Ioctl { errno, .. } => Some(*errno),
            DrmError::Open { source, .. } => source.raw_os_error().map(Errno::from_raw),
        }
    }
}

pub type Result<T> = core::result::Result<T, DrmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ioctl_error_keeps_errno() {
        let err = DrmError::Ioctl {
            request: "DRM_IOCTL_MODE_CREATE_DUMB",
            errno: Errno::ENOMEM,
        };
        assert_eq!(err.errno(), Some(Errno::ENOMEM));
        assert!(err.to_string().starts_with("DRM_IOCTL_MODE_CREATE_DUMB failed"));
    }

    #[test]
    fn test_open_error_maps_os_error() {
        let err = DrmError::Open {
            path: PathBuf::from("/dev/dri/card7"),
            source: std::io::Error::from_raw_os_error(Errno::ENOENT as i32),
        };
        assert_eq!(err.errno(), Some(Errno::ENOENT));
    }
}
