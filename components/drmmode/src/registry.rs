//! Backend registry
//!
//! The host driver picks its backend by the name the kernel driver reports
//! for the open node.

use drm_platform::DrmDevice;

use crate::config;
use crate::interface::DrmModeInterface;
use crate::{DrmModeError, Result};

/// All backends compiled into this build
pub fn interfaces() -> &'static [&'static dyn DrmModeInterface] {
    config::INTERFACES
}

/// Look up the backend serving kernel driver `name`
///
/// # Errors
/// Returns [`DrmModeError::UnsupportedDriver`] if no backend matches
pub fn find_interface(name: &str) -> Result<&'static dyn DrmModeInterface> {
    interfaces()
        .iter()
        .copied()
        .find(|iface| iface.name() == name)
        .ok_or_else(|| DrmModeError::UnsupportedDriver {
            name: name.to_owned(),
        })
}

/// Select the backend for an open device from its reported driver name
pub fn interface_for_device(dev: &dyn DrmDevice) -> Result<&'static dyn DrmModeInterface> {
    let version = dev.version()?;
    let iface = find_interface(&version.name)?;

    log::info!(
        "Using {} backend (kernel driver {}.{}.{})",
        iface.name(),
        version.major,
        version.minor,
        version.patchlevel
    );

    Ok(iface)
}
