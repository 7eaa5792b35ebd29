//! Backend composition
//!
//! Which backends are compiled into the registry is decided by cargo
//! features:
//! - `backend-sun4i`: Allwinner A10/A20/A33/H3 display engine (default)
//!
//! Builds without any backend feature get an empty registry; the host then
//! reports every driver as unsupported.

use crate::interface::DrmModeInterface;

#[cfg(feature = "backend-sun4i")]
pub(crate) static INTERFACES: &[&dyn DrmModeInterface] = &[&crate::sun4i::SUN4I];

#[cfg(not(feature = "backend-sun4i"))]
pub(crate) static INTERFACES: &[&dyn DrmModeInterface] = &[];
