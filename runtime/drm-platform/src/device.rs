//! The DRM device abstraction
//!
//! Everything a mode-setting backend needs from an open DRM node, expressed
//! as a trait so the kernel-backed [`Card`](crate::Card) and test doubles are
//! interchangeable.

use crate::abi::drm_mode_create_dumb;
use crate::property::{ObjectProperties, ObjectType, Property};
use crate::Result;

/// Driver identity reported by `DRM_IOCTL_VERSION`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverVersion {
    pub major: i32,
    pub minor: i32,
    pub patchlevel: i32,
    /// Kernel driver name, e.g. `sun4i-drm`
    pub name: String,
    pub date: String,
    pub desc: String,
}

/// Operations on an open DRM device node
///
/// Calls are synchronous kernel round-trips. Implementations hold no state a
/// caller must serialize beyond the device itself; the host driver owns the
/// node and calls in from a single thread.
pub trait DrmDevice {
    /// Query the kernel driver's name and version
    fn version(&self) -> Result<DriverVersion>;

    /// List the properties attached to a mode object
    ///
    /// # Errors
    /// Returns an error if the object does not exist or the query fails
    fn object_properties(&self, obj_id: u32, obj_type: ObjectType) -> Result<ObjectProperties>;

    /// Fetch the full metadata of one property
    fn property(&self, prop_id: u32) -> Result<Property>;

    /// Set a property on a mode object
    fn set_object_property(
        &self,
        obj_id: u32,
        obj_type: ObjectType,
        prop_id: u32,
        value: u64,
    ) -> Result<()>;

    /// Allocate a dumb buffer
    ///
    /// `create.{bpp, width, height, flags}` are inputs; on success the kernel
    /// fills in `handle`, `pitch` and `size`. On failure `create` must be
    /// treated as undefined.
    fn create_dumb(&self, create: &mut drm_mode_create_dumb) -> Result<()>;
}
