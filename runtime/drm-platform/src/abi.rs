//! Kernel DRM ABI
//!
//! `#[repr(C)]` mirrors of the `drm.h` / `drm_mode.h` structures this crate
//! exchanges with the kernel, plus the ioctl wrappers generated for them.
//! Layouts must match the uapi headers byte for byte; the size checks at the
//! bottom of this file catch drift at compile time.

#![allow(non_camel_case_types)]

use core::ptr;

use nix::libc::{c_char, c_int, size_t};
use static_assertions::assert_eq_size;

/// ioctl type byte shared by every DRM request
pub const DRM_IOCTL_BASE: u8 = b'd';

/// Fixed length of property and enum names (`DRM_PROP_NAME_LEN`)
pub const PROP_NAME_LEN: usize = 32;

/// `struct drm_version`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct drm_version {
    pub version_major: c_int,
    pub version_minor: c_int,
    pub version_patchlevel: c_int,
    pub name_len: size_t,
    pub name: *mut c_char,
    pub date_len: size_t,
    pub date: *mut c_char,
    pub desc_len: size_t,
    pub desc: *mut c_char,
}

impl Default for drm_version {
    fn default() -> Self {
        Self {
            version_major: 0,
            version_minor: 0,
            version_patchlevel: 0,
            name_len: 0,
            name: ptr::null_mut(),
            date_len: 0,
            date: ptr::null_mut(),
            desc_len: 0,
            desc: ptr::null_mut(),
        }
    }
}

/// `struct drm_mode_create_dumb`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct drm_mode_create_dumb {
    pub height: u32,
    pub width: u32,
    pub bpp: u32,
    pub flags: u32,
    // Filled in by the kernel
    pub handle: u32,
    pub pitch: u32,
    pub size: u64,
}

/// `struct drm_mode_obj_get_properties`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct drm_mode_obj_get_properties {
    pub props_ptr: u64,
    pub prop_values_ptr: u64,
    pub count_props: u32,
    pub obj_id: u32,
    pub obj_type: u32,
}

/// `struct drm_mode_obj_set_property`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct drm_mode_obj_set_property {
    pub value: u64,
    pub prop_id: u32,
    pub obj_id: u32,
    pub obj_type: u32,
}

/// `struct drm_mode_get_property`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct drm_mode_get_property {
    pub values_ptr: u64,
    pub enum_blob_ptr: u64,
    pub prop_id: u32,
    pub flags: u32,
    pub name: [u8; PROP_NAME_LEN],
    pub count_values: u32,
    pub count_enum_blobs: u32,
}

/// `struct drm_mode_property_enum`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct drm_mode_property_enum {
    pub value: u64,
    pub name: [u8; PROP_NAME_LEN],
}

nix::ioctl_readwrite!(
    /// `DRM_IOCTL_VERSION`
    drm_ioctl_version,
    DRM_IOCTL_BASE,
    0x00,
    drm_version
);

nix::ioctl_readwrite!(
    /// `DRM_IOCTL_MODE_GETPROPERTY`
    drm_ioctl_mode_getproperty,
    DRM_IOCTL_BASE,
    0xAA,
    drm_mode_get_property
);

nix::ioctl_readwrite!(
    /// `DRM_IOCTL_MODE_CREATE_DUMB`
    drm_ioctl_mode_create_dumb,
    DRM_IOCTL_BASE,
    0xB2,
    drm_mode_create_dumb
);

nix::ioctl_readwrite!(
    /// `DRM_IOCTL_MODE_OBJ_GETPROPERTIES`
    drm_ioctl_mode_obj_getproperties,
    DRM_IOCTL_BASE,
    0xB9,
    drm_mode_obj_get_properties
);

nix::ioctl_readwrite!(
    /// `DRM_IOCTL_MODE_OBJ_SETPROPERTY`
    drm_ioctl_mode_obj_setproperty,
    DRM_IOCTL_BASE,
    0xBA,
    drm_mode_obj_set_property
);

assert_eq_size!(drm_mode_create_dumb, [u8; 32]);
assert_eq_size!(drm_mode_obj_get_properties, [u8; 32]);
assert_eq_size!(drm_mode_obj_set_property, [u8; 24]);
assert_eq_size!(drm_mode_get_property, [u8; 64]);
assert_eq_size!(drm_mode_property_enum, [u8; 40]);
#[cfg(target_pointer_width = "64")]
assert_eq_size!(drm_version, [u8; 64]);
