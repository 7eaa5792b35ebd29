//! KMS object properties
//!
//! Owned, safe views of what `DRM_IOCTL_MODE_OBJ_GETPROPERTIES` and
//! `DRM_IOCTL_MODE_GETPROPERTY` return. Values are plain owned data: dropping
//! them is all the releasing they need.

use std::borrow::Cow;

use crate::abi::PROP_NAME_LEN;

/// Kind of mode object a property is attached to (`DRM_MODE_OBJECT_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ObjectType {
    Any = 0,
    Crtc = 0xcccc_cccc,
    Connector = 0xc0c0_c0c0,
    Encoder = 0xe0e0_e0e0,
    Mode = 0xdede_dede,
    Property = 0xb0b0_b0b0,
    Framebuffer = 0xfbfb_fbfb,
    Blob = 0xbbbb_bbbb,
    Plane = 0xeeee_eeee,
}

impl From<ObjectType> for u32 {
    fn from(ty: ObjectType) -> Self {
        ty as u32
    }
}

bitflags::bitflags! {
    /// Property flags (`DRM_MODE_PROP_*`)
    ///
    /// The low bits are the legacy one-hot type bits; the extended types are
    /// a small integer packed into `EXTENDED_TYPE`.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u32 {
        const PENDING = 1 << 0;
        const RANGE = 1 << 1;
        const IMMUTABLE = 1 << 2;
        const ENUM = 1 << 3;
        const BLOB = 1 << 4;
        const BITMASK = 1 << 5;
        const LEGACY_TYPE = Self::RANGE.bits()
            | Self::ENUM.bits()
            | Self::BLOB.bits()
            | Self::BITMASK.bits();

        const OBJECT = 1 << 6;
        const SIGNED_RANGE = 2 << 6;
        const EXTENDED_TYPE = 0x0000_ffc0;

        const ATOMIC = 0x8000_0000;
    }
}

impl PropertyFlags {
    /// Type test with `drm_property_type_is()` semantics
    ///
    /// A property carrying an extended type only matches that exact
    /// extended type; otherwise the legacy bit of `kind` is tested.
    pub fn type_is(self, kind: PropertyFlags) -> bool {
        if self.intersects(Self::EXTENDED_TYPE) {
            (self & Self::EXTENDED_TYPE) == kind
        } else {
            self.intersects(kind)
        }
    }
}

/// Compare a kernel-reported fixed-size name against `wanted`
///
/// Behaves like `strncmp(raw, wanted, PROP_NAME_LEN) == 0`: at most
/// `PROP_NAME_LEN` bytes take part and a NUL ends the raw name early.
pub fn property_name_eq(raw: &[u8; PROP_NAME_LEN], wanted: &str) -> bool {
    let raw_len = raw.iter().position(|&b| b == 0).unwrap_or(PROP_NAME_LEN);
    let wanted = wanted.as_bytes();
    let wanted = &wanted[..wanted.len().min(PROP_NAME_LEN)];
    &raw[..raw_len] == wanted
}

/// Encode `name` into a fixed-size, NUL-padded property name
///
/// Names longer than `PROP_NAME_LEN` are cut at the bound.
pub fn encode_name(name: &str) -> [u8; PROP_NAME_LEN] {
    let mut raw = [0u8; PROP_NAME_LEN];
    let len = name.len().min(PROP_NAME_LEN);
    raw[..len].copy_from_slice(&name.as_bytes()[..len]);
    raw
}

/// One named value of an enum or bitmask property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyEnum {
    pub value: u64,
    pub name: [u8; PROP_NAME_LEN],
}

/// Full metadata of a single property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub prop_id: u32,
    pub flags: PropertyFlags,
    pub name: [u8; PROP_NAME_LEN],
    /// For range properties: `[min, max]`
    pub values: Vec<u64>,
    pub enums: Vec<PropertyEnum>,
}

impl Property {
    pub fn new(prop_id: u32, name: &str, flags: PropertyFlags, values: Vec<u64>) -> Self {
        Self {
            prop_id,
            flags,
            name: encode_name(name),
            values,
            enums: Vec::new(),
        }
    }

    /// Name up to the first NUL, lossily decoded
    pub fn name(&self) -> Cow<'_, str> {
        let len = self.name.iter().position(|&b| b == 0).unwrap_or(PROP_NAME_LEN);
        String::from_utf8_lossy(&self.name[..len])
    }

    pub fn name_is(&self, wanted: &str) -> bool {
        property_name_eq(&self.name, wanted)
    }

    pub fn type_is(&self, kind: PropertyFlags) -> bool {
        self.flags.type_is(kind)
    }

    pub fn count_values(&self) -> usize {
        self.values.len()
    }
}

/// Property ids and current values attached to one object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectProperties {
    pub prop_ids: Vec<u32>,
    pub values: Vec<u64>,
}

impl ObjectProperties {
    pub fn len(&self) -> usize {
        self.prop_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prop_ids.is_empty()
    }

    /// `(prop_id, value)` pairs in kernel order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.prop_ids.iter().copied().zip(self.values.iter().copied())
    }
}
