//! ⚠️  MOCK DRM device for backend testing
//!
//! # WARNING: This is NOT a kernel driver!
//!
//! An in-memory stand-in for an open `/dev/dri/cardN` node. It lets backend
//! callbacks run on any host, without a display controller.
//!
//! ## What it models
//!
//! - A driver identity for `DRM_IOCTL_VERSION`
//! - Mode objects (planes, CRTCs, ...) with attached properties and values
//! - A dumb-buffer allocator with kernel-like argument validation
//! - Per-operation fault injection
//! - A log of every call, in order, for asserting on side effects
//!
//! ## Usage
//!
//! ```rust
//! use drm_mock::{range_property, MockDrm};
//! use drm_platform::{DrmDevice, ObjectType};
//!
//! let drm = MockDrm::new("sun4i-drm").with_object_property(31, range_property(5, "zpos", 0, 3), 0);
//! let props = drm.object_properties(31, ObjectType::Plane).unwrap();
//! assert_eq!(props.len(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use drm_platform::{
    drm_mode_create_dumb, DriverVersion, DrmDevice, DrmError, Errno, ObjectProperties,
    ObjectType, Property, PropertyFlags, Result,
};

/// One recorded device operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Version,
    ObjectProperties {
        obj_id: u32,
        obj_type: ObjectType,
    },
    Property {
        prop_id: u32,
    },
    SetObjectProperty {
        obj_id: u32,
        obj_type: ObjectType,
        prop_id: u32,
        value: u64,
    },
    CreateDumb {
        bpp: u32,
        width: u32,
        height: u32,
    },
}

/// Errors to inject, keyed by operation
#[derive(Debug, Default)]
struct Faults {
    version: Option<Errno>,
    object_properties: Option<Errno>,
    property: HashMap<u32, Errno>,
    set_object_property: Option<Errno>,
    create_dumb: Option<Errno>,
}

/// A mode object and the properties attached to it
#[derive(Debug, Default)]
struct MockObject {
    obj_type: Option<ObjectType>,
    /// `(prop_id, current value)` in attach order
    props: Vec<(u32, u64)>,
}

/// Scripted DRM device
#[derive(Debug)]
pub struct MockDrm {
    version: DriverVersion,
    objects: RefCell<HashMap<u32, MockObject>>,
    properties: HashMap<u32, Property>,
    faults: Faults,
    pitch_align: u32,
    next_handle: Cell<u32>,
    calls: RefCell<Vec<Call>>,
}

impl MockDrm {
    /// Create a device reporting `driver_name` from `DRM_IOCTL_VERSION`
    pub fn new(driver_name: &str) -> Self {
        Self {
            version: DriverVersion {
                major: 1,
                minor: 0,
                patchlevel: 0,
                name: driver_name.to_owned(),
                date: "20150629".to_owned(),
                desc: format!("{driver_name} (mock)"),
            },
            objects: RefCell::new(HashMap::new()),
            properties: HashMap::new(),
            faults: Faults::default(),
            pitch_align: 1,
            next_handle: Cell::new(1),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Attach `property` to object `obj_id` with an initial value
    ///
    /// The property is registered globally by its id; attaching the same
    /// property to several objects shares the metadata.
    pub fn with_object_property(mut self, obj_id: u32, property: Property, value: u64) -> Self {
        self.objects
            .get_mut()
            .entry(obj_id)
            .or_default()
            .props
            .push((property.prop_id, value));
        self.properties.insert(property.prop_id, property);
        self
    }

    /// Declare an object with no properties
    ///
    /// When a type is given, enumeration with a different non-`Any` type
    /// fails with `ENOENT` like the kernel lookup does.
    pub fn with_object(mut self, obj_id: u32, obj_type: ObjectType) -> Self {
        self.objects.get_mut().entry(obj_id).or_default().obj_type = Some(obj_type);
        self
    }

    /// Declare a plane (shorthand for `with_object(id, ObjectType::Plane)`)
    pub fn with_plane(self, plane_id: u32) -> Self {
        self.with_object(plane_id, ObjectType::Plane)
    }

    /// Round dumb-buffer pitches up to a multiple of `align` bytes
    pub fn with_pitch_alignment(mut self, align: u32) -> Self {
        self.pitch_align = align.max(1);
        self
    }

    pub fn fail_version(mut self, errno: Errno) -> Self {
        self.faults.version = Some(errno);
        self
    }

    pub fn fail_object_properties(mut self, errno: Errno) -> Self {
        self.faults.object_properties = Some(errno);
        self
    }

    pub fn fail_property(mut self, prop_id: u32, errno: Errno) -> Self {
        self.faults.property.insert(prop_id, errno);
        self
    }

    pub fn fail_set_object_property(mut self, errno: Errno) -> Self {
        self.faults.set_object_property = Some(errno);
        self
    }

    pub fn fail_create_dumb(mut self, errno: Errno) -> Self {
        self.faults.create_dumb = Some(errno);
        self
    }

    /// Every operation issued so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Only the property writes issued so far
    pub fn set_property_calls(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::SetObjectProperty { .. }))
            .cloned()
            .collect()
    }

    /// Current value of a property on an object
    pub fn property_value(&self, obj_id: u32, prop_id: u32) -> Option<u64> {
        self.objects
            .borrow()
            .get(&obj_id)?
            .props
            .iter()
            .find(|(id, _)| *id == prop_id)
            .map(|(_, value)| *value)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn fail(request: &'static str, errno: Errno) -> DrmError {
        log::debug!("mock: injecting {} for {}", errno, request);
        DrmError::Ioctl { request, errno }
    }

    fn type_matches(object: &MockObject, obj_type: ObjectType) -> bool {
        match (object.obj_type, obj_type) {
            (_, ObjectType::Any) | (None, _) => true,
            (Some(have), want) => have == want,
        }
    }
}

impl DrmDevice for MockDrm {
    fn version(&self) -> Result<DriverVersion> {
        self.record(Call::Version);
        if let Some(errno) = self.faults.version {
            return Err(Self::fail("DRM_IOCTL_VERSION", errno));
        }
        Ok(self.version.clone())
    }

    fn object_properties(&self, obj_id: u32, obj_type: ObjectType) -> Result<ObjectProperties> {
        const REQUEST: &str = "DRM_IOCTL_MODE_OBJ_GETPROPERTIES";

        self.record(Call::ObjectProperties { obj_id, obj_type });
        if let Some(errno) = self.faults.object_properties {
            return Err(Self::fail(REQUEST, errno));
        }

        let objects = self.objects.borrow();
        let object = objects
            .get(&obj_id)
            .filter(|o| Self::type_matches(o, obj_type))
            .ok_or(DrmError::Ioctl {
                request: REQUEST,
                errno: Errno::ENOENT,
            })?;

        Ok(ObjectProperties {
            prop_ids: object.props.iter().map(|(id, _)| *id).collect(),
            values: object.props.iter().map(|(_, value)| *value).collect(),
        })
    }

    fn property(&self, prop_id: u32) -> Result<Property> {
        const REQUEST: &str = "DRM_IOCTL_MODE_GETPROPERTY";

        self.record(Call::Property { prop_id });
        if let Some(errno) = self.faults.property.get(&prop_id) {
            return Err(Self::fail(REQUEST, *errno));
        }

        self.properties.get(&prop_id).cloned().ok_or(DrmError::Ioctl {
            request: REQUEST,
            errno: Errno::ENOENT,
        })
    }

    fn set_object_property(
        &self,
        obj_id: u32,
        obj_type: ObjectType,
        prop_id: u32,
        value: u64,
    ) -> Result<()> {
        const REQUEST: &str = "DRM_IOCTL_MODE_OBJ_SETPROPERTY";

        self.record(Call::SetObjectProperty {
            obj_id,
            obj_type,
            prop_id,
            value,
        });
        if let Some(errno) = self.faults.set_object_property {
            return Err(Self::fail(REQUEST, errno));
        }

        let mut objects = self.objects.borrow_mut();
        let slot = objects
            .get_mut(&obj_id)
            .filter(|o| Self::type_matches(o, obj_type))
            .and_then(|o| o.props.iter_mut().find(|(id, _)| *id == prop_id))
            .ok_or(DrmError::Ioctl {
                request: REQUEST,
                errno: Errno::ENOENT,
            })?;

        // Range properties reject out-of-bounds values
        if let Some(prop) = self.properties.get(&prop_id) {
            if prop.type_is(PropertyFlags::RANGE)
                && prop.values.len() == 2
                && !(prop.values[0]..=prop.values[1]).contains(&value)
            {
                return Err(DrmError::Ioctl {
                    request: REQUEST,
                    errno: Errno::EINVAL,
                });
            }
        }

        slot.1 = value;
        Ok(())
    }

    fn create_dumb(&self, create: &mut drm_mode_create_dumb) -> Result<()> {
        const REQUEST: &str = "DRM_IOCTL_MODE_CREATE_DUMB";

        self.record(Call::CreateDumb {
            bpp: create.bpp,
            width: create.width,
            height: create.height,
        });
        if let Some(errno) = self.faults.create_dumb {
            return Err(Self::fail(REQUEST, errno));
        }

        // Same argument checks as drm_mode_create_dumb() in the kernel
        if create.width == 0 || create.height == 0 || create.bpp == 0 || create.flags != 0 {
            return Err(DrmError::Ioctl {
                request: REQUEST,
                errno: Errno::EINVAL,
            });
        }

        let row = (u64::from(create.width) * u64::from(create.bpp)).div_ceil(8);
        let pitch = row.next_multiple_of(u64::from(self.pitch_align));
        let pitch = u32::try_from(pitch).map_err(|_| DrmError::Ioctl {
            request: REQUEST,
            errno: Errno::EINVAL,
        })?;

        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);

        create.handle = handle;
        create.pitch = pitch;
        create.size = u64::from(pitch) * u64::from(create.height);
        Ok(())
    }
}

/// A range property with bounds `[min, max]`
pub fn range_property(prop_id: u32, name: &str, min: u64, max: u64) -> Property {
    Property::new(prop_id, name, PropertyFlags::RANGE, vec![min, max])
}

/// A property with arbitrary flags and values
pub fn property(prop_id: u32, name: &str, flags: PropertyFlags, values: Vec<u64>) -> Property {
    Property::new(prop_id, name, flags, values)
}
