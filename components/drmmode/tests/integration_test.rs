//! Integration tests for the sun4i backend
//!
//! These drive the backend callbacks the way the host driver does:
//! - Backend selection from the device's reported driver name
//! - Cursor plane setup against various property layouts
//! - Dumb-buffer creation, including allocator failures

use armsoc_drmmode::sun4i::SUN4I;
use armsoc_drmmode::*;
use drm_mock::{property, range_property, Call, MockDrm};
use drm_platform::{DrmDevice, Errno, ObjectType, PropertyFlags};

const CURSOR_PLANE: u32 = 31;
const ZPOS_ID: u32 = 12;

/// Typical sun4i cursor plane: type enum, zpos range, a couple of others
fn cursor_plane(min: u64, max: u64) -> MockDrm {
    MockDrm::new("sun4i-drm")
        .with_plane(CURSOR_PLANE)
        .with_object_property(
            CURSOR_PLANE,
            property(10, "type", PropertyFlags::ENUM | PropertyFlags::IMMUTABLE, vec![0, 1, 2]),
            2,
        )
        .with_object_property(CURSOR_PLANE, range_property(11, "CRTC_X", 0, i32::MAX as u64), 0)
        .with_object_property(CURSOR_PLANE, range_property(ZPOS_ID, "zpos", min, max), min)
        .with_object_property(CURSOR_PLANE, property(13, "FB_ID", PropertyFlags::OBJECT, vec![]), 0)
}

/// Test the zpos range's upper bound is written exactly once
#[test]
fn test_cursor_zpos_set_to_max() {
    let drm = cursor_plane(1, 3);

    SUN4I
        .init_plane_for_cursor(&drm, CURSOR_PLANE)
        .expect("cursor plane setup never fails");

    assert_eq!(
        drm.set_property_calls(),
        vec![Call::SetObjectProperty {
            obj_id: CURSOR_PLANE,
            obj_type: ObjectType::Plane,
            prop_id: ZPOS_ID,
            value: 3,
        }]
    );
    assert_eq!(drm.property_value(CURSOR_PLANE, ZPOS_ID), Some(3));
}

/// Test the value written is always the reported maximum, whatever the range
#[test]
fn test_cursor_zpos_follows_reported_range() {
    for (lo, hi) in [(0, 0), (0, 1), (2, 5), (0, u64::from(u32::MAX))] {
        let drm = cursor_plane(lo, hi);
        SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).unwrap();

        let writes = drm.set_property_calls();
        assert_eq!(writes.len(), 1, "range [{lo}, {hi}]");
        assert!(matches!(
            writes[0],
            Call::SetObjectProperty { value, .. } if value == hi
        ));
    }
}

/// Test planes without a zpos property are left untouched
#[test]
fn test_no_zpos_property() {
    let drm = MockDrm::new("sun4i-drm")
        .with_plane(CURSOR_PLANE)
        .with_object_property(CURSOR_PLANE, range_property(11, "CRTC_X", 0, 4096), 0)
        .with_object_property(CURSOR_PLANE, range_property(14, "ZPOS", 0, 3), 0)
        .with_object_property(CURSOR_PLANE, range_property(15, "zpos_offset", 0, 3), 0);

    assert!(SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).is_ok());
    assert!(drm.set_property_calls().is_empty());
}

/// Test a plane with no properties at all
#[test]
fn test_plane_without_properties() {
    let drm = MockDrm::new("sun4i-drm").with_plane(CURSOR_PLANE);

    assert!(SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).is_ok());
    assert_eq!(
        drm.calls(),
        vec![Call::ObjectProperties {
            obj_id: CURSOR_PLANE,
            obj_type: ObjectType::Plane,
        }]
    );
}

/// Test zpos of the wrong type or arity is ignored
#[test]
fn test_zpos_wrong_shape_ignored() {
    let layouts = [
        property(ZPOS_ID, "zpos", PropertyFlags::ENUM, vec![0, 3]),
        property(ZPOS_ID, "zpos", PropertyFlags::SIGNED_RANGE, vec![0, 3]),
        property(
            ZPOS_ID,
            "zpos",
            PropertyFlags::RANGE | PropertyFlags::SIGNED_RANGE,
            vec![0, 3],
        ),
        property(ZPOS_ID, "zpos", PropertyFlags::RANGE | PropertyFlags::OBJECT, vec![0, 3]),
        property(ZPOS_ID, "zpos", PropertyFlags::RANGE, vec![3]),
        property(ZPOS_ID, "zpos", PropertyFlags::RANGE, vec![0, 1, 3]),
        property(ZPOS_ID, "zpos", PropertyFlags::RANGE, vec![]),
    ];

    for prop in layouts {
        let drm = MockDrm::new("sun4i-drm")
            .with_plane(CURSOR_PLANE)
            .with_object_property(CURSOR_PLANE, prop.clone(), 0);

        assert!(SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).is_ok());
        assert!(drm.set_property_calls().is_empty(), "{prop:?}");
    }
}

/// Test an immutable zpos range still counts as a range
#[test]
fn test_immutable_zpos_range_matches() {
    let drm = MockDrm::new("sun4i-drm").with_plane(CURSOR_PLANE).with_object_property(
        CURSOR_PLANE,
        property(
            ZPOS_ID,
            "zpos",
            PropertyFlags::RANGE | PropertyFlags::IMMUTABLE | PropertyFlags::ATOMIC,
            vec![4, 4],
        ),
        4,
    );

    SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).unwrap();
    assert_eq!(drm.set_property_calls().len(), 1);
}

/// Test the scan keeps going after the first zpos match
#[test]
fn test_every_zpos_range_is_raised() {
    let drm = MockDrm::new("sun4i-drm")
        .with_plane(CURSOR_PLANE)
        .with_object_property(CURSOR_PLANE, range_property(ZPOS_ID, "zpos", 0, 3), 0)
        .with_object_property(CURSOR_PLANE, range_property(11, "CRTC_X", 0, 4096), 0)
        .with_object_property(CURSOR_PLANE, range_property(16, "zpos", 1, 5), 1);

    SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).unwrap();

    assert_eq!(
        drm.set_property_calls(),
        vec![
            Call::SetObjectProperty {
                obj_id: CURSOR_PLANE,
                obj_type: ObjectType::Plane,
                prop_id: ZPOS_ID,
                value: 3,
            },
            Call::SetObjectProperty {
                obj_id: CURSOR_PLANE,
                obj_type: ObjectType::Plane,
                prop_id: 16,
                value: 5,
            },
        ]
    );
    assert_eq!(drm.property_value(CURSOR_PLANE, 16), Some(5));
}

/// Test enumeration failure is swallowed with no further device calls
#[test]
fn test_enumeration_failure_is_silent() {
    let drm = cursor_plane(0, 3).fail_object_properties(Errno::EIO);

    assert!(SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).is_ok());
    assert_eq!(
        drm.calls(),
        vec![Call::ObjectProperties {
            obj_id: CURSOR_PLANE,
            obj_type: ObjectType::Plane,
        }]
    );
}

/// Test an unknown plane id behaves like a failed enumeration
#[test]
fn test_unknown_plane() {
    let drm = cursor_plane(0, 3);

    assert!(SUN4I.init_plane_for_cursor(&drm, 999).is_ok());
    assert!(drm.set_property_calls().is_empty());
    assert_eq!(drm.calls().len(), 1);
}

/// Test a property that cannot be fetched is skipped, the rest still scanned
#[test]
fn test_property_fetch_failure_skips_entry() {
    let drm = cursor_plane(0, 3).fail_property(10, Errno::ENOENT);

    SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).unwrap();

    let fetched: Vec<_> = drm
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Property { prop_id } => Some(prop_id),
            _ => None,
        })
        .collect();
    assert_eq!(fetched, vec![10, 11, ZPOS_ID, 13]);
    assert_eq!(drm.set_property_calls().len(), 1);
}

/// Test a rejected zpos write does not fail the caller
#[test]
fn test_set_failure_is_advisory() {
    let drm = cursor_plane(0, 3).fail_set_object_property(Errno::EBUSY);

    assert!(SUN4I.init_plane_for_cursor(&drm, CURSOR_PLANE).is_ok());
    assert_eq!(drm.set_property_calls().len(), 1);
    assert_eq!(drm.property_value(CURSOR_PLANE, ZPOS_ID), Some(0));
}

/// Test a 1080p XRGB8888 buffer is created with the allocator's results
#[test]
fn test_create_custom_gem() {
    let drm = MockDrm::new("sun4i-drm").with_pitch_alignment(64);

    let buffer = SUN4I
        .create_custom_gem(&drm, &CreateGem::new(32, 1920, 1080))
        .expect("allocation succeeds");

    assert_eq!(buffer.handle, 1);
    assert_eq!(buffer.pitch, 1920 * 4);
    assert_eq!(buffer.size, 1920 * 4 * 1080);
    assert_eq!(
        drm.calls(),
        vec![Call::CreateDumb {
            bpp: 32,
            width: 1920,
            height: 1080,
        }]
    );
}

/// Test handle and pitch come from the device, not from local arithmetic
#[test]
fn test_create_custom_gem_uses_device_pitch() {
    let drm = MockDrm::new("sun4i-drm").with_pitch_alignment(256);

    let first = SUN4I
        .create_custom_gem(&drm, &CreateGem::new(16, 100, 10))
        .unwrap();
    let second = SUN4I
        .create_custom_gem(
            &drm,
            &CreateGem {
                buf_type: BufferType::NonScanout,
                ..CreateGem::new(16, 100, 10)
            },
        )
        .unwrap();

    assert_eq!(first.pitch, 256);
    assert_eq!(first.size, 2560);
    assert_ne!(first.handle, second.handle);
}

/// Test an allocator failure is returned with its code unchanged
#[test]
fn test_create_custom_gem_failure() {
    let drm = MockDrm::new("sun4i-drm").fail_create_dumb(Errno::ENOMEM);

    let err = SUN4I
        .create_custom_gem(&drm, &CreateGem::new(32, 1920, 1080))
        .unwrap_err();

    assert!(matches!(err, DrmModeError::Device(_)));
    assert_eq!(err.errno(), Some(Errno::ENOMEM));
}

/// Test kernel-side argument rejection propagates
#[test]
fn test_create_custom_gem_invalid_arguments() {
    let drm = MockDrm::new("sun4i-drm");

    let err = SUN4I
        .create_custom_gem(&drm, &CreateGem::new(0, 1920, 1080))
        .unwrap_err();
    assert_eq!(err.errno(), Some(Errno::EINVAL));
}

/// Test the backend is selected from the reported driver name
#[test]
fn test_backend_selection() {
    let drm = MockDrm::new("sun4i-drm");

    let iface = interface_for_device(&drm).expect("sun4i is compiled in");
    assert_eq!(iface.name(), "sun4i-drm");
    assert_eq!(drm.calls(), vec![Call::Version]);
}

/// Test an unknown kernel driver is reported, not guessed
#[test]
fn test_backend_selection_unknown_driver() {
    let drm = MockDrm::new("vc4");

    let result = interface_for_device(&drm);
    assert!(matches!(
        result,
        Err(DrmModeError::UnsupportedDriver { ref name }) if name == "vc4"
    ));
}

/// Test a failed version query propagates the device error
#[test]
fn test_backend_selection_version_failure() {
    let drm = MockDrm::new("sun4i-drm").fail_version(Errno::EACCES);

    match interface_for_device(&drm) {
        Err(e) => assert_eq!(e.errno(), Some(Errno::EACCES)),
        Ok(_) => panic!("version failure must not select a backend"),
    }
}

/// Test every compiled-in backend describes a sane cursor
#[test]
fn test_descriptor_through_registry() {
    for iface in interfaces() {
        let desc = iface.descriptor();
        assert_eq!(desc.driver_name, iface.name());
        if desc.cursor_api == CursorApi::Plane {
            assert!(desc.cursor.width > 0 && desc.cursor.height > 0);
        }
    }

    let sun4i = find_interface("sun4i-drm").ok().map(|i| i.descriptor());
    assert_eq!(
        sun4i.map(|d| d.cursor),
        Some(CursorGeometry {
            width: 64,
            height: 64,
            padding: 0,
        })
    );
}

/// Test the callbacks work through a trait object, as the host holds them
#[test]
fn test_dynamic_dispatch() {
    let drm = cursor_plane(0, 2);
    let dev: &dyn DrmDevice = &drm;
    let iface: &dyn DrmModeInterface = &SUN4I;

    iface.init_plane_for_cursor(dev, CURSOR_PLANE).unwrap();
    let buffer = iface
        .create_custom_gem(dev, &CreateGem::new(32, 64, 64))
        .unwrap();

    assert_eq!(drm.property_value(CURSOR_PLANE, ZPOS_ID), Some(2));
    assert_eq!(buffer.size, 64 * 64 * 4);
}
