//! Plane helpers shared by backends

use drm_platform::{DrmDevice, ObjectType, Property, PropertyFlags};

/// Name of the plane z-order property
pub const ZPOS: &str = "zpos";

/// A `zpos` range property exposing exactly `[min, max]`
fn is_zpos_range(prop: &Property) -> bool {
    prop.name_is(ZPOS) && prop.type_is(PropertyFlags::RANGE) && prop.count_values() == 2
}

/// Raise a plane to the top of the compositing order
///
/// Sets every `zpos` range property on `plane_id` to its upper bound. This
/// is advisory: a failed enumeration, fetch or write leaves the plane as it
/// was and is never reported to the caller.
pub fn raise_to_max_zpos(dev: &dyn DrmDevice, plane_id: u32) {
    let Ok(props) = dev.object_properties(plane_id, ObjectType::Plane) else {
        return;
    };

    for (prop_id, _) in props.iter() {
        let Ok(prop) = dev.property(prop_id) else {
            continue;
        };

        if !is_zpos_range(&prop) {
            continue;
        }

        let max = prop.values[1];
        log::info!("Setting zpos for cursor plane {} to {}", plane_id, max);
        if let Err(e) = dev.set_object_property(plane_id, ObjectType::Plane, prop.prop_id, max) {
            log::warn!("Failed to set zpos on plane {}: {}", plane_id, e);
        }
    }
}
