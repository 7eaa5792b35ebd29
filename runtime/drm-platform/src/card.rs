//! Kernel-backed DRM device
//!
//! Wraps an open `/dev/dri/cardN` node and issues the real ioctls.

use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::libc::c_int;

use crate::abi;
use crate::device::{DriverVersion, DrmDevice};
use crate::property::{ObjectProperties, ObjectType, Property, PropertyEnum, PropertyFlags};
use crate::{DrmError, Result};

/// Default primary node on single-GPU boards
pub const DEFAULT_CARD: &str = "/dev/dri/card0";

type IoctlFn<T> = unsafe fn(c_int, *mut T) -> nix::Result<c_int>;

/// An open DRM card node
#[derive(Debug)]
pub struct Card {
    file: File,
    path: PathBuf,
}

impl Card {
    /// Open a DRM node read/write
    ///
    /// # Errors
    /// Returns [`DrmError::Open`] if the node cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| DrmError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!("Opened DRM node {}", path.display());

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Adopt an already open node (e.g. one handed over by the X server)
    pub fn from_file(file: File, path: impl Into<PathBuf>) -> Self {
        Self {
            file,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Issue one ioctl, restarting it while the kernel reports
    /// `EINTR`/`EAGAIN` (same contract as libdrm's `drmIoctl`).
    fn ioctl<T>(&self, request: &'static str, f: IoctlFn<T>, arg: &mut T) -> Result<()> {
        let arg: *mut T = arg;
        loop {
            // SAFETY: `arg` is an exclusively borrowed, initialized value of
            // the exact type `f` was generated for, and every pointer field in
            // it refers to a live buffer of the advertised length.
            match unsafe { f(self.file.as_raw_fd(), arg) } {
                Ok(_) => return Ok(()),
                Err(Errno::EINTR) | Err(Errno::EAGAIN) => {
                    log::debug!("{} interrupted, restarting", request);
                }
                Err(errno) => return Err(DrmError::Ioctl { request, errno }),
            }
        }
    }
}

impl AsFd for Card {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for Card {
    fn as_raw_fd(&self) -> c_int {
        self.file.as_raw_fd()
    }
}

fn lossy(buf: &[u8]) -> String {
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

impl DrmDevice for Card {
    fn version(&self) -> Result<DriverVersion> {
        // First pass sizes the strings, second pass fills them
        let mut arg = abi::drm_version::default();
        self.ioctl("DRM_IOCTL_VERSION", abi::drm_ioctl_version, &mut arg)?;

        let mut name = vec![0u8; arg.name_len];
        let mut date = vec![0u8; arg.date_len];
        let mut desc = vec![0u8; arg.desc_len];
        arg.name = name.as_mut_ptr().cast();
        arg.date = date.as_mut_ptr().cast();
        arg.desc = desc.as_mut_ptr().cast();
        self.ioctl("DRM_IOCTL_VERSION", abi::drm_ioctl_version, &mut arg)?;

        name.truncate(arg.name_len);
        date.truncate(arg.date_len);
        desc.truncate(arg.desc_len);

        Ok(DriverVersion {
            major: arg.version_major,
            minor: arg.version_minor,
            patchlevel: arg.version_patchlevel,
            name: lossy(&name),
            date: lossy(&date),
            desc: lossy(&desc),
        })
    }

    fn object_properties(&self, obj_id: u32, obj_type: ObjectType) -> Result<ObjectProperties> {
        let mut prop_ids: Vec<u32> = Vec::new();
        let mut values: Vec<u64> = Vec::new();

        // The property count can grow between the sizing call and the fill
        // call (hotplug adds connector properties); size again if it did.
        loop {
            let mut arg = abi::drm_mode_obj_get_properties {
                props_ptr: prop_ids.as_mut_ptr() as u64,
                prop_values_ptr: values.as_mut_ptr() as u64,
                count_props: prop_ids.len() as u32,
                obj_id,
                obj_type: obj_type.into(),
            };
            self.ioctl(
                "DRM_IOCTL_MODE_OBJ_GETPROPERTIES",
                abi::drm_ioctl_mode_obj_getproperties,
                &mut arg,
            )?;

            let count = arg.count_props as usize;
            if count <= prop_ids.len() {
                prop_ids.truncate(count);
                values.truncate(count);
                return Ok(ObjectProperties { prop_ids, values });
            }

            prop_ids = vec![0; count];
            values = vec![0; count];
        }
    }

    fn property(&self, prop_id: u32) -> Result<Property> {
        let mut arg = abi::drm_mode_get_property {
            prop_id,
            ..Default::default()
        };
        self.ioctl(
            "DRM_IOCTL_MODE_GETPROPERTY",
            abi::drm_ioctl_mode_getproperty,
            &mut arg,
        )?;

        let flags = PropertyFlags::from_bits_retain(arg.flags);
        let mut values = vec![0u64; arg.count_values as usize];
        let mut enums = if flags.intersects(PropertyFlags::ENUM | PropertyFlags::BITMASK) {
            vec![abi::drm_mode_property_enum::default(); arg.count_enum_blobs as usize]
        } else {
            Vec::new()
        };

        arg.values_ptr = values.as_mut_ptr() as u64;
        arg.count_values = values.len() as u32;
        arg.enum_blob_ptr = enums.as_mut_ptr() as u64;
        arg.count_enum_blobs = enums.len() as u32;
        self.ioctl(
            "DRM_IOCTL_MODE_GETPROPERTY",
            abi::drm_ioctl_mode_getproperty,
            &mut arg,
        )?;

        values.truncate(arg.count_values as usize);
        enums.truncate(arg.count_enum_blobs as usize);

        Ok(Property {
            prop_id: arg.prop_id,
            flags,
            name: arg.name,
            values,
            enums: enums
                .into_iter()
                .map(|e| PropertyEnum {
                    value: e.value,
                    name: e.name,
                })
                .collect(),
        })
    }

    fn set_object_property(
        &self,
        obj_id: u32,
        obj_type: ObjectType,
        prop_id: u32,
        value: u64,
    ) -> Result<()> {
        let mut arg = abi::drm_mode_obj_set_property {
            value,
            prop_id,
            obj_id,
            obj_type: obj_type.into(),
        };
        self.ioctl(
            "DRM_IOCTL_MODE_OBJ_SETPROPERTY",
            abi::drm_ioctl_mode_obj_setproperty,
            &mut arg,
        )
    }

    fn create_dumb(&self, create: &mut abi::drm_mode_create_dumb) -> Result<()> {
        self.ioctl(
            "DRM_IOCTL_MODE_CREATE_DUMB",
            abi::drm_ioctl_mode_create_dumb,
            create,
        )
    }
}
