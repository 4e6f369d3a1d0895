//! `.npy` Persistence for Volumes and Masks
//!
//! Volumes exported from a DICOM reader arrive in whatever dtype the series was
//! stored in, so loading tries the common voxel types in turn.

use std::path::Path;

use ndarray::Array3;
use ndarray_npy::{read_npy, write_npy, ReadNpyError};
use tracing::debug;

use crate::error::VolumeError;
use crate::volume::{Mask, Volume};

type NpyReader<T> = fn(&Path) -> Result<T, ReadNpyError>;

/// Try each dtype in turn; only a descriptor mismatch moves on to the next one
fn read_first_matching<T>(
    path: &Path,
    kind: &str,
    readers: &[(&str, NpyReader<T>)],
) -> Result<T, VolumeError> {
    let mut mismatch = String::new();
    for (_, reader) in readers {
        match reader(path) {
            Ok(value) => return Ok(value),
            Err(err @ ReadNpyError::WrongDescriptor(_)) => mismatch = err.to_string(),
            Err(err) => {
                return Err(VolumeError::Read {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })
            }
        }
    }

    let supported: Vec<&str> = readers.iter().map(|(name, _)| *name).collect();
    Err(VolumeError::Read {
        path: path.to_path_buf(),
        reason: format!(
            "{}; supported {} dtypes: {}",
            mismatch,
            kind,
            supported.join(", ")
        ),
    })
}

/// Load a volume stored as `f64`, `f32`, `i32`, `i16`, `u16` or `u8`
pub fn load_volume(path: impl AsRef<Path>) -> Result<Volume, VolumeError> {
    let path = path.as_ref();
    let readers: [(&str, NpyReader<Array3<f64>>); 6] = [
        ("f64", |p: &Path| read_npy::<_, Array3<f64>>(p)),
        ("f32", |p: &Path| read_npy::<_, Array3<f32>>(p).map(|a| a.mapv(f64::from))),
        ("i32", |p: &Path| read_npy::<_, Array3<i32>>(p).map(|a| a.mapv(f64::from))),
        ("i16", |p: &Path| read_npy::<_, Array3<i16>>(p).map(|a| a.mapv(f64::from))),
        ("u16", |p: &Path| read_npy::<_, Array3<u16>>(p).map(|a| a.mapv(f64::from))),
        ("u8", |p: &Path| read_npy::<_, Array3<u8>>(p).map(|a| a.mapv(f64::from))),
    ];
    let data = read_first_matching(path, "volume", &readers)?;

    debug!("Loaded volume {} with shape {:?}", path.display(), data.dim());
    Ok(Volume::new(data))
}

/// Load a mask stored as `bool` or any integer/float dtype; non-zero voxels are inside
pub fn load_mask(path: impl AsRef<Path>) -> Result<Mask, VolumeError> {
    let path = path.as_ref();
    let readers: [(&str, NpyReader<Mask>); 7] = [
        ("bool", |p: &Path| read_npy::<_, Array3<bool>>(p).map(Mask::new)),
        ("u8", |p: &Path| read_npy::<_, Array3<u8>>(p).map(|a| Mask::from_values(&a))),
        ("i16", |p: &Path| read_npy::<_, Array3<i16>>(p).map(|a| Mask::from_values(&a))),
        ("u16", |p: &Path| read_npy::<_, Array3<u16>>(p).map(|a| Mask::from_values(&a))),
        ("i32", |p: &Path| read_npy::<_, Array3<i32>>(p).map(|a| Mask::from_values(&a))),
        ("f32", |p: &Path| read_npy::<_, Array3<f32>>(p).map(|a| Mask::from_values(&a))),
        ("f64", |p: &Path| read_npy::<_, Array3<f64>>(p).map(|a| Mask::from_values(&a))),
    ];
    let mask = read_first_matching(path, "mask", &readers)?;

    debug!(
        "Loaded mask {} with shape {:?}, {} voxels selected",
        path.display(),
        mask.shape(),
        mask.count()
    );
    Ok(mask)
}

/// Write a volume as `f64`
pub fn save_volume(path: impl AsRef<Path>, volume: &Volume) -> Result<(), VolumeError> {
    let path = path.as_ref();
    write_npy(path, volume.data()).map_err(|e| VolumeError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write a mask as 0/1 `u8`
pub fn save_mask(path: impl AsRef<Path>, mask: &Mask) -> Result<(), VolumeError> {
    let path = path.as_ref();
    write_npy(path, &mask.to_u8()).map_err(|e| VolumeError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
