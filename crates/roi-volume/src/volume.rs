//! Volume, Mask and MaskedVolume

use ndarray::{Array3, Zip};

use crate::error::VolumeError;
use crate::Shape3;

/// Verify that a volume and a mask are co-registered
pub fn check_shapes(volume: &Volume, mask: &Mask) -> Result<(), VolumeError> {
    if volume.shape() != mask.shape() {
        return Err(VolumeError::ShapeMismatch {
            volume: volume.shape(),
            mask: mask.shape(),
        });
    }
    Ok(())
}

/// Real-valued 3-D intensity volume
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    data: Array3<f64>,
}

impl Volume {
    /// Wrap an existing array
    pub fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// Volume of zeros
    pub fn zeros(shape: Shape3) -> Self {
        Self::new(Array3::zeros(shape))
    }

    /// Build a volume by evaluating `f` at every (z, y, x) index
    pub fn from_shape_fn<F>(shape: Shape3, f: F) -> Self
    where
        F: FnMut(Shape3) -> f64,
    {
        Self::new(Array3::from_shape_fn(shape, f))
    }

    /// Shape as (nz, ny, nx)
    pub fn shape(&self) -> Shape3 {
        self.data.dim()
    }

    /// Number of voxels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when any axis has length zero
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Underlying intensities
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Copy of the volume with every intensity multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.data.mapv(|v| v * factor))
    }

    /// Zero every voxel outside the mask
    pub fn masked(&self, mask: &Mask) -> Result<MaskedVolume, VolumeError> {
        check_shapes(self, mask)?;
        let data = Zip::from(&self.data)
            .and(&mask.data)
            .map_collect(|&v, &inside| if inside { v } else { 0.0 });
        Ok(MaskedVolume {
            data,
            voxel_count: mask.count(),
        })
    }

    /// Intensities of the voxels selected by the mask, in row-major order
    pub fn roi_values(&self, mask: &Mask) -> Result<Vec<f64>, VolumeError> {
        check_shapes(self, mask)?;
        let values = self
            .data
            .iter()
            .zip(mask.data.iter())
            .filter_map(|(&v, &inside)| inside.then_some(v))
            .collect();
        Ok(values)
    }
}

impl From<Array3<f64>> for Volume {
    fn from(data: Array3<f64>) -> Self {
        Self::new(data)
    }
}

/// Binary region-of-interest mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    data: Array3<bool>,
}

impl Mask {
    pub fn new(data: Array3<bool>) -> Self {
        Self { data }
    }

    /// Interpret any numeric array as a mask: non-zero elements are inside
    pub fn from_values<A>(values: &Array3<A>) -> Self
    where
        A: Copy + Default + PartialEq,
    {
        let zero = A::default();
        Self::new(values.mapv(|v| v != zero))
    }

    /// Build a mask by evaluating `f` at every (z, y, x) index
    pub fn from_shape_fn<F>(shape: Shape3, f: F) -> Self
    where
        F: FnMut(Shape3) -> bool,
    {
        Self::new(Array3::from_shape_fn(shape, f))
    }

    /// Mask selecting every voxel
    pub fn full(shape: Shape3) -> Self {
        Self::new(Array3::from_elem(shape, true))
    }

    /// Mask selecting nothing
    pub fn empty(shape: Shape3) -> Self {
        Self::new(Array3::from_elem(shape, false))
    }

    pub fn shape(&self) -> Shape3 {
        self.data.dim()
    }

    /// Number of selected voxels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&inside| inside).count()
    }

    /// True when no voxel is selected
    pub fn is_region_empty(&self) -> bool {
        !self.data.iter().any(|&inside| inside)
    }

    pub fn data(&self) -> &Array3<bool> {
        &self.data
    }

    /// Mask as 0/1 bytes, the usual on-disk representation
    pub fn to_u8(&self) -> Array3<u8> {
        self.data.mapv(u8::from)
    }
}

/// Volume with every voxel outside the ROI set to zero
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedVolume {
    data: Array3<f64>,
    voxel_count: usize,
}

impl MaskedVolume {
    pub fn shape(&self) -> Shape3 {
        self.data.dim()
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    /// Number of ROI voxels that contributed to the masked volume
    pub fn voxel_count(&self) -> usize {
        self.voxel_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp(shape: Shape3) -> Volume {
        Volume::from_shape_fn(shape, |(z, y, x)| (z * 100 + y * 10 + x) as f64)
    }

    #[test]
    fn test_full_mask_keeps_volume() {
        let volume = ramp((3, 4, 5));
        let masked = volume.masked(&Mask::full((3, 4, 5))).unwrap();
        assert_eq!(masked.data(), volume.data());
        assert_eq!(masked.voxel_count(), 60);
    }

    #[test]
    fn test_empty_mask_zeroes_volume() {
        let volume = ramp((2, 2, 2));
        let masked = volume.masked(&Mask::empty((2, 2, 2))).unwrap();
        assert!(masked.data().iter().all(|&v| v == 0.0));
        assert_eq!(masked.voxel_count(), 0);
    }

    #[test]
    fn test_sub_cube_mask() {
        let volume = ramp((4, 4, 4));
        let mask = Mask::from_shape_fn((4, 4, 4), |(z, y, x)| z < 2 && y < 2 && x < 2);
        let masked = volume.masked(&mask).unwrap();

        assert_eq!(masked.voxel_count(), 8);
        assert_eq!(masked.data()[[1, 1, 1]], 111.0);
        assert_eq!(masked.data()[[2, 1, 1]], 0.0);
        assert_eq!(masked.data()[[3, 3, 3]], 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let volume = ramp((2, 3, 4));
        let err = volume.masked(&Mask::full((2, 3, 5))).unwrap_err();
        assert_eq!(
            err,
            VolumeError::ShapeMismatch {
                volume: (2, 3, 4),
                mask: (2, 3, 5),
            }
        );
        assert!(volume.roi_values(&Mask::full((4, 3, 2))).is_err());
    }

    #[test]
    fn test_roi_values_order() {
        let volume = ramp((2, 2, 2));
        let mask = Mask::from_shape_fn((2, 2, 2), |(z, _, x)| z == 1 || x == 1);
        let values = volume.roi_values(&mask).unwrap();
        assert_eq!(values, vec![1.0, 11.0, 100.0, 101.0, 110.0, 111.0]);
    }

    #[test]
    fn test_mask_from_values_non_zero() {
        let raw = Array3::from_shape_vec((1, 2, 3), vec![0.0, -1.0, 0.5, 0.0, 2.0, -0.0]).unwrap();
        let mask = Mask::from_values(&raw);
        assert_eq!(mask.count(), 3);
        assert_eq!(mask.to_u8().iter().copied().collect::<Vec<_>>(), vec![0, 1, 1, 0, 1, 0]);
        assert!(!mask.is_region_empty());
        assert!(Mask::from_values(&Array3::<u8>::zeros((2, 2, 2))).is_region_empty());
    }

    proptest! {
        #[test]
        fn test_masked_volume_matches_selection(
            values in proptest::collection::vec(-1000.0f64..1000.0, 27),
            selected in proptest::collection::vec(any::<bool>(), 27),
        ) {
            let volume = Volume::new(Array3::from_shape_vec((3, 3, 3), values.clone()).unwrap());
            let mask = Mask::new(Array3::from_shape_vec((3, 3, 3), selected.clone()).unwrap());
            let masked = volume.masked(&mask).unwrap();

            for ((&m, &v), &inside) in masked.data().iter().zip(values.iter()).zip(selected.iter()) {
                prop_assert_eq!(m, if inside { v } else { 0.0 });
            }
            prop_assert_eq!(masked.voxel_count(), selected.iter().filter(|&&s| s).count());
        }
    }
}
