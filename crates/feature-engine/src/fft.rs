//! 3-D FFT and Frequency Grids

use ndarray::{Array3, Axis};
use roi_volume::Shape3;
use rustfft::{num_complex::Complex, FftPlanner};

/// Unnormalized forward 3-D DFT of a real volume
///
/// Applied as three passes of 1-D transforms, one per axis.
pub fn fft3(data: &Array3<f64>) -> Array3<Complex<f64>> {
    let mut spectrum = data.mapv(|v| Complex::new(v, 0.0));
    let mut planner = FftPlanner::new();
    for axis in 0..3 {
        transform_axis(&mut spectrum, Axis(axis), &mut planner);
    }
    spectrum
}

fn transform_axis(data: &mut Array3<Complex<f64>>, axis: Axis, planner: &mut FftPlanner<f64>) {
    let n = data.len_of(axis);
    if n <= 1 {
        return;
    }

    let fft = planner.plan_fft_forward(n);
    let mut buffer = vec![Complex::new(0.0, 0.0); n];
    let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

    for mut lane in data.lanes_mut(axis) {
        for (dst, src) in buffer.iter_mut().zip(lane.iter()) {
            *dst = *src;
        }
        fft.process_with_scratch(&mut buffer, &mut scratch);
        for (dst, src) in lane.iter_mut().zip(buffer.iter()) {
            *dst = *src;
        }
    }
}

/// Sample frequencies of an `n`-point DFT in cycles per sample
///
/// Ordered zero, positive ascending, then negative ascending from the most
/// negative, e.g. `n = 4` gives `[0, 0.25, -0.5, -0.25]`.
pub fn fft_frequencies(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / n as f64;
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|i| {
            let k = if i < positive { i as f64 } else { i as f64 - n as f64 };
            k * scale
        })
        .collect()
}

/// Radial frequency of every DFT bin, divided by the grid maximum
///
/// Values lie in [0, 1]; the farthest bin(s) map to exactly 1.0. A grid with no
/// non-zero frequency (every axis of length 1) stays all zero.
pub fn radial_frequency_grid(shape: Shape3) -> Array3<f64> {
    let (nz, ny, nx) = shape;
    let fz = fft_frequencies(nz);
    let fy = fft_frequencies(ny);
    let fx = fft_frequencies(nx);

    let radius = Array3::from_shape_fn(shape, |(z, y, x)| {
        (fx[x] * fx[x] + fy[y] * fy[y] + fz[z] * fz[z]).sqrt()
    });

    let max = radius.fold(0.0_f64, |acc, &r| acc.max(r));
    if max > 0.0 {
        radius.mapv(|r| r / max)
    } else {
        radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_frequencies_even() {
        assert_eq!(fft_frequencies(4), vec![0.0, 0.25, -0.5, -0.25]);
    }

    #[test]
    fn test_frequencies_odd() {
        let f = fft_frequencies(5);
        let expected = [0.0, 0.2, 0.4, -0.4, -0.2];
        for (a, b) in f.iter().zip(expected.iter()) {
            assert!(close(*a, *b));
        }
        assert_eq!(fft_frequencies(1), vec![0.0]);
        assert!(fft_frequencies(0).is_empty());
    }

    #[test]
    fn test_radial_grid_normalized() {
        let grid = radial_frequency_grid((4, 4, 4));
        assert_eq!(grid[[0, 0, 0]], 0.0);
        // Nyquist corner is the single farthest bin
        assert_eq!(grid[[2, 2, 2]], 1.0);
        assert_eq!(grid.iter().filter(|&&r| r == 1.0).count(), 1);
        assert!(grid.iter().all(|&r| (0.0..=1.0).contains(&r)));
        assert!(close(grid[[0, 0, 2]], 1.0 / 3.0_f64.sqrt()));
    }

    #[test]
    fn test_radial_grid_odd_shape_has_symmetric_maxima() {
        // n = 3 has no Nyquist bin: +1/3 and -1/3 tie on every axis
        let grid = radial_frequency_grid((3, 3, 3));
        assert_eq!(grid.iter().filter(|&&r| r == 1.0).count(), 8);
    }

    #[test]
    fn test_radial_grid_single_voxel() {
        let grid = radial_frequency_grid((1, 1, 1));
        assert_eq!(grid[[0, 0, 0]], 0.0);
    }

    #[test]
    fn test_fft3_impulse_is_flat() {
        let mut data = Array3::zeros((2, 4, 3));
        data[[0, 0, 0]] = 2.0;
        let spectrum = fft3(&data);
        assert!(spectrum.iter().all(|c| close(c.re, 2.0) && close(c.im, 0.0)));
    }

    #[test]
    fn test_fft3_dc_is_sum() {
        let data = Array3::from_shape_fn((3, 2, 5), |(z, y, x)| (z * 7 + y * 3 + x) as f64);
        let spectrum = fft3(&data);
        assert!(close(spectrum[[0, 0, 0]].re, data.sum()));
        assert!(close(spectrum[[0, 0, 0]].im, 0.0));
    }

    #[test]
    fn test_fft3_single_axis_cosine() {
        // cos(2*pi*x/4) along X: energy at x-bins 1 and 3 only
        let data = Array3::from_shape_fn((1, 1, 4), |(_, _, x)| (std::f64::consts::PI * x as f64 / 2.0).cos());
        let spectrum = fft3(&data);
        assert!(close(spectrum[[0, 0, 1]].norm(), 2.0));
        assert!(close(spectrum[[0, 0, 3]].norm(), 2.0));
        assert!(close(spectrum[[0, 0, 0]].norm(), 0.0));
        assert!(close(spectrum[[0, 0, 2]].norm(), 0.0));
    }

    #[test]
    fn test_fft3_parseval() {
        let data = Array3::from_shape_fn((3, 4, 5), |(z, y, x)| ((z * 31 + y * 17 + x * 5) % 11) as f64 - 4.0);
        let spectrum = fft3(&data);
        let time_energy: f64 = data.iter().map(|v| v * v).sum();
        let freq_energy: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum::<f64>() / data.len() as f64;
        assert!((time_energy - freq_energy).abs() < 1e-6 * time_energy);
    }
}
