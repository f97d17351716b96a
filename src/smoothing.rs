// Pose Coach 🚀 MIT License

//! Gaussian heatmap smoothing.
//!
//! Raw heatmaps out of the network carry per-pixel noise that produces
//! spurious local maxima; a small normalized Gaussian blur per channel is
//! applied before peak search.

use ndarray::Array3;

/// Convolve each channel of a `(height, width, channels)` grid with a
/// normalized Gaussian kernel.
///
/// The kernel is precomputed once per call and normalized to sum to 1.
/// A border of `kernel_size / 2` pixels is left at zero rather than
/// extrapolated; peaks that close to the edge are not meaningful joint
/// positions anyway.
///
/// # Arguments
///
/// * `input` - Dense grid of shape `(height, width, channels)`.
/// * `kernel_size` - Side length of the square kernel (odd).
/// * `sigma` - Gaussian standard deviation in pixels.
///
/// # Returns
///
/// A new grid of identical dimensions. Pure function; the input is untouched.
#[must_use]
pub fn gaussian_filter_3d(input: &Array3<f32>, kernel_size: usize, sigma: f32) -> Array3<f32> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<f32>::zeros((height, width, channels));

    let pad = kernel_size / 2;
    let kernel = gaussian_kernel(kernel_size, sigma);

    if height < kernel_size || width < kernel_size {
        return output;
    }

    for y in pad..height - pad {
        for x in pad..width - pad {
            for c in 0..channels {
                let mut sum = 0.0;
                for ky in 0..kernel_size {
                    for kx in 0..kernel_size {
                        sum += input[[y + ky - pad, x + kx - pad, c]] * kernel[ky * kernel_size + kx];
                    }
                }
                output[[y, x, c]] = sum;
            }
        }
    }

    output
}

/// Build a flattened `size x size` Gaussian kernel normalized to sum to 1.
fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let pad = size as isize / 2;
    let inv_two_sigma_sq = 1.0 / (2.0 * sigma * sigma);

    let mut kernel = Vec::with_capacity(size * size);
    let mut total = 0.0;
    for y in -pad..=pad {
        for x in -pad..=pad {
            let value = (-((x * x + y * y) as f32) * inv_two_sigma_sq).exp();
            kernel.push(value);
            total += value;
        }
    }

    for value in &mut kernel {
        *value /= total;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized() {
        for (size, sigma) in [(3, 1.0), (3, 3.0), (5, 2.0), (7, 1.5)] {
            let kernel = gaussian_kernel(size, sigma);
            assert_eq!(kernel.len(), size * size);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "kernel sum {sum} for size {size}");
        }
    }

    #[test]
    fn test_kernel_center_is_largest() {
        let size = 3;
        let kernel = gaussian_kernel(size, 1.0);
        let center = kernel[size * size / 2];
        for (i, &v) in kernel.iter().enumerate() {
            if i != size * size / 2 {
                assert!(v <= center);
            }
        }
    }

    #[test]
    fn test_uniform_field_unchanged_in_interior() {
        let input = Array3::from_elem((8, 8, 2), 0.5_f32);
        let output = gaussian_filter_3d(&input, 3, 1.0);

        // Interior cells keep the uniform value; the 1-pixel border is zero.
        for y in 0..8 {
            for x in 0..8 {
                for c in 0..2 {
                    let v = output[[y, x, c]];
                    if y == 0 || x == 0 || y == 7 || x == 7 {
                        assert!(v.abs() < f32::EPSILON);
                    } else {
                        assert!((v - 0.5).abs() < 1e-5);
                    }
                }
            }
        }
    }

    #[test]
    fn test_impulse_spreads_but_preserves_mass() {
        let mut input = Array3::<f32>::zeros((9, 9, 1));
        input[[4, 4, 0]] = 1.0;
        let output = gaussian_filter_3d(&input, 3, 1.0);

        // The impulse peak is reduced and mass leaks to neighbors.
        assert!(output[[4, 4, 0]] < 1.0);
        assert!(output[[4, 3, 0]] > 0.0);
        assert!(output[[3, 4, 0]] > 0.0);

        let total: f32 = output.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_channels_independent() {
        let mut input = Array3::<f32>::zeros((9, 9, 2));
        input[[4, 4, 0]] = 1.0;
        let output = gaussian_filter_3d(&input, 3, 1.0);

        // Channel 1 had no signal and must stay all zero.
        for y in 0..9 {
            for x in 0..9 {
                assert!(output[[y, x, 1]].abs() < f32::EPSILON);
            }
        }
    }

    #[test]
    fn test_grid_smaller_than_kernel() {
        let input = Array3::from_elem((2, 2, 1), 1.0_f32);
        let output = gaussian_filter_3d(&input, 3, 1.0);
        assert!(output.iter().all(|&v| v.abs() < f32::EPSILON));
    }
}
