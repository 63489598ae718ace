use smallvec::SmallVec;

use crate::foundation::error::{BlurError, BlurResult};

/// Largest kernel radius a single convolution pass supports.
pub const MAX_KERNEL_RADIUS: i32 = 12;
/// Taps of the widest 1-D kernel.
pub const MAX_KERNEL_WIDTH: usize = (2 * MAX_KERNEL_RADIUS + 1) as usize;
/// Largest 2-D kernel (in taps) that is drawn as one fused pass by default.
pub const MAX_FUSED_KERNEL_TAPS: usize = 25;

pub type Kernel1D = SmallVec<[f32; MAX_KERNEL_WIDTH]>;

/// Normalized 1-D Gaussian weights for offsets `-radius..=radius`.
///
/// Weights always sum to 1; radius 0 yields the identity kernel.
pub fn gaussian_kernel_1d(radius: i32, sigma: f32) -> BlurResult<Kernel1D> {
    if !(0..=MAX_KERNEL_RADIUS).contains(&radius) {
        return Err(BlurError::invariant(format!(
            "kernel radius {radius} outside 0..={MAX_KERNEL_RADIUS}"
        )));
    }
    if radius == 0 {
        return Ok(SmallVec::from_slice(&[1.0]));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BlurError::validation("gaussian sigma must be > 0"));
    }

    let denom = 1.0 / (2.0 * f64::from(sigma) * f64::from(sigma));
    let mut weights_f = SmallVec::<[f64; MAX_KERNEL_WIDTH]>::new();
    let mut sum = 0.0f64;
    for i in -radius..=radius {
        let x = f64::from(i);
        let w = (-x * x * denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(BlurError::invariant("gaussian kernel sum is zero"));
    }

    Ok(weights_f.iter().map(|w| (w / sum) as f32).collect())
}

/// Row-major `(2*ry+1) x (2*rx+1)` Gaussian weights, the outer product of the 1-D kernels.
pub fn gaussian_kernel_2d(
    radius_x: i32,
    radius_y: i32,
    sigma_x: f32,
    sigma_y: f32,
) -> BlurResult<Vec<f32>> {
    let kx = gaussian_kernel_1d(radius_x, sigma_x)?;
    let ky = gaussian_kernel_1d(radius_y, sigma_y)?;
    let mut out = Vec::with_capacity(kx.len() * ky.len());
    for wy in &ky {
        for wx in &kx {
            out.push(wy * wx);
        }
    }
    Ok(out)
}

/// Tap count of a 2-D kernel with the given radii.
pub fn kernel_taps_2d(radius_x: i32, radius_y: i32) -> usize {
    let w = (2 * radius_x.max(0) + 1) as usize;
    let h = (2 * radius_y.max(0) + 1) as usize;
    w * h
}

#[cfg(test)]
#[path = "../../tests/unit/effects/kernel.rs"]
mod tests;
