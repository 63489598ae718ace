use smallvec::SmallVec;

use crate::effects::kernel::{MAX_KERNEL_RADIUS, kernel_taps_2d};
use crate::foundation::error::{BlurError, BlurResult};
use crate::render::backend::{RendererCaps, SizeFit};

/// Largest sigma convolved at full resolution; larger sigmas are reached by decimating first.
pub const MAX_BLUR_SIGMA: f32 = 4.0;

/// Per-axis blur parameters after decimation planning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisPlan {
    /// Sigma applied at the decimated resolution, at most [`MAX_BLUR_SIGMA`].
    pub sigma: f32,
    /// Power-of-two downsample factor.
    pub scale_factor: i32,
    /// `ceil(3 * sigma)`.
    pub radius: i32,
}

impl AxisPlan {
    /// Whether this axis runs a convolution pass at all.
    pub fn filters(&self) -> bool {
        self.sigma > 0.0
    }

    /// Whether this axis is downsampled before convolving.
    pub fn is_decimated(&self) -> bool {
        self.scale_factor > 1
    }
}

/// Split `sigma` into a power-of-two scale factor and a residual sigma no larger than
/// [`MAX_BLUR_SIGMA`].
///
/// Each halving of the image halves the sigma needed for the same visual blur. The scale never
/// grows past `max_texture_size`; when that cap is hit the residual sigma is clamped instead,
/// which under-blurs rather than failing.
pub fn plan_axis(sigma: f32, max_texture_size: i32) -> BlurResult<AxisPlan> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(BlurError::validation(format!(
            "blur sigma must be finite and >= 0, got {sigma}"
        )));
    }
    if max_texture_size <= 0 {
        return Err(BlurError::configuration(format!(
            "max texture size must be > 0, got {max_texture_size}"
        )));
    }

    let mut sigma = sigma;
    let mut scale_factor = 1i32;
    while sigma > MAX_BLUR_SIGMA {
        match scale_factor.checked_mul(2) {
            Some(next) if next <= max_texture_size => {
                scale_factor = next;
                sigma *= 0.5;
            }
            _ => {
                sigma = MAX_BLUR_SIGMA;
                break;
            }
        }
    }

    let radius = (3.0 * sigma).ceil() as i32;
    debug_assert!(
        radius <= MAX_KERNEL_RADIUS,
        "planned radius {radius} for sigma {sigma}"
    );
    if radius > MAX_KERNEL_RADIUS {
        return Err(BlurError::invariant(format!(
            "planned kernel radius {radius} exceeds {MAX_KERNEL_RADIUS}"
        )));
    }

    Ok(AxisPlan {
        sigma,
        scale_factor,
        radius,
    })
}

/// One step of the blur state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum BlurStage {
    /// Both axes in a single 2-D draw, straight into the final surface.
    #[serde(rename = "fused_2d")]
    Fused2D { fit: SizeFit },
    /// Downsample by the axis scale factors.
    Decimate,
    /// Horizontal 1-D pass over the (possibly decimated) source rect.
    ConvolveX { fit: SizeFit },
    /// Clear the strip below the X pass output that the Y pass reads as its halo.
    ClearHaloY,
    /// Vertical 1-D pass; reads the X pass output when there is one.
    ConvolveY { fit: SizeFit },
    /// Upsample back to the destination size.
    Reexpand { fit: SizeFit },
}

/// Ordered stage list plus the per-axis plans it was derived from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlurPlan {
    pub x: AxisPlan,
    pub y: AxisPlan,
    /// Executed in order; only the last stage allocates with the caller's fit.
    pub stages: SmallVec<[BlurStage; 6]>,
}

impl BlurPlan {
    /// Plan a blur against `caps`.
    ///
    /// Every intermediate surface is approx-fit; only the last stage allocates with `fit`.
    pub fn new(
        sigma_x: f32,
        sigma_y: f32,
        caps: RendererCaps,
        fit: SizeFit,
        max_fused_taps: usize,
    ) -> BlurResult<Self> {
        let x = plan_axis(sigma_x, caps.max_texture_size)?;
        let y = plan_axis(sigma_y, caps.max_texture_size)?;
        if !x.filters() && !y.filters() {
            return Err(BlurError::validation("at least one blur sigma must be > 0"));
        }
        for (axis, plan) in [("x", &x), ("y", &y)] {
            if plan.radius > caps.max_kernel_radius {
                return Err(BlurError::configuration(format!(
                    "{axis} kernel radius {} exceeds renderer limit {}",
                    plan.radius, caps.max_kernel_radius
                )));
            }
        }

        let decimated = x.is_decimated() || y.is_decimated();
        let mut stages = SmallVec::new();

        if x.filters()
            && y.filters()
            && !decimated
            && kernel_taps_2d(x.radius, y.radius) <= max_fused_taps
        {
            stages.push(BlurStage::Fused2D { fit });
            return Ok(Self { x, y, stages });
        }

        if decimated {
            stages.push(BlurStage::Decimate);
        }
        if x.filters() {
            let fit_x = if decimated || y.filters() {
                SizeFit::Approx
            } else {
                fit
            };
            stages.push(BlurStage::ConvolveX { fit: fit_x });
            if y.filters() {
                stages.push(BlurStage::ClearHaloY);
            }
        }
        if y.filters() {
            let fit_y = if decimated { SizeFit::Approx } else { fit };
            stages.push(BlurStage::ConvolveY { fit: fit_y });
        }
        if decimated {
            stages.push(BlurStage::Reexpand { fit });
        }

        Ok(Self { x, y, stages })
    }

    pub fn is_fused(&self) -> bool {
        matches!(self.stages.first(), Some(BlurStage::Fused2D { .. }))
    }

    pub fn is_decimated(&self) -> bool {
        self.x.is_decimated() || self.y.is_decimated()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blur/planner.rs"]
mod tests;
