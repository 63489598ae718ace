use crate::blur::convolve::{convolve_gaussian, convolve_gaussian_2d};
use crate::blur::decimate::decimate;
use crate::blur::planner::{BlurPlan, BlurStage};
use crate::blur::reexpand::reexpand;
use crate::blur::surface::{SurfaceFormat, WorkingSurface};
use crate::effects::domain::{Direction, DomainMode};
use crate::effects::kernel::MAX_FUSED_KERNEL_TAPS;
use crate::foundation::core::{IPoint, IRect, ISize, Rgba8Premul};
use crate::foundation::error::{BlurError, BlurResult};
use crate::foundation::format::{AlphaType, ColorSpace, ImageInfo, PixelConfig};
use crate::render::backend::{BlurRenderer, RendererCaps, SizeFit};

/// Environment override for [`BlurOpts::max_fused_taps`].
pub const MAX_FUSED_TAPS_ENV: &str = "WAVYTE_BLUR_MAX_FUSED_TAPS";

/// Pipeline tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlurOpts {
    /// Largest 2-D kernel (in taps) drawn as a single fused pass. `0` disables fusing.
    pub max_fused_taps: usize,
}

impl Default for BlurOpts {
    fn default() -> Self {
        Self {
            max_fused_taps: MAX_FUSED_KERNEL_TAPS,
        }
    }
}

impl BlurOpts {
    /// Override the fused-pass tap limit; `0` forces the separable path.
    pub fn with_max_fused_taps(mut self, taps: usize) -> Self {
        self.max_fused_taps = taps;
        self
    }

    /// Defaults, with `WAVYTE_BLUR_MAX_FUSED_TAPS` applied when it parses.
    pub fn from_env() -> Self {
        let raw = std::env::var(MAX_FUSED_TAPS_ENV).ok();
        Self {
            max_fused_taps: parse_max_fused_taps(raw.as_deref()),
        }
    }
}

pub(crate) fn parse_max_fused_taps(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(MAX_FUSED_KERNEL_TAPS)
}

/// A single blur invocation.
#[derive(Clone, Debug)]
pub struct BlurRequest<T> {
    pub texture: T,
    pub config: PixelConfig,
    /// Valid pixels of `texture`, in texture space.
    pub content_bounds: IRect,
    /// Placement and size of the result, in texture space.
    pub dst_bounds: IRect,
    pub sigma_x: f32,
    pub sigma_y: f32,
    pub mode: DomainMode,
    pub alpha_type: AlphaType,
    pub color_space: Option<ColorSpace>,
    pub fit: SizeFit,
}

impl<T> BlurRequest<T> {
    /// Isotropic blur of `content_bounds` into `dst_bounds`, premultiplied, exact fit, `Ignore`
    /// edges.
    pub fn new(
        texture: T,
        config: PixelConfig,
        content_bounds: IRect,
        dst_bounds: IRect,
        sigma: f32,
    ) -> Self {
        Self {
            texture,
            config,
            content_bounds,
            dst_bounds,
            sigma_x: sigma,
            sigma_y: sigma,
            mode: DomainMode::Ignore,
            alpha_type: AlphaType::Premul,
            color_space: None,
            fit: SizeFit::Exact,
        }
    }

    /// Set independent horizontal and vertical sigmas.
    pub fn with_sigmas(mut self, sigma_x: f32, sigma_y: f32) -> Self {
        self.sigma_x = sigma_x;
        self.sigma_y = sigma_y;
        self
    }

    /// Edge handling for reads outside `content_bounds`.
    pub fn with_mode(mut self, mode: DomainMode) -> Self {
        self.mode = mode;
        self
    }

    /// Backing-store policy for the returned surface.
    pub fn with_fit(mut self, fit: SizeFit) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_alpha_type(mut self, alpha_type: AlphaType) -> Self {
        self.alpha_type = alpha_type;
        self
    }

    pub fn with_color_space(mut self, color_space: Option<ColorSpace>) -> Self {
        self.color_space = color_space;
        self
    }

    fn validate(&self) -> BlurResult<()> {
        if self.dst_bounds.is_empty() {
            return Err(BlurError::validation(format!(
                "destination bounds {:?} are empty",
                self.dst_bounds
            )));
        }
        if self.content_bounds.is_empty() {
            return Err(BlurError::validation(format!(
                "source bounds {:?} are empty",
                self.content_bounds
            )));
        }
        for (axis, sigma) in [("x", self.sigma_x), ("y", self.sigma_y)] {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(BlurError::validation(format!(
                    "sigma_{axis} must be finite and >= 0, got {sigma}"
                )));
            }
        }
        if self.sigma_x == 0.0 && self.sigma_y == 0.0 {
            return Err(BlurError::validation("at least one blur sigma must be > 0"));
        }
        Ok(())
    }
}

/// The blurred surface and its description.
#[derive(Clone, Debug)]
pub struct BlurOutput<T> {
    /// Surface of the destination's size holding the blurred pixels.
    pub target: T,
    pub info: ImageInfo,
}

/// Resolve the request's plan without touching a renderer.
pub fn plan_blur<T>(
    request: &BlurRequest<T>,
    caps: RendererCaps,
    opts: &BlurOpts,
) -> BlurResult<BlurPlan> {
    request.validate()?;
    BlurPlan::new(
        request.sigma_x,
        request.sigma_y,
        caps,
        request.fit,
        opts.max_fused_taps,
    )
}

/// Gaussian-blur `request.content_bounds` of `request.texture` into a new surface with the
/// size of `request.dst_bounds`.
///
/// On error nothing is returned and every intermediate surface has been released.
#[tracing::instrument(
    level = "debug",
    skip(renderer, request, opts),
    fields(
        sigma_x = request.sigma_x,
        sigma_y = request.sigma_y,
        mode = ?request.mode,
        dst_w = request.dst_bounds.width(),
        dst_h = request.dst_bounds.height(),
    )
)]
pub fn gaussian_blur<R: BlurRenderer>(
    renderer: &mut R,
    request: BlurRequest<R::Texture>,
    opts: &BlurOpts,
) -> BlurResult<BlurOutput<R::Target>> {
    request.validate()?;

    let config = request.config.blur_config(request.color_space)?;
    let color_type = config.color_type().ok_or_else(|| {
        BlurError::configuration(format!("pixel config {config:?} has no color type"))
    })?;
    let dst_size = request.dst_bounds.size();
    let info = ImageInfo {
        width: dst_size.width,
        height: dst_size.height,
        color_type,
        alpha_type: request.alpha_type,
        color_space: request.color_space,
    };
    let format = SurfaceFormat {
        config,
        color_space: request.color_space,
    };

    let plan = BlurPlan::new(
        request.sigma_x,
        request.sigma_y,
        renderer.caps(),
        request.fit,
        opts.max_fused_taps,
    )?;
    tracing::debug!(
        fused = plan.is_fused(),
        scale_x = plan.x.scale_factor,
        scale_y = plan.y.scale_factor,
        radius_x = plan.x.radius,
        radius_y = plan.y.radius,
        "blur planned"
    );

    let (sx, sy) = (plan.x.scale_factor, plan.y.scale_factor);
    let src_rect = IRect::from_wh(dst_size.width, dst_size.height)
        .scale_round_out(1.0 / sx as f32, 1.0 / sy as f32);
    let mode = request.mode;

    // Each stage hands the next one a texture view of its output; `last` keeps the target.
    let mut surface = Some(WorkingSurface {
        texture: request.texture,
        content: request.content_bounds,
        offset: -request.dst_bounds.origin(),
    });
    let mut last: Option<(R::Target, ISize)> = None;

    for stage in plan.stages.iter().copied() {
        match stage {
            BlurStage::Fused2D { fit } => {
                debug_assert!(!plan.is_decimated(), "fused pass planned with decimation");
                if plan.is_decimated() {
                    return Err(BlurError::invariant("fused pass planned with decimation"));
                }
                let src = take_surface(&mut surface)?;
                let target = convolve_gaussian_2d(
                    renderer, &src, dst_size, &plan.x, &plan.y, mode, format, fit,
                )?;
                last = Some((target, dst_size));
            }
            BlurStage::Decimate => {
                let src = take_surface(&mut surface)?;
                let decimated = decimate(renderer, src, dst_size, &plan.x, &plan.y, mode, format)?;
                surface = Some(decimated);
            }
            BlurStage::ConvolveX { fit } | BlurStage::ConvolveY { fit } => {
                let (direction, axis) = match stage {
                    BlurStage::ConvolveX { .. } => (Direction::X, &plan.x),
                    _ => (Direction::Y, &plan.y),
                };
                let src = take_surface(&mut surface)?;
                let (target, valid) = convolve_gaussian(
                    renderer,
                    &src,
                    src_rect,
                    direction,
                    axis.radius,
                    axis.sigma,
                    mode,
                    format,
                    fit,
                )?;
                drop(src);
                surface = Some(WorkingSurface {
                    texture: renderer.texture(&target)?,
                    content: valid,
                    offset: IPoint::ZERO,
                });
                last = Some((target, src_rect.size()));
            }
            BlurStage::ClearHaloY => {
                let Some((target, _)) = &last else {
                    return Err(BlurError::invariant("halo clear without a prior pass"));
                };
                let halo = IRect::from_xywh(
                    src_rect.left,
                    src_rect.bottom,
                    src_rect.width(),
                    plan.y.radius,
                );
                renderer.clear(target, halo, Rgba8Premul::TRANSPARENT)?;
            }
            BlurStage::Reexpand { fit } => {
                let content = take_surface(&mut surface)?.content;
                let Some((target, size)) = last.take() else {
                    return Err(BlurError::invariant("reexpand without a blurred surface"));
                };
                let target = reexpand(
                    renderer,
                    target,
                    size,
                    content,
                    (sx, sy),
                    mode,
                    dst_size,
                    format,
                    fit,
                )?;
                last = Some((target, dst_size));
            }
        }
    }
    drop(surface);

    let Some((target, size)) = last else {
        return Err(BlurError::invariant("blur plan produced no surface"));
    };
    if size != dst_size {
        return Err(BlurError::invariant(format!(
            "blur produced {}x{}, expected {}x{}",
            size.width, size.height, dst_size.width, dst_size.height
        )));
    }
    Ok(BlurOutput { target, info })
}

fn take_surface<T>(surface: &mut Option<WorkingSurface<T>>) -> BlurResult<WorkingSurface<T>> {
    surface
        .take()
        .ok_or_else(|| BlurError::invariant("blur stage has no input surface"))
}

#[cfg(test)]
#[path = "../../tests/unit/blur/orchestrator.rs"]
mod tests;
