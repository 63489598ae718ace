use crate::effects::domain::{Direction, DomainMode};
use crate::effects::kernel::{Kernel1D, gaussian_kernel_1d, gaussian_kernel_2d};
use crate::foundation::core::{IRect, Rect};
use crate::foundation::error::BlurResult;

/// Separable Gaussian pass along one axis.
///
/// Taps are fetched with nearest filtering at integer offsets from the fragment's texel. When
/// `mode` is not `Ignore`, the tap index along `direction` is resolved against `bounds`
/// (half-open, texture space).
#[derive(Clone, Debug)]
pub struct Gaussian1D<T> {
    pub texture: T,
    pub direction: Direction,
    pub radius: i32,
    pub sigma: f32,
    pub mode: DomainMode,
    pub bounds: [i32; 2],
    kernel: Kernel1D,
}

impl<T> Gaussian1D<T> {
    pub fn new(
        texture: T,
        direction: Direction,
        radius: i32,
        sigma: f32,
        mode: DomainMode,
        bounds: [i32; 2],
    ) -> BlurResult<Self> {
        let kernel = gaussian_kernel_1d(radius, sigma)?;
        Ok(Self {
            texture,
            direction,
            radius,
            sigma,
            mode,
            bounds,
            kernel,
        })
    }

    /// Weights for offsets `-radius..=radius`.
    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }
}

/// Non-separable Gaussian applied in one draw, restricted to `bounds` with `mode`.
#[derive(Clone, Debug)]
pub struct Gaussian2D<T> {
    pub texture: T,
    pub bounds: IRect,
    pub radius_x: i32,
    pub radius_y: i32,
    pub sigma_x: f32,
    pub sigma_y: f32,
    pub mode: DomainMode,
    kernel: Vec<f32>,
}

impl<T> Gaussian2D<T> {
    pub fn new(
        texture: T,
        bounds: IRect,
        radii: (i32, i32),
        sigmas: (f32, f32),
        mode: DomainMode,
    ) -> BlurResult<Self> {
        let kernel = gaussian_kernel_2d(radii.0, radii.1, sigmas.0, sigmas.1)?;
        Ok(Self {
            texture,
            bounds,
            radius_x: radii.0,
            radius_y: radii.1,
            sigma_x: sigmas.0,
            sigma_y: sigmas.1,
            mode,
            kernel,
        })
    }

    /// Row-major weights, `2 * radius_x + 1` per row, rows for `-radius_y..=radius_y`.
    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }
}

/// Single bilinear texture read, optionally restricted to a float `domain`.
#[derive(Clone, Debug)]
pub struct TextureDomain<T> {
    pub texture: T,
    pub domain: Rect,
    pub mode: DomainMode,
}

/// The fragment stage of a fill-rect draw.
#[derive(Clone, Debug)]
pub enum ConvolutionEffect<T> {
    /// One axis of a separable blur.
    Gaussian1D(Gaussian1D<T>),
    /// Small fused blur over both axes.
    Gaussian2D(Gaussian2D<T>),
    /// Resampling draw used by decimation and reexpansion.
    TextureDomain(TextureDomain<T>),
}

impl<T> ConvolutionEffect<T> {
    /// Plain bilinear sampling, clamped to the texture edge.
    pub fn bilinear(texture: T) -> Self {
        Self::TextureDomain(TextureDomain {
            texture,
            domain: Rect::ZERO,
            mode: DomainMode::Ignore,
        })
    }

    /// Bilinear sampling restricted to `domain`.
    pub fn bilinear_domain(texture: T, domain: Rect, mode: DomainMode) -> Self {
        Self::TextureDomain(TextureDomain {
            texture,
            domain,
            mode,
        })
    }

    /// The texture every tap of this effect reads.
    pub fn texture(&self) -> &T {
        match self {
            Self::Gaussian1D(e) => &e.texture,
            Self::Gaussian2D(e) => &e.texture,
            Self::TextureDomain(e) => &e.texture,
        }
    }

    /// Weight of the tap at texel offset `(dx, dy)` from the fragment.
    pub fn tap_weight(&self, dx: i32, dy: i32) -> f32 {
        fn at(kernel: &[f32], radius: i32, d: i32) -> f32 {
            if d.abs() > radius {
                return 0.0;
            }
            kernel[(d + radius) as usize]
        }
        match self {
            Self::Gaussian1D(e) => match e.direction {
                Direction::X if dy == 0 => at(&e.kernel, e.radius, dx),
                Direction::Y if dx == 0 => at(&e.kernel, e.radius, dy),
                _ => 0.0,
            },
            Self::Gaussian2D(e) => {
                if dx.abs() > e.radius_x || dy.abs() > e.radius_y {
                    return 0.0;
                }
                let row_len = 2 * e.radius_x + 1;
                e.kernel[((dy + e.radius_y) * row_len + dx + e.radius_x) as usize]
            }
            Self::TextureDomain(_) => {
                if dx == 0 && dy == 0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Half-extent of the tap footprint, `(rx, ry)`.
    pub fn radii(&self) -> (i32, i32) {
        match self {
            Self::Gaussian1D(e) => match e.direction {
                Direction::X => (e.radius, 0),
                Direction::Y => (0, e.radius),
            },
            Self::Gaussian2D(e) => (e.radius_x, e.radius_y),
            Self::TextureDomain(_) => (0, 0),
        }
    }

    pub fn mode(&self) -> DomainMode {
        match self {
            Self::Gaussian1D(e) => e.mode,
            Self::Gaussian2D(e) => e.mode,
            Self::TextureDomain(e) => e.mode,
        }
    }
}
