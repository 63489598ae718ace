//! Separable Gaussian blur for GPU-style renderers.
//!
//! The pipeline draws through a small renderer trait ([`BlurRenderer`]): allocate targets,
//! fill rectangles with a convolution effect, clear, sample. Large sigmas are reached by
//! decimating first, so no pass needs a kernel radius above 12; small 2-D kernels are drawn in
//! a single fused pass.
//!
//! - Build a [`BlurRequest`] for a source texture
//! - Run [`gaussian_blur`] against a renderer, e.g. the CPU reference [`CpuRenderer`]
//! - Inspect the stage list ahead of time with [`plan_blur`]
#![forbid(unsafe_code)]

pub mod blur;
pub mod effects;
pub mod foundation;
pub mod render;

pub use crate::blur::orchestrator::{
    BlurOpts, BlurOutput, BlurRequest, MAX_FUSED_TAPS_ENV, gaussian_blur, plan_blur,
};
pub use crate::blur::planner::{AxisPlan, BlurPlan, BlurStage, MAX_BLUR_SIGMA, plan_axis};
pub use crate::effects::domain::{Direction, DomainMode};
pub use crate::effects::paint::ConvolutionEffect;
pub use crate::foundation::core::{IPoint, IRect, ISize, Rgba8Premul};
pub use crate::foundation::error::{BlurError, BlurResult};
pub use crate::foundation::format::{AlphaType, ColorSpace, ColorType, ImageInfo, PixelConfig};
pub use crate::render::FrameRGBA;
pub use crate::render::backend::{BlurRenderer, FillRect, RendererCaps, SizeFit, TargetDesc};
pub use crate::render::cpu::{CpuRenderer, CpuRendererOpts, CpuSurface};
pub use crate::render::surface_pool::{SurfacePoolOpts, SurfacePoolStats};
