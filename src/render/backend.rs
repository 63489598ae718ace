use crate::effects::kernel::MAX_KERNEL_RADIUS;
use crate::effects::paint::ConvolutionEffect;
use crate::foundation::core::{Affine, IPoint, IRect, Rect, Rgba8Premul};
use crate::foundation::error::BlurResult;
use crate::foundation::format::{ColorSpace, PixelConfig};

/// Backing-store sizing policy for a render target.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SizeFit {
    /// Backing store matches the requested size.
    #[default]
    Exact,
    /// Backing store may be larger; contents beyond the logical size are undefined.
    Approx,
}

/// Hardware limits the blur pipeline plans against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RendererCaps {
    pub max_texture_size: i32,
    pub max_kernel_radius: i32,
}

impl Default for RendererCaps {
    fn default() -> Self {
        Self {
            max_texture_size: 16384,
            max_kernel_radius: MAX_KERNEL_RADIUS,
        }
    }
}

/// Render-target allocation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetDesc {
    pub fit: SizeFit,
    pub width: i32,
    pub height: i32,
    pub config: PixelConfig,
    pub color_space: Option<ColorSpace>,
}

/// Geometry of a fill-rect draw.
///
/// Pixels whose centers lie inside `dst` and `clip` are shaded. The effect sees the pixel
/// center mapped through `local` (destination -> texture space).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillRect {
    pub clip: IRect,
    pub dst: Rect,
    pub local: Affine,
}

impl FillRect {
    /// Draw `dst` with texture coordinates `dst + translate`.
    pub fn with_translate(clip: IRect, dst: IRect, translate: IPoint) -> Self {
        Self {
            clip,
            dst: dst.to_rect(),
            local: Affine::translate(translate.to_vec2()),
        }
    }

    /// Draw `dst`, mapping it linearly onto `src` in texture space.
    pub fn rect_to_rect(clip: IRect, dst: IRect, src: IRect) -> Self {
        let (d, s) = (dst.to_rect(), src.to_rect());
        let sx = if d.width() == 0.0 {
            1.0
        } else {
            s.width() / d.width()
        };
        let sy = if d.height() == 0.0 {
            1.0
        } else {
            s.height() / d.height()
        };
        Self {
            clip,
            dst: d,
            local: Affine::new([sx, 0.0, 0.0, sy, s.x0 - d.x0 * sx, s.y0 - d.y0 * sy]),
        }
    }
}

/// The renderer capability the blur pipeline drives.
///
/// Handles are shared references into renderer-owned resources: cloning a handle does not copy
/// pixels, and a surface is released once its last handle is dropped. Commands are recorded in
/// submission order; a draw that samples a texture observes every earlier command that wrote
/// the surface behind it.
pub trait BlurRenderer {
    /// Render target handle.
    type Target: Clone + std::fmt::Debug;
    /// Sampleable texture handle.
    type Texture: Clone + std::fmt::Debug;

    fn caps(&self) -> RendererCaps;

    /// Allocate a render target. Fails with [`crate::BlurError::Allocation`].
    fn make_render_target(&mut self, desc: &TargetDesc) -> BlurResult<Self::Target>;

    /// Shade the pixels covered by `geom` with `effect`, replacing their contents.
    fn fill_rect(
        &mut self,
        target: &Self::Target,
        effect: &ConvolutionEffect<Self::Texture>,
        geom: &FillRect,
    ) -> BlurResult<()>;

    /// Clear `rect` to `color` in backing-store coordinates.
    ///
    /// The rectangle may extend past the target's logical size into an approx-fit backing
    /// store; anything past the backing store is dropped.
    fn clear(&mut self, target: &Self::Target, rect: IRect, color: Rgba8Premul)
    -> BlurResult<()>;

    /// Texture view of a render target.
    fn texture(&self, target: &Self::Target) -> BlurResult<Self::Texture>;
}
