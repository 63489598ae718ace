use crate::foundation::core::{IPoint, IRect};
use crate::foundation::format::{ColorSpace, PixelConfig};
use crate::render::backend::{SizeFit, TargetDesc};

/// A texture flowing between blur stages.
///
/// `content` is the valid region in texture space. `offset` maps destination space to texture
/// space: `texture = destination - offset`.
#[derive(Clone, Debug)]
pub struct WorkingSurface<T> {
    pub texture: T,
    pub content: IRect,
    pub offset: IPoint,
}

impl<T> WorkingSurface<T> {
    /// Content rect in destination space.
    pub fn content_in_dst(&self) -> IRect {
        self.content.offset(self.offset)
    }
}

/// Pixel format shared by every surface of one blur.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceFormat {
    pub config: PixelConfig,
    pub color_space: Option<ColorSpace>,
}

impl SurfaceFormat {
    pub fn desc(self, fit: SizeFit, width: i32, height: i32) -> TargetDesc {
        TargetDesc {
            fit,
            width,
            height,
            config: self.config,
            color_space: self.color_space,
        }
    }
}
