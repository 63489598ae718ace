use crate::foundation::error::{BlurError, BlurResult};

/// Renderer-level pixel configuration of a texture or render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelConfig {
    Rgba8888,
    Bgra8888,
    Rgb888,
    Rgba4444,
    Rgb565,
    Srgba8888,
    Sbgra8888,
    RgbaHalf,
    Alpha8,
    Rgba1010102,
    RgbaFloat,
    RgFloat,
    AlphaHalf,
    Unknown,
}

impl PixelConfig {
    pub fn is_srgb(self) -> bool {
        matches!(self, Self::Srgba8888 | Self::Sbgra8888)
    }

    /// Pick the config intermediate and final blur surfaces are allocated with.
    ///
    /// sRGB sources without a color space are blurred into a plain RGBA8888 target; without
    /// sRGB write control the linear->sRGB conversion out of the shader cannot be suppressed.
    pub fn blur_config(self, color_space: Option<ColorSpace>) -> BlurResult<Self> {
        if self.is_srgb() && color_space.is_none() {
            return Ok(Self::Rgba8888);
        }
        match self {
            Self::Rgba8888
            | Self::Bgra8888
            | Self::Rgb888
            | Self::Rgba4444
            | Self::Rgb565
            | Self::Srgba8888
            | Self::Sbgra8888
            | Self::RgbaHalf
            | Self::Alpha8
            | Self::Rgba1010102 => Ok(self),
            other => Err(BlurError::configuration(format!(
                "pixel config {other:?} cannot be used as a blur target"
            ))),
        }
    }

    pub fn color_type(self) -> Option<ColorType> {
        Some(match self {
            Self::Rgba8888 | Self::Srgba8888 => ColorType::Rgba8888,
            Self::Bgra8888 | Self::Sbgra8888 => ColorType::Bgra8888,
            Self::Rgb888 => ColorType::Rgb888x,
            Self::Rgba4444 => ColorType::Argb4444,
            Self::Rgb565 => ColorType::Rgb565,
            Self::RgbaHalf => ColorType::RgbaF16,
            Self::Alpha8 => ColorType::Alpha8,
            Self::Rgba1010102 => ColorType::Rgba1010102,
            Self::RgbaFloat | Self::RgFloat | Self::AlphaHalf | Self::Unknown => return None,
        })
    }
}

/// Client-visible color layout of the blurred result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorType {
    Rgba8888,
    Bgra8888,
    Rgb888x,
    Argb4444,
    Rgb565,
    RgbaF16,
    Alpha8,
    Rgba1010102,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum AlphaType {
    Opaque,
    #[default]
    Premul,
    Unpremul,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorSpace {
    Srgb,
    SrgbLinear,
    DisplayP3,
}

/// Description of the final blurred image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageInfo {
    pub width: i32,
    pub height: i32,
    pub color_type: ColorType,
    pub alpha_type: AlphaType,
    pub color_space: Option<ColorSpace>,
}
