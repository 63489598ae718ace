use crate::foundation::error::{BlurError, BlurResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Integer point, used for texel offsets.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(f64::from(self.x), f64::from(self.y))
    }
}

impl std::ops::Neg for IPoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Integer surface size in pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ISize {
    pub width: i32,
    pub height: i32,
}

impl ISize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn bounds(self) -> IRect {
        IRect::from_wh(self.width, self.height)
    }
}

/// Half-open integer rectangle `[left, right) x [top, bottom)`.
///
/// Rectangles with `left >= right` or `top >= bottom` are empty; the pipeline produces such
/// rectangles freely (e.g. margins of width zero) and skips them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct IRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl IRect {
    pub const EMPTY: Self = Self::from_ltrb(0, 0, 0, 0);

    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::from_ltrb(x, y, x + w, y + h)
    }

    pub const fn from_wh(w: i32, h: i32) -> Self {
        Self::from_ltrb(0, 0, w, h)
    }

    pub fn width(self) -> i32 {
        self.right - self.left
    }

    pub fn height(self) -> i32 {
        self.bottom - self.top
    }

    pub fn size(self) -> ISize {
        ISize::new(self.width(), self.height())
    }

    pub fn origin(self) -> IPoint {
        IPoint::new(self.left, self.top)
    }

    pub fn is_empty(self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn offset(self, d: IPoint) -> Self {
        Self::from_ltrb(
            self.left + d.x,
            self.top + d.y,
            self.right + d.x,
            self.bottom + d.y,
        )
    }

    /// Shrink by `dx` on the left and right and by `dy` on the top and bottom. The result may be
    /// empty (or inverted) when the insets exceed the size.
    pub fn inset(self, dx: i32, dy: i32) -> Self {
        Self::from_ltrb(
            self.left + dx,
            self.top + dy,
            self.right - dx,
            self.bottom - dy,
        )
    }

    pub fn intersect(self, other: Self) -> Option<Self> {
        let r = Self::from_ltrb(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Scale by fractional factors, rounding outward so the result covers the scaled area.
    pub fn scale_round_out(self, sx: f32, sy: f32) -> Self {
        Self::from_ltrb(
            (self.left as f32 * sx).floor() as i32,
            (self.top as f32 * sy).floor() as i32,
            (self.right as f32 * sx).ceil() as i32,
            (self.bottom as f32 * sy).ceil() as i32,
        )
    }

    pub fn scale(self, sx: i32, sy: i32) -> Self {
        Self::from_ltrb(
            self.left * sx,
            self.top * sy,
            self.right * sx,
            self.bottom * sy,
        )
    }

    /// Halve the coordinates of the selected axes. Halved coordinates must be even.
    pub fn shrink_by_2(self, x_axis: bool, y_axis: bool) -> BlurResult<Self> {
        let mut r = self;
        if x_axis {
            if r.left % 2 != 0 || r.right % 2 != 0 {
                return Err(BlurError::invariant(format!(
                    "odd horizontal bounds in decimation rect {self:?}"
                )));
            }
            r.left /= 2;
            r.right /= 2;
        }
        if y_axis {
            if r.top % 2 != 0 || r.bottom % 2 != 0 {
                return Err(BlurError::invariant(format!(
                    "odd vertical bounds in decimation rect {self:?}"
                )));
            }
            r.top /= 2;
            r.bottom /= 2;
        }
        Ok(r)
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

/// Shrink a float rectangle by `dx`/`dy` on each side.
///
/// `kurbo::Rect::inset` grows for positive insets; domains are always shrunk, so this helper
/// keeps the sign convention of [`IRect::inset`].
pub fn inset_rect(r: Rect, dx: f64, dy: f64) -> Rect {
    Rect::new(r.x0 + dx, r.y0 + dy, r.x1 - dx, r.y1 - dy)
}

/// Premultiplied RGBA8 color.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn mul(c: u8, a: u8) -> u8 {
            ((u16::from(c) * u16::from(a) + 127) / 255) as u8
        }
        Self::new(mul(r, a), mul(g, a), mul(b, a), a)
    }

    /// Undo premultiplication. Channels are clamped to `[0, 255]`.
    pub fn to_straight_rgba(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let un = |c: u8| -> u8 {
            let v = (u32::from(c) * 255 + u32::from(self.a) / 2) / u32::from(self.a);
            v.min(255) as u8
        };
        [un(self.r), un(self.g), un(self.b), self.a]
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
