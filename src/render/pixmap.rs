//! Sampling and raster helpers over `vello_cpu::Pixmap` backing stores.

use vello_cpu::Pixmap;

use crate::foundation::core::{IRect, Rgba8Premul};
use crate::foundation::error::{BlurError, BlurResult};

pub(crate) fn pixmap_bounds(pixmap: &Pixmap) -> IRect {
    IRect::from_wh(i32::from(pixmap.width()), i32::from(pixmap.height()))
}

fn index(pixmap: &Pixmap, x: u32, y: u32) -> usize {
    ((y as usize) * usize::from(pixmap.width()) + (x as usize)) * 4
}

/// Build a pixmap from tightly packed premultiplied RGBA8 bytes.
pub(crate) fn pixmap_from_rgba8_premul(
    rgba8_premul: &[u8],
    width: u16,
    height: u16,
) -> BlurResult<Pixmap> {
    let expected = usize::from(width) * usize::from(height) * 4;
    if rgba8_premul.len() != expected {
        return Err(BlurError::validation(format!(
            "pixmap expects {expected} bytes for {width}x{height}, got {}",
            rgba8_premul.len()
        )));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height));
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    Ok(Pixmap::from_parts_with_opacity(
        pixels,
        width,
        height,
        may_have_opacities,
    ))
}

/// Pixel at `(x, y)`; the coordinates are clamped to the pixmap edge.
pub(crate) fn pixel_clamped(pixmap: &Pixmap, x: i32, y: i32) -> [f32; 4] {
    let x = x.clamp(0, i32::from(pixmap.width()) - 1) as u32;
    let y = y.clamp(0, i32::from(pixmap.height()) - 1) as u32;
    let i = index(pixmap, x, y);
    let d = &pixmap.data_as_u8_slice()[i..i + 4];
    [
        f32::from(d[0]),
        f32::from(d[1]),
        f32::from(d[2]),
        f32::from(d[3]),
    ]
}

/// Bilinear sample at a continuous coordinate; texel `i` is centered at `i + 0.5`.
pub(crate) fn sample_bilinear(pixmap: &Pixmap, x: f64, y: f64) -> [f32; 4] {
    let u = x - 0.5;
    let v = y - 0.5;
    let x0 = u.floor();
    let y0 = v.floor();
    let fx = (u - x0) as f32;
    let fy = (v - y0) as f32;
    let (x0, y0) = (x0 as i32, y0 as i32);

    let p00 = pixel_clamped(pixmap, x0, y0);
    let p10 = pixel_clamped(pixmap, x0 + 1, y0);
    let p01 = pixel_clamped(pixmap, x0, y0 + 1);
    let p11 = pixel_clamped(pixmap, x0 + 1, y0 + 1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * fx;
        let bot = p01[c] + (p11[c] - p01[c]) * fx;
        out[c] = top + (bot - top) * fy;
    }
    out
}

pub(crate) fn clear_pixmap(pixmap: &mut Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Fill `rect`, clipped to the pixmap.
pub(crate) fn fill_rect(pixmap: &mut Pixmap, rect: IRect, color: Rgba8Premul) {
    let Some(r) = rect.intersect(pixmap_bounds(pixmap)) else {
        return;
    };
    let px = color.to_array();
    let row_len = (r.width() as usize) * 4;
    for y in r.top..r.bottom {
        let start = index(pixmap, r.left as u32, y as u32);
        let row = &mut pixmap.data_as_u8_slice_mut()[start..start + row_len];
        for d in row.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }
}

/// Overwrite the rows of `rect` with already-shaded bytes (`rect.width() * 4` per row).
pub(crate) fn write_rect(pixmap: &mut Pixmap, rect: IRect, rows: &[u8]) {
    let row_len = (rect.width() as usize) * 4;
    for (ry, src) in rows.chunks_exact(row_len).enumerate() {
        let y = (rect.top as usize + ry) as u32;
        let start = index(pixmap, rect.left as u32, y);
        pixmap.data_as_u8_slice_mut()[start..start + row_len].copy_from_slice(src);
    }
}

/// Copy out the bytes of `rect`, which must lie inside the pixmap.
pub(crate) fn crop(pixmap: &Pixmap, rect: IRect) -> BlurResult<Vec<u8>> {
    if rect.intersect(pixmap_bounds(pixmap)) != Some(rect) {
        return Err(BlurError::validation(format!(
            "crop rect {rect:?} outside pixmap {}x{}",
            pixmap.width(),
            pixmap.height()
        )));
    }
    let row_len = (rect.width() as usize) * 4;
    let data = pixmap.data_as_u8_slice();
    let mut out = Vec::with_capacity(row_len * rect.height() as usize);
    for y in rect.top..rect.bottom {
        let start = index(pixmap, rect.left as u32, y as u32);
        out.extend_from_slice(&data[start..start + row_len]);
    }
    Ok(out)
}

/// Round a shaded premultiplied color into storage, keeping color <= alpha.
pub(crate) fn store_premul(c: [f32; 4]) -> [u8; 4] {
    let q = |v: f32| -> u8 { v.round().clamp(0.0, 255.0) as u8 };
    let a = q(c[3]);
    [q(c[0]).min(a), q(c[1]).min(a), q(c[2]).min(a), a]
}

#[cfg(test)]
pub(crate) fn pixel_at(pixmap: &Pixmap, x: u32, y: u32) -> Rgba8Premul {
    let i = index(pixmap, x, y);
    let d = &pixmap.data_as_u8_slice()[i..i + 4];
    Rgba8Premul::new(d[0], d[1], d[2], d[3])
}
