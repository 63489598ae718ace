use crate::blur::planner::AxisPlan;
use crate::blur::surface::{SurfaceFormat, WorkingSurface};
use crate::effects::domain::{Direction, DomainMode};
use crate::effects::paint::{ConvolutionEffect, Gaussian1D, Gaussian2D};
use crate::foundation::core::{IRect, ISize, Rgba8Premul};
use crate::foundation::error::BlurResult;
use crate::render::backend::{BlurRenderer, FillRect, SizeFit};

/// One separable Gaussian pass along `direction`, into a new target of `src_rect`'s size.
///
/// Outside `Ignore` mode the draw is split along the pass axis: the margins within `radius` of
/// the content edge resolve taps with `mode`, the interior whose whole kernel support lies in
/// the content is drawn in `Ignore` mode. Rows (X) or columns (Y) outside the content are
/// cleared.
///
/// Returns the target and the rect of valid output in target space.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(level = "debug", skip(renderer, src, format))]
pub fn convolve_gaussian<R: BlurRenderer>(
    renderer: &mut R,
    src: &WorkingSurface<R::Texture>,
    src_rect: IRect,
    direction: Direction,
    radius: i32,
    sigma: f32,
    mode: DomainMode,
    format: SurfaceFormat,
    fit: SizeFit,
) -> BlurResult<(R::Target, IRect)> {
    let size = src_rect.size();
    let target = renderer.make_render_target(&format.desc(fit, size.width, size.height))?;
    let clip = size.bounds();
    let translate = -src.offset;
    let content = src.content;

    let bounds = match direction {
        Direction::X => [content.left, content.right],
        Direction::Y => [content.top, content.bottom],
    };
    let draw = |renderer: &mut R, rect: IRect, mode: DomainMode| -> BlurResult<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let effect = ConvolutionEffect::Gaussian1D(Gaussian1D::new(
            src.texture.clone(),
            direction,
            radius,
            sigma,
            mode,
            bounds,
        )?);
        renderer.fill_rect(
            &target,
            &effect,
            &FillRect::with_translate(clip, rect, translate),
        )
    };

    if mode.is_ignore() {
        draw(renderer, src_rect, DomainMode::Ignore)?;
        tracing::debug!(path = "single", "convolved");
        return Ok((target, clip));
    }

    let mid = src.content_in_dst();
    let (band, interior, outside) = match direction {
        Direction::X => {
            let band = IRect::from_ltrb(
                src_rect.left,
                mid.top.max(src_rect.top),
                src_rect.right,
                mid.bottom.min(src_rect.bottom),
            );
            let interior = IRect::from_ltrb(
                (mid.left + radius).max(band.left),
                band.top,
                (mid.right - radius).min(band.right),
                band.bottom,
            );
            let outside = [
                IRect::from_ltrb(src_rect.left, src_rect.top, src_rect.right, band.top),
                IRect::from_ltrb(src_rect.left, band.bottom, src_rect.right, src_rect.bottom),
            ];
            (band, interior, outside)
        }
        Direction::Y => {
            let band = IRect::from_ltrb(
                mid.left.max(src_rect.left),
                src_rect.top,
                mid.right.min(src_rect.right),
                src_rect.bottom,
            );
            let interior = IRect::from_ltrb(
                band.left,
                (mid.top + radius).max(band.top),
                band.right,
                (mid.bottom - radius).min(band.bottom),
            );
            let outside = [
                IRect::from_ltrb(src_rect.left, src_rect.top, band.left, src_rect.bottom),
                IRect::from_ltrb(band.right, src_rect.top, src_rect.right, src_rect.bottom),
            ];
            (band, interior, outside)
        }
    };

    for rect in outside {
        if !rect.is_empty() {
            renderer.clear(&target, rect, Rgba8Premul::TRANSPARENT)?;
        }
    }

    if band.is_empty() {
        tracing::debug!(path = "empty", "convolved");
        return Ok((target, IRect::EMPTY));
    }

    if interior.is_empty() {
        draw(renderer, band, mode)?;
        tracing::debug!(path = "band", ?band, "convolved");
    } else {
        let (lead, tail) = match direction {
            Direction::X => (
                IRect::from_ltrb(band.left, band.top, interior.left, band.bottom),
                IRect::from_ltrb(interior.right, band.top, band.right, band.bottom),
            ),
            Direction::Y => (
                IRect::from_ltrb(band.left, band.top, band.right, interior.top),
                IRect::from_ltrb(band.left, interior.bottom, band.right, band.bottom),
            ),
        };
        draw(renderer, lead, mode)?;
        draw(renderer, interior, DomainMode::Ignore)?;
        draw(renderer, tail, mode)?;
        tracing::debug!(path = "split", ?lead, ?interior, ?tail, "convolved");
    }

    let valid = match direction {
        Direction::X => IRect::from_ltrb(
            0,
            mid.top.max(0),
            size.width,
            mid.bottom.min(size.height),
        ),
        Direction::Y => IRect::from_ltrb(
            mid.left.max(0),
            0,
            mid.right.min(size.width),
            size.height,
        ),
    };
    Ok((target, if valid.is_empty() { IRect::EMPTY } else { valid }))
}

/// Both axes in one draw over a `dst_size` target, for kernels small enough to fuse.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(level = "debug", skip(renderer, src, format))]
pub fn convolve_gaussian_2d<R: BlurRenderer>(
    renderer: &mut R,
    src: &WorkingSurface<R::Texture>,
    dst_size: ISize,
    x: &AxisPlan,
    y: &AxisPlan,
    mode: DomainMode,
    format: SurfaceFormat,
    fit: SizeFit,
) -> BlurResult<R::Target> {
    let target =
        renderer.make_render_target(&format.desc(fit, dst_size.width, dst_size.height))?;
    let effect = ConvolutionEffect::Gaussian2D(Gaussian2D::new(
        src.texture.clone(),
        src.content,
        (x.radius, y.radius),
        (x.sigma, y.sigma),
        mode,
    )?);
    let clip = dst_size.bounds();
    renderer.fill_rect(
        &target,
        &effect,
        &FillRect::with_translate(clip, clip, -src.offset),
    )?;
    Ok(target)
}

#[cfg(test)]
#[path = "../../tests/unit/blur/convolve.rs"]
mod tests;
