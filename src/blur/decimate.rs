use crate::blur::planner::AxisPlan;
use crate::blur::surface::{SurfaceFormat, WorkingSurface};
use crate::effects::domain::DomainMode;
use crate::effects::paint::ConvolutionEffect;
use crate::foundation::core::{IPoint, IRect, ISize, Rgba8Premul, inset_rect};
use crate::foundation::error::{BlurError, BlurResult};
use crate::render::backend::{BlurRenderer, FillRect, SizeFit};

/// Downsample `src` by the axis scale factors with repeated 2x bilinear draws.
///
/// Each halving samples at the shared corner of a 2x2 texel block, so the bilinear filter
/// computes the box average. The returned surface has its content at the decimated
/// destination-space rect and a zero offset. A halo strip beyond the content is cleared for
/// the first convolution pass that follows.
#[tracing::instrument(
    level = "debug",
    skip(renderer, src),
    fields(scale_x = x.scale_factor, scale_y = y.scale_factor)
)]
pub fn decimate<R: BlurRenderer>(
    renderer: &mut R,
    src: WorkingSurface<R::Texture>,
    dst_size: ISize,
    x: &AxisPlan,
    y: &AxisPlan,
    mode: DomainMode,
    format: SurfaceFormat,
) -> BlurResult<WorkingSurface<R::Texture>> {
    let (scale_x, scale_y) = (x.scale_factor, y.scale_factor);
    if scale_x <= 1 && scale_y <= 1 {
        return Err(BlurError::invariant(
            "decimation requested without a scale factor > 1",
        ));
    }

    let src_rect = if mode.is_ignore() {
        dst_size.bounds()
    } else {
        src.content_in_dst()
    };
    let src_rect = src_rect
        .scale_round_out(1.0 / scale_x as f32, 1.0 / scale_y as f32)
        .scale(scale_x, scale_y);

    let mut texture = src.texture;
    let mut sample_rect = src_rect.offset(-src.offset);
    let mut dst_rect = src_rect;
    let mut last = None;

    let mut i = 1;
    while i < scale_x || i < scale_y {
        let (halve_x, halve_y) = (i < scale_x, i < scale_y);
        dst_rect = dst_rect.shrink_by_2(halve_x, halve_y)?;

        let target = renderer.make_render_target(&format.desc(
            SizeFit::Approx,
            dst_rect.right.max(1),
            dst_rect.bottom.max(1),
        ))?;
        let effect = if i == 1 && !mode.is_ignore() {
            let domain = inset_rect(
                src.content.to_rect(),
                if halve_x { 0.5 } else { 0.0 },
                if halve_y { 0.5 } else { 0.0 },
            );
            ConvolutionEffect::bilinear_domain(texture, domain, mode.for_scaling())
        } else {
            ConvolutionEffect::bilinear(texture)
        };
        renderer.fill_rect(
            &target,
            &effect,
            &FillRect::rect_to_rect(dst_rect, dst_rect, sample_rect),
        )?;

        texture = renderer.texture(&target)?;
        sample_rect = dst_rect;
        last = Some(target);
        i *= 2;
    }

    let Some(target) = last else {
        return Err(BlurError::invariant("decimation produced no surface"));
    };

    let halo = if x.filters() {
        IRect::from_xywh(dst_rect.right, dst_rect.top, x.radius, dst_rect.height())
    } else if y.filters() {
        IRect::from_xywh(dst_rect.left, dst_rect.bottom, dst_rect.width(), y.radius)
    } else {
        IRect::EMPTY
    };
    if !halo.is_empty() {
        renderer.clear(&target, halo, Rgba8Premul::TRANSPARENT)?;
    }

    tracing::debug!(content = ?dst_rect, ?halo, "decimated");
    Ok(WorkingSurface {
        texture,
        content: dst_rect,
        offset: IPoint::ZERO,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/blur/decimate.rs"]
mod tests;
