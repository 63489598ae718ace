use crate::blur::surface::SurfaceFormat;
use crate::effects::domain::DomainMode;
use crate::effects::paint::ConvolutionEffect;
use crate::foundation::core::{IRect, ISize, Rgba8Premul, inset_rect};
use crate::foundation::error::BlurResult;
use crate::render::backend::{BlurRenderer, FillRect, SizeFit};

/// Upsample a decimated result back to `dst_size` with one bilinear draw.
///
/// `src_size` is the logical size of `src`, `content` its valid rect. The strips just past the
/// logical size are cleared first; bilinear taps at the right and bottom edge reach one texel
/// into them.
#[allow(clippy::too_many_arguments)]
#[tracing::instrument(level = "debug", skip(renderer, src, format))]
pub fn reexpand<R: BlurRenderer>(
    renderer: &mut R,
    src: R::Target,
    src_size: ISize,
    content: IRect,
    scale: (i32, i32),
    mode: DomainMode,
    dst_size: ISize,
    format: SurfaceFormat,
    fit: SizeFit,
) -> BlurResult<R::Target> {
    let (w, h) = (src_size.width, src_size.height);
    renderer.clear(&src, IRect::from_xywh(0, h, w + 1, 1), Rgba8Premul::TRANSPARENT)?;
    renderer.clear(&src, IRect::from_xywh(w, 0, 1, h), Rgba8Premul::TRANSPARENT)?;

    let texture = renderer.texture(&src)?;
    drop(src);

    let target =
        renderer.make_render_target(&format.desc(fit, dst_size.width, dst_size.height))?;
    let effect = if mode.is_ignore() {
        ConvolutionEffect::bilinear(texture)
    } else {
        ConvolutionEffect::bilinear_domain(
            texture,
            inset_rect(content.to_rect(), 0.5, 0.5),
            mode.for_scaling(),
        )
    };

    let src_rect = src_size.bounds();
    renderer.fill_rect(
        &target,
        &effect,
        &FillRect::rect_to_rect(dst_size.bounds(), src_rect.scale(scale.0, scale.1), src_rect),
    )?;
    tracing::debug!(?src_rect, "reexpanded");
    Ok(target)
}

#[cfg(test)]
#[path = "../../tests/unit/blur/reexpand.rs"]
mod tests;
