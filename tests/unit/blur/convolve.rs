use super::*;
use crate::foundation::core::IPoint;
use crate::foundation::format::PixelConfig;
use crate::render::cpu::{CpuRenderer, CpuRendererOpts, CpuSurface};

const FORMAT: SurfaceFormat = SurfaceFormat {
    config: PixelConfig::Rgba8888,
    color_space: None,
};
const GREEN: [u8; 4] = [0, 255, 0, 255];
const POISON: Rgba8Premul = Rgba8Premul::new(255, 0, 255, 255);

fn poisoned_renderer() -> CpuRenderer {
    CpuRenderer::new(CpuRendererOpts::default().with_uninit_fill(Some(POISON)))
}

/// Green inside `content`, poison elsewhere.
fn upload(r: &mut CpuRenderer, w: u32, h: u32, content: IRect) -> CpuSurface {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            if content.contains(x, y) {
                data.extend_from_slice(&GREEN);
            } else {
                data.extend_from_slice(&POISON.to_array());
            }
        }
    }
    r.upload_rgba8_premul(w, h, data).unwrap()
}

#[test]
fn x_pass_clamps_to_content_columns() {
    let mut r = poisoned_renderer();
    let content = IRect::from_ltrb(2, 0, 18, 4);
    let src = WorkingSurface {
        texture: upload(&mut r, 20, 4, content),
        content,
        offset: IPoint::ZERO,
    };
    let (target, valid) = convolve_gaussian(
        &mut r,
        &src,
        IRect::from_wh(20, 4),
        Direction::X,
        3,
        1.0,
        DomainMode::Clamp,
        FORMAT,
        SizeFit::Approx,
    )
    .unwrap();
    assert_eq!(valid, IRect::from_wh(20, 4));
    let frame = r.read_rgba8_premul(&target).unwrap();
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, &GREEN);
    }
}

#[test]
fn y_pass_clears_columns_outside_content() {
    let mut r = poisoned_renderer();
    let content = IRect::from_ltrb(0, 0, 3, 6);
    let src = WorkingSurface {
        texture: upload(&mut r, 6, 6, content),
        content,
        offset: IPoint::ZERO,
    };
    let (target, valid) = convolve_gaussian(
        &mut r,
        &src,
        IRect::from_wh(6, 6),
        Direction::Y,
        1,
        0.5,
        DomainMode::Decal,
        FORMAT,
        SizeFit::Exact,
    )
    .unwrap();
    assert_eq!(valid, IRect::from_ltrb(0, 0, 3, 6));

    let frame = r.read_rgba8_premul(&target).unwrap();
    assert_eq!(frame.pixel(4, 2), [0, 0, 0, 0]);
    assert_eq!(frame.pixel(5, 5), [0, 0, 0, 0]);
    assert_eq!(frame.pixel(1, 2), GREEN);
    // Decal edges lose the weight of the tap past the content.
    assert!(frame.pixel(1, 0)[3] < 255);
    assert_eq!(frame.pixel(1, 0)[0], 0);
}

#[test]
fn ignore_mode_is_a_single_draw_over_the_target() {
    let mut r = CpuRenderer::default();
    let content = IRect::from_wh(8, 8);
    let src = WorkingSurface {
        texture: upload(&mut r, 8, 8, content),
        content,
        offset: IPoint::ZERO,
    };
    let (target, valid) = convolve_gaussian(
        &mut r,
        &src,
        IRect::from_wh(8, 8),
        Direction::X,
        2,
        0.6,
        DomainMode::Ignore,
        FORMAT,
        SizeFit::Exact,
    )
    .unwrap();
    assert_eq!(valid, IRect::from_wh(8, 8));
    assert_eq!(r.read_rgba8_premul(&target).unwrap().pixel(0, 0), GREEN);
}

#[test]
fn offset_moves_the_sampled_window() {
    let mut r = poisoned_renderer();
    let content = IRect::from_ltrb(4, 4, 12, 12);
    let src = WorkingSurface {
        texture: upload(&mut r, 16, 16, content),
        content,
        offset: IPoint::new(-4, -4),
    };
    let (target, valid) = convolve_gaussian(
        &mut r,
        &src,
        IRect::from_wh(8, 8),
        Direction::X,
        3,
        1.0,
        DomainMode::Clamp,
        FORMAT,
        SizeFit::Exact,
    )
    .unwrap();
    assert_eq!(valid, IRect::from_wh(8, 8));
    let frame = r.read_rgba8_premul(&target).unwrap();
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, &GREEN);
    }
}

#[test]
fn fused_2d_pass_keeps_uniform_content() {
    let mut r = poisoned_renderer();
    let content = IRect::from_ltrb(1, 1, 7, 7);
    let src = WorkingSurface {
        texture: upload(&mut r, 8, 8, content),
        content,
        offset: IPoint::ZERO,
    };
    let axis = AxisPlan {
        sigma: 0.6,
        scale_factor: 1,
        radius: 2,
    };
    let target = convolve_gaussian_2d(
        &mut r,
        &src,
        ISize::new(8, 8),
        &axis,
        &axis,
        DomainMode::Clamp,
        FORMAT,
        SizeFit::Exact,
    )
    .unwrap();
    let frame = r.read_rgba8_premul(&target).unwrap();
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, &GREEN);
    }
}
