use super::*;
use crate::foundation::format::PixelConfig;
use crate::render::cpu::{CpuRenderer, CpuRendererOpts, CpuSurface};

const FORMAT: SurfaceFormat = SurfaceFormat {
    config: PixelConfig::Rgba8888,
    color_space: None,
};

fn halved(sigma: f32, radius: i32) -> AxisPlan {
    AxisPlan {
        sigma,
        scale_factor: 2,
        radius,
    }
}

fn unfiltered() -> AxisPlan {
    AxisPlan {
        sigma: 0.0,
        scale_factor: 1,
        radius: 0,
    }
}

fn upload(r: &mut CpuRenderer, w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> CpuSurface {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&f(x, y));
        }
    }
    r.upload_rgba8_premul(w, h, data).unwrap()
}

#[test]
fn halving_box_averages_pairs() {
    let mut r = CpuRenderer::default();
    let tex = upload(&mut r, 4, 2, |x, _| {
        if x % 2 == 0 { [0, 0, 0, 0] } else { [255, 255, 255, 255] }
    });
    let src = WorkingSurface {
        texture: tex,
        content: IRect::from_wh(4, 2),
        offset: IPoint::ZERO,
    };
    let out = decimate(
        &mut r,
        src,
        ISize::new(4, 2),
        &halved(1.0, 3),
        &unfiltered(),
        DomainMode::Clamp,
        FORMAT,
    )
    .unwrap();

    assert_eq!(out.content, IRect::from_wh(2, 2));
    assert_eq!(out.offset, IPoint::ZERO);
    let frame = r.read_rgba8_premul(&out.texture).unwrap();
    assert_eq!((frame.width, frame.height), (2, 2));
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, &[128, 128, 128, 128]);
    }
}

#[test]
fn halo_right_of_content_is_cleared() {
    let poison = Rgba8Premul::new(255, 0, 255, 255);
    let mut r = CpuRenderer::new(CpuRendererOpts::default().with_uninit_fill(Some(poison)));
    let tex = upload(&mut r, 8, 8, |_, _| [0, 0, 255, 255]);
    let src = WorkingSurface {
        texture: tex,
        content: IRect::from_wh(8, 8),
        offset: IPoint::ZERO,
    };
    let out = decimate(
        &mut r,
        src,
        ISize::new(8, 8),
        &halved(2.0, 6),
        &unfiltered(),
        DomainMode::Clamp,
        FORMAT,
    )
    .unwrap();
    assert_eq!(out.content, IRect::from_wh(4, 8));
    assert_eq!(out.texture.backing_size(), ISize::new(16, 16));

    let frame = r.read_rgba8_premul(&out.texture).unwrap();
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, &[0, 0, 255, 255]);
    }

    // Halo columns 4..10 are transparent; everything else past the content stays poisoned.
    let backing = r.read_backing_rgba8_premul(&out.texture).unwrap();
    assert_eq!(backing.pixel(4, 0), [0, 0, 0, 0]);
    assert_eq!(backing.pixel(9, 7), [0, 0, 0, 0]);
    assert_eq!(backing.pixel(10, 0), poison.to_array());
    assert_eq!(backing.pixel(4, 8), poison.to_array());
}

#[test]
fn offset_is_consumed_into_the_first_draw() {
    let mut r = CpuRenderer::default();
    let tex = upload(&mut r, 8, 8, |x, _| {
        if x < 4 { [255, 255, 255, 255] } else { [0, 0, 0, 0] }
    });
    // Destination starts at (2, 2) of the source texture.
    let src = WorkingSurface {
        texture: tex,
        content: IRect::from_wh(8, 8),
        offset: IPoint::new(-2, -2),
    };
    let out = decimate(
        &mut r,
        src,
        ISize::new(4, 4),
        &halved(1.0, 3),
        &unfiltered(),
        DomainMode::Ignore,
        FORMAT,
    )
    .unwrap();
    assert_eq!(out.content, IRect::from_wh(2, 4));
    assert_eq!(out.offset, IPoint::ZERO);

    let frame = r.read_rgba8_premul(&out.texture).unwrap();
    assert_eq!(frame.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(frame.pixel(1, 0), [0, 0, 0, 0]);
}

#[test]
fn requires_a_scale_factor() {
    let mut r = CpuRenderer::default();
    let tex = upload(&mut r, 2, 2, |_, _| [0, 0, 0, 0]);
    let src = WorkingSurface {
        texture: tex,
        content: IRect::from_wh(2, 2),
        offset: IPoint::ZERO,
    };
    let plan = AxisPlan {
        sigma: 1.0,
        scale_factor: 1,
        radius: 3,
    };
    let err = decimate(
        &mut r,
        src,
        ISize::new(2, 2),
        &plan,
        &plan,
        DomainMode::Clamp,
        FORMAT,
    )
    .unwrap_err();
    assert!(matches!(err, BlurError::Invariant(_)));
}
