use super::*;

const MAX_TEX: i32 = 16384;

#[test]
fn small_sigmas_are_not_decimated() {
    assert_eq!(
        plan_axis(0.0, MAX_TEX).unwrap(),
        AxisPlan {
            sigma: 0.0,
            scale_factor: 1,
            radius: 0
        }
    );
    let p = plan_axis(2.0, MAX_TEX).unwrap();
    assert_eq!((p.scale_factor, p.radius), (1, 6));
    let p = plan_axis(4.0, MAX_TEX).unwrap();
    assert_eq!((p.scale_factor, p.radius), (1, 12));
}

#[test]
fn large_sigmas_halve_until_in_range() {
    let p = plan_axis(8.0, MAX_TEX).unwrap();
    assert_eq!((p.sigma, p.scale_factor, p.radius), (4.0, 2, 12));
    let p = plan_axis(10.0, MAX_TEX).unwrap();
    assert_eq!((p.sigma, p.scale_factor, p.radius), (2.5, 4, 8));
}

#[test]
fn texture_limit_clamps_sigma_and_keeps_pow2_scale() {
    let p = plan_axis(100.0, 8).unwrap();
    assert_eq!((p.sigma, p.scale_factor, p.radius), (4.0, 8, 12));
    let p = plan_axis(100.0, 12).unwrap();
    assert_eq!(p.scale_factor, 8);
    assert_eq!(p.sigma, MAX_BLUR_SIGMA);
    let p = plan_axis(1.0e30, MAX_TEX).unwrap();
    assert!(p.scale_factor <= MAX_TEX);
    assert_eq!(p.radius, 12);
}

#[test]
fn planning_is_pure_and_monotone() {
    let mut last_scale = 1;
    for i in 0..4000 {
        let sigma = i as f32 * 0.25;
        let a = plan_axis(sigma, MAX_TEX).unwrap();
        let b = plan_axis(sigma, MAX_TEX).unwrap();
        assert_eq!(a, b);
        assert!(a.radius <= MAX_KERNEL_RADIUS);
        assert!(a.sigma <= MAX_BLUR_SIGMA);
        assert_eq!(a.scale_factor.count_ones(), 1);
        assert!(a.scale_factor >= last_scale);
        last_scale = a.scale_factor;
    }
}

#[test]
fn rejects_bad_inputs() {
    for sigma in [f32::NAN, f32::INFINITY, -1.0] {
        assert!(matches!(
            plan_axis(sigma, MAX_TEX),
            Err(BlurError::Validation(_))
        ));
    }
    assert!(matches!(
        plan_axis(1.0, 0),
        Err(BlurError::Configuration(_))
    ));
}

fn stages(sx: f32, sy: f32, max_fused_taps: usize) -> Vec<BlurStage> {
    BlurPlan::new(
        sx,
        sy,
        RendererCaps::default(),
        SizeFit::Exact,
        max_fused_taps,
    )
    .unwrap()
    .stages
    .to_vec()
}

#[test]
fn small_2d_kernels_are_fused() {
    // radius 2 x 2 -> 25 taps.
    assert_eq!(
        stages(0.6, 0.6, 25),
        vec![BlurStage::Fused2D {
            fit: SizeFit::Exact
        }]
    );
    // radius 3 x 2 -> 35 taps.
    assert_eq!(stages(1.0, 0.6, 25).len(), 3);
}

#[test]
fn separable_stage_lists_route_fits() {
    use BlurStage::*;
    let exact = SizeFit::Exact;
    let approx = SizeFit::Approx;

    assert_eq!(
        stages(1.0, 1.0, 0),
        vec![
            ConvolveX { fit: approx },
            ClearHaloY,
            ConvolveY { fit: exact }
        ]
    );
    assert_eq!(stages(2.0, 0.0, 25), vec![ConvolveX { fit: exact }]);
    assert_eq!(stages(0.0, 3.0, 25), vec![ConvolveY { fit: exact }]);
    assert_eq!(
        stages(10.0, 2.0, 25),
        vec![
            Decimate,
            ConvolveX { fit: approx },
            ClearHaloY,
            ConvolveY { fit: approx },
            Reexpand { fit: exact }
        ]
    );
    assert_eq!(
        stages(0.0, 9.0, 25),
        vec![Decimate, ConvolveY { fit: approx }, Reexpand { fit: exact }]
    );
}

#[test]
fn decimated_plans_are_never_fused() {
    let plan = BlurPlan::new(
        9.0,
        9.0,
        RendererCaps::default(),
        SizeFit::Approx,
        usize::MAX,
    )
    .unwrap();
    assert!(!plan.is_fused());
    assert!(plan.is_decimated());
}

#[test]
fn plan_errors() {
    assert!(matches!(
        BlurPlan::new(0.0, 0.0, RendererCaps::default(), SizeFit::Exact, 25),
        Err(BlurError::Validation(_))
    ));
    let caps = RendererCaps {
        max_texture_size: 16384,
        max_kernel_radius: 4,
    };
    assert!(matches!(
        BlurPlan::new(3.0, 0.0, caps, SizeFit::Exact, 25),
        Err(BlurError::Configuration(_))
    ));
}

#[test]
fn plan_serializes_for_diagnostics() {
    let plan = BlurPlan::new(10.0, 0.0, RendererCaps::default(), SizeFit::Exact, 25).unwrap();
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v["x"]["scale_factor"], 4);
    assert_eq!(v["stages"][0]["stage"], "decimate");
    assert_eq!(v["stages"][2]["stage"], "reexpand");
    assert_eq!(v["stages"][2]["fit"], "exact");
}
