use super::*;

#[test]
fn irect_basic_geometry() {
    let r = IRect::from_xywh(2, 3, 10, 4);
    assert_eq!(r, IRect::from_ltrb(2, 3, 12, 7));
    assert_eq!(r.width(), 10);
    assert_eq!(r.height(), 4);
    assert_eq!(r.size(), ISize::new(10, 4));
    assert!(r.contains(2, 3));
    assert!(!r.contains(12, 3));
    assert!(IRect::from_ltrb(5, 0, 5, 10).is_empty());
    assert!(IRect::from_ltrb(0, 0, 4, 4).inset(3, 0).is_empty());
}

#[test]
fn irect_offset_and_negation() {
    let r = IRect::from_ltrb(1, 1, 5, 5);
    assert_eq!(r.offset(IPoint::new(-1, 2)), IRect::from_ltrb(0, 3, 4, 7));
    assert_eq!(-IPoint::new(3, -4), IPoint::new(-3, 4));
}

#[test]
fn scale_round_out_covers_source() {
    let r = IRect::from_ltrb(3, 5, 13, 15);
    let s = r.scale_round_out(0.25, 0.5);
    assert_eq!(s, IRect::from_ltrb(0, 2, 4, 8));
    assert_eq!(s.scale(4, 2), IRect::from_ltrb(0, 4, 16, 16));

    let neg = IRect::from_ltrb(-3, -1, 1, 1).scale_round_out(0.5, 0.5);
    assert_eq!(neg, IRect::from_ltrb(-2, -1, 1, 1));
}

#[test]
fn shrink_by_2_halves_selected_axes() {
    let r = IRect::from_ltrb(4, 2, 16, 10);
    assert_eq!(
        r.shrink_by_2(true, false).unwrap(),
        IRect::from_ltrb(2, 2, 8, 10)
    );
    assert_eq!(
        r.shrink_by_2(true, true).unwrap(),
        IRect::from_ltrb(2, 1, 8, 5)
    );
}

#[test]
fn shrink_by_2_rejects_odd_coordinates() {
    let r = IRect::from_ltrb(1, 0, 8, 8);
    let err = r.shrink_by_2(true, false).unwrap_err();
    assert!(matches!(err, BlurError::Invariant(_)));
    // An odd axis that is not halved is fine.
    assert!(r.shrink_by_2(false, true).is_ok());
}

#[test]
fn intersect_returns_none_for_disjoint() {
    let a = IRect::from_wh(4, 4);
    assert_eq!(
        a.intersect(IRect::from_ltrb(2, 2, 8, 8)),
        Some(IRect::from_ltrb(2, 2, 4, 4))
    );
    assert_eq!(a.intersect(IRect::from_ltrb(4, 0, 8, 4)), None);
}

#[test]
fn inset_rect_shrinks() {
    let r = inset_rect(IRect::from_wh(10, 4).to_rect(), 0.5, 0.0);
    assert_eq!(r, Rect::new(0.5, 0.0, 9.5, 4.0));
}

#[test]
fn premul_round_trip_stays_in_range() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert!(c.r <= c.a && c.g <= c.a);
    let s = c.to_straight_rgba();
    assert_eq!(s[0], 255);
    assert!((i32::from(s[1]) - 128).abs() <= 2);
    assert_eq!(Rgba8Premul::TRANSPARENT.to_straight_rgba(), [0, 0, 0, 0]);
}
