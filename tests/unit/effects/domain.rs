use super::*;

#[test]
fn repeat_degrades_to_decal_for_filtered_sampling() {
    assert_eq!(DomainMode::Repeat.for_scaling(), DomainMode::Decal);
    assert_eq!(DomainMode::Clamp.for_scaling(), DomainMode::Clamp);
    assert_eq!(DomainMode::Decal.for_scaling(), DomainMode::Decal);
    assert_eq!(DomainMode::Ignore.for_scaling(), DomainMode::Ignore);
}

#[test]
fn resolve_texel_per_mode() {
    assert_eq!(DomainMode::Ignore.resolve_texel(-3, 0, 4), Some(-3));
    assert_eq!(DomainMode::Clamp.resolve_texel(-3, 0, 4), Some(0));
    assert_eq!(DomainMode::Clamp.resolve_texel(9, 0, 4), Some(3));
    assert_eq!(DomainMode::Repeat.resolve_texel(-1, 0, 4), Some(3));
    assert_eq!(DomainMode::Repeat.resolve_texel(5, 2, 4), Some(3));
    assert_eq!(DomainMode::Decal.resolve_texel(4, 0, 4), None);
    assert_eq!(DomainMode::Decal.resolve_texel(2, 0, 4), Some(2));
}

#[test]
fn empty_domain_reads_transparent_unless_ignored() {
    assert_eq!(DomainMode::Clamp.resolve_texel(1, 2, 2), None);
    assert_eq!(DomainMode::Ignore.resolve_texel(1, 2, 2), Some(1));
}

#[test]
fn resolve_coord_per_mode() {
    assert_eq!(DomainMode::Clamp.resolve_coord(-1.0, 0.5, 3.5), Some(0.5));
    assert_eq!(DomainMode::Clamp.resolve_coord(2.0, 0.5, 3.5), Some(2.0));
    assert_eq!(DomainMode::Decal.resolve_coord(3.6, 0.5, 3.5), None);
    assert_eq!(DomainMode::Repeat.resolve_coord(4.0, 0.0, 3.0), Some(1.0));
    assert_eq!(DomainMode::Ignore.resolve_coord(-7.0, 0.0, 1.0), Some(-7.0));
}
