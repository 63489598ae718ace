use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BlurError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BlurError::allocation("x")
            .to_string()
            .contains("allocation error:")
    );
    assert!(
        BlurError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        BlurError::invariant("x")
            .to_string()
            .contains("invariant violation:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BlurError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_allocation_failures_report_as_allocation() {
    assert!(BlurError::allocation("oom").is_allocation());
    assert!(!BlurError::configuration("fmt").is_allocation());
    assert!(!BlurError::validation("sigma").is_allocation());
}
