use crate::ReleaseTag;

#[test]
fn tags_order_from_internal_to_public() {
    assert!(ReleaseTag::Internal < ReleaseTag::Alpha);
    assert!(ReleaseTag::Alpha < ReleaseTag::Beta);
    assert!(ReleaseTag::Beta < ReleaseTag::Public);
}

#[test]
fn visibility_at_tier() {
    assert!(ReleaseTag::Public.is_visible_at(ReleaseTag::Beta));
    assert!(ReleaseTag::Beta.is_visible_at(ReleaseTag::Beta));
    assert!(!ReleaseTag::Alpha.is_visible_at(ReleaseTag::Beta));
    assert!(ReleaseTag::Internal.is_visible_at(ReleaseTag::Internal));
}

#[test]
fn doc_tag_parsing() {
    assert_eq!(ReleaseTag::from_doc_tag("@beta"), Some(ReleaseTag::Beta));
    assert_eq!(ReleaseTag::from_doc_tag("@internal"), Some(ReleaseTag::Internal));
    assert_eq!(ReleaseTag::from_doc_tag("@preapproved"), None);
}

#[test]
fn from_str_and_display() {
    assert_eq!("Alpha".parse::<ReleaseTag>(), Ok(ReleaseTag::Alpha));
    insta::assert_snapshot!(
        "nightly".parse::<ReleaseTag>().unwrap_err(),
        @"unknown release tag 'nightly' (expected public, beta, alpha or internal)"
    );
    insta::assert_snapshot!(ReleaseTag::Public.to_string(), @"public");
}
