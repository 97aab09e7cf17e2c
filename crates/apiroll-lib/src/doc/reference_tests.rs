use super::DeclarationReference;

#[test]
fn local_member_path() {
    let r = DeclarationReference::parse("Widget.render").unwrap();
    assert_eq!(r.package, None);
    assert_eq!(r.path, vec!["Widget", "render"]);
    assert!(!r.is_external("demo"));
}

#[test]
fn package_qualified() {
    let r = DeclarationReference::parse("@scope/other#Base.method").unwrap();
    assert_eq!(r.package.as_deref(), Some("@scope/other"));
    assert!(r.is_external("demo"));
    assert!(!r.is_external("@scope/other"));
    assert_eq!(r.to_string(), "@scope/other#Base.method");
}

#[test]
fn selectors_are_ignored() {
    let r = DeclarationReference::parse("(parse:1).(overload:static)").unwrap();
    assert_eq!(r.path, vec!["parse", "overload"]);

    let r = DeclarationReference::parse("Table.get:instance").unwrap();
    assert_eq!(r.path, vec!["Table", "get"]);
}

#[test]
fn empty_references_are_rejected() {
    assert_eq!(DeclarationReference::parse(""), None);
    assert_eq!(DeclarationReference::parse("A..B"), None);
    assert_eq!(DeclarationReference::parse("pkg#"), None);
}
