use depresolve::overrides::OverrideTable;

#[test]
fn test_whole_match_substitution() {
    let table = OverrideTable::from_pairs([("^acme/.*$", "https://vcs/acme/$0")]).unwrap();
    assert_eq!(
        table.lookup("acme/widgets").as_deref(),
        Some("https://vcs/acme/acme/widgets")
    );
}

#[test]
fn test_capture_group_substitution() {
    let table = OverrideTable::from_pairs([(
        "^org\\.apache\\.(\\w+)/.*$",
        "https://github.com/apache/${1}",
    )])
    .unwrap();
    assert_eq!(
        table.lookup("org.apache.commons/commons-lang3").as_deref(),
        Some("https://github.com/apache/commons")
    );
}

#[test]
fn test_first_match_wins() {
    let table = OverrideTable::from_pairs([
        ("^acme/special$", "https://vcs/special"),
        ("^acme/.*$", "https://vcs/generic"),
    ])
    .unwrap();
    assert_eq!(table.lookup("acme/special").as_deref(), Some("https://vcs/special"));
    assert_eq!(table.lookup("acme/other").as_deref(), Some("https://vcs/generic"));
}

#[test]
fn test_unanchored_pattern_replaces_every_match() {
    let table = OverrideTable::from_pairs([("guava", "G")]).unwrap();
    assert_eq!(table.lookup("com.google.guava/guava").as_deref(), Some("com.google.G/G"));
}

#[test]
fn test_no_match() {
    let table = OverrideTable::from_pairs([("^acme/.*$", "https://vcs/$0")]).unwrap();
    assert_eq!(table.lookup("other/widgets"), None);
    assert_eq!(OverrideTable::new().lookup("acme/widgets"), None);
}

#[test]
fn test_invalid_pattern_rejected() {
    assert!(OverrideTable::from_pairs([("[", "x")]).is_err());
}

#[test]
fn test_braced_group_reference_before_text() {
    let braced = OverrideTable::from_pairs([("^acme/(\\w+)$", "https://vcs/${1}abc")]).unwrap();
    assert_eq!(braced.lookup("acme/widgets").as_deref(), Some("https://vcs/widgetsabc"));

    let bare = OverrideTable::from_pairs([("^acme/(\\w+)$", "https://vcs/$1abc")]).unwrap();
    assert_eq!(bare.lookup("acme/widgets").as_deref(), Some("https://vcs/"));
}
