//! Integration tests for path building
//!
//! `create_path` substitutes params, appends search params and a hash.

use pretty_assertions::assert_eq;
use rstest::rstest;
use typesafe_router::{create_path, PathOptions};

fn params() -> PathOptions {
    PathOptions::new().with_param("paramA", "one").with_param("paramB", "two")
}

fn search() -> PathOptions {
    PathOptions::new()
        .with_search_param("searchA", "one")
        .with_search_param("searchB", "two")
}

#[rstest]
#[case("", PathOptions::new(), "")]
#[case("base", PathOptions::new(), "base")]
#[case(":paramA/:paramB", params(), "one/two")]
#[case("", search(), "?searchA=one&searchB=two")]
#[case("", PathOptions::new().with_hash("hashString"), "#hashString")]
#[case("/", PathOptions::new().with_hash(""), "/")]
fn test_create_path(#[case] to: &str, #[case] options: PathOptions, #[case] expected: &str) {
    assert_eq!(create_path(to, &options).unwrap(), expected);
}

#[test]
fn test_create_path_all_options() {
    let options = params()
        .with_search_param("searchA", "one")
        .with_search_param("searchB", "two")
        .with_hash("hashString");

    let path = create_path("base/:paramA/:paramB", &options).unwrap();
    assert_eq!(path, "base/one/two?searchA=one&searchB=two#hashString");
    assert!(!path.contains(':'));
}

#[test]
fn test_create_path_missing_param() {
    assert!(create_path("users/:id", &search()).is_err());
}
