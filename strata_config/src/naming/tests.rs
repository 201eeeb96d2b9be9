//! Unit tests for key splitting and segment renaming.

use rstest::rstest;

use super::{NameTransformer, camel_case};

fn owned(parts: &[&str]) -> Option<Vec<String>> {
    Some(parts.iter().map(|p| (*p).to_owned()).collect())
}

#[rstest]
#[case("MAX_THREADS", "maxThreads")]
#[case("PORT", "port")]
#[case("jdbc_url", "jdbcUrl")]
#[case("_LEADING__AND__TRAILING_", "leadingAndTrailing")]
#[case("A_B_C", "aBC")]
#[case("", "")]
fn camel_cases_words(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(camel_case(input), expected);
}

#[rstest]
#[case("APP_SERVER__MAX_THREADS", owned(&["server", "maxThreads"]))]
#[case("APP_PORT", owned(&["port"]))]
#[case("APP_DB__POOL__MIN_IDLE", owned(&["db", "pool", "minIdle"]))]
#[case("app_PORT", None)]
#[case("OTHER_PORT", None)]
#[case("APP_", None)]
#[case("APP_A____B", None)]
fn environment_keys_split_and_rename(#[case] raw: &str, #[case] expected: Option<Vec<String>>) {
    assert_eq!(NameTransformer::environment("APP_").segments(raw), expected);
}

#[rstest]
#[case("server.port", owned(&["server", "port"]))]
#[case("db.jdbcUrl", owned(&["db", "jdbcUrl"]))]
#[case("users[0]", owned(&["users[0]"]))]
#[case("a..b", None)]
#[case("trailing.", None)]
fn property_keys_are_verbatim(#[case] raw: &str, #[case] expected: Option<Vec<String>>) {
    assert_eq!(NameTransformer::properties("").segments(raw), expected);
}

#[rstest]
fn prefix_is_stripped_from_property_keys() {
    let names = NameTransformer::properties("app.");
    assert_eq!(names.segments("app.server.port"), owned(&["server", "port"]));
    assert_eq!(names.segments("other.server.port"), None);
}

#[rstest]
fn custom_rename_replaces_camel_case() {
    let names = NameTransformer::environment("APP_").with_rename(str::to_lowercase);
    assert_eq!(names.segments("APP_SERVER__MAX_THREADS"), owned(&["server", "max_threads"]));
}

#[rstest]
fn custom_delimiter_is_honoured() {
    let names = NameTransformer::properties("").with_delimiter("/");
    assert_eq!(names.segments("server/port"), owned(&["server", "port"]));
}

#[rstest]
fn nest_builds_nested_objects_from_matching_keys() {
    let doc = NameTransformer::properties("app.").nest([
        ("app.server.port", "8080"),
        ("app.server.threads", "10"),
        ("other.port", "1"),
    ]);
    assert_eq!(
        doc,
        serde_json::json!({"server": {"port": "8080", "threads": "10"}})
    );
}
