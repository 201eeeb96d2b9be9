//! Unit tests for configuration sources.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_json::json;
use url::Url;

use super::bytes::{Location, resolve};
use super::properties_format::{decode_text, parse_properties};
use super::*;
use crate::document::SourceKind;
use crate::format::Format;
use crate::{ConfigError, ConfigResult};

#[fixture]
fn mapper() -> ObjectMapper {
    ObjectMapper::default()
}

fn parse(text: &str) -> Result<Vec<(String, String)>> {
    parse_properties(text).map_err(|e| anyhow!(e.message))
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[rstest]
fn properties_text_skips_comments_and_blank_lines() -> Result<()> {
    let parsed = parse("# comment\n! also a comment\n\n   \na=1\n")?;
    ensure!(parsed == pairs(&[("a", "1")]));
    Ok(())
}

#[rstest]
#[case("a=1", "a", "1")]
#[case("a = 1", "a", "1")]
#[case("a:1", "a", "1")]
#[case("a 1", "a", "1")]
#[case("a   =  spaced value", "a", "spaced value")]
#[case("flag", "flag", "")]
#[case("url=http://x:80/", "url", "http://x:80/")]
fn properties_separators(#[case] line: &str, #[case] key: &str, #[case] value: &str) -> Result<()> {
    ensure!(parse(line)? == pairs(&[(key, value)]));
    Ok(())
}

#[rstest]
fn properties_lines_continue_after_odd_backslashes() -> Result<()> {
    let parsed = parse("list=a,\\\n    b,\\\n    c\npath=C:\\\\\nnext=1\n")?;
    ensure!(parsed == pairs(&[("list", "a,b,c"), ("path", "C:\\"), ("next", "1")]));
    Ok(())
}

#[rstest]
#[case(r"key\ with\ space=v", "key with space", "v")]
#[case(r"tab=a\tb", "tab", "a\tb")]
#[case(r"greek=\u03b1", "greek", "\u{3b1}")]
#[case(r"emoji=\uD83D\uDE00", "emoji", "\u{1F600}")]
#[case(r"a\=b=c", "a=b", "c")]
fn properties_escapes(#[case] line: &str, #[case] key: &str, #[case] value: &str) -> Result<()> {
    ensure!(parse(line)? == pairs(&[(key, value)]));
    Ok(())
}

#[rstest]
#[case("ok=1\nbad=\\u12", 2)]
#[case("bad=\\uZZZZ", 1)]
#[case("a=1\nb=2\nbad=\\uD83D", 3)]
fn malformed_unicode_escapes_report_the_line(#[case] text: &str, #[case] line: usize) -> Result<()> {
    let err = parse_properties(text)
        .err()
        .ok_or_else(|| anyhow!("escape should be rejected"))?;
    ensure!(err.line == Some(line), "reported {:?}", err.line);
    Ok(())
}

#[rstest]
fn properties_bytes_fall_back_to_latin1() {
    assert_eq!(decode_text(b"name=caf\xe9"), "name=caf\u{e9}");
    assert_eq!(decode_text("name=caf\u{e9}".as_bytes()), "name=caf\u{e9}");
}

#[rstest]
fn property_keys_nest_on_dots(mapper: ObjectMapper) -> Result<()> {
    let source = PropertiesSource::from_map([
        ("db.url", "jdbc:h2:mem:"),
        ("db.pool.max", "8"),
        ("name", "svc"),
    ]);
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"db": {"url": "jdbc:h2:mem:", "pool": {"max": "8"}}, "name": "svc"}));
    Ok(())
}

#[rstest]
fn property_prefix_filters_and_strips(mapper: ObjectMapper) -> Result<()> {
    let source = PropertiesSource::from_map([
        ("app.server.port", "80"),
        ("app.name", "svc"),
        ("other.name", "ignored"),
        ("app.", "empty remainder"),
    ])
    .with_prefix("app.");
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"server": {"port": "80"}, "name": "svc"}));
    ensure!(doc.as_object().map(serde_json::Map::len) == Some(2));
    Ok(())
}

#[rstest]
fn bracketed_property_keys_stay_literal(mapper: ObjectMapper) -> Result<()> {
    let source = PropertiesSource::from_map([("users[0].name", "ada"), ("users[1].name", "bob")]);
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"users[0]": {"name": "ada"}, "users[1]": {"name": "bob"}}));
    Ok(())
}

#[rstest]
fn properties_documents_are_read_from_bytes(mapper: ObjectMapper) -> Result<()> {
    let source =
        PropertiesSource::from_bytes(ByteSource::bytes("app.a=1\nother=2\napp.a=3\n")).with_prefix("app.");
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"a": "3"}));
    ensure!(source.kind() == SourceKind::Properties);
    Ok(())
}

#[rstest]
fn malformed_properties_documents_are_parse_errors(mapper: ObjectMapper) -> Result<()> {
    let source = PropertiesSource::from_bytes(ByteSource::bytes("a=1\nb=\\u00"));
    let err = source
        .load(&mapper)
        .err()
        .ok_or_else(|| anyhow!("malformed escape should fail"))?;
    ensure!(matches!(&*err, ConfigError::Parse { line: Some(2), .. }));
    Ok(())
}

#[rstest]
fn system_property_sources_report_their_kind() {
    let source = PropertiesSource::system();
    assert_eq!(source.kind(), SourceKind::SystemProperties);
    assert_eq!(source.prefix(), crate::DEFAULT_PROP_PREFIX);
    assert_eq!(source.describe(), "system properties");
}

#[rstest]
fn environment_names_nest_and_camel_case(mapper: ObjectMapper) -> Result<()> {
    let source = EnvironmentSource::prefixed("APP_").with_vars([
        ("APP_SERVER__MAX_THREADS", "4"),
        ("APP_DB__URL", "postgres://db"),
        ("APP_", "dropped"),
        ("PATH", "/bin"),
    ]);
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"server": {"maxThreads": "4"}, "db": {"url": "postgres://db"}}));
    ensure!(source.describe() == "environment (fixed)");
    Ok(())
}

#[rstest]
fn environment_rename_replaces_camel_case(mapper: ObjectMapper) -> Result<()> {
    let source = EnvironmentSource::with_rename("APP_", str::to_ascii_lowercase)
        .with_vars([("APP_SERVER__MAX_THREADS", "4")]);
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"server": {"max_threads": "4"}}));
    Ok(())
}

fn first_var_only(vars: &BTreeMap<String, String>) -> ConfigResult<Document> {
    let (key, value) = vars
        .iter()
        .next()
        .ok_or_else(|| ConfigError::configuration("no variables").shared())?;
    Ok(json!({ "first": { key.as_str(): value } }))
}

#[rstest]
fn custom_environment_parsers_bypass_naming(mapper: ObjectMapper) -> Result<()> {
    let source = EnvironmentSource::with_parser(first_var_only).with_vars([("Z", "26"), ("A__B", "1")]);
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"first": {"A__B": "1"}}));

    let empty = EnvironmentSource::with_parser(first_var_only).with_vars(BTreeMap::<String, String>::new());
    ensure!(empty.load(&mapper).is_err());
    Ok(())
}

#[rstest]
#[case("https://example.org/app.json", true)]
#[case("file:///etc/app.json", true)]
#[case("/etc/app.json", false)]
#[case("config/app.json", false)]
#[case("C:\\config\\app.json", false)]
#[case("c:/config/app.json", false)]
#[case("dev:app.json", false)]
#[case("ftp://example.org/app.json", false)]
fn path_or_url_resolution(#[case] location: &str, #[case] is_url: bool) {
    assert_eq!(matches!(resolve(location), Location::Url(_)), is_url);
}

#[rstest]
fn byte_sources_read_files_and_file_urls() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("app.json");
    std::fs::write(&path, br#"{"a": 1}"#)?;

    let by_path = ByteSource::Path(path.clone()).read();
    let url = Url::from_file_path(&path).map_err(|()| anyhow!("not absolute"))?;
    let by_url = ByteSource::Url(url.clone()).read();
    let by_string = ByteSource::PathOrUrl(url.to_string()).read();

    for result in [by_path, by_url, by_string] {
        let bytes = result.map_err(|e| anyhow!(e.to_string()))?;
        ensure!(bytes == br#"{"a": 1}"#);
    }
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn byte_sources_follow_symlinks_out_of_their_directory() -> Result<()> {
    let target_dir = tempfile::tempdir()?;
    let link_dir = tempfile::tempdir()?;
    let target = target_dir.path().join("app.json");
    std::fs::write(&target, br#"{"a": 1}"#)?;
    let link = link_dir.path().join("linked.json");
    std::os::unix::fs::symlink(&target, &link)?;

    let bytes = ByteSource::Path(link)
        .read()
        .map_err(|e| anyhow!(e.to_string()))?;
    ensure!(bytes == br#"{"a": 1}"#);
    Ok(())
}

#[rstest]
fn byte_sources_read_paths_that_climb_with_parent_segments() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("nested"))?;
    std::fs::write(dir.path().join("app.json"), b"{}")?;
    let climbing = dir.path().join("nested").join("..").join("app.json");
    let bytes = ByteSource::Path(climbing)
        .read()
        .map_err(|e| anyhow!(e.to_string()))?;
    ensure!(bytes == b"{}");
    Ok(())
}

#[rstest]
fn unknown_schemes_in_locations_are_read_as_paths() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dev:app.json");
    std::fs::write(&path, b"{}")?;
    let location = path
        .to_str()
        .ok_or_else(|| anyhow!("temp path is not UTF-8"))?;
    let bytes = ByteSource::PathOrUrl(location.to_owned())
        .read()
        .map_err(|e| anyhow!(e.to_string()))?;
    ensure!(bytes == b"{}");
    Ok(())
}

#[rstest]
#[case("a=1\rb=2\r", &[("a", "1"), ("b", "2")])]
#[case("a=1\r\nb=2", &[("a", "1"), ("b", "2")])]
#[case("a=1\r\n\r\nb=2\n", &[("a", "1"), ("b", "2")])]
#[case("list=x,\\\r  y\rnext=3", &[("list", "x,y"), ("next", "3")])]
fn properties_accept_every_line_terminator(
    #[case] text: &str,
    #[case] expected: &[(&str, &str)],
) -> Result<()> {
    ensure!(parse(text)? == pairs(expected));
    Ok(())
}

#[rstest]
fn carriage_return_lines_keep_line_numbers() -> Result<()> {
    let err = parse_properties("a=1\rb=2\rbad=\\u12")
        .err()
        .ok_or_else(|| anyhow!("escape should be rejected"))?;
    ensure!(err.line == Some(3), "reported {:?}", err.line);
    Ok(())
}

#[rstest]
fn missing_files_are_unreadable() -> Result<()> {
    let err = ByteSource::Path(PathBuf::from("/no/such/dir/app.json"))
        .read()
        .err()
        .ok_or_else(|| anyhow!("read should fail"))?;
    ensure!(matches!(&*err, ConfigError::SourceUnreadable { .. }));
    ensure!(err.source_id() == Some("/no/such/dir/app.json"));
    Ok(())
}

#[rstest]
fn unsupported_url_schemes_are_unreadable() -> Result<()> {
    let url = Url::parse("ftp://example.org/app.json")?;
    let err = ByteSource::Url(url)
        .read()
        .err()
        .ok_or_else(|| anyhow!("ftp should be rejected"))?;
    ensure!(err.to_string().contains("unsupported URL scheme 'ftp'"));
    Ok(())
}

#[rstest]
fn structured_sources_keep_document_nesting(mapper: ObjectMapper) -> Result<()> {
    let source = StructuredSource::new(
        Format::Json,
        ByteSource::bytes(r#"{"server_name": {"MAX": [1, 2]}}"#),
    );
    let doc = source.load(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(doc == json!({"server_name": {"MAX": [1, 2]}}));
    Ok(())
}

#[rstest]
fn unknown_formats_need_a_codec(mapper: ObjectMapper) -> Result<()> {
    let source = StructuredSource::new(Format::Other("ini".to_owned()), ByteSource::bytes("a=1"));
    let err = source
        .load(&mapper)
        .err()
        .ok_or_else(|| anyhow!("no codec should be found"))?;
    ensure!(matches!(&*err, ConfigError::Parse { .. }));
    ensure!(err.to_string().contains("ini"));
    Ok(())
}

#[rstest]
fn malformed_structured_documents_name_the_source(mapper: ObjectMapper) -> Result<()> {
    let source = StructuredSource::new(Format::Json, ByteSource::bytes("{\n  \"a\": }"));
    let err = source
        .load(&mapper)
        .err()
        .ok_or_else(|| anyhow!("malformed JSON should fail"))?;
    ensure!(matches!(&*err, ConfigError::Parse { line: Some(2), .. }));
    ensure!(err.source_id().is_some_and(|id| id.starts_with("json")));
    Ok(())
}

#[rstest]
fn custom_sources_produce_tagged_layers(mapper: ObjectMapper) -> Result<()> {
    let source = ConfigurationSource::from(CustomSource::new("static", |_| Ok(json!({"k": true}))));
    let layer = source.load_layer(&mapper).map_err(|e| anyhow!(e.to_string()))?;
    ensure!(layer.kind() == SourceKind::Custom);
    ensure!(layer.origin() == "custom source 'static'");
    ensure!(layer.value() == &json!({"k": true}));
    Ok(())
}
