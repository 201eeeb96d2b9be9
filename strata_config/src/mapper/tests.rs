//! Binding coverage: coercion, error paths and strictness policy.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{MapperConfig, ObjectMapper};
use crate::ConfigError;

#[derive(Debug, Deserialize, PartialEq)]
struct Server {
    port: u16,
    #[serde(default)]
    threads: Option<u32>,
    #[serde(default)]
    secure: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
struct App {
    server: Server,
    #[serde(default)]
    hosts: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Mode {
    Fast,
    Safe { retries: u8 },
}

#[fixture]
fn mapper() -> ObjectMapper {
    ObjectMapper::default()
}

fn binding_path(err: &ConfigError) -> Option<&str> {
    match err {
        ConfigError::Binding { path, .. } => Some(path),
        _ => None,
    }
}

#[rstest]
fn strings_coerce_into_numbers_and_bools(mapper: ObjectMapper) -> Result<()> {
    let doc = json!({"port": "8080", "threads": "10", "secure": "TRUE"});
    let server: Server = mapper.bind(&doc, "").map_err(|e| anyhow!(e.to_string()))?;
    ensure!(
        server
            == Server {
                port: 8080,
                threads: Some(10),
                secure: true
            },
        "unexpected {server:?}"
    );
    Ok(())
}

#[rstest]
fn numbers_coerce_into_strings(mapper: ObjectMapper) -> Result<()> {
    let names: BTreeMap<String, String> = mapper
        .bind(&json!({"port": 8080, "debug": false}), "")
        .map_err(|e| anyhow!(e.to_string()))?;
    ensure!(names.get("port").map(String::as_str) == Some("8080"), "port");
    ensure!(names.get("debug").map(String::as_str) == Some("false"), "debug");
    Ok(())
}

#[rstest]
#[case(json!("a, b,c"), vec!["a", "b", "c"])]
#[case(json!(""), vec![])]
#[case(json!("single"), vec!["single"])]
#[case(json!(r#"["x", "y,z"]"#), vec!["x", "y,z"])]
#[case(json!(["p", "q"]), vec!["p", "q"])]
fn sequences_accept_comma_lists(
    mapper: ObjectMapper,
    #[case] hosts: Value,
    #[case] expected: Vec<&str>,
) -> Result<()> {
    let doc = json!({"server": {"port": 1}, "hosts": hosts});
    let app: App = mapper.bind(&doc, "").map_err(|e| anyhow!(e.to_string()))?;
    ensure!(app.hosts == expected, "unexpected hosts {:?}", app.hosts);
    Ok(())
}

#[rstest]
fn splitting_can_be_disabled() {
    let mapper = ObjectMapper::new(MapperConfig::default().split_comma_lists(false));
    let doc = json!({"server": {"port": 1}, "hosts": "a,b"});
    assert!(mapper.bind::<App>(&doc, "").is_err());
}

#[rstest]
fn errors_name_the_failing_path(mapper: ObjectMapper) -> Result<()> {
    let doc = json!({"server": {"port": "eighty"}});
    let Err(err) = mapper.bind::<App>(&doc, "") else {
        return Err(anyhow!("expected binding failure"));
    };
    ensure!(
        binding_path(&err) == Some("/server/port"),
        "unexpected error {err}"
    );
    Ok(())
}

#[rstest]
fn missing_fields_report_their_own_path(mapper: ObjectMapper) -> Result<()> {
    let doc = json!({"server": {"threads": 2}});
    let Err(err) = mapper.bind::<App>(&doc, "") else {
        return Err(anyhow!("expected binding failure"));
    };
    ensure!(binding_path(&err) == Some("/server/port"), "unexpected error {err}");
    ensure!(err.to_string().contains("missing field `port`"), "{err}");
    Ok(())
}

#[rstest]
fn missing_fields_of_null_nodes_are_reported_below_the_base(mapper: ObjectMapper) -> Result<()> {
    let Err(err) = mapper.bind::<Server>(&Value::Null, "/server") else {
        return Err(anyhow!("expected binding failure"));
    };
    ensure!(binding_path(&err) == Some("/server/port"), "unexpected error {err}");
    Ok(())
}

#[rstest]
fn base_path_prefixes_reported_paths(mapper: ObjectMapper) -> Result<()> {
    let doc = json!({"port": -1});
    let Err(err) = mapper.bind::<Server>(&doc, "/server") else {
        return Err(anyhow!("expected binding failure"));
    };
    ensure!(
        binding_path(&err) == Some("/server/port"),
        "unexpected error {err}"
    );
    Ok(())
}

#[rstest]
fn unknown_fields_are_tolerated_by_default(mapper: ObjectMapper) {
    let doc = json!({"port": 1, "extra": "ignored"});
    assert!(mapper.bind::<Server>(&doc, "").is_ok());
}

#[rstest]
fn unknown_fields_can_be_rejected() -> Result<()> {
    let mapper = ObjectMapper::new(MapperConfig::default().deny_unknown_fields(true));
    let doc = json!({"port": 1, "extra": "rejected"});
    let Err(err) = mapper.bind::<Server>(&doc, "") else {
        return Err(anyhow!("expected unknown field to be rejected"));
    };
    ensure!(binding_path(&err) == Some("/extra"), "unexpected error {err}");
    Ok(())
}

#[rstest]
fn strict_mapper_refuses_string_numbers() {
    let mapper = ObjectMapper::new(MapperConfig::default().coerce_scalars(false));
    assert!(mapper.bind::<Server>(&json!({"port": "8080"}), "").is_err());
    assert!(mapper.bind::<Server>(&json!({"port": 8080}), "").is_ok());
}

#[rstest]
fn null_binds_as_empty_struct_with_defaults(mapper: ObjectMapper) -> Result<()> {
    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Optional {
        level: Option<String>,
    }
    let bound: Optional = mapper.bind(&Value::Null, "").map_err(|e| anyhow!(e.to_string()))?;
    ensure!(bound.level.is_none(), "expected default");
    Ok(())
}

#[rstest]
#[case(json!("fast"), Mode::Fast)]
#[case(json!({"safe": {"retries": "3"}}), Mode::Safe { retries: 3 })]
fn enums_bind_from_strings_and_objects(
    mapper: ObjectMapper,
    #[case] doc: Value,
    #[case] expected: Mode,
) -> Result<()> {
    let mode: Mode = mapper.bind(&doc, "").map_err(|e| anyhow!(e.to_string()))?;
    ensure!(mode == expected, "unexpected {mode:?}");
    Ok(())
}

#[rstest]
fn numeric_map_keys_are_coerced(mapper: ObjectMapper) -> Result<()> {
    let ports: BTreeMap<u16, String> = mapper
        .bind(&json!({"80": "http", "443": "https"}), "")
        .map_err(|e| anyhow!(e.to_string()))?;
    ensure!(ports.get(&443).map(String::as_str) == Some("https"), "{ports:?}");
    Ok(())
}

#[rstest]
fn pointer_segments_are_escaped(mapper: ObjectMapper) -> Result<()> {
    let doc = json!({"a/b": {"port": "x"}});
    let Err(err) = mapper.bind::<BTreeMap<String, Server>>(&doc, "") else {
        return Err(anyhow!("expected binding failure"));
    };
    ensure!(binding_path(&err) == Some("/a~1b/port"), "unexpected error {err}");
    Ok(())
}
