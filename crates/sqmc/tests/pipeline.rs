//! Facade pipeline over JSON fixtures

use pretty_assertions::assert_eq;
use sqmc::diagnostics::{SQM0001, SQM0100, SQM0303};
use sqmc::model::{MappingRegistry, NoParameterBindings, QueryParameterBindings};
use sqmc::sql::{ParameterBinder, ReaderKind};
use sqmc::types::{BasicType, OrmType};
use sqmc::{compile, translate, SqmcConfig, Statement};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

fn statement(name: &str) -> Statement {
    serde_json::from_str(&read_fixture(name)).unwrap()
}

fn bindings() -> QueryParameterBindings {
    QueryParameterBindings::from_json(&read_fixture("bindings.json")).unwrap()
}

#[test]
fn test_compile_company_query() {
    let metamodel = MappingRegistry::from_json_file(fixture("mapping.json")).unwrap();
    let config = SqmcConfig::default();
    let select = compile(
        &statement("company_query.json"),
        &metamodel,
        &bindings(),
        &config.dialect,
        &config,
    )
    .unwrap();

    assert_eq!(
        select.sql,
        "select company1_0.name, count(customers1_0.id) \
         from company_table as company1_0 \
         inner join customer_table as customers1_0 on company1_0.id = customers1_0.company_id \
         where company1_0.id <> ?"
    );
    assert_eq!(
        select.parameter_binders,
        vec![ParameterBinder::Named {
            name: "excludeId".to_string(),
            bind_type: OrmType::Basic(BasicType::Long),
        }]
    );
    assert_eq!(select.returns.len(), 2);
    assert_eq!(select.returns[0].result_variable.as_deref(), Some("name"));
    assert_eq!(select.returns[1].reader.start_position, 2);
    assert_eq!(
        select.returns[1].reader.kind,
        ReaderKind::Basic(BasicType::Long)
    );
}

#[test]
fn test_configured_operator_from_file() {
    let metamodel = MappingRegistry::from_json_file(fixture("mapping.json")).unwrap();
    let config = SqmcConfig::from_file(fixture("config.json")).unwrap();
    assert_eq!(config.query_options.fetch_size, Some(50));

    let select = compile(
        &statement("company_query.json"),
        &metamodel,
        &bindings(),
        &config.dialect,
        &config,
    )
    .unwrap();
    assert!(select.sql.ends_with("where company1_0.id != ?"), "{}", select.sql);
}

#[test]
fn test_missing_binding_type() {
    let metamodel = MappingRegistry::from_json_file(fixture("mapping.json")).unwrap();
    let config = SqmcConfig::default();
    let err = translate(
        &statement("company_query.json"),
        &metamodel,
        &NoParameterBindings,
        &config,
    )
    .unwrap_err();
    assert_eq!(err.code(), SQM0100);
    assert!(err.to_string().contains(":excludeId"));
}

#[test]
fn test_update_statement_is_rejected() {
    let metamodel = MappingRegistry::from_json_file(fixture("mapping.json")).unwrap();
    let config = SqmcConfig::default();
    let err = translate(
        &statement("update_statement.json"),
        &metamodel,
        &NoParameterBindings,
        &config,
    )
    .unwrap_err();
    assert_eq!(err.code(), SQM0001);
    assert!(err.is_fatal());
}

#[test]
fn test_fixture_mapping_is_valid() {
    let metamodel = MappingRegistry::from_json_file(fixture("mapping.json")).unwrap();
    assert!(metamodel.validate().is_empty());
    assert_eq!(metamodel.entities().count(), 2);
}

#[test]
fn test_malformed_mapping() {
    let err = MappingRegistry::from_json(r#"{"entities": [{"name": "Company"}]}"#).unwrap_err();
    assert_eq!(err.code(), SQM0303);
}
