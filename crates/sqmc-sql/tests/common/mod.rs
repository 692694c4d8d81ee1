//! Shared fixtures for translation and rendering tests
//!
//! The fixture domain:
//! - `Company` with an embedded `Address`, a `ceo` and two collections
//! - `Customer`, whose `account_manager` joins on an employee badge
//! - `Employee`, whose optional details live in a secondary table

#![allow(dead_code)]

use sqmc_ast::{
    FromElementId, SelectStatement, SqmExpression, SqmNamedParameter, SqmPositionalParameter,
};
use sqmc_diagnostics::Result;
use sqmc_model::{
    AttributeClassification, AttributeMapping, CollectionElement, CollectionMapping,
    ColumnMapping, EntityMapping, IdentifierMapping, MappingRegistry, ParameterBindings,
    SecondaryTableMapping,
};
use sqmc_sql::{
    interpret, render, Interpretation, JdbcSelect, RenderOptions, SelectStatementInterpreter,
    TranslationContext,
};
use sqmc_types::{BasicType, CompositeType, OrmType, StandardDialect};

pub fn address_type() -> CompositeType {
    CompositeType::new("Address")
        .with_component("street", BasicType::String)
        .with_component("city", BasicType::String)
        .with_component("zip", BasicType::String)
}

pub fn company() -> EntityMapping {
    EntityMapping::new(
        "Company",
        "company_table",
        IdentifierMapping::simple("id", "id", BasicType::Long),
    )
    .with_attribute(AttributeMapping::basic("name", "name", BasicType::String))
    .with_attribute(AttributeMapping::embedded(
        "address",
        address_type(),
        &["street", "city", "zip"],
    ))
    .with_attribute(AttributeMapping::many_to_one(
        "ceo",
        "Employee",
        vec![ColumnMapping::new("ceo_id", BasicType::Long)],
    ))
    .with_attribute(AttributeMapping::plural("customers", "Company.customers"))
    .with_attribute(AttributeMapping::plural("employees", "Company.employees"))
}

pub fn customer() -> EntityMapping {
    EntityMapping::new(
        "Customer",
        "customer_table",
        IdentifierMapping::simple("id", "id", BasicType::Long),
    )
    .with_attribute(AttributeMapping::basic("name", "name", BasicType::String))
    .with_attribute(AttributeMapping::many_to_one(
        "company",
        "Company",
        vec![ColumnMapping::new("company_id", BasicType::Long)],
    ))
    .with_attribute(
        AttributeMapping::many_to_one(
            "account_manager",
            "Employee",
            vec![ColumnMapping::new("manager_badge", BasicType::String)],
        )
        .with_unique_key("badge"),
    )
    .with_attribute(AttributeMapping::plural("nicknames", "Customer.nicknames"))
}

pub fn employee() -> EntityMapping {
    EntityMapping::new(
        "Employee",
        "employee_table",
        IdentifierMapping::simple("id", "id", BasicType::Long),
    )
    .with_attribute(AttributeMapping::basic("name", "name", BasicType::String))
    .with_attribute(AttributeMapping::basic("badge", "badge", BasicType::String))
    .with_attribute(AttributeMapping {
        name: "salary".to_string(),
        classification: AttributeClassification::Basic(BasicType::BigDecimal),
        columns: vec![ColumnMapping::new("salary", BasicType::BigDecimal).in_table("employee_details")],
    })
    .with_secondary_table(SecondaryTableMapping {
        table: "employee_details".to_string(),
        key_columns: vec!["employee_id".to_string()],
        optional: true,
    })
}

pub fn metamodel() -> MappingRegistry {
    MappingRegistry::new()
        .with_entity(company())
        .with_entity(customer())
        .with_entity(employee())
        .with_collection(CollectionMapping {
            role: "Company.customers".to_string(),
            owner_entity: "Company".to_string(),
            table: "customer_table".to_string(),
            key_columns: vec!["company_id".to_string()],
            element: CollectionElement::Entity {
                entity_name: "Customer".to_string(),
                columns: Vec::new(),
            },
        })
        .with_collection(CollectionMapping {
            role: "Company.employees".to_string(),
            owner_entity: "Company".to_string(),
            table: "company_employee".to_string(),
            key_columns: vec!["company_id".to_string()],
            element: CollectionElement::Entity {
                entity_name: "Employee".to_string(),
                columns: vec!["employee_id".to_string()],
            },
        })
        .with_collection(CollectionMapping {
            role: "Customer.nicknames".to_string(),
            owner_entity: "Customer".to_string(),
            table: "customer_nicknames".to_string(),
            key_columns: vec!["customer_id".to_string()],
            element: CollectionElement::Basic {
                column: "nickname".to_string(),
                sql_type: BasicType::String,
            },
        })
}

pub fn id(uid: u32) -> FromElementId {
    FromElementId(uid)
}

pub fn attr(uid: u32, attribute: &str) -> SqmExpression {
    SqmExpression::attribute(FromElementId(uid), attribute)
}

pub fn named(name: &str, anticipated_type: OrmType) -> SqmExpression {
    SqmExpression::NamedParameter(SqmNamedParameter {
        name: name.to_string(),
        anticipated_type: Some(anticipated_type),
    })
}

pub fn positional(position: u32, anticipated_type: OrmType) -> SqmExpression {
    SqmExpression::PositionalParameter(SqmPositionalParameter {
        position,
        anticipated_type: Some(anticipated_type),
    })
}

pub fn string_type() -> OrmType {
    OrmType::Basic(BasicType::String)
}

pub fn long_type() -> OrmType {
    OrmType::Basic(BasicType::Long)
}

/// Translate and render against the fixture metamodel
pub fn compile(statement: &SelectStatement) -> Result<JdbcSelect> {
    let metamodel = metamodel();
    let select = interpret(statement, TranslationContext::new(&metamodel))?;
    render(&select, &StandardDialect::default(), &RenderOptions::default())
}

pub fn compile_with_bindings(
    statement: &SelectStatement,
    bindings: &dyn ParameterBindings,
) -> Result<JdbcSelect> {
    let metamodel = metamodel();
    let ctx = TranslationContext::new(&metamodel).with_parameter_bindings(bindings);
    let select = interpret(statement, ctx)?;
    render(&select, &StandardDialect::default(), &RenderOptions::default())
}

/// Translate keeping the final from-clause index
pub fn translate(statement: &SelectStatement) -> Result<Interpretation> {
    let metamodel = metamodel();
    SelectStatementInterpreter::new(TranslationContext::new(&metamodel)).translate(statement)
}

/// Render SQL, panicking with the diagnostic on failure
#[track_caller]
pub fn sql_of(statement: &SelectStatement) -> String {
    match compile(statement) {
        Ok(select) => select.sql,
        Err(err) => panic!("compilation failed: {}", err),
    }
}
