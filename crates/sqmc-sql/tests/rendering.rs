//! End-to-end: SQM select statement to SQL text, binders and returns

mod common;

use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sqmc_ast::{
    BinaryArithmeticOperator, FromElementSpace, InstantiationTargetNature, OrderByClause,
    RelationalOperator, SelectStatement, SortOrder, SqmAggregate, SqmAttributeJoin,
    SqmCaseSearched, SqmCoalesce, SqmCrossJoin, SqmDynamicInstantiation,
    SqmDynamicInstantiationArgument, SqmExpression, SqmFilterPredicate, SqmFromClause,
    SqmInListPredicate, SqmInSubQueryPredicate, SqmInstantiationTarget, SqmJoin,
    SqmLikePredicate, SqmLiteral, SqmPredicate, SqmQuerySpec, SqmRoot, SqmSearchedWhen,
    SqmSelectClause, SqmSelection, SqmSortSpecification, SqmUnaryOperation, UnaryOperator,
};
use sqmc_diagnostics::SQM0201;
use sqmc_sql::{
    interpret, render, DynamicInstantiationTarget, ParameterBinder, ReaderKind, RenderOptions,
    ReturnReader, TranslationContext,
};
use sqmc_types::{BasicType, JoinType, LiteralValue, OrmType, StandardDialect};

fn space(root: SqmRoot, joins: Vec<SqmJoin>) -> FromElementSpace {
    joins
        .into_iter()
        .fold(FromElementSpace::new(root), |space, join| space.join(join))
}

fn companies(joins: Vec<SqmJoin>) -> SqmFromClause {
    SqmFromClause::new(vec![space(SqmRoot::new(1, "Company"), joins)])
}

fn query(from: SqmFromClause, selections: Vec<SqmSelection>) -> SqmQuerySpec {
    SqmQuerySpec::new(from).with_select(SqmSelectClause::new(selections))
}

fn selecting(from: SqmFromClause, expressions: Vec<SqmExpression>) -> SqmQuerySpec {
    query(from, expressions.into_iter().map(SqmSelection::new).collect())
}

fn reader(start_position: usize, column_count: usize, kind: ReaderKind) -> ReturnReader {
    ReturnReader {
        start_position,
        column_count,
        kind,
    }
}

#[test]
fn test_company_example() {
    let statement = SelectStatement::new(
        selecting(
            companies(vec![SqmAttributeJoin::new(2, id(1), "customers").into()]),
            vec![
                attr(1, "name"),
                SqmExpression::Count(SqmAggregate::new(SqmExpression::FromElementReference(id(2)))),
            ],
        )
        .with_where(SqmPredicate::relational(
            RelationalOperator::NotEqual,
            attr(1, "id"),
            named("excludeId", long_type()),
        )),
    );
    let select = compile(&statement).unwrap();

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
            bind_type: long_type(),
        }]
    );
    let readers: Vec<_> = select.returns.iter().map(|r| r.reader.clone()).collect();
    assert_eq!(
        readers,
        vec![
            reader(1, 1, ReaderKind::Basic(BasicType::String)),
            reader(2, 1, ReaderKind::Basic(BasicType::Long)),
        ]
    );
}

#[test]
fn test_configured_not_equal_operator() {
    let statement = SelectStatement::new(
        selecting(companies(vec![]), vec![attr(1, "name")]).with_where(SqmPredicate::relational(
            RelationalOperator::NotEqual,
            attr(1, "id"),
            named("excludeId", long_type()),
        )),
    );
    let metamodel = metamodel();
    let select_query = interpret(&statement, TranslationContext::new(&metamodel)).unwrap();
    let options = RenderOptions::default().with_not_equal_operator("!=");
    let select = render(&select_query, &StandardDialect::default(), &options).unwrap();
    assert!(select.sql.ends_with("where company1_0.id != ?"), "{}", select.sql);
}

#[test]
fn test_translation_is_deterministic() {
    let statement = SelectStatement::new(
        selecting(
            companies(vec![
                SqmAttributeJoin::new(2, id(1), "customers").into(),
                SqmAttributeJoin::new(3, id(1), "ceo").into(),
            ]),
            vec![SqmExpression::FromElementReference(id(1)), attr(3, "salary")],
        )
        .with_where(SqmPredicate::in_list(
            attr(2, "name"),
            vec![named("first", string_type()), SqmLiteral::string("second").into()],
        )),
    );
    assert_eq!(compile(&statement).unwrap(), compile(&statement).unwrap());
}

#[test]
fn test_literal_inlined_in_select_bound_in_where() {
    let statement = SelectStatement::new(
        selecting(companies(vec![]), vec![SqmLiteral::string("hello").into()]).with_where(
            SqmPredicate::relational(
                RelationalOperator::Equal,
                attr(1, "name"),
                SqmLiteral::string("hello").into(),
            ),
        ),
    );
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select 'hello' from company_table as company1_0 where company1_0.name = ?"
    );
    assert_eq!(
        select.parameter_binders,
        vec![ParameterBinder::Literal {
            value: LiteralValue::String("hello".to_string()),
            literal_type: Some(string_type()),
        }]
    );
    assert_eq!(select.placeholder_count(), 1);
}

#[test]
fn test_binders_follow_placeholder_order() {
    let statement = SelectStatement::new(
        selecting(companies(vec![]), vec![attr(1, "name")]).with_where(SqmPredicate::and(
            SqmPredicate::relational(
                RelationalOperator::Equal,
                attr(1, "id"),
                positional(1, long_type()),
            ),
            SqmPredicate::Like(SqmLikePredicate {
                match_expression: Box::new(attr(1, "name")),
                pattern: Box::new(positional(2, string_type())),
                escape: Some(Box::new(positional(3, OrmType::Basic(BasicType::Character)))),
                negated: false,
            }),
        )),
    );
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select company1_0.name from company_table as company1_0 \
         where company1_0.id = ? and company1_0.name like ? escape ?"
    );
    assert_eq!(select.placeholder_count(), select.parameter_binders.len());
    let bound: Vec<_> = select
        .parameter_binders
        .iter()
        .map(|binder| match binder {
            ParameterBinder::Positional { position, bind_type } => (*position, bind_type.clone()),
            other => panic!("unexpected binder {:?}", other),
        })
        .collect();
    assert_eq!(
        bound,
        vec![
            (1, long_type()),
            (2, string_type()),
            (3, OrmType::Basic(BasicType::Character)),
        ]
    );
}

#[test]
fn test_multi_column_values_grouped_in_predicates_only() {
    let address = || named("address", OrmType::Composite(address_type()));
    let statement = SelectStatement::new(
        selecting(companies(vec![]), vec![address(), attr(1, "address")]).with_where(
            SqmPredicate::relational(RelationalOperator::Equal, attr(1, "address"), address()),
        ),
    );
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select ?, ?, ?, company1_0.street, company1_0.city, company1_0.zip \
         from company_table as company1_0 \
         where (company1_0.street, company1_0.city, company1_0.zip) = (?, ?, ?)"
    );
    assert_eq!(select.parameter_binders.len(), 2);
    assert_eq!(select.placeholder_count(), 6);
    assert_eq!(select.bound_column_count(), select.placeholder_count());

    let composite = ReaderKind::Composite(address_type());
    assert_eq!(select.returns[0].reader, reader(1, 3, composite.clone()));
    assert_eq!(select.returns[1].reader, reader(4, 3, composite));
}

#[rstest]
#[case::plain(false, "where company1_0.id in(null)")]
#[case::negated(true, "where company1_0.id not in(null)")]
fn test_empty_in_list(#[case] negated: bool, #[case] expected_tail: &str) {
    let statement = SelectStatement::new(
        selecting(companies(vec![]), vec![attr(1, "name")]).with_where(SqmPredicate::InList(
            SqmInListPredicate {
                test_expression: Box::new(attr(1, "id")),
                list_expressions: Vec::new(),
                negated,
            },
        )),
    );
    let select = compile(&statement).unwrap();
    assert!(select.sql.ends_with(expected_tail), "{}", select.sql);
    assert!(select.parameter_binders.is_empty());
}

#[test]
fn test_joins_render_in_source_order() {
    let statement = SelectStatement::new(selecting(
        companies(vec![
            SqmAttributeJoin::new(2, id(1), "customers").into(),
            SqmAttributeJoin::new(3, id(1), "ceo")
                .with_join_type(JoinType::Left)
                .into(),
            SqmAttributeJoin::new(4, id(2), "nicknames").into(),
        ]),
        vec![attr(1, "name")],
    ));
    let sql = sql_of(&statement);

    assert_eq!(
        sql,
        "select company1_0.name from company_table as company1_0 \
         inner join customer_table as customers1_0 on company1_0.id = customers1_0.company_id \
         left outer join employee_table as employee1_0 \
         left outer join employee_details as employee1_1 on employee1_0.id = employee1_1.employee_id \
         on company1_0.ceo_id = employee1_0.id \
         inner join customer_nicknames as nicknames1_0 on customers1_0.id = nicknames1_0.customer_id"
    );
    let customers = sql.find("customer_table").unwrap();
    let ceo = sql.find("employee_table").unwrap();
    let nicknames = sql.find("customer_nicknames").unwrap();
    assert!(customers < ceo && ceo < nicknames);
}

#[test]
fn test_unique_key_join() {
    let statement = SelectStatement::new(selecting(
        SqmFromClause::new(vec![space(
            SqmRoot::new(1, "Customer"),
            vec![SqmAttributeJoin::new(2, id(1), "account_manager").into()],
        )]),
        vec![attr(2, "name")],
    ));
    assert_eq!(
        sql_of(&statement),
        "select employee1_0.name from customer_table as customer1_0 \
         inner join employee_table as employee1_0 \
         left outer join employee_details as employee1_1 on employee1_0.id = employee1_1.employee_id \
         on customer1_0.manager_badge = employee1_0.badge"
    );
}

#[test]
fn test_many_to_many_join() {
    let statement = SelectStatement::new(selecting(
        companies(vec![SqmAttributeJoin::new(2, id(1), "employees").into()]),
        vec![attr(2, "name")],
    ));
    assert_eq!(
        sql_of(&statement),
        "select employees1_1.name from company_table as company1_0 \
         inner join company_employee as employees1_0 \
         inner join employee_table as employees1_1 on employees1_0.employee_id = employees1_1.id \
         left outer join employee_details as employees1_2 on employees1_1.id = employees1_2.employee_id \
         on company1_0.id = employees1_0.company_id"
    );
}

#[test]
fn test_collection_element_reads_secondary_table() {
    let statement = SelectStatement::new(query(
        companies(vec![SqmAttributeJoin::new(2, id(1), "employees").into()]),
        vec![
            SqmSelection::aliased(SqmExpression::FromElementReference(id(2)), "e"),
            SqmSelection::new(attr(2, "salary")),
        ],
    ));
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select employees1_1.id, employees1_1.name, employees1_1.badge, employees1_2.salary, \
         employees1_2.salary from company_table as company1_0 \
         inner join company_employee as employees1_0 \
         inner join employee_table as employees1_1 on employees1_0.employee_id = employees1_1.id \
         left outer join employee_details as employees1_2 on employees1_1.id = employees1_2.employee_id \
         on company1_0.id = employees1_0.company_id"
    );
    assert_eq!(
        select.returns[0].reader,
        reader(
            1,
            4,
            ReaderKind::Entity {
                entity_name: "Employee".to_string()
            }
        )
    );
    assert_eq!(
        select.returns[1].reader,
        reader(5, 1, ReaderKind::Basic(BasicType::BigDecimal))
    );
}

#[test]
fn test_embedded_join_adds_no_table() {
    let statement = SelectStatement::new(
        selecting(
            companies(vec![SqmAttributeJoin::new(2, id(1), "address").into()]),
            vec![attr(2, "city")],
        )
        .with_where(SqmPredicate::relational(
            RelationalOperator::Equal,
            attr(2, "zip"),
            named("zip", string_type()),
        )),
    );
    assert_eq!(
        sql_of(&statement),
        "select company1_0.city from company_table as company1_0 where company1_0.zip = ?"
    );
}

#[test]
fn test_cross_join_and_multiple_spaces() {
    let statement = SelectStatement::new(selecting(
        SqmFromClause::new(vec![
            space(
                SqmRoot::new(1, "Company"),
                vec![SqmCrossJoin::new(2, "Employee").into()],
            ),
            space(SqmRoot::new(3, "Customer"), vec![]),
        ]),
        vec![attr(1, "name"), attr(2, "name"), attr(3, "name")],
    ));
    assert_eq!(
        sql_of(&statement),
        "select company1_0.name, employee1_0.name, customer1_0.name \
         from company_table as company1_0 \
         cross join employee_table as employee1_0 \
         left outer join employee_details as employee1_1 on employee1_0.id = employee1_1.employee_id, \
         customer_table as customer1_0"
    );
}

#[test]
fn test_entity_selection_reads_whole_row() {
    let statement = SelectStatement::new(query(
        companies(vec![]),
        vec![
            SqmSelection::aliased(SqmExpression::FromElementReference(id(1)), "c"),
            SqmSelection::new(attr(1, "name")),
        ],
    ));
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select company1_0.id, company1_0.name, company1_0.street, company1_0.city, \
         company1_0.zip, company1_0.ceo_id, company1_0.name from company_table as company1_0"
    );
    assert_eq!(select.returns.len(), 2);
    assert_eq!(select.returns[0].result_variable.as_deref(), Some("c"));
    assert_eq!(
        select.returns[0].reader,
        reader(
            1,
            6,
            ReaderKind::Entity {
                entity_name: "Company".to_string()
            }
        )
    );
    assert_eq!(
        select.returns[1].reader,
        reader(7, 1, ReaderKind::Basic(BasicType::String))
    );
}

#[test]
fn test_dynamic_instantiation_renders_arguments() {
    let statement = SelectStatement::new(selecting(
        companies(vec![]),
        vec![SqmExpression::DynamicInstantiation(SqmDynamicInstantiation {
            target: SqmInstantiationTarget {
                nature: InstantiationTargetNature::List,
                class_name: None,
            },
            arguments: vec![
                SqmDynamicInstantiationArgument {
                    expression: attr(1, "name"),
                    alias: Some("name".to_string()),
                },
                SqmDynamicInstantiationArgument {
                    expression: attr(1, "ceo"),
                    alias: None,
                },
            ],
        })],
    ));
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select company1_0.name, company1_0.ceo_id from company_table as company1_0"
    );
    assert_eq!(select.returns.len(), 1);
    assert_eq!(
        select.returns[0].reader,
        reader(
            1,
            2,
            ReaderKind::DynamicInstantiation {
                target: DynamicInstantiationTarget::List,
                arguments: vec![
                    reader(1, 1, ReaderKind::Basic(BasicType::String)),
                    reader(
                        2,
                        1,
                        ReaderKind::Entity {
                            entity_name: "Employee".to_string()
                        }
                    ),
                ],
            }
        )
    );
}

#[test]
fn test_correlated_subquery_contributes_no_returns() {
    let sub_query = selecting(
        SqmFromClause::new(vec![space(SqmRoot::new(2, "Customer"), vec![])]),
        vec![attr(2, "company")],
    )
    .with_where(SqmPredicate::relational(
        RelationalOperator::Equal,
        attr(2, "name"),
        attr(1, "name"),
    ));
    let statement = SelectStatement::new(
        selecting(companies(vec![]), vec![attr(1, "name")]).with_where(SqmPredicate::InSubQuery(
            SqmInSubQueryPredicate {
                test_expression: Box::new(attr(1, "id")),
                sub_query: Box::new(sub_query),
                negated: false,
            },
        )),
    );
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select company1_0.name from company_table as company1_0 \
         where company1_0.id in (select customer1_0.company_id from customer_table as customer1_0 \
         where customer1_0.name = company1_0.name)"
    );
    assert_eq!(select.returns.len(), 1);
}

#[test]
fn test_order_by() {
    let statement = SelectStatement::new(selecting(companies(vec![]), vec![attr(1, "name")]))
        .with_order_by(OrderByClause {
            sort_specifications: vec![
                SqmSortSpecification {
                    expression: attr(1, "name"),
                    collation: Some("de_DE".to_string()),
                    sort_order: SortOrder::Descending,
                },
                SqmSortSpecification::new(attr(1, "id"), SortOrder::Ascending),
            ],
        });
    assert_eq!(
        sql_of(&statement),
        "select company1_0.name from company_table as company1_0 \
         order by company1_0.name collate de_DE desc, company1_0.id asc"
    );
}

#[test]
fn test_distinct_and_expressions() {
    let statement = SelectStatement::new(
        SqmQuerySpec::new(companies(vec![]))
            .with_select(
                SqmSelectClause::new(vec![
                    SqmSelection::new(SqmExpression::CaseSearched(SqmCaseSearched {
                        when_fragments: vec![SqmSearchedWhen {
                            predicate: SqmPredicate::is_null(attr(1, "name"), false),
                            result: SqmLiteral::string("unknown").into(),
                        }],
                        otherwise: Box::new(attr(1, "name")),
                        expression_type: None,
                    })),
                    SqmSelection::new(SqmExpression::UnaryOperation(SqmUnaryOperation {
                        operator: UnaryOperator::Minus,
                        operand: Box::new(attr(1, "id")),
                    })),
                    SqmSelection::new(SqmExpression::arithmetic(
                        BinaryArithmeticOperator::Modulo,
                        attr(1, "id"),
                        SqmLiteral::integer(2).into(),
                    )),
                ])
                .distinct(),
            )
            .with_where(SqmPredicate::relational(
                RelationalOperator::Equal,
                SqmExpression::Coalesce(SqmCoalesce {
                    values: vec![attr(1, "name"), SqmLiteral::string("x").into()],
                    expression_type: None,
                }),
                named("name", string_type()),
            )),
    );
    let select = compile(&statement).unwrap();

    assert_eq!(
        select.sql,
        "select distinct case when company1_0.name is null then 'unknown' else company1_0.name end, \
         -company1_0.id, mod(company1_0.id, 2) \
         from company_table as company1_0 where coalesce(company1_0.name, ?) = ?"
    );
    assert_eq!(select.parameter_binders.len(), 2);
    assert!(matches!(select.parameter_binders[0], ParameterBinder::Literal { .. }));
}

#[test]
fn test_filter_predicate_is_not_rendered() {
    let statement = SelectStatement::new(
        selecting(companies(vec![]), vec![attr(1, "name")]).with_where(SqmPredicate::Filter(
            SqmFilterPredicate {
                name: "active".to_string(),
                condition: Some("active = 1".to_string()),
            },
        )),
    );
    let err = compile(&statement).unwrap_err();
    assert_eq!(err.code(), SQM0201);
    assert!(!err.is_fatal());
}
