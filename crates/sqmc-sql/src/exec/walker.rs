//! SQL tree walker
//!
//! Renders a [`SelectQuery`] depth first into SQL text. Parameter binders
//! are collected in the order their `?` placeholders are emitted, and one
//! [`Return`] is recorded per selection of the root select clause, so both
//! lists line up one-to-one with what a JDBC statement binds and reads.
//!
//! Two context flags drive context-sensitive rendering:
//! - inside a predicate, multi-column values are parenthesised
//! - inside a select clause, literals are inlined through the dialect;
//!   everywhere else they are bound

use sqmc_diagnostics::{Result, SqmError, SQM0101, SQM0201};
use sqmc_types::{Dialect, OrmType};
use sqmc_ast::UnaryOperator;

use crate::ast::{
    ColumnBinding, ComparisonOperator, Expression, Junction, Predicate, QueryLiteral, QuerySpec,
    SelectClause, SelectQuery, SortSpecification, TableBinding, TableGroup, TableSpace,
};
use crate::exec::{JdbcSelect, ParameterBinder, RenderOptions, Return};

/// Render `select` with a fresh walker
pub fn render(
    select: &SelectQuery,
    dialect: &dyn Dialect,
    options: &RenderOptions,
) -> Result<JdbcSelect> {
    SqlTreeWalker::new(dialect, options).render(select)
}

/// Single-use renderer of one select query
pub struct SqlTreeWalker<'a> {
    dialect: &'a dyn Dialect,
    options: &'a RenderOptions,
    sql: String,
    parameter_binders: Vec<ParameterBinder>,
    returns: Vec<Return>,
    in_predicate: bool,
    in_selections: bool,
    query_spec_depth: usize,
    /// 1-based JDBC position of the next root selection column
    next_column_position: usize,
}

impl<'a> SqlTreeWalker<'a> {
    pub fn new(dialect: &'a dyn Dialect, options: &'a RenderOptions) -> Self {
        Self {
            dialect,
            options,
            sql: String::new(),
            parameter_binders: Vec::new(),
            returns: Vec::new(),
            in_predicate: false,
            in_selections: false,
            query_spec_depth: 0,
            next_column_position: 1,
        }
    }

    pub fn render(mut self, select: &SelectQuery) -> Result<JdbcSelect> {
        self.visit_query_spec(&select.query_spec)?;

        if !select.sort_specifications.is_empty() {
            self.append(" order by ");
            for (i, sort) in select.sort_specifications.iter().enumerate() {
                if i > 0 {
                    self.append(", ");
                }
                self.visit_sort_specification(sort)?;
            }
        }

        log::debug!(
            "rendered {} chars of SQL with {} binder(s) and {} return(s) using dialect {}",
            self.sql.len(),
            self.parameter_binders.len(),
            self.returns.len(),
            self.dialect.name()
        );
        Ok(JdbcSelect {
            sql: self.sql,
            parameter_binders: self.parameter_binders,
            returns: self.returns,
        })
    }

    fn append(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Run `render` with the given context flags, restoring the previous
    /// flags afterwards whether or not it fails
    fn with_clause_context<T>(
        &mut self,
        in_predicate: bool,
        in_selections: bool,
        render: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved_predicate = std::mem::replace(&mut self.in_predicate, in_predicate);
        let saved_selections = std::mem::replace(&mut self.in_selections, in_selections);
        let result = render(self);
        self.in_predicate = saved_predicate;
        self.in_selections = saved_selections;
        result
    }

    fn is_root_query_spec(&self) -> bool {
        self.query_spec_depth == 1
    }

    // === Query structure ===

    fn visit_query_spec(&mut self, query_spec: &QuerySpec) -> Result<()> {
        self.query_spec_depth += 1;
        let result = self.visit_query_spec_body(query_spec);
        self.query_spec_depth -= 1;
        result
    }

    fn visit_query_spec_body(&mut self, query_spec: &QuerySpec) -> Result<()> {
        self.visit_select_clause(&query_spec.select_clause)?;

        self.append(" from ");
        for (i, table_space) in query_spec.from_clause.table_spaces.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            self.visit_table_space(table_space)?;
        }

        if let Some(restriction) = query_spec
            .where_clause_restrictions
            .as_ref()
            .filter(|restriction| !restriction.is_empty())
        {
            self.append(" where ");
            self.with_clause_context(true, false, |this| this.visit_predicate(restriction))?;
        }
        Ok(())
    }

    fn visit_select_clause(&mut self, select_clause: &SelectClause) -> Result<()> {
        self.append("select ");
        if select_clause.distinct {
            self.append("distinct ");
        }

        let record_returns = self.is_root_query_spec();
        self.with_clause_context(false, true, |this| {
            for (i, selection) in select_clause.selections.iter().enumerate() {
                if i > 0 {
                    this.append(", ");
                }
                if !record_returns {
                    this.visit_expression(&selection.expression)?;
                } else {
                    this.visit_root_selection(&selection.expression)?;
                    let selection_return = Return::for_selection(selection, this.next_column_position);
                    this.next_column_position = selection_return.reader.end_position();
                    this.returns.push(selection_return);
                }
            }
            Ok(())
        })
    }

    /// A root selection: entities render their whole row, matching the
    /// columns their return reader consumes
    fn visit_root_selection(&mut self, expression: &Expression) -> Result<()> {
        match expression {
            Expression::EntityReference(reference) => {
                self.render_columns(reference.all_bindings());
                Ok(())
            }
            Expression::DynamicInstantiation(instantiation) => {
                for (i, argument) in instantiation.arguments.iter().enumerate() {
                    if i > 0 {
                        self.append(", ");
                    }
                    self.visit_root_selection(&argument.expression)?;
                }
                Ok(())
            }
            other => self.visit_expression(other),
        }
    }

    fn visit_sort_specification(&mut self, sort: &SortSpecification) -> Result<()> {
        self.visit_expression(&sort.sort_expression)?;
        if let Some(collation) = &sort.collation {
            self.append(" collate ");
            self.append(collation);
        }
        self.append(" ");
        self.append(sort.sort_order.sql_text());
        Ok(())
    }

    // === From clause ===

    fn visit_table_space(&mut self, table_space: &TableSpace) -> Result<()> {
        self.visit_table_group(&table_space.root_table_group)?;
        for join in &table_space.joined_table_groups {
            self.append(" ");
            self.append(join.join_type.sql_text());
            self.append(" join ");
            self.visit_table_group(&join.joined_group)?;
            self.visit_join_predicate(join.predicate.as_ref())?;
        }
        Ok(())
    }

    fn visit_table_group(&mut self, table_group: &TableGroup) -> Result<()> {
        self.visit_table_binding(&table_group.root_table_binding);
        for table_join in &table_group.table_joins {
            self.append(" ");
            self.append(table_join.join_type.sql_text());
            self.append(" join ");
            self.visit_table_binding(&table_join.joined_table_binding);
            self.visit_join_predicate(table_join.join_predicate.as_ref())?;
        }
        Ok(())
    }

    fn visit_table_binding(&mut self, binding: &TableBinding) {
        self.append(&binding.table);
        self.append(" as ");
        self.append(&binding.identification_variable);
    }

    fn visit_join_predicate(&mut self, predicate: Option<&Predicate>) -> Result<()> {
        match predicate.filter(|predicate| !predicate.is_empty()) {
            Some(predicate) => {
                self.append(" on ");
                self.with_clause_context(true, false, |this| this.visit_predicate(predicate))
            }
            None => Ok(()),
        }
    }

    // === Expressions ===

    fn visit_expressions(&mut self, expressions: &[Expression]) -> Result<()> {
        for (i, expression) in expressions.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            self.visit_expression(expression)?;
        }
        Ok(())
    }

    fn visit_expression(&mut self, expression: &Expression) -> Result<()> {
        match expression {
            Expression::ColumnReference(binding) => {
                self.render_columns(std::iter::once(binding));
            }
            Expression::AttributeReference(reference) => {
                self.render_columns(reference.bindings.iter());
            }
            Expression::EntityReference(reference) => {
                self.render_columns(reference.identifier_bindings.iter());
            }
            Expression::Literal(literal) => self.visit_literal(literal)?,
            Expression::NamedParameter(parameter) => {
                self.render_placeholders(parameter.parameter_type.column_span());
                self.parameter_binders.push(ParameterBinder::Named {
                    name: parameter.name.clone(),
                    bind_type: parameter.parameter_type.clone(),
                });
            }
            Expression::PositionalParameter(parameter) => {
                self.render_placeholders(parameter.parameter_type.column_span());
                self.parameter_binders.push(ParameterBinder::Positional {
                    position: parameter.position,
                    bind_type: parameter.parameter_type.clone(),
                });
            }
            Expression::UnaryOperation(operation) => {
                self.append(match operation.operator {
                    UnaryOperator::Plus => "+",
                    UnaryOperator::Minus => "-",
                });
                self.visit_expression(&operation.operand)?;
            }
            Expression::BinaryArithmetic(arithmetic) => {
                self.visit_expression(&arithmetic.lhs)?;
                self.append(arithmetic.operator.sql_text());
                self.visit_expression(&arithmetic.rhs)?;
            }
            Expression::Aggregate(aggregate) => {
                self.append(aggregate.kind.name());
                self.append("(");
                if aggregate.distinct {
                    self.append("distinct ");
                }
                self.visit_expression(&aggregate.argument)?;
                self.append(")");
            }
            Expression::CountStar(count) => {
                self.append(if count.distinct {
                    "count(distinct *)"
                } else {
                    "count(*)"
                });
            }
            Expression::CaseSearched(case) => {
                self.append("case");
                for when in &case.when_fragments {
                    self.append(" when ");
                    self.visit_predicate(&when.predicate)?;
                    self.append(" then ");
                    self.visit_expression(&when.result)?;
                }
                self.append(" else ");
                self.visit_expression(&case.otherwise)?;
                self.append(" end");
            }
            Expression::CaseSimple(case) => {
                self.append("case ");
                self.visit_expression(&case.fixture)?;
                for when in &case.when_fragments {
                    self.append(" when ");
                    self.visit_expression(&when.value)?;
                    self.append(" then ");
                    self.visit_expression(&when.result)?;
                }
                self.append(" else ");
                self.visit_expression(&case.otherwise)?;
                self.append(" end");
            }
            Expression::Coalesce(coalesce) => {
                self.append("coalesce(");
                self.visit_expressions(&coalesce.values)?;
                self.append(")");
            }
            Expression::Nullif(nullif) => {
                self.append("nullif(");
                self.visit_expression(&nullif.first)?;
                self.append(", ");
                self.visit_expression(&nullif.second)?;
                self.append(")");
            }
            Expression::Concat(concat) => {
                self.append("concat(");
                self.visit_expression(&concat.lhs)?;
                self.append(", ");
                self.visit_expression(&concat.rhs)?;
                self.append(")");
            }
            Expression::NonStandardFunction(function) => {
                self.append(&function.name);
                if !function.arguments.is_empty() {
                    self.append("(");
                    self.visit_expressions(&function.arguments)?;
                    self.append(")");
                }
            }
            Expression::DynamicInstantiation(instantiation) => {
                for (i, argument) in instantiation.arguments.iter().enumerate() {
                    if i > 0 {
                        self.append(", ");
                    }
                    self.visit_expression(&argument.expression)?;
                }
            }
        }
        Ok(())
    }

    fn visit_literal(&mut self, literal: &QueryLiteral) -> Result<()> {
        if !self.in_selections {
            self.render_placeholders(literal.column_span());
            self.parameter_binders.push(ParameterBinder::Literal {
                value: literal.value.clone(),
                literal_type: literal.literal_type.clone(),
            });
            return Ok(());
        }

        let sql = self
            .dialect
            .literal_to_sql(&literal.value, literal.literal_type.as_ref())
            .map_err(|cause| {
                SqmError::query(
                    SQM0101,
                    format!(
                        "Could not render literal value [{} ({})] into SQL",
                        literal.value,
                        literal.literal_type.as_ref().map_or("unknown", OrmType::name)
                    ),
                )
                .with_context(cause.to_string())
            })?;
        self.append(&sql);
        Ok(())
    }

    /// `?` per column; parenthesised when a multi-column value sits in a predicate
    fn render_placeholders(&mut self, column_span: usize) {
        let grouped = column_span > 1 && self.in_predicate;
        if grouped {
            self.append("(");
        }
        for i in 0..column_span {
            if i > 0 {
                self.append(", ");
            }
            self.append("?");
        }
        if grouped {
            self.append(")");
        }
    }

    /// Comma-joined columns, under the same grouping rule as placeholders
    fn render_columns<'b>(&mut self, columns: impl Iterator<Item = &'b ColumnBinding>) {
        let columns: Vec<_> = columns.collect();
        let grouped = columns.len() > 1 && self.in_predicate;
        if grouped {
            self.append("(");
        }
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            self.append(&column.identification_variable);
            self.append(".");
            self.append(&column.column);
        }
        if grouped {
            self.append(")");
        }
    }

    // === Predicates ===

    fn visit_predicate(&mut self, predicate: &Predicate) -> Result<()> {
        match predicate {
            Predicate::Junction(junction) => self.visit_junction(junction),
            Predicate::Negated(negated) => {
                self.append("not(");
                self.visit_predicate(&negated.predicate)?;
                self.append(")");
                Ok(())
            }
            Predicate::Grouped(grouped) => {
                self.append("(");
                self.visit_predicate(&grouped.predicate)?;
                self.append(")");
                Ok(())
            }
            Predicate::Relational(relational) => {
                self.visit_expression(&relational.lhs)?;
                let options = self.options;
                let operator = match relational.operator {
                    ComparisonOperator::Equal => "=",
                    ComparisonOperator::NotEqual => options.not_equal_operator.as_str(),
                    ComparisonOperator::GreaterThanOrEqual => ">=",
                    ComparisonOperator::GreaterThan => ">",
                    ComparisonOperator::LessThanOrEqual => "<=",
                    ComparisonOperator::LessThan => "<",
                };
                self.append(" ");
                self.append(operator);
                self.append(" ");
                self.visit_expression(&relational.rhs)
            }
            Predicate::Between(between) => {
                self.visit_expression(&between.expression)?;
                if between.negated {
                    self.append(" not");
                }
                self.append(" between ");
                self.visit_expression(&between.lower_bound)?;
                self.append(" and ");
                self.visit_expression(&between.upper_bound)
            }
            Predicate::Like(like) => {
                self.visit_expression(&like.match_expression)?;
                if like.negated {
                    self.append(" not");
                }
                self.append(" like ");
                self.visit_expression(&like.pattern)?;
                if let Some(escape) = &like.escape_character {
                    self.append(" escape ");
                    self.visit_expression(escape)?;
                }
                Ok(())
            }
            Predicate::NullCheck(nullness) => {
                self.visit_expression(&nullness.expression)?;
                self.append(if nullness.negated {
                    " is not null"
                } else {
                    " is null"
                });
                Ok(())
            }
            Predicate::InList(in_list) => {
                self.visit_expression(&in_list.test_expression)?;
                if in_list.negated {
                    self.append(" not");
                }
                if in_list.list_expressions.is_empty() {
                    self.append(" in(null)");
                    return Ok(());
                }
                self.append(" in(");
                self.visit_expressions(&in_list.list_expressions)?;
                self.append(")");
                Ok(())
            }
            Predicate::InSubQuery(in_sub_query) => {
                self.visit_expression(&in_sub_query.test_expression)?;
                if in_sub_query.negated {
                    self.append(" not");
                }
                self.append(" in (");
                self.visit_query_spec(&in_sub_query.sub_query)?;
                self.append(")");
                Ok(())
            }
            Predicate::Filter(filter) => Err(SqmError::not_yet_implemented(
                SQM0201,
                format!("rendering of filter predicate {}", filter.name),
            )),
        }
    }

    fn visit_junction(&mut self, junction: &Junction) -> Result<()> {
        let mut first = true;
        for child in junction.predicates.iter().filter(|child| !child.is_empty()) {
            if !first {
                self.append(junction.nature.separator());
            }
            first = false;

            let nested = matches!(child, Predicate::Junction(inner) if inner.nature != junction.nature);
            if nested {
                self.append("(");
            }
            self.visit_predicate(child)?;
            if nested {
                self.append(")");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        FromClause, InListPredicate, NamedParameter, RelationalPredicate, Selection,
        TableGroupSource,
    };
    use pretty_assertions::assert_eq;
    use sqmc_ast::FromElementId;
    use sqmc_types::{BasicType, CompositeType, LiteralValue, StandardDialect};

    fn company_space() -> TableSpace {
        TableSpace::new(TableGroup {
            uid: FromElementId(1),
            source: TableGroupSource::Entity {
                entity_name: "Company".to_string(),
            },
            root_table_binding: TableBinding {
                table: "company_table".to_string(),
                identification_variable: "company1_0".to_string(),
            },
            table_joins: Vec::new(),
        })
    }

    fn column(name: &str, sql_type: BasicType) -> Expression {
        Expression::ColumnReference(ColumnBinding::new("company1_0", name, sql_type))
    }

    fn query(selections: Vec<Expression>, restriction: Option<Predicate>) -> SelectQuery {
        SelectQuery::new(QuerySpec {
            from_clause: FromClause {
                table_spaces: vec![company_space()],
            },
            select_clause: SelectClause {
                distinct: false,
                selections: selections
                    .into_iter()
                    .map(|expression| Selection {
                        expression,
                        result_variable: None,
                    })
                    .collect(),
            },
            where_clause_restrictions: restriction,
        })
    }

    fn render_default(select: &SelectQuery) -> Result<JdbcSelect> {
        render(select, &StandardDialect::default(), &RenderOptions::default())
    }

    fn address_type() -> OrmType {
        OrmType::Composite(
            CompositeType::new("Address")
                .with_component("street", BasicType::String)
                .with_component("city", BasicType::String),
        )
    }

    #[test]
    fn test_context_flags_restored_after_failure() {
        let dialect = StandardDialect::default();
        let options = RenderOptions::default();
        let mut walker = SqlTreeWalker::new(&dialect, &options);
        let result: Result<()> = walker.with_clause_context(true, true, |this| {
            assert!(this.in_predicate && this.in_selections);
            Err(SqmError::not_yet_implemented(SQM0201, "probe"))
        });
        assert!(result.is_err());
        assert!(!walker.in_predicate);
        assert!(!walker.in_selections);
    }

    #[test]
    fn test_multi_column_parameter_grouping() {
        let parameter = || {
            Expression::NamedParameter(NamedParameter {
                name: "address".to_string(),
                parameter_type: address_type(),
            })
        };
        let select = query(
            vec![parameter()],
            Some(Predicate::Relational(RelationalPredicate {
                operator: ComparisonOperator::Equal,
                lhs: column("street", BasicType::String),
                rhs: parameter(),
            })),
        );
        let rendered = render_default(&select).unwrap();
        assert_eq!(
            rendered.sql,
            "select ?, ? from company_table as company1_0 where company1_0.street = (?, ?)"
        );
        assert_eq!(rendered.parameter_binders.len(), 2);
        assert_eq!(rendered.placeholder_count(), rendered.bound_column_count());
        assert_eq!(rendered.returns[0].reader.column_count, 2);
    }

    #[test]
    fn test_empty_in_list() {
        let select = query(
            vec![column("name", BasicType::String)],
            Some(Predicate::InList(InListPredicate {
                test_expression: column("id", BasicType::Long),
                list_expressions: Vec::new(),
                negated: false,
            })),
        );
        let rendered = render_default(&select).unwrap();
        assert!(rendered.sql.ends_with("where company1_0.id in(null)"));
        assert!(rendered.parameter_binders.is_empty());
    }

    #[test]
    fn test_literal_rendering_failure_names_value() {
        let select = query(
            vec![Expression::Literal(QueryLiteral {
                value: LiteralValue::Double(f64::NAN),
                literal_type: Some(BasicType::Double.into()),
            })],
            None,
        );
        let err = render_default(&select).unwrap_err();
        assert_eq!(err.code(), SQM0101);
        assert!(err.to_string().contains("Double"));
    }
}
