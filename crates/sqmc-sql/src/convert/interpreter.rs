//! SQM select statement interpreter
//!
//! Lowers a semantically resolved select statement into a [`SelectQuery`].
//! An interpreter is consumed by translation, so each statement needs a
//! fresh one.

use sqmc_ast::{
    BinaryArithmeticOperator, FromElementId, FromElementSpace, InstantiationTargetNature,
    LiteralKind, RelationalOperator, SelectStatement, SqmAggregate, SqmAttributeJoin,
    SqmAttributeReference, SqmBinaryArithmetic, SqmCrossJoin, SqmDynamicInstantiation,
    SqmExpression, SqmFromClause, SqmJoin, SqmJunction, SqmLiteral, SqmPredicate, SqmQuerySpec,
    SqmRoot, SqmSelectClause, SqmSortSpecification, Statement,
};
use sqmc_diagnostics::{Result, SqmError, SQM0001, SQM0005, SQM0100, SQM0200};
use sqmc_model::{
    AttributeClassification, Callback, DEFAULT_QUERY_OPTIONS, Metamodel, NoParameterBindings,
    NoopCallback, ParameterBinding, ParameterBindings, QueryOptions,
};
use sqmc_types::{BasicType, JoinType, OrmType};

use crate::ast::{
    AggregateFunction, AggregateKind, ArithmeticOperator, AttributeReference, BetweenPredicate,
    BinaryArithmetic, CaseSearchedExpression, CaseSimpleExpression, CoalesceFunction,
    ComparisonOperator, ConcatFunction, CountStarFunction, DynamicInstantiation,
    DynamicInstantiationArgument, DynamicInstantiationTarget, Expression, FilterPredicate,
    FromClause, GroupedPredicate, InListPredicate, InSubQueryPredicate, Junction, JunctionNature,
    LikePredicate, NamedParameter, NegatedPredicate, NonStandardFunction, NullifFunction,
    NullnessPredicate, PositionalParameter, Predicate, QueryLiteral, QuerySpec,
    RelationalPredicate, SearchedWhenFragment, SelectClause, SelectQuery, Selection,
    SimpleWhenFragment, SortSpecification, TableGroup, TableGroupJoin, TableSpace,
    UnaryOperation,
};
use crate::convert::{FromClauseIndex, SqlAliasBaseManager};
use crate::persister::{
    equate_columns, CollectionPersister, EntityPersister, Persister, TableGroupProducer,
};

static NO_PARAMETER_BINDINGS: NoParameterBindings = NoParameterBindings;
static NOOP_CALLBACK: NoopCallback = NoopCallback;

/// Read-only collaborators of one translation
#[derive(Clone, Copy)]
pub struct TranslationContext<'a> {
    pub metamodel: &'a dyn Metamodel,
    pub parameter_bindings: &'a dyn ParameterBindings,
    /// Carried for downstream stages; translation does not read it
    pub query_options: &'a QueryOptions,
    /// Carried for downstream stages; translation does not invoke it
    pub callback: &'a dyn Callback,
}

impl<'a> TranslationContext<'a> {
    pub fn new(metamodel: &'a dyn Metamodel) -> Self {
        Self {
            metamodel,
            parameter_bindings: &NO_PARAMETER_BINDINGS,
            query_options: &DEFAULT_QUERY_OPTIONS,
            callback: &NOOP_CALLBACK,
        }
    }

    pub fn with_parameter_bindings(mut self, parameter_bindings: &'a dyn ParameterBindings) -> Self {
        self.parameter_bindings = parameter_bindings;
        self
    }

    pub fn with_query_options(mut self, query_options: &'a QueryOptions) -> Self {
        self.query_options = query_options;
        self
    }

    pub fn with_callback(mut self, callback: &'a dyn Callback) -> Self {
        self.callback = callback;
        self
    }
}

/// Result of a translation, including the final from-clause index state
#[derive(Debug)]
pub struct Interpretation {
    pub select_query: SelectQuery,
    pub from_clause_index: FromClauseIndex,
}

/// Translate `statement` with a fresh interpreter
pub fn interpret(statement: &SelectStatement, ctx: TranslationContext<'_>) -> Result<SelectQuery> {
    SelectStatementInterpreter::new(ctx).interpret(statement)
}

/// Single-use SQM to SQL AST translator
pub struct SelectStatementInterpreter<'a> {
    ctx: TranslationContext<'a>,
    from_clause_index: FromClauseIndex,
    alias_manager: SqlAliasBaseManager,
}

impl<'a> SelectStatementInterpreter<'a> {
    pub fn new(ctx: TranslationContext<'a>) -> Self {
        Self {
            ctx,
            from_clause_index: FromClauseIndex::new(),
            alias_manager: SqlAliasBaseManager::new(),
        }
    }

    pub fn interpret(self, statement: &SelectStatement) -> Result<SelectQuery> {
        self.translate(statement)
            .map(|interpretation| interpretation.select_query)
    }

    /// Interpret any statement; only selects are accepted
    pub fn interpret_statement(self, statement: &Statement) -> Result<SelectQuery> {
        match statement {
            Statement::Select(select) => self.interpret(select),
            other => Err(SqmError::assertion(
                SQM0001,
                format!("Not expecting {} statement", other.kind()),
            )),
        }
    }

    pub fn translate(mut self, statement: &SelectStatement) -> Result<Interpretation> {
        log::debug!(
            "translating select statement with {} from-element space(s), lock mode {:?}",
            statement.query_spec.from_clause.spaces.len(),
            self.ctx.query_options.lock_mode
        );

        // Order-by resolves against the root query spec, so it is
        // translated before that scope closes.
        let select_query = self.in_query_spec_scope(|this| {
            let query_spec = this.visit_query_spec_body(&statement.query_spec)?;
            let mut select_query = SelectQuery::new(query_spec);
            if let Some(order_by) = &statement.order_by {
                for sort in &order_by.sort_specifications {
                    let sort = this.visit_sort_specification(sort)?;
                    select_query.sort_specifications.push(sort);
                }
            }
            Ok(select_query)
        })?;

        log::debug!(
            "translated select query: {} table space(s), {} selection(s), {} sort specification(s)",
            select_query.query_spec.from_clause.table_spaces.len(),
            select_query.query_spec.select_clause.selections.len(),
            select_query.sort_specifications.len()
        );
        Ok(Interpretation {
            select_query,
            from_clause_index: self.from_clause_index,
        })
    }

    /// Run `visit` inside a new from-clause scope. The scope is popped even
    /// when `visit` fails; the visit error wins over a pop error.
    fn in_query_spec_scope<T>(&mut self, visit: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let scope = self.from_clause_index.push_from_clause();
        let result = visit(self);
        let popped = self.from_clause_index.pop_from_clause(scope);
        let value = result?;
        popped?;
        Ok(value)
    }

    fn visit_query_spec(&mut self, query_spec: &SqmQuerySpec) -> Result<QuerySpec> {
        self.in_query_spec_scope(|this| this.visit_query_spec_body(query_spec))
    }

    fn visit_query_spec_body(&mut self, query_spec: &SqmQuerySpec) -> Result<QuerySpec> {
        // from first: select and where resolve against its table groups
        let from_clause = self.visit_from_clause(&query_spec.from_clause)?;

        let select_clause = match &query_spec.select_clause {
            Some(select_clause) => self.visit_select_clause(select_clause)?,
            None => self.implicit_select_clause(&query_spec.from_clause)?,
        };

        let where_clause_restrictions = query_spec
            .where_clause
            .as_ref()
            .and_then(|where_clause| where_clause.predicate.as_ref())
            .map(|predicate| self.visit_predicate(predicate))
            .transpose()?;

        Ok(QuerySpec {
            from_clause,
            select_clause,
            where_clause_restrictions,
        })
    }

    // === From clause ===

    fn visit_from_clause(&mut self, from_clause: &SqmFromClause) -> Result<FromClause> {
        let table_spaces = from_clause
            .spaces
            .iter()
            .map(|space| self.visit_from_element_space(space))
            .collect::<Result<_>>()?;
        Ok(FromClause { table_spaces })
    }

    fn visit_from_element_space(&mut self, space: &FromElementSpace) -> Result<TableSpace> {
        let root_table_group = self.visit_root(&space.root)?;
        let mut table_space = TableSpace::new(root_table_group);
        for join in &space.joins {
            if let Some(joined) = self.visit_join(join)? {
                table_space.joined_table_groups.push(joined);
            }
        }
        Ok(table_space)
    }

    fn visit_root(&mut self, root: &SqmRoot) -> Result<TableGroup> {
        if self.from_clause_index.is_resolved(root.uid) {
            let resolved = self.from_clause_index.find_resolved_table_group(root.uid)?;
            return Ok(resolved.table_group.clone());
        }
        EntityPersister::for_entity(self.ctx.metamodel, &root.entity_name)?.build_table_group(
            root.uid,
            &mut self.alias_manager,
            &mut self.from_clause_index,
        )
    }

    fn visit_join(&mut self, join: &SqmJoin) -> Result<Option<TableGroupJoin>> {
        match join {
            SqmJoin::Attribute(attribute_join) => self.visit_attribute_join(attribute_join),
            SqmJoin::Cross(cross_join) => self.visit_cross_join(cross_join),
            SqmJoin::Entity(entity_join) => Err(SqmError::not_yet_implemented(
                SQM0200,
                format!("entity join to {}", entity_join.entity_name),
            )),
        }
    }

    fn visit_attribute_join(&mut self, join: &SqmAttributeJoin) -> Result<Option<TableGroupJoin>> {
        if self.from_clause_index.is_resolved(join.uid) {
            return Ok(None);
        }

        let metamodel = self.ctx.metamodel;
        let lhs = self.from_clause_index.find_resolved_table_group(join.lhs)?.clone();
        if let Some(path) = &lhs.embedded_path {
            return Err(SqmError::assertion(
                SQM0005,
                format!("cannot join {} through embedded attribute {}", join.attribute, path),
            ));
        }
        let lhs_persister = Persister::for_table_group(&lhs.table_group, metamodel)?;
        let owner = lhs_persister.entity_mapping().ok_or_else(|| {
            SqmError::assertion(
                SQM0005,
                format!("from-element {} has no attributes to join", join.lhs),
            )
        })?;
        let attribute = owner.require_attribute(&join.attribute)?;
        let what = format!("join {}.{}", owner.name, join.attribute);

        let (joined_group, mut predicate) = match &attribute.classification {
            AttributeClassification::Plural { role } => {
                let collection = CollectionPersister::for_role(metamodel, role)?;
                let group = collection.build_table_group(
                    join.uid,
                    &mut self.alias_manager,
                    &mut self.from_clause_index,
                )?;
                let predicate = equate_columns(
                    lhs_persister.identifier_column_bindings(&lhs.table_group)?,
                    collection.key_column_bindings(&group)?,
                    &what,
                )?;
                (group, predicate)
            }
            AttributeClassification::ManyToOne {
                target_entity,
                unique_key_property,
            }
            | AttributeClassification::OneToOne {
                target_entity,
                unique_key_property,
            } => {
                let target_name = join.target_entity.as_deref().unwrap_or(target_entity);
                let target = EntityPersister::for_entity(metamodel, target_name)?;
                let group = target.build_table_group(
                    join.uid,
                    &mut self.alias_manager,
                    &mut self.from_clause_index,
                )?;
                let (lhs_columns, _) =
                    lhs_persister.resolve_attribute(&lhs.table_group, None, &join.attribute)?;
                let rhs_columns = match unique_key_property {
                    Some(property) => target.resolve_bindings(&group, property)?.into_vec(),
                    None => target.identifier_column_bindings(&group)?,
                };
                let predicate = equate_columns(lhs_columns.into_vec(), rhs_columns, &what)?;
                (group, predicate)
            }
            AttributeClassification::Embedded(_) => {
                if join.on_clause.is_some() {
                    return Err(SqmError::assertion(
                        SQM0005,
                        format!("{} is embedded and cannot carry an on-clause", what),
                    ));
                }
                self.from_clause_index.cross_reference_embedded(
                    join.uid,
                    lhs.table_group,
                    join.attribute.clone(),
                )?;
                return Ok(None);
            }
            AttributeClassification::Basic(_) => {
                return Err(SqmError::assertion(
                    SQM0005,
                    format!("{} targets a basic attribute", what),
                ));
            }
        };

        if let Some(on_clause) = &join.on_clause {
            let restriction = self.visit_predicate(on_clause)?;
            predicate.add(restriction);
        }

        Ok(Some(TableGroupJoin {
            join_type: join.join_type,
            joined_group,
            predicate: Some(Predicate::Junction(predicate)),
        }))
    }

    fn visit_cross_join(&mut self, join: &SqmCrossJoin) -> Result<Option<TableGroupJoin>> {
        if self.from_clause_index.is_resolved(join.uid) {
            return Ok(None);
        }
        let joined_group = EntityPersister::for_entity(self.ctx.metamodel, &join.entity_name)?
            .build_table_group(join.uid, &mut self.alias_manager, &mut self.from_clause_index)?;
        Ok(Some(TableGroupJoin {
            join_type: JoinType::Cross,
            joined_group,
            predicate: None,
        }))
    }

    // === Select clause ===

    fn visit_select_clause(&mut self, select_clause: &SqmSelectClause) -> Result<SelectClause> {
        let selections = select_clause
            .selections
            .iter()
            .map(|selection| -> Result<Selection> {
                Ok(Selection {
                    expression: self.visit_expression(&selection.expression)?,
                    result_variable: selection.alias.clone(),
                })
            })
            .collect::<Result<_>>()?;
        Ok(SelectClause {
            distinct: select_clause.distinct,
            selections,
        })
    }

    /// `from Company c` selects each space root
    fn implicit_select_clause(&self, from_clause: &SqmFromClause) -> Result<SelectClause> {
        let selections = from_clause
            .spaces
            .iter()
            .map(|space| -> Result<Selection> {
                Ok(Selection {
                    expression: self.visit_from_element_reference(space.root.uid)?,
                    result_variable: space.root.alias.clone(),
                })
            })
            .collect::<Result<_>>()?;
        Ok(SelectClause {
            distinct: false,
            selections,
        })
    }

    fn visit_sort_specification(&mut self, sort: &SqmSortSpecification) -> Result<SortSpecification> {
        Ok(SortSpecification {
            sort_expression: self.visit_expression(&sort.expression)?,
            collation: sort.collation.clone(),
            sort_order: sort.sort_order,
        })
    }

    // === Expressions ===

    fn visit_expressions(&mut self, expressions: &[SqmExpression]) -> Result<Vec<Expression>> {
        expressions
            .iter()
            .map(|expression| self.visit_expression(expression))
            .collect()
    }

    fn visit_boxed(&mut self, expression: &SqmExpression) -> Result<Box<Expression>> {
        self.visit_expression(expression).map(Box::new)
    }

    fn visit_expression(&mut self, expression: &SqmExpression) -> Result<Expression> {
        match expression {
            SqmExpression::AttributeReference(reference) => self.visit_attribute_reference(reference),
            SqmExpression::FromElementReference(uid) => self.visit_from_element_reference(*uid),
            SqmExpression::Literal(literal) => Ok(Expression::Literal(visit_literal(literal))),
            SqmExpression::NamedParameter(parameter) => {
                let parameter_type = resolve_parameter_type(
                    self.ctx.parameter_bindings.binding_by_name(&parameter.name),
                    parameter.anticipated_type.as_ref(),
                    || format!(":{}", parameter.name),
                )?;
                Ok(Expression::NamedParameter(NamedParameter {
                    name: parameter.name.clone(),
                    parameter_type,
                }))
            }
            SqmExpression::PositionalParameter(parameter) => {
                let parameter_type = resolve_parameter_type(
                    self.ctx
                        .parameter_bindings
                        .binding_by_position(parameter.position),
                    parameter.anticipated_type.as_ref(),
                    || format!("?{}", parameter.position),
                )?;
                Ok(Expression::PositionalParameter(PositionalParameter {
                    position: parameter.position,
                    parameter_type,
                }))
            }
            SqmExpression::UnaryOperation(operation) => Ok(Expression::UnaryOperation(UnaryOperation {
                operator: operation.operator,
                operand: self.visit_boxed(&operation.operand)?,
            })),
            SqmExpression::BinaryArithmetic(arithmetic) => self.visit_binary_arithmetic(arithmetic),
            SqmExpression::Avg(aggregate) => self.visit_aggregate(AggregateKind::Avg, aggregate),
            SqmExpression::Min(aggregate) => self.visit_aggregate(AggregateKind::Min, aggregate),
            SqmExpression::Max(aggregate) => self.visit_aggregate(AggregateKind::Max, aggregate),
            SqmExpression::Sum(aggregate) => self.visit_aggregate(AggregateKind::Sum, aggregate),
            SqmExpression::Count(aggregate) => self.visit_aggregate(AggregateKind::Count, aggregate),
            SqmExpression::CountStar(count) => Ok(Expression::CountStar(CountStarFunction {
                distinct: count.distinct,
            })),
            SqmExpression::CaseSimple(case) => {
                let fixture = self.visit_boxed(&case.fixture)?;
                let when_fragments = case
                    .when_fragments
                    .iter()
                    .map(|when| -> Result<SimpleWhenFragment> {
                        Ok(SimpleWhenFragment {
                            value: self.visit_expression(&when.value)?,
                            result: self.visit_expression(&when.result)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let otherwise = self.visit_boxed(&case.otherwise)?;
                let expression_type = case
                    .expression_type
                    .clone()
                    .or_else(|| otherwise.expression_type());
                Ok(Expression::CaseSimple(CaseSimpleExpression {
                    fixture,
                    when_fragments,
                    otherwise,
                    expression_type,
                }))
            }
            SqmExpression::CaseSearched(case) => {
                let when_fragments = case
                    .when_fragments
                    .iter()
                    .map(|when| -> Result<SearchedWhenFragment> {
                        Ok(SearchedWhenFragment {
                            predicate: self.visit_predicate(&when.predicate)?,
                            result: self.visit_expression(&when.result)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let otherwise = self.visit_boxed(&case.otherwise)?;
                let expression_type = case
                    .expression_type
                    .clone()
                    .or_else(|| otherwise.expression_type());
                Ok(Expression::CaseSearched(CaseSearchedExpression {
                    when_fragments,
                    otherwise,
                    expression_type,
                }))
            }
            SqmExpression::Coalesce(coalesce) => {
                let values = self.visit_expressions(&coalesce.values)?;
                let expression_type = coalesce
                    .expression_type
                    .clone()
                    .or_else(|| values.iter().find_map(Expression::expression_type));
                Ok(Expression::Coalesce(CoalesceFunction {
                    values,
                    expression_type,
                }))
            }
            SqmExpression::Nullif(nullif) => Ok(Expression::Nullif(NullifFunction {
                first: self.visit_boxed(&nullif.first)?,
                second: self.visit_boxed(&nullif.second)?,
            })),
            SqmExpression::Concat(concat) => Ok(Expression::Concat(ConcatFunction {
                lhs: self.visit_boxed(&concat.lhs)?,
                rhs: self.visit_boxed(&concat.rhs)?,
            })),
            SqmExpression::Function(function) => {
                Ok(Expression::NonStandardFunction(NonStandardFunction {
                    name: function.name.clone(),
                    arguments: self.visit_expressions(&function.arguments)?,
                    expression_type: function.expression_type.clone(),
                }))
            }
            SqmExpression::DynamicInstantiation(instantiation) => {
                self.visit_dynamic_instantiation(instantiation)
            }
        }
    }

    fn visit_attribute_reference(&self, reference: &SqmAttributeReference) -> Result<Expression> {
        let resolved = self.from_clause_index.find_resolved_table_group(reference.lhs)?;
        let persister = Persister::for_table_group(&resolved.table_group, self.ctx.metamodel)?;
        let (bindings, attribute_type) = persister.resolve_attribute(
            &resolved.table_group,
            resolved.embedded_path.as_deref(),
            &reference.attribute,
        )?;
        Ok(Expression::AttributeReference(AttributeReference {
            attribute_name: reference.attribute.clone(),
            bindings,
            attribute_type,
        }))
    }

    fn visit_from_element_reference(&self, uid: FromElementId) -> Result<Expression> {
        let resolved = self.from_clause_index.find_resolved_table_group(uid)?;
        let persister = Persister::for_table_group(&resolved.table_group, self.ctx.metamodel)?;
        match &resolved.embedded_path {
            // an embedded join used as a value is the embedded attribute itself
            Some(path) => {
                let (bindings, attribute_type) =
                    persister.resolve_attribute(&resolved.table_group, None, path)?;
                Ok(Expression::AttributeReference(AttributeReference {
                    attribute_name: path.clone(),
                    bindings,
                    attribute_type,
                }))
            }
            None => persister.from_element_reference(&resolved.table_group),
        }
    }

    fn visit_binary_arithmetic(&mut self, arithmetic: &SqmBinaryArithmetic) -> Result<Expression> {
        let lhs = self.visit_expression(&arithmetic.lhs)?;
        let rhs = self.visit_expression(&arithmetic.rhs)?;
        let expression_type = arithmetic
            .expression_type
            .clone()
            .or_else(|| promoted_type(&lhs, &rhs));

        let operator = match arithmetic.operator {
            BinaryArithmeticOperator::Modulo => {
                return Ok(Expression::NonStandardFunction(NonStandardFunction {
                    name: "mod".to_string(),
                    arguments: vec![lhs, rhs],
                    expression_type,
                }));
            }
            BinaryArithmeticOperator::Add => ArithmeticOperator::Add,
            BinaryArithmeticOperator::Subtract => ArithmeticOperator::Subtract,
            BinaryArithmeticOperator::Multiply => ArithmeticOperator::Multiply,
            BinaryArithmeticOperator::Divide => ArithmeticOperator::Divide,
            BinaryArithmeticOperator::Quot => ArithmeticOperator::Quot,
        };
        Ok(Expression::BinaryArithmetic(BinaryArithmetic {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            expression_type,
        }))
    }

    fn visit_aggregate(&mut self, kind: AggregateKind, aggregate: &SqmAggregate) -> Result<Expression> {
        let argument = self.visit_boxed(&aggregate.argument)?;
        let expression_type = aggregate.expression_type.clone().or_else(|| match kind {
            AggregateKind::Count => Some(OrmType::Basic(BasicType::Long)),
            AggregateKind::Avg => Some(OrmType::Basic(BasicType::Double)),
            AggregateKind::Min | AggregateKind::Max | AggregateKind::Sum => argument.expression_type(),
        });
        Ok(Expression::Aggregate(AggregateFunction {
            kind,
            argument,
            distinct: aggregate.distinct,
            expression_type,
        }))
    }

    fn visit_dynamic_instantiation(
        &mut self,
        instantiation: &SqmDynamicInstantiation,
    ) -> Result<Expression> {
        let target = match instantiation.target.nature {
            InstantiationTargetNature::List => DynamicInstantiationTarget::List,
            InstantiationTargetNature::Map => DynamicInstantiationTarget::Map,
            InstantiationTargetNature::Class => {
                let class_name = instantiation.target.class_name.clone().ok_or_else(|| {
                    SqmError::assertion(SQM0005, "dynamic instantiation of a class without a class name")
                })?;
                DynamicInstantiationTarget::Class(class_name)
            }
        };
        let arguments = instantiation
            .arguments
            .iter()
            .map(|argument| -> Result<DynamicInstantiationArgument> {
                Ok(DynamicInstantiationArgument {
                    expression: self.visit_expression(&argument.expression)?,
                    alias: argument.alias.clone(),
                })
            })
            .collect::<Result<_>>()?;
        Ok(Expression::DynamicInstantiation(DynamicInstantiation { target, arguments }))
    }

    // === Predicates ===

    fn visit_junction(&mut self, nature: JunctionNature, junction: &SqmJunction) -> Result<Predicate> {
        let mut result = Junction::new(nature);
        result.add(self.visit_predicate(&junction.lhs)?);
        result.add(self.visit_predicate(&junction.rhs)?);
        Ok(Predicate::Junction(result))
    }

    fn visit_predicate(&mut self, predicate: &SqmPredicate) -> Result<Predicate> {
        match predicate {
            SqmPredicate::And(junction) => self.visit_junction(JunctionNature::Conjunction, junction),
            SqmPredicate::Or(junction) => self.visit_junction(JunctionNature::Disjunction, junction),
            SqmPredicate::Negated(negated) => Ok(Predicate::Negated(NegatedPredicate {
                predicate: Box::new(self.visit_predicate(&negated.predicate)?),
            })),
            SqmPredicate::Grouped(grouped) => Ok(Predicate::Grouped(GroupedPredicate {
                predicate: Box::new(self.visit_predicate(&grouped.predicate)?),
            })),
            SqmPredicate::Relational(relational) => Ok(Predicate::Relational(RelationalPredicate {
                operator: comparison_operator(relational.operator),
                lhs: self.visit_expression(&relational.lhs)?,
                rhs: self.visit_expression(&relational.rhs)?,
            })),
            SqmPredicate::Between(between) => Ok(Predicate::Between(BetweenPredicate {
                expression: self.visit_expression(&between.expression)?,
                lower_bound: self.visit_expression(&between.lower_bound)?,
                upper_bound: self.visit_expression(&between.upper_bound)?,
                negated: between.negated,
            })),
            SqmPredicate::Like(like) => Ok(Predicate::Like(LikePredicate {
                match_expression: self.visit_expression(&like.match_expression)?,
                pattern: self.visit_expression(&like.pattern)?,
                escape_character: like
                    .escape
                    .as_deref()
                    .map(|escape| self.visit_expression(escape))
                    .transpose()?,
                negated: like.negated,
            })),
            SqmPredicate::IsNull(nullness) => Ok(Predicate::NullCheck(NullnessPredicate {
                expression: self.visit_expression(&nullness.expression)?,
                negated: nullness.negated,
            })),
            SqmPredicate::InList(in_list) => Ok(Predicate::InList(InListPredicate {
                test_expression: self.visit_expression(&in_list.test_expression)?,
                list_expressions: self.visit_expressions(&in_list.list_expressions)?,
                negated: in_list.negated,
            })),
            SqmPredicate::InSubQuery(in_sub_query) => {
                let test_expression = self.visit_expression(&in_sub_query.test_expression)?;
                let sub_query = self.visit_query_spec(&in_sub_query.sub_query)?;
                Ok(Predicate::InSubQuery(InSubQueryPredicate {
                    test_expression,
                    sub_query: Box::new(sub_query),
                    negated: in_sub_query.negated,
                }))
            }
            SqmPredicate::Filter(filter) => Ok(Predicate::Filter(FilterPredicate {
                name: filter.name.clone(),
                condition: filter.condition.clone(),
            })),
        }
    }
}

fn visit_literal(literal: &SqmLiteral) -> QueryLiteral {
    let literal_type = match literal.kind {
        LiteralKind::True | LiteralKind::False => Some(OrmType::Basic(BasicType::Boolean)),
        LiteralKind::Null => None,
        _ => literal
            .expression_type
            .clone()
            .or_else(|| literal.value.natural_type().map(OrmType::Basic)),
    };
    QueryLiteral {
        value: literal.value.clone(),
        literal_type,
    }
}

/// Explicit bind type, then the anticipated type, else a query error
fn resolve_parameter_type(
    binding: Option<&ParameterBinding>,
    anticipated_type: Option<&OrmType>,
    describe: impl FnOnce() -> String,
) -> Result<OrmType> {
    binding
        .and_then(|binding| binding.bind_type.clone())
        .or_else(|| anticipated_type.cloned())
        .ok_or_else(|| {
            SqmError::query(
                SQM0100,
                format!("Unable to determine type of parameter {}", describe()),
            )
        })
}

fn promoted_type(lhs: &Expression, rhs: &Expression) -> Option<OrmType> {
    let lhs = lhs.expression_type()?.as_basic()?;
    let rhs = rhs.expression_type()?.as_basic()?;
    lhs.promote(rhs).map(OrmType::Basic)
}

const fn comparison_operator(operator: RelationalOperator) -> ComparisonOperator {
    match operator {
        RelationalOperator::Equal => ComparisonOperator::Equal,
        RelationalOperator::NotEqual => ComparisonOperator::NotEqual,
        RelationalOperator::GreaterThanOrEqual => ComparisonOperator::GreaterThanOrEqual,
        RelationalOperator::GreaterThan => ComparisonOperator::GreaterThan,
        RelationalOperator::LessThanOrEqual => ComparisonOperator::LessThanOrEqual,
        RelationalOperator::LessThan => ComparisonOperator::LessThan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqmc_types::LiteralValue;

    #[test]
    fn test_bind_type_wins_over_anticipated_type() {
        let binding = ParameterBinding::typed(BasicType::Long.into());
        let anticipated = OrmType::Basic(BasicType::Integer);
        let resolved =
            resolve_parameter_type(Some(&binding), Some(&anticipated), || ":id".to_string()).unwrap();
        assert_eq!(resolved, OrmType::Basic(BasicType::Long));
    }

    #[test]
    fn test_untyped_binding_falls_back() {
        let binding = ParameterBinding::default();
        let anticipated = OrmType::Basic(BasicType::String);
        let resolved =
            resolve_parameter_type(Some(&binding), Some(&anticipated), || ":name".to_string()).unwrap();
        assert_eq!(resolved, OrmType::Basic(BasicType::String));
    }

    #[test]
    fn test_unresolved_parameter_names_itself() {
        let err = resolve_parameter_type(None, None, || "?3".to_string()).unwrap_err();
        assert_eq!(err.code(), SQM0100);
        assert!(err.to_string().contains("?3"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_literal_types() {
        let typed = visit_literal(&SqmLiteral::long(5));
        assert_eq!(typed.literal_type, Some(OrmType::Basic(BasicType::Long)));

        let boolean = visit_literal(&SqmLiteral::new(LiteralKind::True, LiteralValue::Boolean(true)));
        assert_eq!(boolean.literal_type, Some(OrmType::Basic(BasicType::Boolean)));

        let null = visit_literal(&SqmLiteral::null().with_type(BasicType::String.into()));
        assert_eq!(null.literal_type, None);

        let constant = visit_literal(
            &SqmLiteral::new(LiteralKind::ConstantField, LiteralValue::Integer(10))
                .with_type(BasicType::Long.into()),
        );
        assert_eq!(constant.literal_type, Some(OrmType::Basic(BasicType::Long)));
    }
}
