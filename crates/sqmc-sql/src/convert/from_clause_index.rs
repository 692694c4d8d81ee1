//! From-clause index: resolution of semantic from-elements to table groups
//!
//! One scope is opened per query spec being translated. A lookup searches
//! the innermost scope first and then its ancestors, which is what lets a
//! correlated subquery see the roots and joins of the enclosing query.

use indexmap::IndexMap;
use sqmc_ast::FromElementId;
use sqmc_diagnostics::{Result, SqmError, SQM0002, SQM0004};
use std::fmt;

use crate::ast::TableGroup;

/// Identity of one pushed scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FromClauseScopeId(u32);

impl fmt::Display for FromClauseScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// The resolution of one from-element
#[derive(Debug, Clone)]
pub struct ResolvedFromElement {
    pub table_group: TableGroup,
    /// For embedded joins: the embedded attribute of the owner group
    pub embedded_path: Option<String>,
}

#[derive(Debug)]
struct FromClauseScope {
    id: FromClauseScopeId,
    resolved: IndexMap<FromElementId, ResolvedFromElement>,
}

/// Stack of from-clause scopes
#[derive(Debug, Default)]
pub struct FromClauseIndex {
    scopes: Vec<FromClauseScope>,
    next_id: u32,
}

impl FromClauseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new scope
    pub fn push_from_clause(&mut self) -> FromClauseScopeId {
        self.next_id += 1;
        let id = FromClauseScopeId(self.next_id);
        self.scopes.push(FromClauseScope {
            id,
            resolved: IndexMap::new(),
        });
        log::trace!("pushed from-clause {} (depth {})", id, self.scopes.len());
        id
    }

    /// Close the innermost scope, which must be `expected`
    pub fn pop_from_clause(&mut self, expected: FromClauseScopeId) -> Result<()> {
        let Some(scope) = self.scopes.pop() else {
            return Err(SqmError::assertion(
                SQM0002,
                format!("popped {} from an empty from-clause index", expected),
            ));
        };
        if scope.id != expected {
            let actual = scope.id;
            self.scopes.push(scope);
            return Err(SqmError::assertion(
                SQM0002,
                format!("popped {} but the current from-clause is {}", expected, actual),
            ));
        }
        log::trace!("popped from-clause {} (depth {})", expected, self.scopes.len());
        Ok(())
    }

    /// The innermost open scope
    pub fn current_from_clause(&self) -> Option<FromClauseScopeId> {
        self.scopes.last().map(|scope| scope.id)
    }

    pub fn open_scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Record that `uid` resolves to `table_group` in the current scope
    pub fn cross_reference(&mut self, uid: FromElementId, table_group: TableGroup) -> Result<()> {
        self.register(
            uid,
            ResolvedFromElement {
                table_group,
                embedded_path: None,
            },
        )
    }

    /// Record an embedded join: `uid` lives in the owner's group under `path`
    pub fn cross_reference_embedded(
        &mut self,
        uid: FromElementId,
        owner_group: TableGroup,
        path: impl Into<String>,
    ) -> Result<()> {
        self.register(
            uid,
            ResolvedFromElement {
                table_group: owner_group,
                embedded_path: Some(path.into()),
            },
        )
    }

    fn register(&mut self, uid: FromElementId, resolved: ResolvedFromElement) -> Result<()> {
        let scope = self.scopes.last_mut().ok_or_else(|| {
            SqmError::assertion(
                SQM0002,
                format!("cross-reference of {} outside any from-clause", uid),
            )
        })?;
        log::trace!(
            "cross-referenced {} -> {} in {}",
            uid,
            resolved.table_group.root_alias(),
            scope.id
        );
        scope.resolved.insert(uid, resolved);
        Ok(())
    }

    /// Whether `uid` is visible from the current scope
    pub fn is_resolved(&self, uid: FromElementId) -> bool {
        self.lookup(uid).is_some()
    }

    /// Resolve `uid`, failing if it was never cross-referenced
    pub fn find_resolved_table_group(&self, uid: FromElementId) -> Result<&ResolvedFromElement> {
        self.lookup(uid).ok_or_else(|| {
            SqmError::assertion(
                SQM0004,
                format!("from-element {} has not been resolved to a table group", uid),
            )
        })
    }

    fn lookup(&self, uid: FromElementId) -> Option<&ResolvedFromElement> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.resolved.get(&uid))
    }
}
