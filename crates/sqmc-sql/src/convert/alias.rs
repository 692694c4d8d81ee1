//! SQL alias generation
//!
//! Each table group gets an alias base `{stem}{n}`, unique across one whole
//! translation, and each table inside the group is aliased `{base}_{i}`.
//! A stem ending in a digit can spell another stem's base (`item1` + `1`
//! against `item` + `11`); such counters are skipped.

use std::collections::{HashMap, HashSet};

const MAX_STEM_LEN: usize = 15;

/// Issues unique alias bases for one translation
#[derive(Debug, Default)]
pub struct SqlAliasBaseManager {
    counters: HashMap<String, u32>,
    issued: HashSet<String>,
}

impl SqlAliasBaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new alias base for a group named after `name` (an entity
    /// name or a collection role)
    pub fn create_alias_base(&mut self, name: &str) -> SqlAliasBase {
        let stem = alias_stem(name);
        let counter = self.counters.entry(stem.clone()).or_insert(0);
        let base = loop {
            *counter += 1;
            let candidate = format!("{}{}", stem, counter);
            if self.issued.insert(candidate.clone()) {
                break candidate;
            }
        };
        SqlAliasBase {
            base,
            next_table: 0,
        }
    }
}

/// Alias base of one table group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlAliasBase {
    base: String,
    next_table: u32,
}

impl SqlAliasBase {
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Alias for the next table of the group
    pub fn generate_alias(&mut self) -> String {
        let alias = format!("{}_{}", self.base, self.next_table);
        self.next_table += 1;
        alias
    }
}

fn alias_stem(name: &str) -> String {
    let unqualified = name.rsplit('.').next().unwrap_or(name);
    let stem: String = unqualified
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_STEM_LEN)
        .collect();
    if stem.is_empty() || stem.starts_with(|c: char| c.is_ascii_digit()) {
        format!("t{}", stem)
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Company", "company")]
    #[case("com.acme.Customer", "customer")]
    #[case("Company.customers", "customers")]
    #[case("VeryLongEntityNameIndeed", "verylongentityn")]
    #[case("_", "t")]
    #[case("2fa", "t2fa")]
    fn test_alias_stem(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(alias_stem(name), expected);
    }

    #[test]
    fn test_bases_are_unique_per_stem() {
        let mut manager = SqlAliasBaseManager::new();
        assert_eq!(manager.create_alias_base("Company").base(), "company1");
        assert_eq!(manager.create_alias_base("Customer").base(), "customer1");
        assert_eq!(manager.create_alias_base("Company").base(), "company2");
    }

    #[test]
    fn test_digit_suffixed_stem_never_shares_a_base() {
        let mut manager = SqlAliasBaseManager::new();
        let item1 = manager.create_alias_base("Item1");
        assert_eq!(item1.base(), "item11");

        let items: Vec<String> = (0..11)
            .map(|_| manager.create_alias_base("Item").base().to_string())
            .collect();
        assert_eq!(items[9], "item10");
        assert_eq!(items[10], "item12");
        assert!(!items.iter().any(|base| base == item1.base()));

        assert_eq!(manager.create_alias_base("Item1").base(), "item13");
    }

    #[test]
    fn test_table_aliases() {
        let mut manager = SqlAliasBaseManager::new();
        let mut base = manager.create_alias_base("Employee");
        assert_eq!(base.generate_alias(), "employee1_0");
        assert_eq!(base.generate_alias(), "employee1_1");
    }
}
