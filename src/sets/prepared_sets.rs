//! Registry of precomputed sets
//!
//! Sets for `IN` right-hand sides are built before index analysis runs. They
//! are keyed by the structural hash of the right-hand side expression plus,
//! for literal lists, the types the set was built for.

use crate::parser::ast::{AstNode, TreeHash};
use crate::sets::set::SetRef;
use crate::types::LogicalType;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Shared registry pointer
pub type PreparedSetsRef = Arc<PreparedSets>;

/// Identity of a prepared set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreparedSetKey {
    ast_hash: TreeHash,
    types: Vec<LogicalType>,
}

impl PreparedSetKey {
    /// Key for a subquery or table on the right of `IN`; types do not matter
    pub fn for_subquery(ast: &AstNode) -> Self {
        Self {
            ast_hash: ast.tree_hash(),
            types: Vec::new(),
        }
    }

    /// Key for a literal list on the right of `IN`, built for `types`
    pub fn for_literal(ast: &AstNode, types: Vec<LogicalType>) -> Self {
        Self {
            ast_hash: ast.tree_hash(),
            types,
        }
    }

    pub fn ast_hash(&self) -> TreeHash {
        self.ast_hash
    }

    pub fn types(&self) -> &[LogicalType] {
        &self.types
    }
}

impl fmt::Display for PreparedSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.ast_hash)?;
        if !self.types.is_empty() {
            write!(f, " [")?;
            for (i, data_type) in self.types.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", data_type)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Entries {
    sets: Vec<(PreparedSetKey, SetRef)>,
    index_by_key: AHashMap<PreparedSetKey, usize>,
}

/// Registry of sets prepared for one query.
///
/// Entries keep their registration order, so lookups that return the first
/// matching candidate are deterministic.
#[derive(Debug, Default)]
pub struct PreparedSets {
    entries: RwLock<Entries>,
}

impl PreparedSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `set` under `key` and return the registered set.
    ///
    /// If the key is already taken the existing set wins.
    pub fn add(&self, key: PreparedSetKey, set: SetRef) -> SetRef {
        let mut entries = self.entries.write();
        if let Some(&position) = entries.index_by_key.get(&key) {
            return entries.sets[position].1.clone();
        }
        let position = entries.sets.len();
        entries.index_by_key.insert(key.clone(), position);
        entries.sets.push((key, set.clone()));
        set
    }

    /// Look up a set by key; sets that are not created yet are absent
    pub fn get(&self, key: &PreparedSetKey) -> Option<SetRef> {
        let entries = self.entries.read();
        entries
            .index_by_key
            .get(key)
            .map(|&position| entries.sets[position].1.clone())
            .filter(|set| set.is_created())
    }

    /// Look up a set by key whether or not it is created yet
    pub fn find_registered(&self, key: &PreparedSetKey) -> Option<SetRef> {
        let entries = self.entries.read();
        entries
            .index_by_key
            .get(key)
            .map(|&position| entries.sets[position].1.clone())
    }

    /// Every registered set whose key has the given structural hash, created or
    /// not, in registration order
    pub fn get_by_tree_hash(&self, ast_hash: TreeHash) -> Vec<SetRef> {
        self.entries
            .read()
            .sets
            .iter()
            .filter(|(key, _)| key.ast_hash == ast_hash)
            .map(|(_, set)| set.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::set::Set;
    use crate::types::Value;

    fn literal_list() -> AstNode {
        AstNode::function(
            "tuple",
            vec![AstNode::literal(Value::bigint(1)), AstNode::literal(Value::bigint(2))],
        )
    }

    #[test]
    fn test_get_requires_created_set() {
        let sets = PreparedSets::new();
        let ast = literal_list();
        let key = PreparedSetKey::for_literal(&ast, vec![LogicalType::Integer]);

        let set = Arc::new(Set::new(vec![LogicalType::Integer]));
        sets.add(key.clone(), set.clone());
        assert!(sets.get(&key).is_none());
        assert!(sets.find_registered(&key).is_some());

        set.finish();
        assert!(Arc::ptr_eq(&sets.get(&key).unwrap(), &set));
    }

    #[test]
    fn test_literal_key_depends_on_types() {
        let sets = PreparedSets::new();
        let ast = literal_list();
        let int_key = PreparedSetKey::for_literal(&ast, vec![LogicalType::Integer]);
        let big_key = PreparedSetKey::for_literal(&ast, vec![LogicalType::BigInt]);
        assert_ne!(int_key, big_key);
        assert_eq!(int_key.ast_hash(), big_key.ast_hash());

        let set = Set::from_rows(vec![LogicalType::Integer], vec![]).unwrap();
        sets.add(int_key.clone(), set);
        assert!(sets.get(&int_key).is_some());
        assert!(sets.get(&big_key).is_none());
    }

    #[test]
    fn test_add_keeps_existing() {
        let sets = PreparedSets::new();
        let ast = literal_list();
        let key = PreparedSetKey::for_subquery(&ast);
        let first = Set::from_rows(vec![LogicalType::Integer], vec![]).unwrap();
        let second = Set::from_rows(vec![LogicalType::Integer], vec![]).unwrap();

        assert!(Arc::ptr_eq(&sets.add(key.clone(), first.clone()), &first));
        assert!(Arc::ptr_eq(&sets.add(key, second), &first));
        assert_eq!(sets.len(), 1);
    }

    #[test]
    fn test_get_by_tree_hash_in_registration_order() {
        let sets = PreparedSets::new();
        let ast = literal_list();
        let first = Set::from_rows(vec![LogicalType::Integer], vec![]).unwrap();
        let second = Arc::new(Set::new(vec![LogicalType::BigInt]));
        sets.add(PreparedSetKey::for_literal(&ast, vec![LogicalType::Integer]), first.clone());
        sets.add(PreparedSetKey::for_literal(&ast, vec![LogicalType::BigInt]), second.clone());

        let candidates = sets.get_by_tree_hash(ast.tree_hash());
        assert_eq!(candidates.len(), 2);
        assert!(Arc::ptr_eq(&candidates[0], &first));
        assert!(Arc::ptr_eq(&candidates[1], &second));
        assert!(sets.get_by_tree_hash(ast.tree_hash() ^ 1).is_empty());
    }
}
