//! Function resolution
//!
//! The planner turns surface function names into resolved implementations.
//! Resolution is case-insensitive and goes through an alias table, so the
//! resolved name may differ from what the query spelled (`MOD` → `modulo`).

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::types::{LogicalType, TypeUtils};
use ahash::AHashMap;
use std::sync::Arc;

/// Shared pointer to a resolved function
pub type FunctionBaseRef = Arc<FunctionBase>;

/// Return type rule of a function family
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionKind {
    /// Comparisons and pattern matches: BOOLEAN, nullable with any argument
    Comparison,
    /// `and`, `or`, `not`: BOOLEAN, nullable with any argument
    Logical,
    /// `in` and friends: BOOLEAN, nullable with the left argument
    Membership,
    /// `isNull`, `isNotNull`: never-null BOOLEAN
    NullCheck,
    /// Common numeric type of the arguments
    Arithmetic,
    /// Always DOUBLE
    Division,
    /// TUPLE of the argument types
    Tuple,
    /// Type of the first argument
    SameAsFirst,
    /// A fixed type, nullable with any argument
    Fixed(LogicalType),
}

/// A function after overload resolution
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBase {
    name: String,
    argument_types: Vec<LogicalType>,
    return_type: LogicalType,
    deterministic: bool,
}

impl FunctionBase {
    /// Resolved implementation name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument_types(&self) -> &[LogicalType] {
        &self.argument_types
    }

    pub fn return_type(&self) -> &LogicalType {
        &self.return_type
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}

#[derive(Debug, Clone)]
struct FunctionDefinition {
    kind: FunctionKind,
    deterministic: bool,
}

/// Registry of known functions and their aliases
#[derive(Debug, Clone, Default)]
pub struct FunctionFactory {
    functions: AHashMap<String, FunctionDefinition>,
    /// Lower-cased alias or canonical name → canonical name
    case_insensitive: AHashMap<String, String>,
}

impl FunctionFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory pre-populated with the functions index analysis understands
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();

        for name in [
            "equals",
            "notEquals",
            "less",
            "lessOrEquals",
            "greater",
            "greaterOrEquals",
            "like",
            "notLike",
            "startsWith",
        ] {
            factory.register(name, FunctionKind::Comparison);
        }
        for name in ["and", "or", "not", "indexHint"] {
            factory.register(name, FunctionKind::Logical);
        }
        for name in ["in", "notIn", "globalIn", "globalNotIn"] {
            factory.register(name, FunctionKind::Membership);
        }
        factory.register("isNull", FunctionKind::NullCheck);
        factory.register("isNotNull", FunctionKind::NullCheck);
        for name in ["plus", "minus", "multiply", "modulo", "moduloLegacy", "intDiv", "negate", "abs"] {
            factory.register(name, FunctionKind::Arithmetic);
        }
        factory.register("divide", FunctionKind::Division);
        factory.register("tuple", FunctionKind::Tuple);
        for name in ["lower", "upper", "substring", "concat"] {
            factory.register(name, FunctionKind::SameAsFirst);
        }
        factory.register("toDate", FunctionKind::Fixed(LogicalType::Date));
        factory.register("toString", FunctionKind::Fixed(LogicalType::Varchar));
        factory.register("length", FunctionKind::Fixed(LogicalType::BigInt));
        factory.register_non_deterministic("now", FunctionKind::Fixed(LogicalType::Timestamp));

        factory.register_alias("mod", "modulo");
        factory.register_alias("substr", "substring");
        factory.register_alias("lcase", "lower");
        factory.register_alias("ucase", "upper");
        factory.register_alias("div", "intDiv");

        factory
    }

    /// Register a deterministic function under its canonical name
    pub fn register(&mut self, name: &str, kind: FunctionKind) {
        self.insert(name, kind, true);
    }

    pub fn register_non_deterministic(&mut self, name: &str, kind: FunctionKind) {
        self.insert(name, kind, false);
    }

    fn insert(&mut self, name: &str, kind: FunctionKind, deterministic: bool) {
        self.functions.insert(
            name.to_string(),
            FunctionDefinition {
                kind,
                deterministic,
            },
        );
        self.case_insensitive
            .insert(name.to_lowercase(), name.to_string());
    }

    /// Make `alias` resolve to the canonical function `canonical`
    pub fn register_alias(&mut self, alias: &str, canonical: &str) {
        self.case_insensitive
            .insert(alias.to_lowercase(), canonical.to_string());
    }

    /// Map a surface name to the canonical name, if known
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        if let Some((canonical, _)) = self.functions.get_key_value(name) {
            return Some(canonical.as_str());
        }
        self.case_insensitive
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Resolve a call of `name` over arguments of the given types
    pub fn resolve(&self, name: &str, argument_types: &[LogicalType]) -> PrismDBResult<FunctionBaseRef> {
        let canonical = self
            .canonical_name(name)
            .ok_or_else(|| PrismDBError::InvalidArgument(format!("Unknown function {}", name)))?;
        let definition = self.functions.get(canonical).ok_or_else(|| {
            PrismDBError::InvalidArgument(format!(
                "Function alias {} points to unknown function {}",
                name, canonical
            ))
        })?;

        let any_nullable = argument_types.iter().any(LogicalType::is_nullable);
        let nullable_if_any = |data_type: LogicalType| {
            if any_nullable {
                data_type.make_nullable()
            } else {
                data_type
            }
        };

        let return_type = match &definition.kind {
            FunctionKind::Comparison | FunctionKind::Logical => nullable_if_any(LogicalType::Boolean),
            FunctionKind::Membership => match argument_types.first() {
                Some(left) if left.is_nullable() => LogicalType::Boolean.make_nullable(),
                _ => LogicalType::Boolean,
            },
            FunctionKind::NullCheck => LogicalType::Boolean,
            FunctionKind::Arithmetic => {
                let (first, rest) = argument_types.split_first().ok_or_else(|| {
                    PrismDBError::InvalidArgument(format!(
                        "Function {} requires at least one argument",
                        canonical
                    ))
                })?;
                let mut result = first.clone();
                for argument_type in rest {
                    result = TypeUtils::get_max_type(&result, argument_type)?;
                }
                result
            }
            FunctionKind::Division => nullable_if_any(LogicalType::Double),
            FunctionKind::Tuple => LogicalType::Tuple(argument_types.to_vec()),
            FunctionKind::SameAsFirst => argument_types.first().cloned().ok_or_else(|| {
                PrismDBError::InvalidArgument(format!(
                    "Function {} requires at least one argument",
                    canonical
                ))
            })?,
            FunctionKind::Fixed(data_type) => nullable_if_any(data_type.clone()),
        };

        Ok(Arc::new(FunctionBase {
            name: canonical.to_string(),
            argument_types: argument_types.to_vec(),
            return_type,
            deterministic: definition.deterministic,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_through_aliases() {
        let factory = FunctionFactory::with_builtins();
        let types = [LogicalType::Integer, LogicalType::TinyInt];

        assert_eq!(factory.resolve("MOD", &types).unwrap().name(), "modulo");
        assert_eq!(factory.resolve("modulo", &types).unwrap().name(), "modulo");
        assert_eq!(factory.resolve("Equals", &types).unwrap().name(), "equals");
        assert_eq!(
            factory.resolve("substr", &[LogicalType::Varchar]).unwrap().name(),
            "substring"
        );
        assert!(factory.resolve("no_such_function", &types).is_err());
    }

    #[test]
    fn test_return_types() {
        let factory = FunctionFactory::with_builtins();
        let nullable_int = LogicalType::Integer.make_nullable();

        let plus = factory
            .resolve("plus", &[LogicalType::Integer, LogicalType::BigInt])
            .unwrap();
        assert_eq!(plus.return_type(), &LogicalType::BigInt);

        let equals = factory
            .resolve("equals", &[nullable_int.clone(), LogicalType::TinyInt])
            .unwrap();
        assert_eq!(equals.return_type(), &LogicalType::Boolean.make_nullable());

        let is_null = factory.resolve("isNull", &[nullable_int.clone()]).unwrap();
        assert_eq!(is_null.return_type(), &LogicalType::Boolean);

        let membership = factory
            .resolve("in", &[LogicalType::Integer, LogicalType::Set])
            .unwrap();
        assert_eq!(membership.return_type(), &LogicalType::Boolean);

        let tuple = factory
            .resolve("tuple", &[LogicalType::Integer, LogicalType::Varchar])
            .unwrap();
        assert_eq!(
            tuple.return_type(),
            &LogicalType::Tuple(vec![LogicalType::Integer, LogicalType::Varchar])
        );

        assert!(!factory.resolve("now", &[]).unwrap().is_deterministic());
        assert!(factory.resolve("plus", &[]).is_err());
    }
}
