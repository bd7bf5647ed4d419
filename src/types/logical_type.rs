use crate::common::error::{PrismDBError, PrismDBResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical types represent the SQL-level types that expressions produce
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// NULL type (the type of a bare NULL literal, wrapped in `Nullable`)
    Null,
    /// Boolean type (TRUE/FALSE)
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit floating point
    Float,
    /// 64-bit double precision
    Double,
    /// Variable length string
    Varchar,
    /// Decimal with precision and scale
    Decimal { precision: u8, scale: u8 },
    /// Date value (days since 1970-01-01)
    Date,
    /// Timestamp value (microseconds since 1970-01-01 00:00:00 UTC)
    Timestamp,
    /// List/array type with element type
    List(Box<LogicalType>),
    /// Tuple type with positional element types
    Tuple(Vec<LogicalType>),
    /// Nullable wrapper around a non-nullable type
    Nullable(Box<LogicalType>),
    /// Type of a column holding a precomputed set for `IN`
    Set,
    /// Invalid/unknown type
    Invalid,
}

impl LogicalType {
    /// Wrap this type in `Nullable` unless it already is nullable or cannot be
    pub fn make_nullable(&self) -> LogicalType {
        if self.is_nullable() || !self.can_be_inside_nullable() {
            self.clone()
        } else {
            LogicalType::Nullable(Box::new(self.clone()))
        }
    }

    /// Strip the outer `Nullable` wrapper, if any
    pub fn remove_nullable(&self) -> LogicalType {
        match self {
            LogicalType::Nullable(inner) => inner.as_ref().clone(),
            other => other.clone(),
        }
    }

    /// Check if this type is wrapped in `Nullable`
    pub fn is_nullable(&self) -> bool {
        matches!(self, LogicalType::Nullable(_))
    }

    /// Nested and set types are never wrapped in `Nullable`
    pub fn can_be_inside_nullable(&self) -> bool {
        !matches!(
            self,
            LogicalType::List(_) | LogicalType::Tuple(_) | LogicalType::Set | LogicalType::Invalid
        )
    }

    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInt
                | LogicalType::SmallInt
                | LogicalType::Integer
                | LogicalType::BigInt
                | LogicalType::Float
                | LogicalType::Double
                | LogicalType::Decimal { .. }
        )
    }

    /// Check if this type is integral (no fractional part)
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInt | LogicalType::SmallInt | LogicalType::Integer | LogicalType::BigInt
        )
    }

    /// Check if this type is floating point
    pub fn is_floating_point(&self) -> bool {
        matches!(self, LogicalType::Float | LogicalType::Double)
    }

    /// Element type of a list, looking through `Nullable`
    pub fn list_element_type(&self) -> Option<&LogicalType> {
        match self {
            LogicalType::List(element) => Some(element),
            LogicalType::Nullable(inner) => inner.list_element_type(),
            _ => None,
        }
    }

    /// Validate if a decimal precision and scale are valid
    pub fn validate_decimal(precision: u8, scale: u8) -> PrismDBResult<()> {
        if precision == 0 || precision > 38 {
            return Err(PrismDBError::InvalidType(format!(
                "Decimal precision must be between 1 and 38, got {}",
                precision
            )));
        }
        if scale > precision {
            return Err(PrismDBError::InvalidType(format!(
                "Decimal scale ({}) cannot be greater than precision ({})",
                scale, precision
            )));
        }
        Ok(())
    }

    /// Create a decimal type with validation
    pub fn decimal(precision: u8, scale: u8) -> PrismDBResult<LogicalType> {
        Self::validate_decimal(precision, scale)?;
        Ok(LogicalType::Decimal { precision, scale })
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Boolean => write!(f, "BOOLEAN"),
            LogicalType::TinyInt => write!(f, "TINYINT"),
            LogicalType::SmallInt => write!(f, "SMALLINT"),
            LogicalType::Integer => write!(f, "INTEGER"),
            LogicalType::BigInt => write!(f, "BIGINT"),
            LogicalType::Float => write!(f, "FLOAT"),
            LogicalType::Double => write!(f, "DOUBLE"),
            LogicalType::Varchar => write!(f, "VARCHAR"),
            LogicalType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({},{})", precision, scale)
            }
            LogicalType::Date => write!(f, "DATE"),
            LogicalType::Timestamp => write!(f, "TIMESTAMP"),
            LogicalType::List(element_type) => write!(f, "{}[]", element_type),
            LogicalType::Tuple(types) => {
                write!(f, "TUPLE(")?;
                for (i, element_type) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element_type)?;
                }
                write!(f, ")")
            }
            LogicalType::Nullable(inner) => write!(f, "NULLABLE({})", inner),
            LogicalType::Set => write!(f, "SET"),
            LogicalType::Null => write!(f, "NULL"),
            LogicalType::Invalid => write!(f, "INVALID"),
        }
    }
}

/// Type system utilities
pub struct TypeUtils;

impl TypeUtils {
    /// Get the smallest type that can hold both types.
    ///
    /// Nullability is carried over: if either side is nullable the result is too.
    pub fn get_max_type(type1: &LogicalType, type2: &LogicalType) -> PrismDBResult<LogicalType> {
        use LogicalType::*;

        let nullable = type1.is_nullable() || type2.is_nullable();
        let (left, right) = (type1.remove_nullable(), type2.remove_nullable());

        let max = if left == right {
            left.clone()
        } else {
            match (&left, &right) {
                (Null, other) | (other, Null) => other.clone(),

                // Numeric type promotion
                (TinyInt, SmallInt | Integer | BigInt | Float | Double | Decimal { .. }) => {
                    right.clone()
                }
                (SmallInt, TinyInt) | (Integer, TinyInt | SmallInt) => left.clone(),
                (SmallInt, Integer | BigInt | Float | Double | Decimal { .. }) => right.clone(),
                (Integer, BigInt | Float | Double | Decimal { .. }) => right.clone(),
                (BigInt, TinyInt | SmallInt | Integer) => left.clone(),
                (BigInt, Float | Double | Decimal { .. }) => right.clone(),
                (Float | Double | Decimal { .. }, TinyInt | SmallInt | Integer | BigInt) => {
                    left.clone()
                }
                (Float, Double) | (Double, Float) => Double,
                (Decimal { .. }, Float | Double) | (Float | Double, Decimal { .. }) => Double,

                // Date to timestamp
                (Date, Timestamp) | (Timestamp, Date) => Timestamp,

                _ => {
                    return Err(PrismDBError::InvalidType(format!(
                        "Cannot find common type between {} and {}",
                        type1, type2
                    )))
                }
            }
        };

        Ok(if nullable { max.make_nullable() } else { max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_type_creation() {
        let int_type = LogicalType::Integer;
        assert!(int_type.is_numeric());
        assert!(int_type.is_integral());
        assert!(!int_type.is_floating_point());

        let float_type = LogicalType::Float;
        assert!(float_type.is_numeric());
        assert!(!float_type.is_integral());
        assert!(float_type.is_floating_point());
    }

    #[test]
    fn test_nullable_wrapping() {
        let nullable = LogicalType::Integer.make_nullable();
        assert_eq!(nullable, LogicalType::Nullable(Box::new(LogicalType::Integer)));
        assert!(nullable.is_nullable());
        assert_eq!(nullable.make_nullable(), nullable);
        assert_eq!(nullable.remove_nullable(), LogicalType::Integer);
        assert_eq!(LogicalType::Integer.remove_nullable(), LogicalType::Integer);

        // Sets and nested types stay unwrapped
        assert_eq!(LogicalType::Set.make_nullable(), LogicalType::Set);
        let list = LogicalType::List(Box::new(LogicalType::Integer));
        assert_eq!(list.make_nullable(), list);
    }

    #[test]
    fn test_decimal_validation() {
        assert!(LogicalType::decimal(10, 2).is_ok());
        assert!(LogicalType::decimal(0, 0).is_err());
        assert!(LogicalType::decimal(39, 10).is_err());
        assert!(LogicalType::decimal(10, 11).is_err());
    }

    #[test]
    fn test_type_promotion() {
        let max_type = TypeUtils::get_max_type(&LogicalType::TinyInt, &LogicalType::BigInt).unwrap();
        assert_eq!(max_type, LogicalType::BigInt);

        let max_type = TypeUtils::get_max_type(&LogicalType::BigInt, &LogicalType::TinyInt).unwrap();
        assert_eq!(max_type, LogicalType::BigInt);

        let max_type = TypeUtils::get_max_type(
            &LogicalType::Integer.make_nullable(),
            &LogicalType::Double,
        )
        .unwrap();
        assert_eq!(max_type, LogicalType::Double.make_nullable());

        assert!(TypeUtils::get_max_type(&LogicalType::Varchar, &LogicalType::Integer).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(LogicalType::Integer.make_nullable().to_string(), "NULLABLE(INTEGER)");
        assert_eq!(
            LogicalType::Tuple(vec![LogicalType::Integer, LogicalType::Varchar]).to_string(),
            "TUPLE(INTEGER, VARCHAR)"
        );
        assert_eq!(
            LogicalType::List(Box::new(LogicalType::BigInt)).to_string(),
            "BIGINT[]"
        );
    }
}
