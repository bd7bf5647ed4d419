use crate::common::error::{PrismDBError, PrismDBResult};
use crate::types::logical_type::{LogicalType, TypeUtils};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Represents a single value with type information
/// Values are what literals and constant columns hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value (type is stored separately)
    Null,
    /// Boolean value
    Boolean(bool),
    /// 8-bit signed integer
    TinyInt(i8),
    /// 16-bit signed integer
    SmallInt(i16),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    BigInt(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit double precision
    Double(f64),
    /// String value
    Varchar(String),
    /// Decimal value (stored as integer with scale)
    Decimal {
        value: i128,
        scale: u8,
        precision: u8,
    },
    /// Date value (days since 1970-01-01)
    Date(i32),
    /// Timestamp value (microseconds since 1970-01-01 00:00:00 UTC)
    Timestamp(i64),
    /// List value
    List(Vec<Value>),
    /// Tuple value
    Tuple(Vec<Value>),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the logical type that the value variant itself carries
    pub fn get_type(&self) -> LogicalType {
        match self {
            Value::Null => LogicalType::Null,
            Value::Boolean(_) => LogicalType::Boolean,
            Value::TinyInt(_) => LogicalType::TinyInt,
            Value::SmallInt(_) => LogicalType::SmallInt,
            Value::Integer(_) => LogicalType::Integer,
            Value::BigInt(_) => LogicalType::BigInt,
            Value::Float(_) => LogicalType::Float,
            Value::Double(_) => LogicalType::Double,
            Value::Varchar(_) => LogicalType::Varchar,
            Value::Decimal {
                precision, scale, ..
            } => LogicalType::Decimal {
                precision: *precision,
                scale: *scale,
            },
            Value::Date(_) => LogicalType::Date,
            Value::Timestamp(_) => LogicalType::Timestamp,
            Value::List(values) => match values.first() {
                Some(first) => LogicalType::List(Box::new(first.get_type())),
                None => LogicalType::List(Box::new(LogicalType::Null)),
            },
            Value::Tuple(values) => LogicalType::Tuple(values.iter().map(Value::get_type).collect()),
        }
    }

    /// Infer the narrowest type able to hold this literal.
    ///
    /// Integers pick the smallest signed width that fits, NULL becomes
    /// `Nullable(Null)`, lists take the common type of their elements.
    pub fn infer_type(&self) -> LogicalType {
        match self {
            Value::Null => LogicalType::Null.make_nullable(),
            Value::TinyInt(v) => Self::narrowest_integer_type(*v as i64),
            Value::SmallInt(v) => Self::narrowest_integer_type(*v as i64),
            Value::Integer(v) => Self::narrowest_integer_type(*v as i64),
            Value::BigInt(v) => Self::narrowest_integer_type(*v),
            Value::List(values) => {
                let mut element_type = LogicalType::Null;
                for value in values {
                    element_type = TypeUtils::get_max_type(&element_type, &value.infer_type())
                        .unwrap_or(LogicalType::Invalid);
                }
                LogicalType::List(Box::new(element_type))
            }
            Value::Tuple(values) => {
                LogicalType::Tuple(values.iter().map(Value::infer_type).collect())
            }
            other => other.get_type(),
        }
    }

    fn narrowest_integer_type(value: i64) -> LogicalType {
        if i8::try_from(value).is_ok() {
            LogicalType::TinyInt
        } else if i16::try_from(value).is_ok() {
            LogicalType::SmallInt
        } else if i32::try_from(value).is_ok() {
            LogicalType::Integer
        } else {
            LogicalType::BigInt
        }
    }

    /// Try to extract an i64 value from any integral variant
    pub fn try_as_i64(&self) -> PrismDBResult<i64> {
        match self {
            Value::BigInt(value) => Ok(*value),
            Value::Integer(value) => Ok(*value as i64),
            Value::SmallInt(value) => Ok(*value as i64),
            Value::TinyInt(value) => Ok(*value as i64),
            Value::Date(value) => Ok(*value as i64),
            Value::Timestamp(value) => Ok(*value),
            Value::Null => Err(PrismDBError::InvalidType(
                "Cannot extract i64 from NULL".to_string(),
            )),
            _ => Err(PrismDBError::InvalidType(format!(
                "Cannot extract i64 from {}",
                self.get_type()
            ))),
        }
    }

    /// Try to extract an f64 value from any numeric variant
    pub fn try_as_f64(&self) -> PrismDBResult<f64> {
        match self {
            Value::Double(value) => Ok(*value),
            Value::Float(value) => Ok(*value as f64),
            Value::Decimal { value, scale, .. } => Ok(*value as f64 / 10_f64.powi(*scale as i32)),
            other => other.try_as_i64().map(|v| v as f64),
        }
    }

    /// Create a boolean value
    pub fn boolean(value: bool) -> Self {
        Value::Boolean(value)
    }

    /// Create an integer value
    pub fn integer(value: i32) -> Self {
        Value::Integer(value)
    }

    /// Create a big integer value
    pub fn bigint(value: i64) -> Self {
        Value::BigInt(value)
    }

    /// Create a double value
    pub fn double(value: f64) -> Self {
        Value::Double(value)
    }

    /// Create a string value
    pub fn varchar(value: impl Into<String>) -> Self {
        Value::Varchar(value.into())
    }

    /// Create a tuple value
    pub fn tuple(values: Vec<Value>) -> Self {
        Value::Tuple(values)
    }

    /// Compare two values for ordering.
    ///
    /// NULL sorts first; integers of different widths, floats and decimals
    /// compare numerically; lists and tuples compare element-wise.
    pub fn compare(&self, other: &Value) -> PrismDBResult<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Null, _) => Ok(Ordering::Less),
            (_, Value::Null) => Ok(Ordering::Greater),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),
            (Value::Varchar(a), Value::Varchar(b)) => Ok(a.cmp(b)),
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                for (left, right) in a.iter().zip(b.iter()) {
                    let ordering = left.compare(right)?;
                    if ordering != Ordering::Equal {
                        return Ok(ordering);
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            (a, b) if a.is_integral() && b.is_integral() => Ok(a.try_as_i64()?.cmp(&b.try_as_i64()?)),
            (a, b) if a.is_numeric() && b.is_numeric() => a
                .try_as_f64()?
                .partial_cmp(&b.try_as_f64()?)
                .ok_or_else(|| PrismDBError::InvalidArgument("Cannot compare NaN values".to_string())),
            _ => Err(PrismDBError::InvalidType(format!(
                "Cannot compare {} and {}",
                self.get_type(),
                other.get_type()
            ))),
        }
    }

    fn is_integral(&self) -> bool {
        matches!(
            self,
            Value::TinyInt(_)
                | Value::SmallInt(_)
                | Value::Integer(_)
                | Value::BigInt(_)
                | Value::Date(_)
                | Value::Timestamp(_)
        )
    }

    fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Value::Float(_) | Value::Double(_) | Value::Decimal { .. })
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    write!(f, "'")?;
    for ch in value.chars() {
        match ch {
            '\'' => write!(f, "\\'")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            other => write!(f, "{}", other)?,
        }
    }
    write!(f, "'")
}

fn write_separated(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

/// Canonical textual form of a value.
///
/// This is the rendering used in column names, so a literal in a syntax tree
/// and a constant column in a computation graph print identically.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::TinyInt(value) => write!(f, "{}", value),
            Value::SmallInt(value) => write!(f, "{}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::BigInt(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", value),
            Value::Varchar(value) => write_quoted(f, value),
            Value::Decimal { value, scale, .. } => {
                let divisor = 10_i128.pow(*scale as u32);
                let integer_part = value / divisor;
                let fractional_part = (value % divisor).abs();
                if *scale == 0 {
                    write!(f, "{}", integer_part)
                } else {
                    write!(
                        f,
                        "{}.{:0width$}",
                        integer_part,
                        fractional_part,
                        width = *scale as usize
                    )
                }
            }
            Value::Date(value) => write!(f, "{}", value),
            Value::Timestamp(value) => write!(f, "{}", value),
            Value::List(values) => {
                write!(f, "[")?;
                write_separated(f, values)?;
                write!(f, "]")
            }
            Value::Tuple(values) => {
                write!(f, "(")?;
                write_separated(f, values)?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_type_inference() {
        assert_eq!(Value::bigint(5).infer_type(), LogicalType::TinyInt);
        assert_eq!(Value::bigint(-129).infer_type(), LogicalType::SmallInt);
        assert_eq!(Value::bigint(70_000).infer_type(), LogicalType::Integer);
        assert_eq!(Value::bigint(1 << 40).infer_type(), LogicalType::BigInt);
        assert_eq!(Value::double(1.5).infer_type(), LogicalType::Double);
        assert_eq!(Value::varchar("a").infer_type(), LogicalType::Varchar);
        assert_eq!(
            Value::Null.infer_type(),
            LogicalType::Nullable(Box::new(LogicalType::Null))
        );
        assert_eq!(
            Value::List(vec![Value::bigint(1), Value::bigint(1000)]).infer_type(),
            LogicalType::List(Box::new(LogicalType::SmallInt))
        );
    }

    #[test]
    fn test_canonical_rendering() {
        assert_eq!(Value::bigint(5).to_string(), "5");
        assert_eq!(Value::double(2.5).to_string(), "2.5");
        assert_eq!(Value::varchar("it's").to_string(), "'it\\'s'");
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::boolean(true).to_string(), "true");
        assert_eq!(
            Value::tuple(vec![Value::bigint(1), Value::varchar("x")]).to_string(),
            "(1, 'x')"
        );
        assert_eq!(
            Value::List(vec![Value::bigint(1), Value::bigint(2)]).to_string(),
            "[1, 2]"
        );
        let decimal = Value::Decimal {
            value: -1205,
            scale: 2,
            precision: 6,
        };
        assert_eq!(decimal.to_string(), "-12.05");
    }

    #[test]
    fn test_value_comparison() {
        assert_eq!(
            Value::integer(10).compare(&Value::bigint(20)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Value::TinyInt(3).compare(&Value::double(2.5)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Value::varchar("apple").compare(&Value::varchar("banana")).unwrap(),
            Ordering::Less
        );
        assert_eq!(Value::Null.compare(&Value::integer(1)).unwrap(), Ordering::Less);
        assert_eq!(
            Value::tuple(vec![Value::integer(1), Value::integer(2)])
                .compare(&Value::tuple(vec![Value::integer(1), Value::integer(3)]))
                .unwrap(),
            Ordering::Less
        );
        assert!(Value::varchar("a").compare(&Value::integer(1)).is_err());
    }
}
