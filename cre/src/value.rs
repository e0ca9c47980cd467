use std::fmt;

use crate::binding::Arg;

/// A dynamic value stored in widget state or passed to an action.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number truncated to an integer, if this is a finite number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

/// Formats like the browser stringifies the equivalent JS value, so
/// templates can interpolate values directly.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => fmt_number(*n, f),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

macro_rules! impl_from_number {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f32);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(values: Vec<V>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

impl From<Arg> for Value {
    fn from(arg: Arg) -> Self {
        match arg {
            Arg::Number(n) => Self::Number(n),
            Arg::Text(s) => Self::Text(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_js_stringification() {
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(-2.5).to_string(), "-2.5");
        assert_eq!(Value::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "1,2,3");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::Null, Value::from(0.5)]).to_string(),
            "a,,0.5"
        );
    }

    #[test]
    fn test_accessors() {
        let v = Value::from(7u32);
        assert_eq!(v.as_f64(), Some(7.0));
        assert_eq!(v.as_i64(), Some(7));
        assert_eq!(v.as_str(), None);

        let v = Value::from("hi");
        assert_eq!(v.as_str(), Some("hi"));
        assert_eq!(v.as_bool(), None);

        assert!(Value::from(Option::<i32>::None).is_null());
        assert_eq!(Value::from(f64::NAN).as_i64(), None);

        let v = Value::from(vec![1, 2]);
        assert_eq!(
            v.as_list(),
            Some(&[Value::Number(1.0), Value::Number(2.0)][..])
        );
        assert_eq!(Value::from(true).as_list(), None);
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(Value::from(Arg::Number(3.0)), Value::Number(3.0));
        assert_eq!(Value::from(Arg::Text("x".into())), Value::Text("x".into()));
    }
}
