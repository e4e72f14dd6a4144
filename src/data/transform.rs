use std::fmt;

use super::error::{DataError, Result};
use super::model::Value;

/// A named, element-wise unary numeric function.
pub struct Transform {
    name: String,
    func: Box<dyn Fn(f64) -> f64>,
}

impl Transform {
    pub fn new(name: impl Into<String>, func: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn sqrt() -> Self {
        Self::new("sqrt", f64::sqrt)
    }

    /// Natural logarithm.
    pub fn ln() -> Self {
        Self::new("log", f64::ln)
    }

    pub fn log10() -> Self {
        Self::new("log10", f64::log10)
    }

    pub fn exp() -> Self {
        Self::new("exp", f64::exp)
    }

    pub fn abs() -> Self {
        Self::new("absolute", f64::abs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the function to every cell of `values`, which belong to
    /// `column`. Results are always floats; `Null` maps to `NaN`.
    pub fn apply(&self, column: &str, values: &[Value]) -> Result<Vec<Value>> {
        values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                let x = value.as_f64().ok_or_else(|| DataError::NotNumeric {
                    column: column.to_string(),
                    row,
                    value: value.to_string(),
                })?;
                Ok(Value::Float((self.func)(x)))
            })
            .collect()
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(values: &[Value]) -> Vec<f64> {
        values.iter().map(|v| v.as_f64().unwrap()).collect()
    }

    #[test]
    fn sqrt_is_applied_element_wise() {
        let input: Vec<Value> = (1..=5).map(Value::from).collect();
        let out = Transform::sqrt().apply("NewColumn", &input).unwrap();
        let expected = [1.0, 2f64.sqrt(), 3f64.sqrt(), 2.0, 5f64.sqrt()];
        assert_eq!(floats(&out), expected);
        assert!(out.iter().all(|v| matches!(v, Value::Float(_))));
    }

    #[test]
    fn null_and_domain_errors_follow_ieee() {
        let input = vec![Value::Null, Value::Float(-1.0), Value::Integer(0)];
        let out = Transform::ln().apply("c", &input).unwrap();
        let out = floats(&out);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_eq!(out[2], f64::NEG_INFINITY);
    }

    #[test]
    fn strings_are_rejected_with_position() {
        let input = vec![Value::Integer(4), Value::from("four")];
        let err = Transform::sqrt().apply("c", &input).unwrap_err();
        match err {
            DataError::NotNumeric { column, row, value } => {
                assert_eq!(column, "c");
                assert_eq!(row, 1);
                assert_eq!(value, "four");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_transform_keeps_its_name() {
        let double = Transform::new("double", |x| x * 2.0);
        assert_eq!(double.name(), "double");
        let out = double.apply("c", &[Value::Bool(true)]).unwrap();
        assert_eq!(out, vec![Value::Float(2.0)]);
    }
}
