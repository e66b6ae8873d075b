use serde::Serialize;
use std::hash::{Hash, Hasher};

///Scalar attribute value attached to a measurement.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::String(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            // floats keyed by bit pattern, attribute values are labels not math
            Value::Float(v) => v.to_bits().hash(state),
            Value::Bool(v) => v.hash(state),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

///Order-irrelevant string-keyed dimensions for one measurement. May be empty
///but is always present. Keys are kept sorted so equal sets compare and hash
///equal no matter the insertion order; a repeated key keeps the last value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttributeSet(Vec<(String, Value)>);

impl AttributeSet {
    pub fn empty() -> Self {
        AttributeSet(vec![])
    }

    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut attrs: Vec<(String, Value)> = vec![];
        for (k, v) in pairs {
            let (k, v) = (k.into(), v.into());
            match attrs.iter_mut().find(|(key, _)| *key == k) {
                Some(entry) => entry.1 = v,
                None => attrs.push((k, v)),
            }
        }
        attrs.sort_by(|a, b| a.0.cmp(&b.0));
        AttributeSet(attrs)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for AttributeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_order_is_irrelevant() {
        let a = AttributeSet::new([("tier", "premium"), ("status", "success")]);
        let b = AttributeSet::new([("status", "success"), ("tier", "premium")]);

        assert_eq!(a, b);
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let attrs = AttributeSet::new([("status", "failed"), ("status", "success")]);

        let values: Vec<_> = attrs.iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].1, &Value::String("success".to_owned()));
    }

    #[test]
    fn empty_set_is_a_valid_key() {
        let attrs = AttributeSet::empty();

        assert!(attrs.is_empty());
        assert_eq!(attrs, AttributeSet::default());
    }
}
