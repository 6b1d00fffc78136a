//! Dynamically typed values exchanged with scripts.

use crate::HostError;
use imgview_core::{Color, PixelValue};
use imgview_io::Palette;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Script function. Called with its argument list; the return value is
/// discarded.
pub type Callback = Rc<dyn Fn(Vec<Value>)>;

/// A script value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// String.
    String(String),
    /// Byte buffer.
    Bytes(Vec<u8>),
    /// Plain object.
    Object(BTreeMap<String, Value>),
    /// Color object.
    Color(Color),
    /// Palette object.
    Palette(Arc<Palette>),
    /// Error object.
    Error(Rc<HostError>),
    /// Callable.
    Function(Callback),
}

impl Value {
    /// Wraps a closure as a [`Value::Function`].
    pub fn function(f: impl Fn(Vec<Value>) + 'static) -> Self {
        Value::Function(Rc::new(f))
    }

    /// Builds an object from key/value pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wraps a palette.
    pub fn palette(palette: Palette) -> Self {
        Value::Palette(Arc::new(palette))
    }

    /// True for `undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// True for `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Number payload.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Number payload truncated toward zero, like a script engine's
    /// integer conversion.
    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().map(|n| n.trunc() as i64)
    }

    /// String payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Byte payload.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Color payload.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Error payload.
    pub fn as_error(&self) -> Option<&HostError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Function payload.
    pub fn as_function(&self) -> Option<&Callback> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Property lookup on a plain object; `undefined` otherwise.
    pub fn get(&self, key: &str) -> &Value {
        const UNDEFINED: &Value = &Value::Undefined;
        match self {
            Value::Object(map) => map.get(key).unwrap_or(UNDEFINED),
            _ => UNDEFINED,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<HostError> for Value {
    fn from(e: HostError) -> Self {
        Value::Error(Rc::new(e))
    }
}

impl From<PixelValue> for Value {
    fn from(p: PixelValue) -> Self {
        match p {
            PixelValue::Packed(v) => Value::Number(v.into()),
            PixelValue::Float(v) => Value::Number(v),
            PixelValue::Color(c) => Value::Color(c),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Undefined, Into::into)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Color(a), Value::Color(b)) => a == b,
            (Value::Palette(a), Value::Palette(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "<Buffer {} bytes>", b.len()),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Color(c) => write!(f, "{c}"),
            Value::Palette(p) => write!(f, "<Palette {} colors>", p.len()),
            Value::Error(e) => write!(f, "[{}: {e}]", e.kind()),
            Value::Function(_) => f.write_str("[Function]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_conversion() {
        assert_eq!(Value::from(PixelValue::Packed(7)), Value::Number(7.0));
        assert_eq!(Value::from(PixelValue::Float(0.5)), Value::Number(0.5));
        let red = Color::rgb(255, 0, 0);
        assert_eq!(Value::from(PixelValue::Color(red)), Value::Color(red));
        assert!(Value::from(None::<PixelValue>).is_undefined());
    }

    #[test]
    fn test_object_lookup() {
        let obj = Value::object([("z", Value::from(9))]);
        assert_eq!(obj.get("z").as_integer(), Some(9));
        assert!(obj.get("palette").is_undefined());
        assert!(Value::Null.get("z").is_undefined());
    }

    #[test]
    fn test_integer_truncation() {
        assert_eq!(Value::Number(3.9).as_integer(), Some(3));
        assert_eq!(Value::Number(-1.5).as_integer(), Some(-1));
        assert_eq!(Value::from("3").as_integer(), None);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Value::Bytes(vec![0; 4])), "<Buffer 4 bytes>");
        assert_eq!(format!("{:?}", Value::function(|_| {})), "[Function]");
    }
}
