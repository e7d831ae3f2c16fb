//! Body serialization.
//!
//! Handler code can hand almost anything to a response. The shape of that value is decided
//! once, when it is converted into a [`BodyValue`], so serializing it later is a total
//! function over a closed set of cases.

use mime::Mime;
use serde::Serialize;
use serde_json::{Number, Value};

/// A response body value before serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BodyValue {
    /// No body was given.
    #[default]
    Empty,
    /// A number or a boolean.
    Scalar(Scalar),
    /// Text, passed through untouched.
    Text(String),
    /// An object, an array or `null`.
    Structured(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(Number),
    Bool(bool),
}

/// Result of [`BodyValue::serialize`].
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedBody {
    pub body: String,
    /// The content type to apply when the response has none yet.
    pub content_type: Mime,
}

impl BodyValue {
    /// Converts any serializable value, classifying the produced JSON.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(BodyValue::from)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, BodyValue::Empty)
    }

    /// Serializes the value into a body string.
    ///
    /// - `Empty` becomes an empty string
    /// - `Text` is passed through unchanged
    /// - scalars, objects and arrays use their canonical JSON text, keeping key order
    pub fn serialize(self) -> SerializedBody {
        let body = match self {
            BodyValue::Empty => String::new(),
            BodyValue::Text(text) => text,
            other => other.into_json(),
        };
        SerializedBody { body, content_type: mime::APPLICATION_JSON }
    }

    /// Serializes the value as JSON text, even when it is plain text.
    ///
    /// An empty value is encoded as `null`.
    pub fn into_json(self) -> String {
        match self {
            BodyValue::Empty => Value::Null.to_string(),
            BodyValue::Scalar(Scalar::Number(number)) => number.to_string(),
            BodyValue::Scalar(Scalar::Bool(flag)) => flag.to_string(),
            BodyValue::Text(text) => Value::String(text).to_string(),
            BodyValue::Structured(value) => value.to_string(),
        }
    }
}

impl From<Value> for BodyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(flag) => BodyValue::Scalar(Scalar::Bool(flag)),
            Value::Number(number) => BodyValue::Scalar(Scalar::Number(number)),
            Value::String(text) => BodyValue::Text(text),
            structured @ (Value::Null | Value::Array(_) | Value::Object(_)) => BodyValue::Structured(structured),
        }
    }
}

impl From<()> for BodyValue {
    fn from(_: ()) -> Self {
        BodyValue::Empty
    }
}

impl<T: Into<BodyValue>> From<Option<T>> for BodyValue {
    fn from(option: Option<T>) -> Self {
        option.map_or(BodyValue::Empty, Into::into)
    }
}

impl From<String> for BodyValue {
    fn from(text: String) -> Self {
        BodyValue::Text(text)
    }
}

impl From<&str> for BodyValue {
    fn from(text: &str) -> Self {
        BodyValue::Text(text.to_owned())
    }
}

impl From<bool> for BodyValue {
    fn from(flag: bool) -> Self {
        BodyValue::Scalar(Scalar::Bool(flag))
    }
}

impl From<f64> for BodyValue {
    fn from(number: f64) -> Self {
        // non finite numbers have no JSON form, they degrade to `null`
        match Number::from_f64(number) {
            Some(number) => BodyValue::Scalar(Scalar::Number(number)),
            None => BodyValue::Structured(Value::Null),
        }
    }
}

macro_rules! integer_body {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for BodyValue {
                fn from(number: $ty) -> Self {
                    BodyValue::Scalar(Scalar::Number(Number::from(number)))
                }
            }
        )*
    };
}

integer_body!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
