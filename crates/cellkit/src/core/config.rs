//! Schema-driven widget configuration.
//!
//! Every widget describes its options once, as a list of `(name, default,
//! setter)` fields. Building a config applies each default through its setter
//! and then applies caller-supplied overrides, so defaults and overrides go
//! through exactly the same validation.
use serde_json::Value;

use super::{
    error::{Error, Result},
    filter::DisplayType,
};
use crate::geom::Position;

/// Caller-supplied option overrides.
pub type Options = serde_json::Map<String, Value>;

/// Setter applying one option value to a config.
pub type Setter<C> = fn(&mut C, &Value) -> Result<()>;

/// One configuration field.
struct Field<C> {
    /// Option name.
    name: &'static str,
    /// Value applied when the caller does not override it.
    default: Value,
    /// Applies a value.
    apply: Setter<C>,
}

/// The full option schema for a config type.
pub struct Schema<C> {
    /// Fields, applied in declaration order.
    fields: Vec<Field<C>>,
}

impl<C: Default> Default for Schema<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Default> Schema<C> {
    /// An empty schema.
    pub fn new() -> Self {
        Self { fields: vec![] }
    }

    /// Add a field.
    pub fn field(mut self, name: &'static str, default: impl Into<Value>, apply: Setter<C>) -> Self {
        self.fields.push(Field {
            name,
            default: default.into(),
            apply,
        });
        self
    }

    /// The names of every field.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Build a config from defaults plus overrides.
    pub fn build(&self, opts: &Options) -> Result<C> {
        if let Some(unknown) = opts.keys().find(|k| !self.fields.iter().any(|f| f.name == k.as_str())) {
            return Err(Error::Config(format!("unknown option: {unknown}")));
        }
        let mut conf = C::default();
        for f in &self.fields {
            let v = opts.get(f.name).unwrap_or(&f.default);
            (f.apply)(&mut conf, v).map_err(|e| match e {
                Error::Config(msg) => Error::Config(format!("{}: {msg}", f.name)),
                other => other,
            })?;
        }
        Ok(conf)
    }
}

/// Build an ill-typed value error.
fn expected(what: &str, v: &Value) -> Error {
    Error::Config(format!("expected {what}, got {v}"))
}

/// A boolean.
pub fn as_bool(v: &Value) -> Result<bool> {
    v.as_bool().ok_or_else(|| expected("a boolean", v))
}

/// A signed integer that fits in 32 bits.
pub fn as_i32(v: &Value) -> Result<i32> {
    v.as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| expected("an integer", v))
}

/// A non-negative integer that fits in 32 bits.
pub fn as_u32(v: &Value) -> Result<u32> {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| expected("a non-negative integer", v))
}

/// A string.
pub fn as_str(v: &Value) -> Result<String> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| expected("a string", v))
}

/// A single character.
pub fn as_char(v: &Value) -> Result<char> {
    let s = v.as_str().ok_or_else(|| expected("a character", v))?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(expected("a character", v)),
    }
}

/// A list of lines: either one string or an array of strings.
pub fn as_lines(v: &Value) -> Result<Vec<String>> {
    match v {
        Value::Null => Ok(vec![]),
        Value::String(s) if s.is_empty() => Ok(vec![]),
        Value::String(s) => Ok(s.lines().map(str::to_string).collect()),
        Value::Array(items) => items.iter().map(as_str).collect(),
        _ => Err(expected("a string or list of strings", v)),
    }
}

/// A position: an integer or one of `LEFT`, `RIGHT`, `TOP`, `BOTTOM`,
/// `CENTER`.
pub fn as_position(v: &Value) -> Result<Position> {
    if let Some(s) = v.as_str() {
        return match s {
            "LEFT" => Ok(Position::Left),
            "RIGHT" => Ok(Position::Right),
            "TOP" => Ok(Position::Top),
            "BOTTOM" => Ok(Position::Bottom),
            "CENTER" => Ok(Position::Center),
            _ => Err(expected("a position", v)),
        };
    }
    as_i32(v).map(Position::At)
}

/// A display type name.
pub fn as_display_type(v: &Value) -> Result<DisplayType> {
    let s = v.as_str().ok_or_else(|| expected("a display type", v))?;
    s.parse().map_err(|_| expected("a display type", v))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Conf {
        width: i32,
        boxed: bool,
        x: Position,
        title: Vec<String>,
    }

    fn schema() -> Schema<Conf> {
        Schema::<Conf>::new()
            .field("width", 10, |c, v| {
                c.width = as_i32(v)?;
                Ok(())
            })
            .field("box", false, |c, v| {
                c.boxed = as_bool(v)?;
                Ok(())
            })
            .field("x", "CENTER", |c, v| {
                c.x = as_position(v)?;
                Ok(())
            })
            .field("title", Value::Null, |c, v| {
                c.title = as_lines(v)?;
                Ok(())
            })
    }

    fn opts(v: Value) -> Options {
        match v {
            Value::Object(m) => m,
            _ => Options::new(),
        }
    }

    #[test]
    fn defaults_then_overrides() -> Result<()> {
        let c = schema().build(&Options::new())?;
        assert_eq!(
            c,
            Conf {
                width: 10,
                boxed: false,
                x: Position::Center,
                title: vec![],
            }
        );

        let c = schema().build(&opts(json!({"box": true, "x": 4, "title": ["a", "b"]})))?;
        assert!(c.boxed);
        assert_eq!(c.x, Position::At(4));
        assert_eq!(c.title, vec!["a", "b"]);
        assert_eq!(schema().names().count(), 4);
        Ok(())
    }

    #[test]
    fn rejects_bad_options() {
        let err = schema().build(&opts(json!({"colour": 1})));
        assert_eq!(err, Err(Error::Config("unknown option: colour".into())));
        let err = schema().build(&opts(json!({"width": "wide"})));
        assert!(matches!(err, Err(Error::Config(m)) if m.starts_with("width:")));
        assert!(schema().build(&opts(json!({"x": "MIDDLE"}))).is_err());
    }

    #[test]
    fn values() -> Result<()> {
        assert_eq!(as_char(&json!("."))?, '.');
        assert!(as_char(&json!("..")).is_err());
        assert_eq!(as_lines(&json!("a\nb"))?, vec!["a", "b"]);
        assert!(as_u32(&json!(-1)).is_err());
        assert_eq!(as_display_type(&json!("UHMIXED"))?, DisplayType::UHMixed);
        Ok(())
    }
}
