//! Minimal JSON5 fragment tree and its two text layouts.
//!
//! Output is assembled from fragments joined with separators, so there is
//! never a trailing comma to strip. Keys are emitted unquoted; every key the
//! converters produce is a plain identifier.

use std::fmt::Write as _;

/// Two spaces per nesting level.
const INDENT: &str = "  ";

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    Array(Vec<Value>),
    Object(Object),
    /// Rendered on one line even inside block output.
    Inline(Box<Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn inline(value: Value) -> Self {
        Value::Inline(Box::new(value))
    }

    fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<[f64; 3]> for Value {
    fn from(value: [f64; 3]) -> Self {
        Value::Array(value.into_iter().map(Value::Number).collect())
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

/// Ordered key/value pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    fields: Vec<(&'static str, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &'static str, value: impl Into<Value>) {
        self.fields.push((key, value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// One field per line, numeric arrays kept on one line.
    Block,
    /// Everything on a single line.
    Compact,
}

pub fn render(value: &Value, style: Style) -> String {
    let mut out = String::new();
    match style {
        Style::Block => write_block(&mut out, value, 0),
        Style::Compact => write_compact(&mut out, value),
    }
    out
}

fn write_block(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(object) if !object.is_empty() => {
            let fields: Vec<String> = object
                .fields
                .iter()
                .map(|(key, value)| {
                    let mut line = format!("{}{key}: ", INDENT.repeat(depth + 1));
                    write_block(&mut line, value, depth + 1);
                    line
                })
                .collect();
            out.push_str("{\n");
            out.push_str(&fields.join(",\n"));
            let _ = write!(out, "\n{}}}", INDENT.repeat(depth));
        }
        Value::Array(items) if !items.iter().all(Value::is_number) => {
            let lines: Vec<String> = items
                .iter()
                .map(|item| {
                    let mut line = INDENT.repeat(depth + 1);
                    write_block(&mut line, item, depth + 1);
                    line
                })
                .collect();
            out.push_str("[\n");
            out.push_str(&lines.join(",\n"));
            let _ = write!(out, "\n{}]", INDENT.repeat(depth));
        }
        Value::Inline(inner) => write_compact(out, inner),
        scalar => write_compact(out, scalar),
    }
}

fn write_compact(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => write_string(out, s),
        Value::Number(n) => write_number(out, *n),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| {
                    let mut part = String::new();
                    write_compact(&mut part, item);
                    part
                })
                .collect();
            let _ = write!(out, "[{}]", parts.join(", "));
        }
        Value::Object(object) => {
            let parts: Vec<String> = object
                .fields
                .iter()
                .map(|(key, value)| {
                    let mut part = format!("{key}: ");
                    write_compact(&mut part, value);
                    part
                })
                .collect();
            let _ = write!(out, "{{{}}}", parts.join(", "));
        }
        Value::Inline(inner) => write_compact(out, inner),
    }
}

/// Shortest round-trip form, always with a fractional part or exponent.
fn write_number(out: &mut String, n: f64) {
    if n.is_nan() {
        out.push_str("NaN");
    } else if n.is_infinite() {
        out.push_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    } else {
        let _ = write!(out, "{n:?}");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture() -> Object {
        Object::new()
            .field("file", "./a.png")
            .field(
                "wrap",
                Value::Array(vec![Value::from("repeat"), Value::from("clamp_to_edge")]),
            )
    }

    #[test]
    fn compact_object_on_one_line() {
        let value = Value::from(
            Object::new()
                .field("name", "foo")
                .field("albedo", [1.0, 0.5, 0.0])
                .field("alpha_test", true),
        );
        assert_eq!(
            render(&value, Style::Compact),
            r#"{name: "foo", albedo: [1.0, 0.5, 0.0], alpha_test: true}"#
        );
    }

    #[test]
    fn block_object_indents_and_joins() {
        let value = Value::from(
            Object::new()
                .field("name", "foo")
                .field("albedo", [1.0, 1.0, 1.0])
                .field("textures", Value::Array(vec![Value::Object(texture())])),
        );
        let expected = "{\n  name: \"foo\",\n  albedo: [1.0, 1.0, 1.0],\n  textures: [\n    {\n      file: \"./a.png\",\n      wrap: [\n        \"repeat\",\n        \"clamp_to_edge\"\n      ]\n    }\n  ]\n}";
        assert_eq!(render(&value, Style::Block), expected);
    }

    #[test]
    fn inline_values_stay_on_one_line_in_block_output() {
        let material = Object::new().field("name", "a");
        let value = Value::from(Object::new().field(
            "materials",
            Value::Array(vec![
                Value::inline(material.clone().into()),
                Value::inline(material.into()),
            ]),
        ));
        assert_eq!(
            render(&value, Style::Block),
            "{\n  materials: [\n    {name: \"a\"},\n    {name: \"a\"}\n  ]\n}"
        );
    }

    #[test]
    fn empty_containers() {
        assert_eq!(render(&Object::new().into(), Style::Block), "{}");
        assert_eq!(render(&Value::Array(vec![]), Style::Block), "[]");
    }

    #[test]
    fn numbers_and_strings_are_escaped() {
        assert_eq!(render(&Value::Number(0.1), Style::Compact), "0.1");
        assert_eq!(render(&Value::Number(2.0), Style::Compact), "2.0");
        assert_eq!(render(&Value::Number(f64::INFINITY), Style::Compact), "Infinity");
        assert_eq!(render(&Value::string("a\"b\\c"), Style::Compact), r#""a\"b\\c""#);
    }
}
