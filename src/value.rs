use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};

/// A JSON number that keeps the integer/float distinction it was parsed with,
/// so untouched fields serialize back the way they were read.
#[derive(Debug, Clone, PartialEq)]
pub enum ResNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl ResNumber {
    fn write_json(&self, out: &mut String) {
        match self {
            ResNumber::I64(v) => out.push_str(&v.to_string()),
            ResNumber::U64(v) => out.push_str(&v.to_string()),
            ResNumber::F64(v) => {
                // JSON has no NaN/Infinity; browsers stringify them as null.
                if !v.is_finite() {
                    out.push_str("null");
                    return;
                }
                if *v == 0.0 {
                    out.push('0');
                    return;
                }
                // Below 2^53 every integral float prints exactly.
                if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 {
                    out.push_str(&format!("{v:.0}"));
                    return;
                }

                let mut buf = ryu::Buffer::new();
                let s = buf.format_finite(*v);
                match s.split_once('e') {
                    // Large integers are spelled out up to 1e21, like JS does.
                    Some((mantissa, exp)) if v.abs() < 1e21 && !exp.starts_with('-') => {
                        let (int_part, frac_part) =
                            mantissa.split_once('.').unwrap_or((mantissa, ""));
                        let zeros = exp
                            .parse::<usize>()
                            .unwrap_or(0)
                            .saturating_sub(frac_part.len());
                        out.push_str(int_part);
                        out.push_str(frac_part);
                        out.push_str(&"0".repeat(zeros));
                    }
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        out.push_str(mantissa);
                        out.push_str("e+");
                        out.push_str(exp);
                    }
                    _ => out.push_str(s.strip_suffix(".0").unwrap_or(s)),
                }
            }
        }
    }
}

/// A JSON value from a `.gbsres` resource.
/// Objects keep their key order so re-serialized documents diff cleanly.
#[derive(Debug, Clone, PartialEq)]
pub enum ResValue {
    Null,
    Bool(bool),
    Number(ResNumber),
    String(String),
    Array(Vec<ResValue>),
    Object(IndexMap<String, ResValue>),
}

impl ResValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, ResValue>> {
        match self {
            ResValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, ResValue>> {
        match self {
            ResValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ResValue]> {
        match self {
            ResValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<ResValue>> {
        match self {
            ResValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ResValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ResValue> {
        self.as_object_mut().and_then(|m| m.get_mut(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ResValue::Null => "null",
            ResValue::Bool(_) => "bool",
            ResValue::Number(_) => "number",
            ResValue::String(_) => "string",
            ResValue::Array(_) => "array",
            ResValue::Object(_) => "object",
        }
    }

    pub fn parse(text: &str) -> Result<ResValue, String> {
        json5::from_str::<ResValue>(text).map_err(|e| e.to_string())
    }

    /// Serialize the way `JSON.stringify(value, null, 2)` does:
    /// - 2-space indentation
    /// - `[]` / `{}` for empty containers
    /// - non-ASCII characters written verbatim
    /// - no trailing newline
    pub fn to_pretty_json(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        match self {
            ResValue::Null => out.push_str("null"),
            ResValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            ResValue::Number(n) => n.write_json(out),
            ResValue::String(s) => write_escaped_string(out, s),
            ResValue::Array(values) => {
                out.push('[');
                if values.is_empty() {
                    out.push(']');
                    return;
                }
                out.push('\n');
                for (i, v) in values.iter().enumerate() {
                    out.push_str(&" ".repeat(indent + 2));
                    v.write_pretty(out, indent + 2);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&" ".repeat(indent));
                out.push(']');
            }
            ResValue::Object(map) => {
                out.push('{');
                if map.is_empty() {
                    out.push('}');
                    return;
                }
                out.push('\n');
                for (i, (k, v)) in map.iter().enumerate() {
                    out.push_str(&" ".repeat(indent + 2));
                    write_escaped_string(out, k);
                    out.push_str(": ");
                    v.write_pretty(out, indent + 2);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&" ".repeat(indent));
                out.push('}');
            }
        }
    }

    /// Visit every string stored under an `"id"` key, at any depth.
    pub fn for_each_id(&self, f: &mut impl FnMut(&str)) {
        match self {
            ResValue::Array(values) => {
                for v in values {
                    v.for_each_id(f);
                }
            }
            ResValue::Object(map) => {
                for (k, v) in map {
                    if k == crate::statics::DOC_ID
                        && let Some(id) = v.as_str()
                    {
                        f(id);
                    }
                    v.for_each_id(f);
                }
            }
            _ => {}
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl<'de> Deserialize<'de> for ResNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = ResNumber;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ResNumber::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ResNumber::U64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ResNumber::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

impl<'de> Deserialize<'de> for ResValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = ResValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ResValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ResValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ResValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ResValue::Number(ResNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ResValue::Number(ResNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ResValue::Number(ResNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ResValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ResValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<ResValue>()? {
                    values.push(value);
                }
                Ok(ResValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, ResValue>()? {
                    values.insert(key, value);
                }
                Ok(ResValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
