use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::error::{ParamError, Result};
use crate::naming::{enum_constant, is_field_identifier};

/// Declared type of a parameter. Closed set: anything else aborts generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    Int,
    Float,
    Bool,
    /// Float vector with 2..=4 components.
    Vec(u8),
    /// Integer vector with 2..=4 components.
    IVec(u8),
    StringList,
}

impl ParamType {
    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "int" => ParamType::Int,
            "float" => ParamType::Float,
            "bool" => ParamType::Bool,
            "Vec2" => ParamType::Vec(2),
            "Vec3" => ParamType::Vec(3),
            "Vec4" => ParamType::Vec(4),
            "IVec2" => ParamType::IVec(2),
            "IVec3" => ParamType::IVec(3),
            "IVec4" => ParamType::IVec(4),
            "std::vector<std::string>" => ParamType::StringList,
            _ => return None,
        })
    }

    /// The type tag as written in the description, which is also the native
    /// type name in the header.
    pub fn tag(self) -> &'static str {
        match self {
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Bool => "bool",
            ParamType::Vec(2) => "Vec2",
            ParamType::Vec(3) => "Vec3",
            ParamType::Vec(_) => "Vec4",
            ParamType::IVec(2) => "IVec2",
            ParamType::IVec(3) => "IVec3",
            ParamType::IVec(_) => "IVec4",
            ParamType::StringList => "std::vector<std::string>",
        }
    }

    /// Component count for vectors.
    pub fn dimension(self) -> Option<usize> {
        match self {
            ParamType::Vec(n) | ParamType::IVec(n) => Some(n as usize),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ParamType::Bool | ParamType::StringList)
    }

    pub fn is_integral(self) -> bool {
        matches!(self, ParamType::Int | ParamType::IVec(_))
    }

    /// Member of the native `Uniform` union that carries this type.
    pub fn uniform_member(self) -> Option<&'static str> {
        Some(match self {
            ParamType::Int => "i32",
            ParamType::Float => "f32",
            ParamType::Bool => "b32",
            ParamType::Vec(2) => "vec2",
            ParamType::Vec(3) => "vec3",
            ParamType::Vec(_) => "vec4",
            ParamType::IVec(2) => "ivec2",
            ParamType::IVec(3) => "ivec3",
            ParamType::IVec(_) => "ivec4",
            ParamType::StringList => return None,
        })
    }
}

/// A number or a fixed-size list of numbers, kept as written so literals
/// round-trip into the generated sources unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum Numeric {
    Scalar(Number),
    Vector(Vec<Number>),
}

impl Numeric {
    /// JS literal: `0.5` or `[0.5, 0.5]`.
    pub fn js_literal(&self) -> String {
        match self {
            Numeric::Scalar(n) => n.to_string(),
            Numeric::Vector(v) => format!("[{}]", join_numbers(v)),
        }
    }
}

pub(crate) fn join_numbers(v: &[Number]) -> String {
    v.iter().map(Number::to_string).collect::<Vec<_>>().join(", ")
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Numeric(Numeric),
    Bool(bool),
    Strings(Vec<String>),
}

/// Optional slider metadata. Shapes match the parameter type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Range {
    pub min: Option<Numeric>,
    pub max: Option<Numeric>,
    pub step: Option<Numeric>,
}

impl Range {
    /// Sliders are only synthesized when both bounds are known.
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Declaration index. Doubles as the enum code in both outputs.
    pub code: usize,
    pub ident: String,
    pub label: String,
    pub ty: ParamType,
    pub value: ParamValue,
    pub range: Range,
}

impl Param {
    pub fn enum_constant(&self) -> String {
        enum_constant(&self.ident)
    }
}

/// Parameters in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ParamSet {
    params: IndexMap<String, Param>,
}

impl ParamSet {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ParamError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(text)?;
        Self::from_value(doc)
    }

    pub fn from_value(doc: Value) -> Result<Self> {
        let Value::Object(entries) = doc else {
            return Err(ParamError::NotAnObject);
        };

        let mut params = IndexMap::with_capacity(entries.len());
        let mut constants: HashMap<String, String> = HashMap::new();

        for (code, (ident, entry)) in entries.into_iter().enumerate() {
            if !is_field_identifier(&ident) {
                return Err(ParamError::BadIdentifier { ident });
            }
            let constant = enum_constant(&ident);
            if let Some(first) = constants.get(&constant) {
                return Err(ParamError::DuplicateConstant {
                    first: first.clone(),
                    second: ident,
                    constant,
                });
            }
            constants.insert(constant, ident.clone());

            let Value::Object(entry) = entry else {
                return Err(ParamError::EntryNotAnObject { ident });
            };
            let param = parse_entry(code, ident, &entry)?;
            params.insert(param.ident.clone(), param);
        }

        // Fields and enum constants share the struct's scope.
        for (constant, ident) in &constants {
            if params.contains_key(constant) {
                return Err(ParamError::ConstantShadowsField {
                    ident: ident.clone(),
                    constant: constant.clone(),
                });
            }
        }

        Ok(Self { params })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn by_code(&self, code: usize) -> Option<&Param> {
        self.params.get_index(code).map(|(_, p)| p)
    }

    pub fn by_ident(&self, ident: &str) -> Option<&Param> {
        self.params.get(ident)
    }
}

fn parse_entry(code: usize, ident: String, entry: &Map<String, Value>) -> Result<Param> {
    let tag = match entry.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(_) => return Err(bad(&ident, "type", "must be a string")),
        None => return Err(ParamError::MissingKey { ident, key: "type" }),
    };
    let Some(ty) = ParamType::parse(tag) else {
        return Err(ParamError::UnknownType {
            tag: tag.to_string(),
            ident,
        });
    };

    let Some(raw_value) = entry.get("value") else {
        return Err(ParamError::MissingKey { ident, key: "value" });
    };
    let value = parse_value(&ident, ty, raw_value)?;

    let label = match entry.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(bad(&ident, "name", "must be a string")),
        None => ident.clone(),
    };

    let range = if ty.is_numeric() {
        Range {
            min: parse_bound(&ident, ty, "min", entry.get("min"))?,
            max: parse_bound(&ident, ty, "max", entry.get("max"))?,
            step: parse_bound(&ident, ty, "step", entry.get("step"))?,
        }
    } else {
        if ["min", "max", "step"].iter().any(|k| entry.contains_key(*k)) {
            warn!(param = %ident, ty = ty.tag(), "range metadata ignored");
        }
        Range::default()
    };

    Ok(Param {
        code,
        ident,
        label,
        ty,
        value,
        range,
    })
}

fn parse_value(ident: &str, ty: ParamType, raw: &Value) -> Result<ParamValue> {
    match ty {
        ParamType::Bool => match raw {
            Value::Bool(b) => Ok(ParamValue::Bool(*b)),
            _ => Err(bad(ident, "value", "must be true or false")),
        },
        ParamType::StringList => parse_string_list(ident, raw).map(ParamValue::Strings),
        _ => parse_numeric(ident, ty, "value", raw, ty.is_integral()).map(ParamValue::Numeric),
    }
}

fn parse_bound(
    ident: &str,
    ty: ParamType,
    key: &'static str,
    raw: Option<&Value>,
) -> Result<Option<Numeric>> {
    raw.map(|raw| parse_numeric(ident, ty, key, raw, false))
        .transpose()
}

fn parse_numeric(
    ident: &str,
    ty: ParamType,
    key: &'static str,
    raw: &Value,
    integral: bool,
) -> Result<Numeric> {
    let number = |v: &Value| -> Result<Number> {
        match v {
            Value::Number(n) if !integral => Ok(n.clone()),
            // Native `int` is 32 bits.
            Value::Number(n) => match n.as_i64() {
                Some(v) if i32::try_from(v).is_ok() => Ok(n.clone()),
                Some(_) => Err(bad(ident, key, "does not fit in a 32-bit int")),
                None if n.is_u64() => Err(bad(ident, key, "does not fit in a 32-bit int")),
                None => Err(bad(ident, key, "must be an integer")),
            },
            _ => Err(bad(ident, key, "must be a number")),
        }
    };

    match ty.dimension() {
        None => number(raw).map(Numeric::Scalar),
        Some(n) => {
            let Value::Array(items) = raw else {
                return Err(bad(ident, key, format!("must be an array of {n} numbers")));
            };
            if items.len() != n {
                return Err(bad(
                    ident,
                    key,
                    format!("has {} components, {} needs {n}", items.len(), ty.tag()),
                ));
            }
            items
                .iter()
                .map(number)
                .collect::<Result<Vec<_>>>()
                .map(Numeric::Vector)
        }
    }
}

/// Accepts a JSON array of strings, or a C++ brace list such as
/// `{"a", "b"}`. A brace list always yields at least one entry.
fn parse_string_list(ident: &str, raw: &Value) -> Result<Vec<String>> {
    match raw {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(bad(ident, "value", "entries must be strings")),
            })
            .collect(),
        Value::String(s) => {
            let inner = s
                .trim()
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .ok_or_else(|| bad(ident, "value", "must be an array or a {..} list"))?;
            Ok(inner
                .split(',')
                .map(|piece| {
                    let piece = piece.trim();
                    piece
                        .strip_prefix('"')
                        .and_then(|p| p.strip_suffix('"'))
                        .unwrap_or(piece)
                        .to_string()
                })
                .collect())
        }
        _ => Err(bad(ident, "value", "must be an array of strings")),
    }
}

fn bad(ident: &str, key: &'static str, reason: impl Into<String>) -> ParamError {
    ParamError::BadValue {
        ident: ident.to_string(),
        key,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one(entry: Value) -> Result<Param> {
        let set = ParamSet::from_value(json!({ "p": entry }))?;
        Ok(set.by_code(0).cloned().expect("one parameter"))
    }

    #[test]
    fn codes_follow_declaration_order() {
        let set = ParamSet::from_value(json!({
            "zeta": {"type": "int", "value": 1},
            "alpha": {"type": "float", "value": 2.0},
            "mid": {"type": "bool", "value": true},
        }))
        .unwrap();
        let idents: Vec<_> = set.iter().map(|p| (p.code, p.ident.as_str())).collect();
        assert_eq!(idents, vec![(0, "zeta"), (1, "alpha"), (2, "mid")]);
        assert_eq!(set.by_ident("mid").unwrap().code, 2);
    }

    #[test]
    fn label_defaults_to_identifier() {
        let p = one(json!({"type": "int", "value": 3})).unwrap();
        assert_eq!(p.label, "p");
        let p = one(json!({"type": "int", "value": 3, "name": "Steps"})).unwrap();
        assert_eq!(p.label, "Steps");
    }

    #[test]
    fn int_rejects_fractional_default() {
        let err = one(json!({"type": "int", "value": 1.5})).unwrap_err();
        assert!(matches!(err, ParamError::BadValue { key: "value", .. }));
    }

    #[test]
    fn vector_length_must_match_type() {
        let err = one(json!({"type": "Vec3", "value": [0.5, 0.5]})).unwrap_err();
        assert!(err.to_string().contains("Vec3 needs 3"));

        let err = one(json!({
            "type": "Vec2", "value": [0.5, 0.5], "min": [0.0], "max": [1.0, 1.0]
        }))
        .unwrap_err();
        assert!(matches!(err, ParamError::BadValue { key: "min", .. }));
    }

    #[test]
    fn brace_list_strings_are_unquoted() {
        let p = one(json!({"type": "std::vector<std::string>", "value": "{\"a\", \"b\",c}"}))
            .unwrap();
        assert_eq!(
            p.value,
            ParamValue::Strings(vec!["a".into(), "b".into(), "c".into()])
        );

        let p = one(json!({"type": "std::vector<std::string>", "value": "{}"})).unwrap();
        assert_eq!(p.value, ParamValue::Strings(vec![String::new()]));
    }

    #[test]
    fn unknown_type_aborts() {
        let err = one(json!({"type": "double", "value": 1.0})).unwrap_err();
        assert!(matches!(err, ParamError::UnknownType { .. }));
    }

    #[test]
    fn missing_value_aborts() {
        let err = one(json!({"type": "float"})).unwrap_err();
        assert!(matches!(err, ParamError::MissingKey { key: "value", .. }));
    }

    #[test]
    fn colliding_constants_abort() {
        let err = ParamSet::from_value(json!({
            "gridW": {"type": "int", "value": 1},
            "grid_w": {"type": "int", "value": 1},
        }))
        .unwrap_err();
        assert!(matches!(err, ParamError::DuplicateConstant { .. }));
    }

    #[test]
    fn constant_may_not_equal_a_field() {
        let err = ParamSet::from_value(json!({"N": {"type": "int", "value": 1}})).unwrap_err();
        assert!(matches!(err, ParamError::ConstantShadowsField { .. }));
    }

    fn keyed(ident: &str, entry: Value) -> Value {
        let mut doc = Map::new();
        doc.insert(ident.to_string(), entry);
        Value::Object(doc)
    }

    #[test]
    fn keywords_are_rejected() {
        for ident in ["default", "int", "class"] {
            let err = ParamSet::from_value(keyed(ident, json!({"type": "int", "value": 1})))
                .unwrap_err();
            assert!(matches!(err, ParamError::BadIdentifier { .. }), "{ident}");
        }
    }

    #[test]
    fn accessor_names_are_rejected() {
        for ident in ["val", "enum_val", "index", "set", "get", "Uniform"] {
            let entry = json!({"type": "std::vector<std::string>", "value": ["a"]});
            let err = ParamSet::from_value(keyed(ident, entry)).unwrap_err();
            assert!(matches!(err, ParamError::BadIdentifier { .. }), "{ident}");
        }
    }

    #[test]
    fn malformed_identifier_is_rejected() {
        let err = ParamSet::from_value(json!({"2fast": {"type": "int", "value": 1}})).unwrap_err();
        match err {
            ParamError::BadIdentifier { ident } => assert_eq!(ident, "2fast"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ints_must_fit_32_bits() {
        let err = one(json!({"type": "int", "value": 3000000000u64})).unwrap_err();
        assert_eq!(err.to_string(), "parameter 'p': value does not fit in a 32-bit int");

        let err = one(json!({"type": "IVec2", "value": [3000000000u64, 1]})).unwrap_err();
        assert!(matches!(err, ParamError::BadValue { key: "value", .. }));

        let err = one(json!({"type": "int", "value": -2147483649i64})).unwrap_err();
        assert!(matches!(err, ParamError::BadValue { key: "value", .. }));

        let p = one(json!({"type": "int", "value": -2147483648i64})).unwrap();
        assert_eq!(p.value, ParamValue::Numeric(Numeric::Scalar((-2147483648i64).into())));
    }

    #[test]
    fn entry_must_be_an_object() {
        let err = ParamSet::from_value(json!({"dt": 0.1})).unwrap_err();
        assert!(matches!(err, ParamError::EntryNotAnObject { .. }));
    }

    #[test]
    fn missing_type_aborts() {
        let err = one(json!({"value": 1})).unwrap_err();
        assert!(matches!(err, ParamError::MissingKey { key: "type", .. }));
    }

    #[test]
    fn type_must_be_a_string() {
        let err = one(json!({"type": 3, "value": 1})).unwrap_err();
        assert!(matches!(err, ParamError::BadValue { key: "type", .. }));
    }

    #[test]
    fn name_must_be_a_string() {
        let err = one(json!({"type": "int", "value": 1, "name": ["Steps"]})).unwrap_err();
        assert!(matches!(err, ParamError::BadValue { key: "name", .. }));
    }

    #[test]
    fn ivec_rejects_fractional_components() {
        let err = one(json!({"type": "IVec2", "value": [1, 2.5]})).unwrap_err();
        assert_eq!(err.to_string(), "parameter 'p': value must be an integer");
    }

    #[test]
    fn scalar_range_must_not_be_an_array() {
        let err = one(json!({"type": "float", "value": 1.0, "min": [0.0], "max": 2.0}))
            .unwrap_err();
        assert_eq!(err.to_string(), "parameter 'p': min must be a number");
    }

    #[test]
    fn string_list_needs_braces() {
        let err = one(json!({"type": "std::vector<std::string>", "value": "a,b"})).unwrap_err();
        assert!(matches!(err, ParamError::BadValue { key: "value", .. }));
    }

    #[test]
    fn bool_range_is_dropped() {
        let p = one(json!({"type": "bool", "value": false, "min": 0, "max": 1})).unwrap();
        assert!(!p.range.is_bounded());
    }
}
