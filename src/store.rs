//! In-process mirror of the generated struct's accessor protocol. Values are
//! addressed by the same codes the panel sends, through the same setters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controls::Setter;
use crate::error::{ParamError, Result};
use crate::param::{Numeric, ParamSet, ParamType, ParamValue};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i32),
    Float(f64),
    Bool(bool),
    Vec(Vec<f64>),
    IVec(Vec<i32>),
    Strings(Vec<String>),
}

/// One setter invocation as the panel issues it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "setter")]
pub enum SetCall {
    #[serde(rename = "set_int_param")]
    Int { code: usize, value: i32 },
    #[serde(rename = "set_float_param")]
    Float { code: usize, value: f64 },
    #[serde(rename = "set_bool_param")]
    Bool { code: usize, value: bool },
    #[serde(rename = "set_vec_param")]
    Vec {
        code: usize,
        elem_count: usize,
        index: usize,
        value: f64,
    },
    #[serde(rename = "set_ivec_param")]
    IVec {
        code: usize,
        elem_count: usize,
        index: usize,
        value: i32,
    },
    #[serde(rename = "set_string_param")]
    String {
        code: usize,
        index: usize,
        value: String,
    },
}

impl SetCall {
    pub fn setter(&self) -> Setter {
        match self {
            SetCall::Int { .. } => Setter::Int,
            SetCall::Float { .. } => Setter::Float,
            SetCall::Bool { .. } => Setter::Bool,
            SetCall::Vec { .. } => Setter::Vec,
            SetCall::IVec { .. } => Setter::IVec,
            SetCall::String { .. } => Setter::String,
        }
    }

    pub fn code(&self) -> usize {
        match *self {
            SetCall::Int { code, .. }
            | SetCall::Float { code, .. }
            | SetCall::Bool { code, .. }
            | SetCall::Vec { code, .. }
            | SetCall::IVec { code, .. }
            | SetCall::String { code, .. } => code,
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    ident: String,
    ty: ParamType,
    value: StoredValue,
}

#[derive(Clone, Debug)]
pub struct ParamStore {
    slots: Vec<Slot>,
}

impl ParamStore {
    /// Every slot starts at its declared default.
    pub fn new(params: &ParamSet) -> Self {
        let slots = params
            .iter()
            .map(|p| Slot {
                ident: p.ident.clone(),
                ty: p.ty,
                value: initial_value(p.ty, &p.value),
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, code: usize) -> Result<&StoredValue> {
        self.slots
            .get(code)
            .map(|s| &s.value)
            .ok_or(ParamError::UnknownCode(code))
    }

    pub fn set_int(&mut self, code: usize, value: i32) -> Result<()> {
        self.apply(SetCall::Int { code, value })
    }

    pub fn set_float(&mut self, code: usize, value: f64) -> Result<()> {
        self.apply(SetCall::Float { code, value })
    }

    pub fn set_bool(&mut self, code: usize, value: bool) -> Result<()> {
        self.apply(SetCall::Bool { code, value })
    }

    pub fn set_vec(
        &mut self,
        code: usize,
        elem_count: usize,
        index: usize,
        value: f64,
    ) -> Result<()> {
        self.apply(SetCall::Vec {
            code,
            elem_count,
            index,
            value,
        })
    }

    pub fn set_ivec(
        &mut self,
        code: usize,
        elem_count: usize,
        index: usize,
        value: i32,
    ) -> Result<()> {
        self.apply(SetCall::IVec {
            code,
            elem_count,
            index,
            value,
        })
    }

    pub fn set_string(&mut self, code: usize, index: usize, value: impl Into<String>) -> Result<()> {
        self.apply(SetCall::String {
            code,
            index,
            value: value.into(),
        })
    }

    /// Route a setter call to its slot. Only the setter the panel would pick
    /// for the slot's type is accepted; nothing is coerced.
    pub fn apply(&mut self, call: SetCall) -> Result<()> {
        let code = call.code();
        let slot = self
            .slots
            .get_mut(code)
            .ok_or(ParamError::UnknownCode(code))?;

        let setter = call.setter();
        match (&mut slot.value, call) {
            (StoredValue::Int(v), SetCall::Int { value, .. }) => *v = value,
            (StoredValue::Float(v), SetCall::Float { value, .. }) => *v = value,
            (StoredValue::Bool(v), SetCall::Bool { value, .. }) => *v = value,
            (
                StoredValue::Vec(v),
                SetCall::Vec {
                    elem_count,
                    index,
                    value,
                    ..
                },
            ) => set_component(&slot.ident, v, elem_count, index, value)?,
            (
                StoredValue::IVec(v),
                SetCall::IVec {
                    elem_count,
                    index,
                    value,
                    ..
                },
            ) => set_component(&slot.ident, v, elem_count, index, value)?,
            (StoredValue::Strings(v), SetCall::String { index, value, .. }) => {
                let len = v.len();
                let entry = v.get_mut(index).ok_or_else(|| ParamError::IndexOutOfRange {
                    ident: slot.ident.clone(),
                    index,
                    len,
                })?;
                *entry = value;
            }
            _ => {
                return Err(ParamError::SetterMismatch {
                    ident: slot.ident.clone(),
                    code,
                    setter: setter.js_name(),
                    tag: slot.ty.tag(),
                });
            }
        }

        debug!(param = %slot.ident, code, setter = setter.js_name(), "parameter set");
        Ok(())
    }

    /// Current values keyed by identifier, in declaration order.
    pub fn snapshot(&self) -> IndexMap<String, StoredValue> {
        self.slots
            .iter()
            .map(|s| (s.ident.clone(), s.value.clone()))
            .collect()
    }
}

fn set_component<T>(
    ident: &str,
    v: &mut [T],
    elem_count: usize,
    index: usize,
    value: T,
) -> Result<()> {
    if elem_count != v.len() {
        return Err(ParamError::DimensionMismatch {
            ident: ident.to_string(),
            expected: v.len(),
            actual: elem_count,
        });
    }
    let len = v.len();
    let slot = v.get_mut(index).ok_or_else(|| ParamError::IndexOutOfRange {
        ident: ident.to_string(),
        index,
        len,
    })?;
    *slot = value;
    Ok(())
}

fn initial_value(ty: ParamType, value: &ParamValue) -> StoredValue {
    // Shapes were validated when the set was parsed.
    let as_i32 = |n: &serde_json::Number| {
        n.as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or_default()
    };
    let as_f64 = |n: &serde_json::Number| n.as_f64().unwrap_or_default();
    match (ty, value) {
        (_, ParamValue::Bool(b)) => StoredValue::Bool(*b),
        (_, ParamValue::Strings(s)) => StoredValue::Strings(s.clone()),
        (ParamType::Int, ParamValue::Numeric(Numeric::Scalar(n))) => StoredValue::Int(as_i32(n)),
        (_, ParamValue::Numeric(Numeric::Scalar(n))) => StoredValue::Float(as_f64(n)),
        (ParamType::IVec(_), ParamValue::Numeric(Numeric::Vector(v))) => {
            StoredValue::IVec(v.iter().map(as_i32).collect())
        }
        (_, ParamValue::Numeric(Numeric::Vector(v))) => {
            StoredValue::Vec(v.iter().map(as_f64).collect())
        }
    }
}
