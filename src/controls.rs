use serde::{Deserialize, Serialize};

use crate::param::{Param, ParamSet, ParamType, ParamValue};

/// Native entry point a control calls when the user edits it. The names are
/// the functions the simulation module exports to the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Setter {
    #[serde(rename = "set_int_param")]
    Int,
    #[serde(rename = "set_float_param")]
    Float,
    #[serde(rename = "set_bool_param")]
    Bool,
    #[serde(rename = "set_vec_param")]
    Vec,
    #[serde(rename = "set_ivec_param")]
    IVec,
    #[serde(rename = "set_string_param")]
    String,
}

impl Setter {
    pub fn for_type(ty: ParamType) -> Self {
        match ty {
            ParamType::Int => Setter::Int,
            ParamType::Float => Setter::Float,
            ParamType::Bool => Setter::Bool,
            ParamType::Vec(_) => Setter::Vec,
            ParamType::IVec(_) => Setter::IVec,
            ParamType::StringList => Setter::String,
        }
    }

    pub fn js_name(self) -> &'static str {
        match self {
            Setter::Int => "set_int_param",
            Setter::Float => "set_float_param",
            Setter::Bool => "set_bool_param",
            Setter::Vec => "set_vec_param",
            Setter::IVec => "set_ivec_param",
            Setter::String => "set_string_param",
        }
    }

    pub const ALL: [Setter; 6] = [
        Setter::Int,
        Setter::Float,
        Setter::Bool,
        Setter::Vec,
        Setter::IVec,
        Setter::String,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    ScalarSlider,
    /// One slider per component.
    VectorSliders { components: usize },
    Checkbox { checked: bool },
    EntryBoxes { count: usize },
    /// Numeric parameter without both bounds: nothing on the panel, but the
    /// code is still reserved.
    Hidden,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlPlan {
    pub code: usize,
    pub control: Control,
    pub setter: Setter,
}

impl ControlPlan {
    pub fn is_visible(&self) -> bool {
        self.control != Control::Hidden
    }
}

/// Decide the control for every parameter, in declaration order.
pub fn plan(params: &ParamSet) -> Vec<ControlPlan> {
    params.iter().map(plan_param).collect()
}

pub fn plan_param(param: &Param) -> ControlPlan {
    let control = match (&param.value, param.ty) {
        (ParamValue::Strings(entries), _) => Control::EntryBoxes {
            count: entries.len(),
        },
        (ParamValue::Bool(checked), _) => Control::Checkbox { checked: *checked },
        (ParamValue::Numeric(_), _) if !param.range.is_bounded() => Control::Hidden,
        (ParamValue::Numeric(_), ty) => match ty.dimension() {
            Some(components) => Control::VectorSliders { components },
            None => Control::ScalarSlider,
        },
    };

    ControlPlan {
        code: param.code,
        control,
        setter: Setter::for_type(param.ty),
    }
}
