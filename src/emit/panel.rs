use crate::controls::{Control, ControlPlan};
use crate::naming::js_string;
use crate::param::{Param, ParamSet, ParamValue};

/// DOM helpers every generated panel starts with.
pub const PANEL_PRELUDE: &str = include_str!("panel_prelude.js");

/// Render the browser control panel. Each visible control is wired to the
/// numeric setter for its parameter's code.
pub fn render_panel(params: &ParamSet, plans: &[ControlPlan]) -> String {
    let mut out = String::with_capacity(PANEL_PRELUDE.len() + plans.len() * 128);
    out.push_str(PANEL_PRELUDE);
    out.push_str("let controls = document.getElementById('controls');\n");

    for plan in plans.iter().filter(|p| p.is_visible()) {
        let Some(param) = params.by_code(plan.code) else {
            continue;
        };
        out.push_str(&control_call(param, &plan.control));
        out.push('\n');
    }

    out.push('\n');
    out
}

fn control_call(param: &Param, control: &Control) -> String {
    let code = param.code;
    let label = js_string(&param.label);
    match (control, &param.value) {
        (Control::ScalarSlider, _) => format!(
            "createScalarParameterSlider(controls, {code}, {label}, \"{}\", {});",
            param.ty.tag(),
            spec_literal(param)
        ),
        (Control::VectorSliders { .. }, _) => format!(
            "createVectorParameterSliders(controls, {code}, {label}, \"{}\", {});",
            param.ty.tag(),
            spec_literal(param)
        ),
        (Control::Checkbox { checked }, _) => {
            format!("createCheckbox(controls, {code}, {label}, {checked});")
        }
        (Control::EntryBoxes { .. }, ParamValue::Strings(entries)) => {
            let values = entries
                .iter()
                .map(|s| js_string(s))
                .collect::<Vec<_>>()
                .join(", ");
            format!("createEntryBoxes(controls, {code}, {label}, [{values}]);")
        }
        _ => String::new(),
    }
}

/// Slider attributes: `{value: .., min: .., max: .., step: ..}`, keys that are
/// absent are left out.
fn spec_literal(param: &Param) -> String {
    let mut fields = Vec::with_capacity(4);
    if let ParamValue::Numeric(value) = &param.value {
        fields.push(format!("value: {}", value.js_literal()));
    }
    let range = &param.range;
    for (key, bound) in [("min", &range.min), ("max", &range.max), ("step", &range.step)] {
        if let Some(bound) = bound {
            fields.push(format!("{key}: {}", bound.js_literal()));
        }
    }
    format!("{{{}}}", fields.join(", "))
}
