use serde::{Deserialize, Serialize};

use crate::error::{ParamError, Result};
use crate::naming::cpp_string;
use crate::param::{Numeric, Param, ParamSet, ParamType, ParamValue, join_numbers};

const INDENT: &str = "    ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFlavor {
    /// Natively typed fields, accessed through a `Uniform` by code.
    #[default]
    Typed,
    /// Every field is itself a `Uniform`.
    Uniform,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderOptions {
    pub namespace: String,
    /// Falls back to `SimParams` / `UniformParams` depending on the flavor.
    pub struct_name: Option<String>,
    pub include: String,
    pub guard: String,
    pub flavor: HeaderFlavor,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            namespace: "sim_2d".into(),
            struct_name: None,
            include: "gl_wrappers.hpp".into(),
            guard: "_PARAMETERS_".into(),
            flavor: HeaderFlavor::Typed,
        }
    }
}

impl HeaderOptions {
    pub fn struct_name(&self) -> &str {
        match (&self.struct_name, self.flavor) {
            (Some(name), _) => name.as_str(),
            (None, HeaderFlavor::Typed) => "SimParams",
            (None, HeaderFlavor::Uniform) => "UniformParams",
        }
    }
}

/// Render the native parameter struct. Enum constants are assigned in
/// declaration order so they match the codes baked into the panel script.
pub fn render_header(params: &ParamSet, opts: &HeaderOptions) -> Result<String> {
    if opts.flavor == HeaderFlavor::Uniform {
        if let Some(p) = params.iter().find(|p| p.ty.uniform_member().is_none()) {
            return Err(ParamError::NotUniform {
                ident: p.ident.clone(),
                tag: p.ty.tag(),
            });
        }
    }

    let mut out = String::new();
    out.push_str(&format!("#include \"{}\"\n\n", opts.include));
    out.push_str(&format!("namespace {} {{\n\n", opts.namespace));
    out.push_str(&format!("#ifndef {0}\n#define {0}\n\n", opts.guard));
    out.push_str(&format!("struct {} {{\n", opts.struct_name()));

    for p in params.iter() {
        out.push_str(INDENT);
        out.push_str(&field_decl(p, opts.flavor));
        out.push('\n');
    }

    if !params.is_empty() {
        out.push_str(&format!("{INDENT}enum {{\n"));
        for p in params.iter() {
            out.push_str(&format!("{INDENT}{INDENT}{}={},\n", p.enum_constant(), p.code));
        }
        out.push_str(&format!("{INDENT}}};\n"));
    }

    match opts.flavor {
        HeaderFlavor::Typed => {
            let uniform: Vec<&Param> = params
                .iter()
                .filter(|p| p.ty.uniform_member().is_some())
                .collect();
            out.push_str(&uniform_setter(&uniform, |p| {
                format!("{} = val.{};", p.ident, p.ty.uniform_member().unwrap_or_default())
            }));
            out.push_str(&uniform_getter(&uniform, |p| {
                format!("return {{({}){}}};", p.ty.tag(), p.ident)
            }));
            let lists: Vec<&Param> = params
                .iter()
                .filter(|p| p.ty == ParamType::StringList)
                .collect();
            out.push_str(&string_setter(&lists));
        }
        HeaderFlavor::Uniform => {
            let all: Vec<&Param> = params.iter().collect();
            out.push_str(&uniform_setter(&all, |p| format!("{} = val;", p.ident)));
            out.push_str(&uniform_getter(&all, |p| format!("return {};", p.ident)));
        }
    }

    out.push_str("};\n");
    out.push_str("#endif\n");
    out.push_str("}\n");
    Ok(out)
}

fn field_decl(p: &Param, flavor: HeaderFlavor) -> String {
    let ty = p.ty.tag();
    let literal = cpp_literal(p);
    match (flavor, p.ty) {
        (HeaderFlavor::Uniform, _) => {
            format!("Uniform {} = Uniform(({ty})({literal}));", p.ident)
        }
        (HeaderFlavor::Typed, ParamType::StringList) => {
            format!("{ty} {} = {ty}{literal};", p.ident)
        }
        (HeaderFlavor::Typed, _) => format!("{ty} {} = ({ty})({literal});", p.ident),
    }
}

/// C++ literal for a parameter's default.
pub fn cpp_literal(p: &Param) -> String {
    match (&p.value, p.ty) {
        (ParamValue::Bool(b), _) => b.to_string(),
        (ParamValue::Strings(entries), _) => {
            let items = entries
                .iter()
                .map(|s| cpp_string(s))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{items}}}")
        }
        (ParamValue::Numeric(Numeric::Scalar(n)), ParamType::Float) => {
            format!("{}F", float_digits(&n.to_string()))
        }
        (ParamValue::Numeric(Numeric::Scalar(n)), _) => n.to_string(),
        (ParamValue::Numeric(Numeric::Vector(v)), ty) => {
            format!("{} {{.ind={{{}}}}}", ty.tag(), join_numbers(v))
        }
    }
}

/// `1` is not a valid base for an `F` suffix; make sure a float literal has a
/// fractional part or exponent.
fn float_digits(text: &str) -> String {
    if text.contains(['.', 'e', 'E']) {
        text.to_string()
    } else {
        format!("{text}.0")
    }
}

fn switch_block(
    signature: &str,
    cases: &[&Param],
    body: impl Fn(&Param) -> String,
    tail: Option<&str>,
) -> String {
    let i2 = INDENT.repeat(2);
    let i3 = INDENT.repeat(3);
    let i4 = INDENT.repeat(4);
    let mut out = format!("{INDENT}{signature} {{\n{i2}switch(enum_val) {{\n");
    for &p in cases {
        out.push_str(&format!("{i3}case {}:\n", p.enum_constant()));
        out.push_str(&format!("{i4}{}\n", body(p)));
    }
    out.push_str(&format!("{i2}}}\n"));
    if let Some(tail) = tail {
        out.push_str(&format!("{i2}{tail}\n"));
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

fn uniform_setter(cases: &[&Param], assign: impl Fn(&Param) -> String) -> String {
    switch_block(
        "void set(int enum_val, Uniform val)",
        cases,
        |p| format!("{}\n{}break;", assign(p), INDENT.repeat(4)),
        None,
    )
}

fn uniform_getter(cases: &[&Param], ret: impl Fn(&Param) -> String) -> String {
    switch_block(
        "Uniform get(int enum_val) const",
        cases,
        ret,
        Some("return Uniform(0);"),
    )
}

fn string_setter(cases: &[&Param]) -> String {
    switch_block(
        "void set(int enum_val, int index, std::string val)",
        cases,
        |p| format!("{}[index] = val;\n{}break;", p.ident, INDENT.repeat(4)),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param(entry: serde_json::Value) -> Param {
        ParamSet::from_value(json!({ "p": entry }))
            .unwrap()
            .by_code(0)
            .cloned()
            .unwrap()
    }

    #[test]
    fn literals_per_type() {
        assert_eq!(cpp_literal(&param(json!({"type": "float", "value": 0.001}))), "0.001F");
        assert_eq!(cpp_literal(&param(json!({"type": "float", "value": 1}))), "1.0F");
        assert_eq!(cpp_literal(&param(json!({"type": "int", "value": -3}))), "-3");
        assert_eq!(cpp_literal(&param(json!({"type": "bool", "value": true}))), "true");
        assert_eq!(
            cpp_literal(&param(json!({"type": "Vec2", "value": [0.5, 0.5]}))),
            "Vec2 {.ind={0.5, 0.5}}"
        );
        assert_eq!(
            cpp_literal(&param(json!({"type": "std::vector<std::string>", "value": ["a", "b"]}))),
            "{\"a\", \"b\"}"
        );
    }

    #[test]
    fn struct_name_follows_flavor() {
        let mut opts = HeaderOptions::default();
        assert_eq!(opts.struct_name(), "SimParams");
        opts.flavor = HeaderFlavor::Uniform;
        assert_eq!(opts.struct_name(), "UniformParams");
        opts.struct_name = Some("Knobs".into());
        assert_eq!(opts.struct_name(), "Knobs");
    }

    #[test]
    fn empty_set_has_no_enum() {
        let header = render_header(&ParamSet::default(), &HeaderOptions::default()).unwrap();
        assert!(!header.contains("enum {"));
        assert!(header.contains("return Uniform(0);"));
    }
}
