//! Canonical text encoder (spec.md §4.1 "Canonical encoding"), grounded in
//! `original_source/src/ace/ari_text/__init__.py`'s `Encoder`.

use std::fmt::Write as _;

use crate::ari::{Ac, Ari, Expr, Identity, LiteralAri, Name, Namespace, Param, ReferenceAri, Tnvc};

/// Render a full ARI to its canonical text form.
pub fn encode(ari: &Ari) -> String {
    let mut out = String::new();
    write_ari(&mut out, ari);
    out
}

fn write_ari(out: &mut String, ari: &Ari) {
    match ari {
        Ari::Literal(lit) => write_literal(out, lit),
        Ari::Reference(r) => {
            out.push_str("ari:");
            write_reference(out, r);
        }
    }
}

/// Write a reference without the leading `ari:`, for use inside parameter
/// positions where the grammar allows a bare `ssp`.
fn write_reference(out: &mut String, r: &ReferenceAri) {
    write_identity(out, &r.ident);
    if let Some(params) = &r.params {
        out.push('(');
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_param(out, p);
        }
        out.push(')');
    }
}

fn write_identity(out: &mut String, ident: &Identity) {
    out.push('/');
    match &ident.namespace {
        Some(Namespace::Text(s)) => out.push_str(s),
        Some(Namespace::Nickname(n)) => {
            let _ = write!(out, "{n}");
        }
        None => {}
    }
    out.push('/');
    out.push_str(ident.type_enum.name());
    out.push('.');
    write_name(out, &ident.name);
}

fn write_name(out: &mut String, name: &Name) {
    let _ = write!(out, "{name}");
}

fn write_param(out: &mut String, param: &Param) {
    match param {
        Param::Ari(a) => write_ari(out, a),
        Param::Ac(ac) => write_ac(out, ac),
        Param::Tnvc(tnvc) => write_tnvc(out, tnvc),
        Param::Expr(expr) => write_expr(out, expr),
    }
}

fn write_ac(out: &mut String, ac: &Ac) {
    out.push('[');
    for (i, item) in ac.items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_param(out, item);
    }
    out.push(']');
}

/// A TNVC is text-indistinguishable from an AC (spec.md §3); it is printed
/// with the same bracketed form.
fn write_tnvc(out: &mut String, tnvc: &Tnvc) {
    out.push('[');
    for (i, item) in tnvc.items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_param(out, item);
    }
    out.push(']');
}

fn write_expr(out: &mut String, expr: &Expr) {
    out.push('(');
    out.push_str(expr.type_enum.name());
    out.push(')');
    out.push('[');
    for (i, item) in expr.items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_param(out, item);
    }
    out.push(']');
}

fn write_literal(out: &mut String, lit: &LiteralAri) {
    if lit.type_enum.is_label_required() {
        out.push_str(lit.type_enum.name());
        out.push('.');
    }
    write_litvalue(out, lit);
}

fn write_litvalue(out: &mut String, lit: &LiteralAri) {
    use crate::ari::Literal::*;
    match &lit.value {
        Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Int(i) => {
            let _ = write!(out, "{i}");
        }
        Float(f) => out.push_str(&crate::diag::format_float(*f)),
        Text(s) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Bytes(b) => {
            out.push('h');
            out.push('\'');
            out.push_str(&crate::diag::to_hex_lower(b));
            out.push('\'');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ari::StructType;

    #[test]
    fn literal_round_trips_without_ari_prefix() {
        let text = "VAST.10";
        let ari = super::super::parser::parse(text).unwrap();
        assert_eq!(encode(&ari), text);
    }

    #[test]
    fn bare_bool_has_no_label() {
        let ari = Ari::literal(StructType::Bool, crate::ari::Literal::Bool(true));
        assert_eq!(encode(&ari), "true");
    }

    #[test]
    fn reference_preserves_empty_vs_absent_params() {
        let text = "ari:/namespace/VAR.hello()";
        let ari = super::super::parser::parse(text).unwrap();
        assert_eq!(encode(&ari), text);

        let text = "ari:/namespace/VAR.hello";
        let ari = super::super::parser::parse(text).unwrap();
        assert_eq!(encode(&ari), text);
    }

    #[test]
    fn float_uses_diagnostic_specials() {
        let ari = Ari::literal(StructType::Real64, crate::ari::Literal::Float(f64::NAN));
        assert_eq!(encode(&ari), "REAL64.NaN");
    }

    #[test]
    fn bstr_literal_is_prefixed_with_h_and_round_trips() {
        let ari = Ari::literal(
            StructType::Bstr,
            crate::ari::Literal::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        );
        let text = encode(&ari);
        assert_eq!(text, "h'deadbeef'");
        assert_eq!(super::super::parser::parse(&text).unwrap(), ari);
    }
}
