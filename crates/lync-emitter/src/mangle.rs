//! Mangled C function names (spec §4.8), grounded in
//! `original_source/codegen.c`'s `get_mangled_name`.

use lync_parser::FuncSign;

/// `<source-name>_<ret-tag>_<param-tag[own|ref]>...`; `main` is emitted
/// unmangled so the C entry point stays `main`.
#[must_use]
pub fn mangled_name(sign: &FuncSign) -> String {
    if sign.name == "main" {
        return "main".to_string();
    }
    let mut parts = vec![sign.name.clone(), sign.ret_type.to_string()];
    for p in &sign.params {
        parts.push(format!("{}{}", p.type_tag, p.ownership.mangle_suffix()));
    }
    parts.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lync_common::{Ownership, Span, TypeTag};
    use lync_parser::Param;

    fn param(type_tag: TypeTag, ownership: Ownership) -> Param {
        Param { name: "p".into(), type_tag, ownership, nullable: false, is_const: false, is_array: false, span: Span::dummy() }
    }

    fn sign(name: &str, params: Vec<Param>) -> FuncSign {
        FuncSign { name: name.into(), params, ret_type: TypeTag::Int, ret_ownership: Ownership::None, ret_nullable: false, span: Span::dummy() }
    }

    #[test]
    fn main_is_unmangled() {
        assert_eq!(mangled_name(&sign("main", vec![])), "main");
    }

    #[test]
    fn overloads_mangle_distinctly_by_ownership() {
        let a = mangled_name(&sign("add", vec![param(TypeTag::Int, Ownership::None)]));
        let b = mangled_name(&sign("add", vec![param(TypeTag::Int, Ownership::Own)]));
        assert_ne!(a, b);
    }
}
