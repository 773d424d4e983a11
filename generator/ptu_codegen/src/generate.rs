//! The three per-base-type artifacts.

use ptu_registry::{BaseEntry, MethodSig};

use crate::emitter::StringEmitter;

/// Finished artifact text for one base type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    /// Tag enumeration plus variant composite, for inclusion inside the
    /// base type's declaration.
    pub union_decl: String,
    /// One include line per extending variant.
    pub includes: String,
    /// Dispatch function definitions, one per declared method.
    pub dispatch: String,
}

/// Output file name for the tagged-union declaration.
pub fn union_file_name(base: &str) -> String {
    format!("gen_{base}.h")
}

/// Output file name for the include aggregator.
pub fn includes_file_name(base: &str) -> String {
    format!("gen_{base}_includes.h")
}

/// Output file name for the dispatch definitions.
pub fn dispatch_file_name(base: &str) -> String {
    format!("gen_{base}_dispatch.cpp")
}

/// Generate all three artifacts for one base type.
pub fn generate(base: &str, entry: &BaseEntry) -> Artifacts {
    Artifacts {
        union_decl: generate_union(entry),
        includes: generate_includes(entry),
        dispatch: generate_dispatch(base, entry),
    }
}

/// Tag enum and variant composite.
///
/// Tags are whole variant identifiers upper-cased, closed by the
/// `ENUM_COUNT` sentinel. Composite members use the variant identifier
/// verbatim for both the member type and the member name; with no
/// variants a single `void*` placeholder keeps the block well-formed.
fn generate_union(entry: &BaseEntry) -> String {
    let mut out = StringEmitter::new();
    out.emit("enum class Type : u16");
    out.emit_newline();
    out.emit_indent(1);
    out.emit("{ ");
    for (i, variant) in entry.variants.keys().enumerate() {
        if i > 0 {
            out.emit_newline();
            out.emit_indent(1);
            out.emit(", ");
        }
        out.emit(&variant.to_uppercase());
    }
    if !entry.variants.is_empty() {
        out.emit_newline();
        out.emit_indent(1);
        out.emit(", ");
    }
    out.emit("ENUM_COUNT } type;");
    out.emit_newline();
    out.emit("union");
    out.emit_newline();
    out.emit("{");
    out.emit_newline();
    if entry.variants.is_empty() {
        out.emit_indent(1);
        out.emit("void* no_variants;");
        out.emit_newline();
    } else {
        for variant in entry.variants.keys() {
            out.emit_indent(1);
            out.emit(variant);
            out.emit(" ");
            out.emit(variant);
            out.emit(";");
            out.emit_newline();
        }
    }
    out.emit("};");
    out.emit_newline();
    out.output()
}

/// Include aggregator: `#pragma once` plus one include per variant,
/// naming a header derived from the variant identifier with its first
/// character lower-cased.
fn generate_includes(entry: &BaseEntry) -> String {
    let mut out = StringEmitter::new();
    out.emit("#pragma once");
    out.emit_newline();
    for variant in entry.variants.keys() {
        out.emit("#include \"");
        out.emit(&lower_first(variant));
        out.emit(".h\"");
        out.emit_newline();
    }
    out.output()
}

/// One dispatch function per declared method: the stored qualifier run
/// and parameter runs reproduced verbatim, a switch on the self
/// parameter's runtime tag, one case per variant in registry order.
///
/// A case body holds one forwarding call per override of that variant
/// whose target names this method; variants without a matching override
/// get an empty case. Overrides whose target matches no declared method
/// produce nothing.
fn generate_dispatch(base: &str, entry: &BaseEntry) -> String {
    let mut out = StringEmitter::new();
    for (method, sig) in &entry.methods {
        // The parser guarantees a self parameter; a signature without
        // one has nothing to switch on.
        let Some(self_ident) = sig.self_param_ident() else {
            continue;
        };
        for qualifier in &sig.qualifiers {
            out.emit(&qualifier.text);
        }
        out.emit(method);
        out.emit("(");
        out.emit_newline();
        out.emit_indent(2);
        emit_param_runs(&mut out, sig);
        out.emit(")");
        out.emit_newline();
        out.emit("{");
        out.emit_newline();
        out.emit_indent(1);
        out.emit("switch(");
        out.emit(self_ident);
        out.emit("->type)");
        out.emit_newline();
        out.emit_indent(1);
        out.emit("{");
        out.emit_newline();
        for (variant, overrides) in &entry.variants {
            out.emit_indent(1);
            out.emit("case ");
            out.emit(base);
            out.emit("::Type::");
            out.emit(&variant.to_uppercase());
            out.emit(":");
            out.emit_newline();
            for (override_ident, record) in overrides {
                if record.target != *method {
                    continue;
                }
                out.emit_indent(2);
                out.emit(override_ident);
                out.emit("(");
                for (i, param) in sig.params.iter().enumerate() {
                    if i > 0 {
                        out.emit(", ");
                    }
                    out.emit(&param.ident);
                }
                out.emit(");");
                out.emit_newline();
            }
            out.emit_indent(1);
            out.emit("break;");
            out.emit_newline();
        }
        out.emit_indent(1);
        out.emit("}");
        out.emit_newline();
        out.emit("}");
        out.emit_newline();
    }
    out.output()
}

fn emit_param_runs(out: &mut StringEmitter, sig: &MethodSig) {
    for (i, param) in sig.params.iter().enumerate() {
        if i > 0 {
            out.emit(", ");
        }
        for token in &param.tokens {
            out.emit(&token.text);
        }
    }
}

fn lower_first(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use ptu_registry::Registry;
    use pretty_assertions::assert_eq;

    use ptu_lexer::TokenKind;
    use ptu_registry::{OverrideRecord, Param, RunToken};

    /// The stored form of ` void draw(Shape* shape, float scale)` as the
    /// directive parser produces it.
    fn draw_sig() -> MethodSig {
        MethodSig {
            qualifiers: vec![
                RunToken::new(TokenKind::Whitespace, " "),
                RunToken::new(TokenKind::Ident, "void"),
                RunToken::new(TokenKind::Whitespace, " "),
            ],
            params: vec![
                Param {
                    ident: "shape".into(),
                    tokens: vec![
                        RunToken::new(TokenKind::Ident, "Shape"),
                        RunToken::new(TokenKind::Asterisk, "*"),
                        RunToken::new(TokenKind::Whitespace, " "),
                        RunToken::new(TokenKind::Ident, "shape"),
                    ],
                },
                Param {
                    ident: "scale".into(),
                    tokens: vec![
                        RunToken::new(TokenKind::Ident, "float"),
                        RunToken::new(TokenKind::Whitespace, " "),
                        RunToken::new(TokenKind::Ident, "scale"),
                    ],
                },
            ],
        }
    }

    /// A `Shape` registry with `draw` declared, the given variants
    /// extending it, and `(variant, override ident, target)` overrides.
    fn scan(overrides: &[(&str, &str, &str)], variants: &[&str]) -> Registry {
        let mut reg = Registry::new();
        reg.declare("Shape");
        for variant in variants {
            reg.register_extension("Shape", variant).unwrap();
        }
        reg.declare_method("Shape", "draw", draw_sig()).unwrap();
        for (variant, ident, target) in overrides {
            reg.record_override(
                "Shape",
                variant,
                ident,
                OverrideRecord {
                    target: (*target).to_owned(),
                    sig: draw_sig(),
                },
            )
            .unwrap();
        }
        reg
    }

    #[test]
    fn file_names_follow_base_identifier() {
        assert_eq!(union_file_name("Shape"), "gen_Shape.h");
        assert_eq!(includes_file_name("Shape"), "gen_Shape_includes.h");
        assert_eq!(dispatch_file_name("Shape"), "gen_Shape_dispatch.cpp");
    }

    #[test]
    fn dispatch_matched_and_unmatched_cases() {
        let reg = scan(&[("circle", "circleDraw", "draw")], &["circle", "square"]);
        let entry = reg.get("Shape").unwrap();
        let artifacts = generate("Shape", entry);
        assert_eq!(
            artifacts.dispatch,
            concat!(
                " void draw(\n",
                "\t\tShape* shape, float scale)\n",
                "{\n",
                "\tswitch(shape->type)\n",
                "\t{\n",
                "\tcase Shape::Type::CIRCLE:\n",
                "\t\tcircleDraw(shape, scale);\n",
                "\tbreak;\n",
                "\tcase Shape::Type::SQUARE:\n",
                "\tbreak;\n",
                "\t}\n",
                "}\n",
            )
        );
    }

    #[test]
    fn dispatch_ignores_override_of_other_variant() {
        // The circle override must not bleed into the square case.
        let reg = scan(
            &[("circle", "circleDraw", "draw"), ("square", "squareDraw", "draw")],
            &["circle", "square"],
        );
        let entry = reg.get("Shape").unwrap();
        let dispatch = generate("Shape", entry).dispatch;
        let circle_case = dispatch
            .split("\tcase Shape::Type::CIRCLE:\n")
            .nth(1)
            .and_then(|rest| rest.split("\tbreak;\n").next())
            .unwrap();
        assert_eq!(circle_case, "\t\tcircleDraw(shape, scale);\n");
        let square_case = dispatch
            .split("\tcase Shape::Type::SQUARE:\n")
            .nth(1)
            .and_then(|rest| rest.split("\tbreak;\n").next())
            .unwrap();
        assert_eq!(square_case, "\t\tsquareDraw(shape, scale);\n");
    }

    #[test]
    fn override_with_unknown_target_is_silent() {
        let reg = scan(&[("circle", "circleTeleport", "teleport")], &["circle"]);
        let entry = reg.get("Shape").unwrap();
        let dispatch = generate("Shape", entry).dispatch;
        assert!(!dispatch.contains("circleTeleport"));
        assert!(dispatch.contains("\tcase Shape::Type::CIRCLE:\n\tbreak;\n"));
    }

    #[test]
    fn union_decl_lists_variants_and_sentinel() {
        let reg = scan(&[], &["circle", "square"]);
        let entry = reg.get("Shape").unwrap();
        let artifacts = generate("Shape", entry);
        assert_eq!(
            artifacts.union_decl,
            concat!(
                "enum class Type : u16\n",
                "\t{ CIRCLE\n",
                "\t, SQUARE\n",
                "\t, ENUM_COUNT } type;\n",
                "union\n",
                "{\n",
                "\tcircle circle;\n",
                "\tsquare square;\n",
                "};\n",
            )
        );
    }

    #[test]
    fn union_member_names_are_verbatim() {
        // No first-character casing inference on member type or name.
        let reg = scan(&[], &["Circle"]);
        let entry = reg.get("Shape").unwrap();
        let union_decl = generate("Shape", entry).union_decl;
        assert!(union_decl.contains("\tCircle Circle;\n"));
    }

    #[test]
    fn empty_base_still_produces_all_artifacts() {
        let mut reg = Registry::new();
        reg.declare("Shape");
        let entry = reg.get("Shape").unwrap();
        let artifacts = generate("Shape", entry);
        assert_eq!(
            artifacts.union_decl,
            concat!(
                "enum class Type : u16\n",
                "\t{ ENUM_COUNT } type;\n",
                "union\n",
                "{\n",
                "\tvoid* no_variants;\n",
                "};\n",
            )
        );
        assert_eq!(artifacts.includes, "#pragma once\n");
        assert_eq!(artifacts.dispatch, "");
    }

    #[test]
    fn includes_lower_first_character() {
        let reg = scan(&[], &["Circle", "square"]);
        let entry = reg.get("Shape").unwrap();
        let includes = generate("Shape", entry).includes;
        assert_eq!(
            includes,
            "#pragma once\n#include \"circle.h\"\n#include \"square.h\"\n"
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let reg = scan(&[("circle", "circleDraw", "draw")], &["circle", "square"]);
        let entry = reg.get("Shape").unwrap();
        assert_eq!(generate("Shape", entry), generate("Shape", entry));
    }
}
