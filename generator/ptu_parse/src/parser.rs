//! The directive parser proper.

use ptu_lexer::{Scanner, SourceBuffer, TokenKind};
use ptu_registry::{MethodSig, OverrideRecord, Param, Registry, RunToken};

use crate::context::ScanContext;
use crate::error::{Directive, ParseError};

/// Scan one source file's text and feed every recognized directive into
/// `registry`.
///
/// Each call owns a fresh [`ScanContext`], so the "most recent Extend"
/// state never crosses file boundaries. Non-directive text is skipped
/// token by token.
pub fn scan_source(source: &str, registry: &mut Registry) -> Result<(), ParseError> {
    let buffer = SourceBuffer::new(source);
    let mut parser = DirectiveParser {
        scanner: Scanner::new(buffer.cursor()),
        registry,
        ctx: ScanContext::new(),
    };
    parser.run()
}

struct DirectiveParser<'src, 'reg> {
    scanner: Scanner<'src>,
    registry: &'reg mut Registry,
    ctx: ScanContext,
}

/// A parsed function signature plus the two identifiers extracted from it.
struct ScannedFn {
    /// The function's own identifier (last token before the open paren).
    ident: String,
    /// The owning base type (first token of the self parameter's run).
    base: String,
    sig: MethodSig,
}

impl<'src> DirectiveParser<'src, '_> {
    fn run(&mut self) -> Result<(), ParseError> {
        loop {
            let token = self.scanner.next_token();
            match token.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Hash => {
                    let next = self.scanner.next_token();
                    match next.kind {
                        TokenKind::Eof => return Ok(()),
                        TokenKind::Ident if next.text == "define" => {
                            self.scanner.skip_logical_line();
                        }
                        TokenKind::Ident => self.dispatch(next.text)?,
                        _ => {}
                    }
                }
                TokenKind::Ident => self.dispatch(token.text)?,
                _ => {}
            }
        }
    }

    fn dispatch(&mut self, ident: &str) -> Result<(), ParseError> {
        // Exact matches; the scanner always yields maximal identifiers,
        // so the shared prefix between these spellings is harmless.
        if ident == Directive::Declare.keyword() {
            self.parse_declare()
        } else if ident == Directive::Extend.keyword() {
            self.parse_extend()
        } else if ident == Directive::DeclareMethod.keyword() {
            self.parse_method()
        } else if ident == Directive::DeclareOverride.keyword() {
            self.parse_override()
        } else {
            Ok(())
        }
    }

    /// `DIRECTIVE(struct BaseId)` — upsert an entry for the base type.
    fn parse_declare(&mut self) -> Result<(), ParseError> {
        self.require_struct_keyword(Directive::Declare)?;
        let base = self.require_ident(Directive::Declare)?;
        self.registry.declare(base);
        Ok(())
    }

    /// `DIRECTIVE(ParentId) struct ChildId` — register the extension and
    /// make it the active context for subsequent overrides in this pass.
    fn parse_extend(&mut self) -> Result<(), ParseError> {
        let parent = self.require_ident(Directive::Extend)?;
        self.require_struct_keyword(Directive::Extend)?;
        let child = self.require_ident(Directive::Extend)?;
        self.registry.register_extension(parent, child)?;
        self.ctx.set_extension(child);
        Ok(())
    }

    /// `DIRECTIVE qualifiers ident(params)` — declare an abstract method
    /// on the base type named by the self parameter.
    fn parse_method(&mut self) -> Result<(), ParseError> {
        let f = self.scan_signature(Directive::DeclareMethod)?;
        self.registry.declare_method(&f.base, &f.ident, f.sig)?;
        Ok(())
    }

    /// `DIRECTIVE(targetMethodId) qualifiers ident(params)` — record an
    /// override under the active extension context.
    fn parse_override(&mut self) -> Result<(), ParseError> {
        let target = self.require_ident(Directive::DeclareOverride)?;
        if self.scanner.require_next(TokenKind::ParenClose).kind == TokenKind::Eof {
            return Err(ParseError::UnexpectedEof {
                directive: Directive::DeclareOverride,
            });
        }
        let record_target = target.to_owned();
        let f = self.scan_signature(Directive::DeclareOverride)?;
        let variant = self.ctx.active_variant().to_owned();
        self.registry.record_override(
            &f.base,
            &variant,
            &f.ident,
            OverrideRecord {
                target: record_target,
                sig: f.sig,
            },
        )?;
        Ok(())
    }

    /// Skip to the next identifier token; end of input is an error here,
    /// unlike at the top-level scan loop.
    fn require_ident(&mut self, directive: Directive) -> Result<&'src str, ParseError> {
        let token = self.scanner.require_next(TokenKind::Ident);
        if token.kind == TokenKind::Eof {
            return Err(ParseError::UnexpectedEof { directive });
        }
        Ok(token.text)
    }

    fn require_struct_keyword(&mut self, directive: Directive) -> Result<(), ParseError> {
        let keyword = self.require_ident(directive)?;
        if keyword != "struct" {
            return Err(ParseError::ExpectedStruct {
                directive,
                found: keyword.to_owned(),
            });
        }
        Ok(())
    }

    /// Scan a full function signature: qualifier run, function identifier,
    /// and parameter list.
    ///
    /// The qualifier run accumulates every raw token up to the opening
    /// parenthesis, whitespace included; the token immediately before the
    /// parenthesis must be an identifier and becomes the function's name.
    /// Parameter runs trim leading and trailing whitespace, fold
    /// consecutive whitespace tokens into one, never store commas, and
    /// take their last token's text as the parameter identifier; a run
    /// with no tokens left after trimming is not a parameter.
    fn scan_signature(&mut self, directive: Directive) -> Result<ScannedFn, ParseError> {
        let mut qualifiers: Vec<RunToken> = Vec::new();
        loop {
            let token = self.scanner.next_token();
            match token.kind {
                TokenKind::Eof => return Err(ParseError::UnexpectedEof { directive }),
                TokenKind::ParenOpen => break,
                _ => qualifiers.push(RunToken::new(token.kind, token.text)),
            }
        }
        let ident = match qualifiers.pop() {
            Some(last) if last.kind == TokenKind::Ident => last.text,
            _ => return Err(ParseError::MethodIdentMissing { directive }),
        };

        let mut params: Vec<Param> = Vec::new();
        let mut run: Vec<RunToken> = Vec::new();
        loop {
            let token = self.scanner.next_token();
            match token.kind {
                TokenKind::Eof => return Err(ParseError::UnexpectedEof { directive }),
                TokenKind::Comma | TokenKind::ParenClose => {
                    finish_param(&mut run, &mut params);
                    if token.kind == TokenKind::ParenClose {
                        break;
                    }
                }
                TokenKind::Whitespace
                    if run.last().is_some_and(|t| t.kind == TokenKind::Whitespace) => {}
                _ => run.push(RunToken::new(token.kind, token.text)),
            }
        }

        let base = params
            .first()
            .and_then(|p| p.tokens.first())
            .map(|t| t.text.clone())
            .filter(|text| !text.is_empty());
        let Some(base) = base else {
            return Err(ParseError::MissingSelfParam {
                directive,
                method: ident,
            });
        };
        Ok(ScannedFn {
            ident,
            base,
            sig: MethodSig { qualifiers, params },
        })
    }
}

/// Close out the current parameter run. Empties `run` either way.
fn finish_param(run: &mut Vec<RunToken>, params: &mut Vec<Param>) {
    while run.first().is_some_and(|t| t.kind == TokenKind::Whitespace) {
        run.remove(0);
    }
    while run.last().is_some_and(|t| t.kind == TokenKind::Whitespace) {
        run.pop();
    }
    if let Some(last) = run.last() {
        let ident = last.text.clone();
        params.push(Param {
            ident,
            tokens: std::mem::take(run),
        });
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use crate::context::UNBOUND_VARIANT;
    use ptu_registry::RegistryError;
    use pretty_assertions::assert_eq;

    fn scan_all(sources: &[&str]) -> Result<Registry, ParseError> {
        let mut registry = Registry::new();
        for source in sources {
            scan_source(source, &mut registry)?;
        }
        Ok(registry)
    }

    fn texts(tokens: &[RunToken]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    // ─── Declare ────────────────────────────────────────────────────────

    #[test]
    fn declare_registers_base_type() {
        let reg = scan_all(&["KCPP_POLYMORPHIC_TAGGED_UNION(struct Shape);"]).unwrap();
        let entry = reg.get("Shape").unwrap();
        assert!(entry.methods.is_empty());
        assert!(entry.variants.is_empty());
    }

    #[test]
    fn declare_is_idempotent_across_files() {
        let reg = scan_all(&[
            "KCPP_POLYMORPHIC_TAGGED_UNION(struct Shape);",
            "KCPP_POLYMORPHIC_TAGGED_UNION(struct Shape);",
        ])
        .unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn declare_without_struct_keyword_fails() {
        let err = scan_all(&["KCPP_POLYMORPHIC_TAGGED_UNION(class Shape);"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::ExpectedStruct {
                directive: Directive::Declare,
                found: "class".into(),
            }
        );
    }

    #[test]
    fn declare_truncated_at_eof_fails() {
        let err = scan_all(&["KCPP_POLYMORPHIC_TAGGED_UNION(struct"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEof {
                directive: Directive::Declare,
            }
        );
    }

    // ─── Extend ─────────────────────────────────────────────────────────

    #[test]
    fn extend_registers_variant() {
        let reg = scan_all(&["KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};"])
            .unwrap();
        let entry = reg.get("Shape").unwrap();
        assert!(entry.variants.contains_key("circle"));
    }

    #[test]
    fn duplicate_extend_fails() {
        let source = "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};";
        let err = scan_all(&[source, source]).unwrap_err();
        assert_eq!(
            err,
            ParseError::Registry(RegistryError::DuplicateExtension {
                base: "Shape".into(),
                variant: "circle".into(),
            })
        );
    }

    // ─── DeclareMethod ──────────────────────────────────────────────────

    #[test]
    fn method_signature_is_captured() {
        let reg = scan_all(&[
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape* shape, float scale);",
        ])
        .unwrap();
        let entry = reg.get("Shape").unwrap();
        let sig = entry.methods.get("draw").unwrap();
        assert_eq!(texts(&sig.qualifiers), " void ");
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].ident, "shape");
        assert_eq!(texts(&sig.params[0].tokens), "Shape* shape");
        assert_eq!(sig.params[1].ident, "scale");
        assert_eq!(texts(&sig.params[1].tokens), "float scale");
        assert_eq!(sig.self_param_ident(), Some("shape"));
    }

    #[test]
    fn param_runs_trim_edges_and_drop_commas() {
        // Interior whitespace is one token per run, its text preserved
        // verbatim; only leading/trailing whitespace and commas go.
        let reg = scan_all(&[
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape*   shape ,\n\t const  float scale);",
        ])
        .unwrap();
        let sig = reg.get("Shape").unwrap().methods.get("draw").unwrap();
        assert_eq!(texts(&sig.params[0].tokens), "Shape*   shape");
        assert_eq!(texts(&sig.params[1].tokens), "const  float scale");
        assert_eq!(sig.params[0].ident, "shape");
        assert_eq!(sig.params[1].ident, "scale");
    }

    #[test]
    fn trailing_empty_param_run_is_skipped() {
        let reg = scan_all(&[
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape* shape, );",
        ])
        .unwrap();
        let sig = reg.get("Shape").unwrap().methods.get("draw").unwrap();
        assert_eq!(sig.params.len(), 1);
    }

    #[test]
    fn method_without_params_fails() {
        let err = scan_all(&["KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void tick();"])
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingSelfParam {
                directive: Directive::DeclareMethod,
                method: "tick".into(),
            }
        );
    }

    #[test]
    fn qualifier_run_must_end_on_identifier() {
        // A space between the function name and `(` leaves a whitespace
        // token at the end of the run.
        let err = scan_all(&["KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw (Shape* s);"])
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MethodIdentMissing {
                directive: Directive::DeclareMethod,
            }
        );
    }

    #[test]
    fn duplicate_method_across_files_fails() {
        let source = "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape* shape);";
        let err = scan_all(&[source, source]).unwrap_err();
        assert_eq!(
            err,
            ParseError::Registry(RegistryError::DuplicateMethod {
                base: "Shape".into(),
                method: "draw".into(),
            })
        );
    }

    #[test]
    fn method_truncated_in_param_list_fails() {
        let err = scan_all(&["KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape* shape"])
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEof {
                directive: Directive::DeclareMethod,
            }
        );
    }

    // ─── DeclareOverride ────────────────────────────────────────────────

    #[test]
    fn override_files_under_active_extension() {
        let reg = scan_all(&[concat!(
            "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void circleDraw(Shape* shape) {}\n",
        )])
        .unwrap();
        let entry = reg.get("Shape").unwrap();
        let record = entry.variants["circle"].get("circleDraw").unwrap();
        assert_eq!(record.target, "draw");
        assert_eq!(record.sig.self_param_ident(), Some("shape"));
    }

    #[test]
    fn override_without_extend_lands_in_unbound_variant() {
        let reg = scan_all(&[concat!(
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void strayDraw(Shape* shape) {}\n",
        )])
        .unwrap();
        let entry = reg.get("Shape").unwrap();
        assert!(entry.variants[UNBOUND_VARIANT].contains_key("strayDraw"));
    }

    #[test]
    fn extension_context_does_not_leak_between_files() {
        let reg = scan_all(&[
            "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};",
            concat!(
                "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
                "void strayDraw(Shape* shape) {}\n",
            ),
        ])
        .unwrap();
        let entry = reg.get("Shape").unwrap();
        assert!(entry.variants["circle"].is_empty());
        assert!(entry.variants[UNBOUND_VARIANT].contains_key("strayDraw"));
    }

    #[test]
    fn latest_extend_in_file_owns_subsequent_overrides() {
        let reg = scan_all(&[concat!(
            "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct square {};\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void squareDraw(Shape* shape) {}\n",
        )])
        .unwrap();
        let entry = reg.get("Shape").unwrap();
        assert!(entry.variants["circle"].is_empty());
        assert!(entry.variants["square"].contains_key("squareDraw"));
    }

    #[test]
    fn duplicate_override_ident_fails() {
        let err = scan_all(&[concat!(
            "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void circleDraw(Shape* shape) {}\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void circleDraw(Shape* shape) {}\n",
        )])
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::Registry(RegistryError::DuplicateOverride {
                base: "Shape".into(),
                variant: "circle".into(),
                ident: "circleDraw".into(),
            })
        );
    }

    // ─── Skipping ───────────────────────────────────────────────────────

    #[test]
    fn directive_inside_define_body_is_not_registered() {
        let reg = scan_all(&[concat!(
            "#define DECLARE_SHAPE KCPP_POLYMORPHIC_TAGGED_UNION(struct Shape)\n",
            "int x;\n",
        )])
        .unwrap();
        assert!(reg.is_empty());
    }

    #[test]
    fn continued_define_body_is_skipped_entirely() {
        let reg = scan_all(&[concat!(
            "#define DECLARE_BOTH \\\n",
            "\tKCPP_POLYMORPHIC_TAGGED_UNION(struct Shape) \\\n",
            "\tKCPP_POLYMORPHIC_TAGGED_UNION(struct Widget)\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION(struct Entity);\n",
        )])
        .unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.get("Entity").is_some());
    }

    #[test]
    fn directive_in_comment_or_string_is_ignored() {
        let reg = scan_all(&[concat!(
            "// KCPP_POLYMORPHIC_TAGGED_UNION(struct Shape)\n",
            "/* KCPP_POLYMORPHIC_TAGGED_UNION(struct Widget) */\n",
            "const char* s = \"KCPP_POLYMORPHIC_TAGGED_UNION(struct Entity)\";\n",
        )])
        .unwrap();
        assert!(reg.is_empty());
    }

    #[test]
    fn non_directive_text_is_skipped() {
        let reg = scan_all(&["int main() { return 0; }"]).unwrap();
        assert!(reg.is_empty());
    }

    // ─── Order independence ─────────────────────────────────────────────

    #[test]
    fn registry_content_is_file_order_independent() {
        let declare = "KCPP_POLYMORPHIC_TAGGED_UNION(struct Shape);";
        let method =
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape* shape);";
        let variant = concat!(
            "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void circleDraw(Shape* shape) {}\n",
        );
        let orders: [[&str; 3]; 6] = [
            [declare, method, variant],
            [declare, variant, method],
            [method, declare, variant],
            [method, variant, declare],
            [variant, declare, method],
            [variant, method, declare],
        ];
        let baseline = scan_all(&orders[0]).unwrap();
        for order in &orders[1..] {
            assert_eq!(scan_all(order).unwrap(), baseline);
        }
    }
}
