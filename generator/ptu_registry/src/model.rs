//! Structured signatures extracted from directive argument lists.
//!
//! These are owned copies: the registry outlives every per-file source
//! buffer, so the few tokens worth keeping are copied out of it.

use ptu_lexer::TokenKind;

/// One owned token of a qualifier run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunToken {
    pub kind: TokenKind,
    pub text: String,
}

impl RunToken {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A single parameter: its name plus the full qualifier run (type and
/// modifiers, name included as the run's last token). Leading/trailing
/// whitespace has been stripped and internal whitespace runs collapsed
/// before storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    /// The parameter name — the text of the run's last token.
    pub ident: String,
    pub tokens: Vec<RunToken>,
}

/// A method signature: the qualifier run for the method itself (return
/// type and modifiers, whitespace tokens preserved verbatim) and its
/// ordered parameters.
///
/// By convention the first parameter is a pointer-typed self parameter
/// whose run's first token names the owning base type; the directive
/// parser enforces its presence before anything reaches the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSig {
    pub qualifiers: Vec<RunToken>,
    pub params: Vec<Param>,
}

impl MethodSig {
    /// The name of the self parameter, used by dispatch bodies to read
    /// the runtime type tag.
    pub fn self_param_ident(&self) -> Option<&str> {
        self.params.first().map(|p| p.ident.as_str())
    }
}

/// A per-variant override: the signature of the overriding function plus
/// the identifier of the abstract method it claims to override. The
/// target is recorded verbatim from the directive argument and is never
/// validated against the registry at parse time — a target that matches
/// no declared method simply produces no dispatch entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverrideRecord {
    pub target: String,
    pub sig: MethodSig,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(text: &str) -> RunToken {
        RunToken::new(TokenKind::Ident, text)
    }

    #[test]
    fn self_param_ident_is_first_param_name() {
        let sig = MethodSig {
            qualifiers: vec![ident("void")],
            params: vec![
                Param {
                    ident: "shape".into(),
                    tokens: vec![ident("Shape"), RunToken::new(TokenKind::Asterisk, "*"), ident("shape")],
                },
                Param {
                    ident: "scale".into(),
                    tokens: vec![ident("float"), ident("scale")],
                },
            ],
        };
        assert_eq!(sig.self_param_ident(), Some("shape"));
    }

    #[test]
    fn self_param_ident_empty_params() {
        let sig = MethodSig {
            qualifiers: vec![],
            params: vec![],
        };
        assert_eq!(sig.self_param_ident(), None);
    }
}
