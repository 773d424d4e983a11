//! Parse failures.

use std::fmt;

use ptu_registry::RegistryError;
use thiserror::Error;

/// Which directive form was being parsed when a failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Declare,
    Extend,
    DeclareMethod,
    DeclareOverride,
}

impl Directive {
    /// The identifier that introduces this directive in source text.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Declare => "KCPP_POLYMORPHIC_TAGGED_UNION",
            Self::Extend => "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS",
            Self::DeclareMethod => "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL",
            Self::DeclareOverride => "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A directive could not be parsed, or feeding it to the registry violated
/// a uniqueness invariant. All variants abort the run; no output is
/// generated from a partially parsed source set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended in the middle of a directive's argument form.
    #[error("unexpected end of input while parsing a {directive} directive")]
    UnexpectedEof { directive: Directive },

    /// A position requiring the `struct` keyword held some other identifier.
    #[error("expected `struct` in {directive} directive, found `{found}`")]
    ExpectedStruct { directive: Directive, found: String },

    /// The token immediately before a signature's opening parenthesis was
    /// not an identifier, so there is no function name to take.
    #[error("{directive} signature has no function identifier before `(`")]
    MethodIdentMissing { directive: Directive },

    /// A signature had no parameters, so no self parameter names the
    /// owning base type.
    #[error("{directive} signature for `{method}` has no self parameter naming its base type")]
    MissingSelfParam { directive: Directive, method: String },

    /// The directive parsed but violated a registry uniqueness invariant.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
