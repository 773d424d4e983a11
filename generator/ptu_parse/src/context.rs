//! Per-scan extension context.

/// Variant identifier used for overrides that arrive before any Extend
/// directive in the same scan pass.
///
/// Double underscores keep it out of the identifier space real directives
/// can produce, so such overrides are visible in generated output instead
/// of silently colliding with a genuine variant.
pub const UNBOUND_VARIANT: &str = "__unbound__";

/// The "most recent Extend" state for one file pass.
///
/// Created fresh for every [`scan_source`](crate::scan_source) call and
/// threaded through the parser explicitly, so nothing can leak between
/// independently scanned files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanContext {
    last_extension: Option<String>,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `variant` as the active extension context.
    pub fn set_extension(&mut self, variant: &str) {
        self.last_extension = Some(variant.to_owned());
    }

    /// The variant overrides are currently filed under:
    /// [`UNBOUND_VARIANT`] until the first Extend of this pass.
    pub fn active_variant(&self) -> &str {
        self.last_extension.as_deref().unwrap_or(UNBOUND_VARIANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unbound() {
        let ctx = ScanContext::new();
        assert_eq!(ctx.active_variant(), UNBOUND_VARIANT);
    }

    #[test]
    fn latest_extension_wins() {
        let mut ctx = ScanContext::new();
        ctx.set_extension("circle");
        ctx.set_extension("square");
        assert_eq!(ctx.active_variant(), "square");
    }
}
