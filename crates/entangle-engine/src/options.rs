//! Engine configuration

/// Lifecycle hook names skipped when cataloging a class
pub const RESERVED_MEMBERS: [&str; 5] = ["BEGIN", "END", "INIT", "CHECK", "UNITCHECK"];

/// Default separator between origin name and variation label
pub const DEFAULT_SURROGATE_INFIX: &str = "$Surrogate$";

/// Entangler configuration
#[derive(Debug, Clone)]
pub struct EntanglerOptions {
    /// Member names never cataloged
    pub reserved_members: Vec<String>,
    /// Default surrogate name is `{origin}{infix}{variation}`
    pub surrogate_infix: String,
    /// Keep emitted diagnostics for later inspection
    pub retain_diagnostics: bool,
}

impl Default for EntanglerOptions {
    fn default() -> Self {
        Self {
            reserved_members: RESERVED_MEMBERS.iter().map(|s| s.to_string()).collect(),
            surrogate_infix: DEFAULT_SURROGATE_INFIX.to_string(),
            retain_diagnostics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = EntanglerOptions::default();
        assert!(options.reserved_members.iter().any(|m| m == "BEGIN"));
        assert_eq!(options.surrogate_infix, "$Surrogate$");
        assert!(options.retain_diagnostics);
    }

    #[test]
    fn test_struct_update() {
        let options = EntanglerOptions {
            retain_diagnostics: false,
            ..Default::default()
        };
        assert!(!options.retain_diagnostics);
        assert_eq!(options.reserved_members.len(), RESERVED_MEMBERS.len());
    }
}
