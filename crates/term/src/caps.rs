//! Color capabilities of the output terminal.
//!
//! Capabilities are configuration passed into the renderer. Reading them from
//! the environment is a convenience for the driver; the renderer itself never
//! looks at the environment.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// 24-bit `38:2:r:g:b` colors.
    pub truecolor: bool,
    /// 256-color palette `38;5;n`.
    pub colors_256: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            truecolor: true,
            colors_256: true,
        }
    }
}

impl Capabilities {
    /// Only the 8 basic colors.
    pub const BASIC: Capabilities = Capabilities {
        truecolor: false,
        colors_256: false,
    };

    /// Create from `COLORTERM` and `TERM`.
    pub fn from_env() -> Self {
        let colorterm = env::var("COLORTERM").ok();
        let term = env::var("TERM").ok();
        Self::from_vars(colorterm.as_deref(), term.as_deref())
    }

    pub fn from_vars(colorterm: Option<&str>, term: Option<&str>) -> Self {
        let colorterm = colorterm.map(|s| s.trim().to_ascii_lowercase());
        let term = term.map(|s| s.trim().to_ascii_lowercase());

        let truecolor = matches!(colorterm.as_deref(), Some("truecolor") | Some("24bit"))
            || term
                .as_deref()
                .is_some_and(|t| t.ends_with("-direct") || t.contains("truecolor"));

        let colors_256 = truecolor || term.as_deref().is_some_and(|t| t.contains("256color"));

        Self {
            truecolor,
            colors_256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full_color() {
        let caps = Capabilities::default();
        assert!(caps.truecolor);
        assert!(caps.colors_256);
    }

    #[test]
    fn test_colorterm_enables_truecolor() {
        let caps = Capabilities::from_vars(Some("truecolor"), Some("xterm"));
        assert_eq!(caps, Capabilities::default());
        let caps = Capabilities::from_vars(Some("24BIT"), None);
        assert!(caps.truecolor);
    }

    #[test]
    fn test_term_256color() {
        let caps = Capabilities::from_vars(None, Some("xterm-256color"));
        assert!(!caps.truecolor);
        assert!(caps.colors_256);
    }

    #[test]
    fn test_direct_terminfo_entry() {
        let caps = Capabilities::from_vars(None, Some("xterm-direct"));
        assert!(caps.truecolor);
    }

    #[test]
    fn test_unknown_or_missing_is_basic() {
        assert_eq!(Capabilities::from_vars(None, None), Capabilities::BASIC);
        assert_eq!(
            Capabilities::from_vars(Some(""), Some("dumb")),
            Capabilities::BASIC
        );
        assert_eq!(
            Capabilities::from_vars(Some("yes"), Some("xterm")),
            Capabilities::BASIC
        );
    }
}
