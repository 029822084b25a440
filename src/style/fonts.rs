//! Font availability lookup.

use std::collections::HashSet;

/// Answers whether a font family can be used on this machine.
pub trait FontLocator: Send + Sync + std::fmt::Debug {
    /// Whether `name` is available. Implementations should answer `true`
    /// when availability cannot be determined.
    fn is_available(&self, name: &str) -> bool;
}

/// Font role in the typography configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Headings, cover titles, step numbers.
    Display,
    /// Everything else.
    Body,
}

impl FontRole {
    /// Key of the role's primary font in the `typography` section.
    pub fn config_key(self) -> &'static str {
        match self {
            FontRole::Display => "display_font",
            FontRole::Body => "body_font",
        }
    }
}

/// Outcome of a system font query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontLookup {
    /// The family is installed.
    Found,
    /// The font source answered and the family is not installed.
    Missing,
    /// The font source could not be queried.
    Unknown,
}

/// Looks families up through the platform font source (fontconfig,
/// Core Text or DirectWrite) when the `system-fonts` feature is on.
/// Without it every lookup is [`FontLookup::Unknown`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFontLocator;

impl SystemFontLocator {
    /// Locator over the platform font source.
    pub fn new() -> Self {
        Self
    }

    /// Query the font source for an exact family name.
    pub fn lookup(&self, name: &str) -> FontLookup {
        lookup_family(name)
    }
}

impl FontLocator for SystemFontLocator {
    fn is_available(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        availability(name, self.lookup(name))
    }
}

fn availability(name: &str, lookup: FontLookup) -> bool {
    match lookup {
        FontLookup::Found => true,
        FontLookup::Missing => false,
        FontLookup::Unknown => {
            log::debug!(
                "Could not determine availability of font '{}'; assuming available",
                name
            );
            true
        }
    }
}

#[cfg(feature = "system-fonts")]
fn lookup_family(name: &str) -> FontLookup {
    use font_kit::error::SelectionError;
    use font_kit::family_name::FamilyName;
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    match SystemSource::new()
        .select_best_match(&[FamilyName::Title(name.to_string())], &Properties::new())
    {
        Ok(_) => FontLookup::Found,
        Err(SelectionError::NotFound) => FontLookup::Missing,
        Err(err) => {
            log::warn!("Font source unavailable while looking up '{}': {:?}", name, err);
            FontLookup::Unknown
        }
    }
}

#[cfg(not(feature = "system-fonts"))]
fn lookup_family(_name: &str) -> FontLookup {
    FontLookup::Unknown
}

/// Locator with a fixed answer set. Names are compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FixedFontLocator {
    available: HashSet<String>,
}

impl FixedFontLocator {
    /// Only the given fonts are available.
    pub fn new<I, S>(fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            available: fonts.into_iter().map(|f| squash(f.as_ref())).collect(),
        }
    }

    /// No font is available.
    pub fn none() -> Self {
        Self::default()
    }
}

impl FontLocator for FixedFontLocator {
    fn is_available(&self, name: &str) -> bool {
        self.available.contains(&squash(name))
    }
}

fn squash(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_outcomes() {
        assert!(availability("Arial", FontLookup::Found));
        assert!(!availability("Arial", FontLookup::Missing));
        // An unreachable font source must not push the chain to a fallback.
        assert!(availability("Arial", FontLookup::Unknown));
        assert!(!SystemFontLocator::new().is_available("   "));
    }

    #[test]
    fn test_unknown_family_is_never_found() {
        let locator = SystemFontLocator::new();
        assert_ne!(locator.lookup("Docstyle Nonexistent Family 7f3a"), FontLookup::Found);
    }

    #[cfg(not(feature = "system-fonts"))]
    #[test]
    fn test_without_system_fonts_everything_is_available() {
        let locator = SystemFontLocator::new();
        assert_eq!(locator.lookup("Helvetica Neue"), FontLookup::Unknown);
        assert!(locator.is_available("Helvetica Neue"));
    }

    #[test]
    fn test_fixed_locator() {
        let locator = FixedFontLocator::new(["Arial"]);
        assert!(locator.is_available("arial"));
        assert!(!locator.is_available("Helvetica Neue"));
        assert!(!FixedFontLocator::none().is_available("Arial"));
    }

    #[test]
    fn test_role_keys() {
        assert_eq!(FontRole::Display.config_key(), "display_font");
        assert_eq!(FontRole::Body.config_key(), "body_font");
    }
}
