//! C# language version + feature availability model.
//!
//! The parser accepts a superset grammar (modern C#); refactorings consult the configured
//! language version before producing syntax that an older compiler would reject
//! (interpolated strings, expression-bodied members, `is not null`, …).

use std::fmt;

/// The effective C# language version of a document (`major.minor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CSharpLanguageVersion {
    pub major: u16,
    pub minor: u16,
}

impl CSharpLanguageVersion {
    pub const CSHARP_5: Self = Self::new(5, 0);
    pub const CSHARP_6: Self = Self::new(6, 0);
    pub const CSHARP_7: Self = Self::new(7, 0);
    pub const CSHARP_7_3: Self = Self::new(7, 3);
    pub const CSHARP_8: Self = Self::new(8, 0);
    pub const CSHARP_9: Self = Self::new(9, 0);
    pub const CSHARP_10: Self = Self::new(10, 0);
    pub const LATEST: Self = Self::CSHARP_10;

    #[inline]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Parses `"7"`, `"7.3"`, `"latest"`, `"default"` or `"latestmajor"` (case-insensitive).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if ["latest", "latestmajor", "default", "preview"]
            .iter()
            .any(|alias| text.eq_ignore_ascii_case(alias))
        {
            return Some(Self::LATEST);
        }
        let (major, minor) = match text.split_once('.') {
            Some((major, minor)) => (major.parse().ok()?, minor.parse().ok()?),
            None => (text.parse().ok()?, 0),
        };
        (1..=Self::LATEST.major)
            .contains(&major)
            .then_some(Self::new(major, minor))
    }

    pub fn availability(self, feature: CSharpFeature) -> FeatureAvailability {
        if self >= feature.stable_since() {
            FeatureAvailability::Stable
        } else {
            FeatureAvailability::Unavailable
        }
    }

    pub fn is_enabled(self, feature: CSharpFeature) -> bool {
        self.availability(feature) == FeatureAvailability::Stable
    }

    #[inline]
    pub fn supports_csharp6(self) -> bool {
        self.is_enabled(CSharpFeature::InterpolatedStrings)
    }

    #[inline]
    pub fn supports_csharp7(self) -> bool {
        self.is_enabled(CSharpFeature::OutVariables)
    }
}

impl Default for CSharpLanguageVersion {
    fn default() -> Self {
        CSharpLanguageVersion::LATEST
    }
}

impl fmt::Display for CSharpLanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minor == 0 {
            write!(f, "{}", self.major)
        } else {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CSharpFeature {
    InterpolatedStrings,     // C# 6
    NameOf,                  // C# 6
    ExpressionBodiedMembers, // C# 6 (methods/get-only properties), 7 for the rest
    NullConditional,         // C# 6
    OutVariables,            // C# 7
    PatternMatching,         // C# 7
    LocalFunctions,          // C# 7
    ThrowExpressions,        // C# 7
    UsingDeclarations,       // C# 8
    NotPattern,              // C# 9
    TargetTypedNew,          // C# 9
    FileScopedNamespaces,    // C# 10
}

impl CSharpFeature {
    pub const fn display_name(self) -> &'static str {
        match self {
            CSharpFeature::InterpolatedStrings => "interpolated strings",
            CSharpFeature::NameOf => "nameof operator",
            CSharpFeature::ExpressionBodiedMembers => "expression-bodied members",
            CSharpFeature::NullConditional => "null-conditional operators",
            CSharpFeature::OutVariables => "out variable declarations",
            CSharpFeature::PatternMatching => "pattern matching",
            CSharpFeature::LocalFunctions => "local functions",
            CSharpFeature::ThrowExpressions => "throw expressions",
            CSharpFeature::UsingDeclarations => "using declarations",
            CSharpFeature::NotPattern => "`not` patterns",
            CSharpFeature::TargetTypedNew => "target-typed `new`",
            CSharpFeature::FileScopedNamespaces => "file-scoped namespaces",
        }
    }

    pub const fn stable_since(self) -> CSharpLanguageVersion {
        match self {
            CSharpFeature::InterpolatedStrings
            | CSharpFeature::NameOf
            | CSharpFeature::ExpressionBodiedMembers
            | CSharpFeature::NullConditional => CSharpLanguageVersion::CSHARP_6,
            CSharpFeature::OutVariables
            | CSharpFeature::PatternMatching
            | CSharpFeature::LocalFunctions
            | CSharpFeature::ThrowExpressions => CSharpLanguageVersion::CSHARP_7,
            CSharpFeature::UsingDeclarations => CSharpLanguageVersion::CSHARP_8,
            CSharpFeature::NotPattern | CSharpFeature::TargetTypedNew => {
                CSharpLanguageVersion::CSHARP_9
            }
            CSharpFeature::FileScopedNamespaces => CSharpLanguageVersion::CSHARP_10,
        }
    }
}

/// Whether the language supports a feature in a given version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureAvailability {
    Unavailable,
    Stable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_strings() {
        assert_eq!(
            CSharpLanguageVersion::parse("7.3"),
            Some(CSharpLanguageVersion::CSHARP_7_3)
        );
        assert_eq!(
            CSharpLanguageVersion::parse("6"),
            Some(CSharpLanguageVersion::CSHARP_6)
        );
        assert_eq!(
            CSharpLanguageVersion::parse("Latest"),
            Some(CSharpLanguageVersion::LATEST)
        );
        assert_eq!(CSharpLanguageVersion::parse("banana"), None);
        assert_eq!(CSharpLanguageVersion::parse("42"), None);
    }

    #[test]
    fn feature_gates() {
        let v5 = CSharpLanguageVersion::CSHARP_5;
        assert!(!v5.supports_csharp6());
        assert!(!v5.supports_csharp7());
        let v7 = CSharpLanguageVersion::CSHARP_7_3;
        assert!(v7.supports_csharp6());
        assert!(v7.supports_csharp7());
        assert!(!v7.is_enabled(CSharpFeature::NotPattern));
        assert!(CSharpLanguageVersion::default().is_enabled(CSharpFeature::NotPattern));
        assert_eq!(CSharpLanguageVersion::CSHARP_7_3.to_string(), "7.3");
    }
}
