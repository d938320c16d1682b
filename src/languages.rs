//! Supported language tags

use std::fmt;

/// The fixed set of supported language tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Embedded scripting runtime, evaluated in-process
    Rhai,
    C,
    Cpp,
    Java,
    Go,
    Php,
    Python,
    R,
    TypeScript,
    Sql,
}

impl Language {
    /// Parse a language tag, accepting common aliases. Returns `None` for
    /// unrecognized tags; the dispatcher maps that to an
    /// `unsupported_language` result without side effects.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "rhai" | "script" => Some(Self::Rhai),
            "c" => Some(Self::C),
            "cpp" | "c++" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "go" | "golang" => Some(Self::Go),
            "php" => Some(Self::Php),
            "python" | "py" | "python3" => Some(Self::Python),
            "r" => Some(Self::R),
            "typescript" | "ts" => Some(Self::TypeScript),
            "sql" | "sqlite" => Some(Self::Sql),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rhai => "rhai",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Go => "go",
            Self::Php => "php",
            Self::Python => "python",
            Self::R => "r",
            Self::TypeScript => "typescript",
            Self::Sql => "sql",
        }
    }

    /// All supported languages, in registry order.
    pub fn all() -> &'static [Language] {
        &[
            Self::Rhai,
            Self::C,
            Self::Cpp,
            Self::Java,
            Self::Go,
            Self::Php,
            Self::Python,
            Self::R,
            Self::TypeScript,
            Self::Sql,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_tags() {
        for lang in Language::all() {
            assert_eq!(Language::parse(lang.as_str()), Some(*lang));
        }
    }

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!(Language::parse("C++"), Some(Language::Cpp));
        assert_eq!(Language::parse("Py"), Some(Language::Python));
        assert_eq!(Language::parse("GOLANG"), Some(Language::Go));
        assert_eq!(Language::parse("ts"), Some(Language::TypeScript));
        assert_eq!(Language::parse("script"), Some(Language::Rhai));
        assert_eq!(Language::parse("sqlite"), Some(Language::Sql));
    }

    #[test]
    fn rejects_unknown_tags() {
        assert_eq!(Language::parse("cobol"), None);
        assert_eq!(Language::parse(""), None);
    }
}
