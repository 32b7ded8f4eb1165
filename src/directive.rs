//! Preprocessor directive keywords and directive-line parsing
//!
//! The recognized keywords form a closed set. Two subsets drive nesting:
//! - *outdent-before*: `endif`, `else`, `elif` close a level before the line is emitted
//! - *indent-after*: `if`, `ifdef`, `ifndef`, `else`, `elif` open a level after it

use std::fmt;

/// A recognized preprocessor directive keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Define,
    Elif,
    Else,
    Endif,
    If,
    Ifdef,
    Ifndef,
    Include,
    Pragma,
    Undef,
}

impl Directive {
    /// Every recognized directive, in keyword order
    pub const ALL: [Directive; 10] = [
        Directive::Define,
        Directive::Elif,
        Directive::Else,
        Directive::Endif,
        Directive::If,
        Directive::Ifdef,
        Directive::Ifndef,
        Directive::Include,
        Directive::Pragma,
        Directive::Undef,
    ];

    /// Look up a directive by its keyword (case-sensitive)
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let directive = match keyword {
            "define" => Directive::Define,
            "elif" => Directive::Elif,
            "else" => Directive::Else,
            "endif" => Directive::Endif,
            "if" => Directive::If,
            "ifdef" => Directive::Ifdef,
            "ifndef" => Directive::Ifndef,
            "include" => Directive::Include,
            "pragma" => Directive::Pragma,
            "undef" => Directive::Undef,
            _ => return None,
        };
        Some(directive)
    }

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Directive::Define => "define",
            Directive::Elif => "elif",
            Directive::Else => "else",
            Directive::Endif => "endif",
            Directive::If => "if",
            Directive::Ifdef => "ifdef",
            Directive::Ifndef => "ifndef",
            Directive::Include => "include",
            Directive::Pragma => "pragma",
            Directive::Undef => "undef",
        }
    }

    /// Closes the current nesting level before the line is emitted
    #[must_use]
    pub fn outdents_before(self) -> bool {
        matches!(self, Directive::Endif | Directive::Else | Directive::Elif)
    }

    /// Opens a new nesting level after the line is emitted
    #[must_use]
    pub fn indents_after(self) -> bool {
        matches!(
            self,
            Directive::If | Directive::Ifdef | Directive::Ifndef | Directive::Else | Directive::Elif
        )
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A line that starts with the directive marker, split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveLine<'a> {
    /// Everything after the marker and the whitespace following it,
    /// including the line terminator
    pub remainder: &'a str,
    /// First whitespace-delimited token of the remainder (may be empty)
    pub keyword: &'a str,
}

impl<'a> DirectiveLine<'a> {
    /// Split a directive line; returns `None` for plain lines
    ///
    /// Only a marker in the first column makes a directive line.
    #[must_use]
    pub fn parse(line: &'a str, marker: char) -> Option<Self> {
        let remainder = line.strip_prefix(marker)?.trim_start();
        let keyword = remainder.split_whitespace().next().unwrap_or("");
        Some(Self { remainder, keyword })
    }

    /// The recognized directive, if the keyword is one
    #[must_use]
    pub fn directive(&self) -> Option<Directive> {
        Directive::from_keyword(self.keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        for directive in Directive::ALL {
            assert_eq!(Directive::from_keyword(directive.keyword()), Some(directive));
        }
        assert_eq!(Directive::from_keyword("weird"), None);
        assert_eq!(Directive::from_keyword("IF"), None);
        assert_eq!(Directive::from_keyword(""), None);
    }

    #[test]
    fn test_outdent_before_set() {
        let outdents: Vec<_> = Directive::ALL
            .into_iter()
            .filter(|d| d.outdents_before())
            .collect();
        assert_eq!(
            outdents,
            vec![Directive::Elif, Directive::Else, Directive::Endif]
        );
    }

    #[test]
    fn test_indent_after_set() {
        let indents: Vec<_> = Directive::ALL
            .into_iter()
            .filter(|d| d.indents_after())
            .collect();
        assert_eq!(
            indents,
            vec![
                Directive::Elif,
                Directive::Else,
                Directive::If,
                Directive::Ifdef,
                Directive::Ifndef
            ]
        );
    }

    #[test]
    fn test_structural_neutral_directives() {
        for directive in [
            Directive::Define,
            Directive::Include,
            Directive::Pragma,
            Directive::Undef,
        ] {
            assert!(!directive.outdents_before());
            assert!(!directive.indents_after());
        }
    }

    #[test]
    fn test_parse_plain_line() {
        assert_eq!(DirectiveLine::parse("void foo();\n", '#'), None);
        // Marker must be in the first column
        assert_eq!(DirectiveLine::parse("  #define X\n", '#'), None);
    }

    #[test]
    fn test_parse_strips_whitespace_after_marker() {
        let line = DirectiveLine::parse("#   define BAR 1\n", '#').unwrap();
        assert_eq!(line.remainder, "define BAR 1\n");
        assert_eq!(line.keyword, "define");
        assert_eq!(line.directive(), Some(Directive::Define));
    }

    #[test]
    fn test_parse_tabs_after_marker() {
        let line = DirectiveLine::parse("#\t\tendif /* FOO */", '#').unwrap();
        assert_eq!(line.remainder, "endif /* FOO */");
        assert_eq!(line.directive(), Some(Directive::Endif));
    }

    #[test]
    fn test_parse_bare_marker() {
        let line = DirectiveLine::parse("#\n", '#').unwrap();
        assert_eq!(line.remainder, "");
        assert_eq!(line.keyword, "");
        assert_eq!(line.directive(), None);
    }

    #[test]
    fn test_parse_custom_marker() {
        let line = DirectiveLine::parse("%  ifdef X\n", '%').unwrap();
        assert_eq!(line.directive(), Some(Directive::Ifdef));
        assert_eq!(DirectiveLine::parse("#ifdef X\n", '%'), None);
    }
}
