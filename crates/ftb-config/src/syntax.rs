//! Boolean operator syntax.
//!
//! The operator characters recognised by the query lexer are configurable as a
//! single 14-character string. Each position has a fixed role:
//!
//! ```text
//! 0 yes   1 neutral   2 no   3 raise   4 lower   5 (   6 )   7 negate
//! 8 truncate   9 reserved   10 open quote   11 close quote   12-13 reserved
//! ```
//!
//! The default is `+ -><()~*:""&|`.

use std::{fmt, str::FromStr};

use crate::ConfigError;

/// Number of characters in a syntax string.
const SYNTAX_LEN: usize = 14;

/// The default operator syntax.
pub const DEFAULT_BOOLEAN_SYNTAX: &str = "+ -><()~*:\"\"&|";

/// Operator characters understood by the boolean query lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanSyntax {
    /// Characters by position, see the module documentation.
    chars: [char; SYNTAX_LEN],
}

impl BooleanSyntax {
    /// Marks a word or group as required.
    pub fn yes(&self) -> char {
        self.chars[0]
    }

    /// Resets a pending polarity to natural.
    pub fn neutral(&self) -> char {
        self.chars[1]
    }

    /// Marks a word or group as excluded.
    pub fn no(&self) -> char {
        self.chars[2]
    }

    /// Raises the weight of the next word or group by one step.
    pub fn raise(&self) -> char {
        self.chars[3]
    }

    /// Lowers the weight of the next word or group by one step.
    pub fn lower(&self) -> char {
        self.chars[4]
    }

    /// Opens a group.
    pub fn left_paren(&self) -> char {
        self.chars[5]
    }

    /// Closes a group.
    pub fn right_paren(&self) -> char {
        self.chars[6]
    }

    /// Switches the next word or group to the negative weight table.
    pub fn negate(&self) -> char {
        self.chars[7]
    }

    /// Marks the preceding word as a prefix.
    pub fn truncate(&self) -> char {
        self.chars[8]
    }

    /// Opens a phrase.
    pub fn left_quote(&self) -> char {
        self.chars[10]
    }

    /// Closes a phrase.
    pub fn right_quote(&self) -> char {
        self.chars[11]
    }

    /// Returns true when unmarked words are required by default.
    ///
    /// This is the case when the "yes" operator is configured as a space.
    pub fn required_by_default(&self) -> bool {
        self.yes() == ' '
    }

    /// Checks a candidate syntax string.
    fn validate(chars: &[char]) -> Result<(), String> {
        if chars.len() != SYNTAX_LEN {
            return Err(format!(
                "expected {SYNTAX_LEN} characters, found {}",
                chars.len()
            ));
        }
        for (i, &c) in chars.iter().enumerate() {
            if !(c == ' ' || c.is_ascii_punctuation()) || c == '_' {
                return Err(format!("character {c:?} at position {i} is not an operator"));
            }
            for (j, &prev) in chars[..i].iter().enumerate() {
                if prev == c && !(i == 11 && j == 10) {
                    return Err(format!("character {c:?} is used at positions {j} and {i}"));
                }
            }
        }
        Ok(())
    }
}

impl Default for BooleanSyntax {
    fn default() -> Self {
        let mut chars = [' '; SYNTAX_LEN];
        for (slot, c) in chars.iter_mut().zip(DEFAULT_BOOLEAN_SYNTAX.chars()) {
            *slot = c;
        }
        Self { chars }
    }
}

impl FromStr for BooleanSyntax {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: Vec<char> = s.chars().collect();
        Self::validate(&parsed).map_err(|reason| ConfigError::InvalidSyntax {
            syntax: s.to_string(),
            reason,
        })?;
        let mut chars = [' '; SYNTAX_LEN];
        chars.copy_from_slice(&parsed);
        Ok(Self { chars })
    }
}

impl fmt::Display for BooleanSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roles() {
        let syntax = BooleanSyntax::default();
        assert_eq!(syntax.yes(), '+');
        assert_eq!(syntax.neutral(), ' ');
        assert_eq!(syntax.no(), '-');
        assert_eq!(syntax.raise(), '>');
        assert_eq!(syntax.lower(), '<');
        assert_eq!(syntax.left_paren(), '(');
        assert_eq!(syntax.right_paren(), ')');
        assert_eq!(syntax.negate(), '~');
        assert_eq!(syntax.truncate(), '*');
        assert_eq!(syntax.left_quote(), '"');
        assert_eq!(syntax.right_quote(), '"');
        assert!(!syntax.required_by_default());
    }

    #[test]
    fn display_round_trips_default() {
        let syntax = BooleanSyntax::default();
        assert_eq!(syntax.to_string(), DEFAULT_BOOLEAN_SYNTAX);
        assert_eq!(DEFAULT_BOOLEAN_SYNTAX.parse::<BooleanSyntax>().unwrap(), syntax);
    }

    #[test]
    fn space_as_yes_makes_words_required() {
        let syntax: BooleanSyntax = " +-><()~*:\"\"&|".parse().unwrap();
        assert!(syntax.required_by_default());
        assert_eq!(syntax.neutral(), '+');
    }

    #[test]
    fn rejects_wrong_length() {
        let err = "+-".parse::<BooleanSyntax>().unwrap_err();
        assert!(err.to_string().contains("expected 14 characters"));
    }

    #[test]
    fn rejects_word_characters() {
        let err = "+ -><()~a:\"\"&|".parse::<BooleanSyntax>().unwrap_err();
        assert!(err.to_string().contains("not an operator"));
    }

    #[test]
    fn rejects_duplicates_except_quote_pair() {
        let err = "+ +><()~*:\"\"&|".parse::<BooleanSyntax>().unwrap_err();
        assert!(err.to_string().contains("positions 0 and 2"));

        let distinct_quotes: BooleanSyntax = "+ -><()~*:'\"&|".parse().unwrap();
        assert_eq!(distinct_quotes.left_quote(), '\'');
        assert_eq!(distinct_quotes.right_quote(), '"');
    }
}
