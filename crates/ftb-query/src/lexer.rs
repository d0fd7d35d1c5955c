//! Query lexer.
//!
//! Splits a boolean query into words and group boundaries. Operator
//! characters come from the configured [`BooleanSyntax`]; what counts as a
//! word character is decided by the [`Tokenizer`].
//!
//! Modifiers (`+ - > < ~` by default) are only recognised at the start of a
//! word, that is after whitespace, a parenthesis or the start of the query.
//! Any other non-word character resets pending modifiers. Inside a phrase the
//! parentheses and modifiers lose their meaning and only the closing quote is
//! special.

use ftb_config::BooleanSyntax;
use ftb_index::Tokenizer;

use crate::Polarity;

/// Modifiers that apply to the following word or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    /// Requested polarity.
    pub polarity: Polarity,
    /// Net weight adjustment from `>` and `<`.
    pub adjust: i32,
    /// Whether `~` selected the negative weight table.
    pub negate: bool,
}

impl Modifiers {
    /// Modifiers with the given polarity and no weight change.
    fn plain(polarity: Polarity) -> Self {
        Self {
            polarity,
            adjust: 0,
            negate: false,
        }
    }
}

/// What a token is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A word as written in the query.
    Word {
        /// Unfolded word text.
        text: String,
        /// Whether the truncation operator followed the word.
        truncated: bool,
    },
    /// Start of a group, or of a phrase when `phrase` is set.
    Open {
        /// Whether the group was opened by a quote.
        phrase: bool,
    },
    /// End of a group or phrase.
    Close,
}

/// A token in a boolean query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token payload.
    pub kind: TokenKind,
    /// Modifiers in effect for this token.
    pub modifiers: Modifiers,
    /// Byte offset in the query.
    pub offset: usize,
}

/// Iterator over the tokens of a query.
pub struct Lexer<'a> {
    /// The query text.
    input: &'a str,
    /// Current byte position.
    pos: usize,
    /// Operator characters.
    syntax: &'a BooleanSyntax,
    /// Word character rules.
    tokenizer: &'a dyn Tokenizer,
    /// Whether the next character starts a word.
    at_word_start: bool,
    /// Whether the lexer is between phrase quotes.
    in_phrase: bool,
    /// Modifiers collected so far.
    modifiers: Modifiers,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer for `input`.
    pub fn new(input: &'a str, syntax: &'a BooleanSyntax, tokenizer: &'a dyn Tokenizer) -> Self {
        let mut lexer = Self {
            input,
            pos: 0,
            syntax,
            tokenizer,
            at_word_start: true,
            in_phrase: false,
            modifiers: Modifiers::plain(Polarity::Natural),
        };
        lexer.modifiers = lexer.default_modifiers();
        lexer
    }

    /// Modifiers that apply when none were written.
    fn default_modifiers(&self) -> Modifiers {
        if self.in_phrase || self.syntax.required_by_default() {
            Modifiers::plain(Polarity::Required)
        } else {
            Modifiers::plain(Polarity::Natural)
        }
    }

    /// Emits a group boundary and resets the modifiers.
    fn boundary(&mut self, kind: TokenKind, offset: usize) -> Token {
        let modifiers = self.modifiers;
        match kind {
            TokenKind::Open { phrase: true } => self.in_phrase = true,
            TokenKind::Close => self.in_phrase = false,
            _ => {}
        }
        self.at_word_start = true;
        self.modifiers = self.default_modifiers();
        Token {
            kind,
            modifiers,
            offset,
        }
    }

    /// Applies a modifier character. Returns false if `c` is not one.
    fn apply_modifier(&mut self, c: char) -> bool {
        let syntax = self.syntax;
        if c == syntax.yes() {
            self.modifiers.polarity = Polarity::Required;
        } else if c == syntax.neutral() {
            self.modifiers.polarity = Polarity::Natural;
        } else if c == syntax.no() {
            self.modifiers.polarity = Polarity::Excluded;
        } else if c == syntax.raise() {
            self.modifiers.adjust += 1;
        } else if c == syntax.lower() {
            self.modifiers.adjust -= 1;
        } else if c == syntax.negate() {
            self.modifiers.negate = !self.modifiers.negate;
        } else {
            return false;
        }
        true
    }

    /// Reads the word starting at the current position.
    fn read_word(&mut self) -> Token {
        let start = self.pos;
        let end = self.tokenizer.word_end(self.input, start);
        self.pos = end;
        let truncated = self.input[end..].starts_with(self.syntax.truncate());
        if truncated {
            self.pos += self.syntax.truncate().len_utf8();
        }
        let modifiers = self.modifiers;
        self.at_word_start = false;
        self.modifiers = self.default_modifiers();
        Token {
            kind: TokenKind::Word {
                text: self.input[start..end].to_string(),
                truncated,
            },
            modifiers,
            offset: start,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while let Some(c) = self.input[self.pos..].chars().next() {
            if self.tokenizer.is_word_char(c) {
                return Some(self.read_word());
            }
            let offset = self.pos;
            self.pos += c.len_utf8();

            if self.in_phrase {
                if c == self.syntax.right_quote() {
                    return Some(self.boundary(TokenKind::Close, offset));
                }
            } else {
                if c == self.syntax.left_paren() {
                    return Some(self.boundary(TokenKind::Open { phrase: false }, offset));
                }
                if c == self.syntax.right_paren() {
                    return Some(self.boundary(TokenKind::Close, offset));
                }
                if c == self.syntax.left_quote() {
                    return Some(self.boundary(TokenKind::Open { phrase: true }, offset));
                }
                if self.at_word_start && self.apply_modifier(c) {
                    continue;
                }
            }

            self.at_word_start = c.is_whitespace();
            self.modifiers = self.default_modifiers();
        }
        None
    }
}
