use std::fmt;

use crate::{
    ast::BinaryOperator,
    diagnostics::{Diagnostics, SourceLoc, Span},
    error::LexError,
    interpreter::scanner::{EndOfInput, Scanner},
};

/// The kinds of tokens the lexer produces.
///
/// There are no keywords: `var`, `out`, `print`, `map` and `reduce` are
/// plain identifiers that the parser recognizes by their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mult,
    /// `/`
    Div,
    /// `^`
    Pow,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    IntLiteral,
    FloatLiteral,
    /// `->`
    Arrow,
    /// `,`
    Comma,
    StringLiteral,
    /// `=`
    Assign,
    /// Input that could not be lexed. A diagnostic has already been reported.
    Error,
    /// `#` up to the end of the line. The payload includes the `#`.
    Comment,
    /// End of input. Returned again on every further request.
    Eof,
}

impl TokenKind {
    /// Whether a token of this kind can be the last token of an operand.
    ///
    /// A `-` directly in front of a number starts a negative literal only if
    /// the previous token cannot end an operand; otherwise it is subtraction.
    #[must_use]
    pub const fn ends_operand(self) -> bool {
        matches!(self,
                 Self::Identifier
                 | Self::IntLiteral
                 | Self::FloatLiteral
                 | Self::StringLiteral
                 | Self::RParen
                 | Self::RBrace
                 | Self::Error)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "IDENTIFIER",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mult => "MULT",
            Self::Div => "DIV",
            Self::Pow => "POW",
            Self::LParen => "L_PAREN",
            Self::RParen => "R_PAREN",
            Self::LBrace => "L_BRACE",
            Self::RBrace => "R_BRACE",
            Self::IntLiteral => "INT_LITERAL",
            Self::FloatLiteral => "FLOAT_LITERAL",
            Self::Arrow => "ARROW",
            Self::Comma => "COMMA",
            Self::StringLiteral => "STRING_LITERAL",
            Self::Assign => "ASSIGN",
            Self::Error => "ERROR",
            Self::Comment => "COMMENT",
            Self::Eof => "EOF",
        };
        write!(f, "{name}")
    }
}

/// A lexical token with its source span.
///
/// Identifiers, literals and comments carry their text as payload. The span
/// ends just past the token's last character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind:    TokenKind,
    pub payload: Option<String>,
    pub span:    Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, payload: Option<String>, span: Span) -> Self {
        Self { kind,
               payload,
               span }
    }

    #[must_use]
    pub fn payload(&self) -> &str {
        self.payload.as_deref().unwrap_or_default()
    }

    /// Whether this is the identifier `name`.
    #[must_use]
    pub fn is_identifier(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.payload() == name
    }

    /// The binary operator this token spells, if any.
    #[must_use]
    pub const fn binary_operator(&self) -> Option<BinaryOperator> {
        match self.kind {
            TokenKind::Add => Some(BinaryOperator::Add),
            TokenKind::Sub => Some(BinaryOperator::Sub),
            TokenKind::Mult => Some(BinaryOperator::Mul),
            TokenKind::Div => Some(BinaryOperator::Div),
            TokenKind::Pow => Some(BinaryOperator::Pow),
            _ => None,
        }
    }

    /// How the token is usually written in source code. Used to quote the
    /// offending token in parse errors.
    ///
    /// # Example
    /// ```
    /// use seqcalc::lex;
    ///
    /// let spelled = lex("var x = \"hi\"").iter()
    ///                                   .map(|token| token.to_source_string())
    ///                                   .collect::<Vec<_>>();
    /// assert_eq!(spelled, ["var", "x", "=", "\"hi\"", "EOF"]);
    /// ```
    #[must_use]
    pub fn to_source_string(&self) -> String {
        let fixed = match self.kind {
            TokenKind::Identifier
            | TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::Comment => return self.payload().to_string(),
            TokenKind::StringLiteral => return format!("\"{}\"", self.payload()),
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mult => "*",
            TokenKind::Div => "/",
            TokenKind::Pow => "^",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Arrow => "->",
            TokenKind::Comma => ",",
            TokenKind::Assign => "=",
            TokenKind::Error => "<error>",
            TokenKind::Eof => "EOF",
        };
        fixed.to_string()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({payload})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl From<&Token> for Span {
    fn from(token: &Token) -> Self {
        token.span
    }
}

/// Pull-based lexer over a [`Scanner`].
///
/// Lexing never fails: malformed input is reported to the diagnostics and
/// replaced by a best-effort token, and the end of input is the
/// [`TokenKind::Eof`] token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    scanner:  Scanner<'a>,
    previous: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { scanner:  Scanner::new(source),
               previous: None, }
    }

    /// Lexes the next token.
    ///
    /// # Example
    /// ```
    /// use seqcalc::{
    ///     diagnostics::Diagnostics,
    ///     interpreter::lexer::{Lexer, TokenKind},
    /// };
    ///
    /// let mut diagnostics = Diagnostics::new();
    /// let mut lexer = Lexer::new("out 1.5");
    ///
    /// let kinds = std::iter::from_fn(|| {
    ///                 let token = lexer.next_token(&mut diagnostics);
    ///                 (token.kind != TokenKind::Eof).then_some(token.kind)
    ///             }).collect::<Vec<_>>();
    ///
    /// assert_eq!(kinds, [TokenKind::Identifier, TokenKind::FloatLiteral]);
    /// assert!(diagnostics.is_empty());
    /// ```
    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        let token = self.lex_token(diagnostics).unwrap_or_else(|EndOfInput| {
                                                   let at = self.scanner.location();
                                                   Token::new(TokenKind::Eof, None, at.into())
                                               });
        if token.kind != TokenKind::Comment {
            self.previous = Some(token.kind);
        }
        token
    }

    fn lex_token(&mut self, diagnostics: &mut Diagnostics) -> Result<Token, EndOfInput> {
        self.scanner.consume_while(char::is_whitespace);
        let start = self.scanner.location();

        let kind = match self.scanner.peek()? {
            'A'..='Z' | 'a'..='z' | '_' => return Ok(self.lex_identifier(start)),
            '0'..='9' | '.' => return Ok(self.lex_number(start, false, diagnostics)),
            '"' => return Ok(self.lex_string(start, diagnostics)),
            '#' => return Ok(self.lex_comment(start)),
            '-' => {
                self.scanner.consume()?;
                if self.scanner.consume_if(|c| c == '>').is_some() {
                    return Ok(self.token(TokenKind::Arrow, None, start));
                }
                let negative_literal = matches!(self.scanner.peek(), Ok('0'..='9' | '.'))
                                       && !self.previous.is_some_and(TokenKind::ends_operand);
                if negative_literal {
                    return Ok(self.lex_number(start, true, diagnostics));
                }
                return Ok(self.token(TokenKind::Sub, None, start));
            },
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '+' => TokenKind::Add,
            '*' => TokenKind::Mult,
            '/' => TokenKind::Div,
            '^' => TokenKind::Pow,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Assign,
            character => {
                self.scanner.consume()?;
                diagnostics.error((start, self.scanner.location()),
                                  LexError::InvalidCharacter { character });
                return Ok(self.token(TokenKind::Error, None, start));
            },
        };

        self.scanner.consume()?;
        Ok(self.token(kind, None, start))
    }

    fn token(&self, kind: TokenKind, payload: Option<String>, start: SourceLoc) -> Token {
        Token::new(kind, payload, Span::new(start, self.scanner.location()))
    }

    fn lex_identifier(&mut self, start: SourceLoc) -> Token {
        let mut name = String::new();
        while let Some(c) = self.scanner.consume_if(|c| c.is_ascii_alphanumeric() || c == '_') {
            name.push(c);
        }
        self.token(TokenKind::Identifier, Some(name), start)
    }

    /// Lexes `[0-9]*(\.[0-9]*)?`. The `-` of a negative literal has already
    /// been consumed.
    fn lex_number(&mut self, start: SourceLoc, negative: bool, diagnostics: &mut Diagnostics)
                  -> Token {
        let mut text = String::from(if negative { "-" } else { "" });
        let mut kind = TokenKind::IntLiteral;

        loop {
            if let Some(digit) = self.scanner.consume_if(|c| c.is_ascii_digit()) {
                text.push(digit);
                continue;
            }
            let dot = self.scanner.location();
            if self.scanner.consume_if(|c| c == '.').is_none() {
                break;
            }
            if kind == TokenKind::FloatLiteral {
                diagnostics.error((dot, self.scanner.location()), LexError::TwoDotsInNumber);
                self.scanner.consume_while(|c| c.is_ascii_digit() || c == '.');
                return self.token(TokenKind::Error, None, start);
            }
            kind = TokenKind::FloatLiteral;
            text.push('.');
        }

        if text == "." || text == "-." {
            diagnostics.error((start, self.scanner.location()), LexError::SingleDot);
            return self.token(TokenKind::Error, None, start);
        }
        self.token(kind, Some(text), start)
    }

    /// Lexes a string literal. Errors are reported but a string token with
    /// everything read so far is always returned.
    fn lex_string(&mut self, start: SourceLoc, diagnostics: &mut Diagnostics) -> Token {
        let mut text = String::new();
        self.scanner.consume_if(|c| c == '"');

        loop {
            let at = self.scanner.location();
            let Ok(c) = self.scanner.consume() else {
                diagnostics.error(start, LexError::EofInString);
                break;
            };
            match c {
                '"' => break,
                '\n' | '\r' => {
                    diagnostics.error(start, LexError::EolInString);
                    break;
                },
                '\\' => {
                    let Ok(escape) = self.scanner.consume() else {
                        diagnostics.error(start, LexError::EofInString);
                        break;
                    };
                    match unescape(escape) {
                        Some(unescaped) => text.push(unescaped),
                        None => {
                            diagnostics.error((at, self.scanner.location()),
                                              LexError::UnknownEscape { escape });
                        },
                    }
                },
                _ => text.push(c),
            }
        }

        self.token(TokenKind::StringLiteral, Some(text), start)
    }

    fn lex_comment(&mut self, start: SourceLoc) -> Token {
        let mut text = String::new();
        while let Some(c) = self.scanner.consume_if(|c| c != '\n' && c != '\r') {
            text.push(c);
        }
        self.token(TokenKind::Comment, Some(text), start)
    }
}

const fn unescape(escape: char) -> Option<char> {
    match escape {
        't' => Some('\t'),
        'b' => Some('\u{8}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        'f' => Some('\u{c}'),
        '\'' | '"' | '\\' => Some(escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;

    fn lex_all(source: &str) -> (Vec<Token>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token(&mut diagnostics);
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return (tokens, diagnostics);
            }
        }
    }

    fn rendered(source: &str) -> Vec<String> {
        lex_all(source).0.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn lexes_statement() {
        assert_eq!(rendered("var x_1 = {1, 2.5}"),
                   ["IDENTIFIER(var)",
                    "IDENTIFIER(x_1)",
                    "ASSIGN",
                    "L_BRACE",
                    "INT_LITERAL(1)",
                    "COMMA",
                    "FLOAT_LITERAL(2.5)",
                    "R_BRACE",
                    "EOF"]);
    }

    #[test]
    fn token_spans_end_past_last_character() {
        let (tokens, _) = lex_all("out 12\n  ->");
        assert_eq!(tokens[1].span,
                   Span::new(SourceLoc::new(1, 5), SourceLoc::new(1, 7)));
        assert_eq!(tokens[2].span,
                   Span::new(SourceLoc::new(2, 3), SourceLoc::new(2, 5)));
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn minus_depends_on_previous_token() {
        assert_eq!(rendered("5-3"), ["INT_LITERAL(5)", "SUB", "INT_LITERAL(3)", "EOF"]);
        assert_eq!(rendered("= -3"), ["ASSIGN", "INT_LITERAL(-3)", "EOF"]);
        assert_eq!(rendered("(-.5"), ["L_PAREN", "FLOAT_LITERAL(-.5)", "EOF"]);
        assert_eq!(rendered("x - y"),
                   ["IDENTIFIER(x)", "SUB", "IDENTIFIER(y)", "EOF"]);
        assert_eq!(rendered("2 * -x"), ["INT_LITERAL(2)", "MULT", "SUB", "IDENTIFIER(x)", "EOF"]);
    }

    #[test]
    fn second_dot_yields_error_token() {
        let (tokens, diagnostics) = lex_all("1.2.3 4");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[1].to_string(), "INT_LITERAL(4)");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.errors()[0].span.start, SourceLoc::new(1, 4));
        assert_eq!(diagnostics.errors()[0].error, Error::Lex(LexError::TwoDotsInNumber));
    }

    #[test]
    fn single_dot_is_no_number() {
        let (tokens, diagnostics) = lex_all(".");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(diagnostics.errors()[0].message(), "A single dot is no number literal");
    }

    #[test]
    fn string_escapes() {
        let (tokens, diagnostics) = lex_all(r#""a\tb\"c\\""#);
        assert_eq!(tokens[0].payload(), "a\tb\"c\\");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn bad_escape_keeps_rest_of_string() {
        let (tokens, diagnostics) = lex_all(r#""a\qb""#);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].payload(), "ab");
        assert_eq!(diagnostics.errors()[0].message(), "Unknown escape sequence '\\q'");
        assert_eq!(diagnostics.errors()[0].span.start, SourceLoc::new(1, 3));
    }

    #[test]
    fn unterminated_strings() {
        let (tokens, diagnostics) = lex_all("print \"abc\nout 1");
        assert_eq!(tokens[1].payload(), "abc");
        assert_eq!(tokens[2].to_string(), "IDENTIFIER(out)");
        assert_eq!(diagnostics.errors()[0].error, Error::Lex(LexError::EolInString));
        assert_eq!(diagnostics.errors()[0].span.start, SourceLoc::new(1, 7));

        let (tokens, diagnostics) = lex_all("\"abc");
        assert_eq!(tokens[0].payload(), "abc");
        assert_eq!(diagnostics.errors()[0].error, Error::Lex(LexError::EofInString));
    }

    #[test]
    fn comments_keep_raw_text() {
        let (tokens, diagnostics) = lex_all("out 1 # expectedError@5: oops\nout 2");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].payload(), "# expectedError@5: oops");
        assert_eq!(tokens[2].span.start, SourceLoc::new(1, 7));
        assert_eq!(tokens[3].to_string(), "IDENTIFIER(out)");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn invalid_character_is_reported_and_skipped() {
        let (tokens, diagnostics) = lex_all("out 1 $ 2");
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[3].to_string(), "INT_LITERAL(2)");
        assert_eq!(diagnostics.errors()[0].message(),
                   "'$' is an invalid character at this position");
    }

    #[test]
    fn eof_repeats() {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new("  ");
        assert_eq!(lexer.next_token(&mut diagnostics).kind, TokenKind::Eof);
        let again = lexer.next_token(&mut diagnostics);
        assert_eq!(again.kind, TokenKind::Eof);
        assert_eq!(again.span.start, SourceLoc::new(1, 3));
    }
}
