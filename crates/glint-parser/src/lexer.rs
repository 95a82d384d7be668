//! Shader DSL lexer.
//!
//! Converts source text into a flat token sequence in strict source order.
//! Positions are 1-based line/column pairs and are the compiler's only
//! diagnostic surface.

use thiserror::Error;

/// Token kinds produced by the lexer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    // Keywords
    Shader,
    Vertex,
    Fragment,
    Input,
    Output,
    Uniform,
    Main,

    // Type names (also usable as constructor calls)
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    Float,
    Int,

    // Atoms
    Identifier,
    Number,

    // Punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,

    /// End of input; emitted exactly once, as the final token.
    Eof,
}

impl TokenKind {
    /// True for the six type-name keywords.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Vec2 | Self::Vec3 | Self::Vec4 | Self::Mat4 | Self::Float | Self::Int
        )
    }

    fn keyword(lexeme: &str) -> Option<Self> {
        match lexeme {
            "shader" => Some(Self::Shader),
            "vertex" => Some(Self::Vertex),
            "fragment" => Some(Self::Fragment),
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            "uniform" => Some(Self::Uniform),
            "main" => Some(Self::Main),
            "vec2" => Some(Self::Vec2),
            "vec3" => Some(Self::Vec3),
            "vec4" => Some(Self::Vec4),
            "mat4" => Some(Self::Mat4),
            "float" => Some(Self::Float),
            "int" => Some(Self::Int),
            _ => None,
        }
    }
}

/// A token: kind, original text, and the position of its first character.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

/// A character no token can start with.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("unexpected character '{ch}' at line {line}, column {column}")]
pub struct LexError {
    pub ch: char,
    pub line: u32,
    pub column: u32,
}

/// Tokenize a source buffer.
///
/// The result is never empty: it always ends with exactly one [`TokenKind::Eof`]
/// token carrying the position just past the last character.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(byte) = self.current() else { break };

            // Line comment, discarded to end of line.
            if byte == b'/' && self.peek() == Some(b'/') {
                self.skip_comment();
                continue;
            }

            if byte.is_ascii_digit() || (byte == b'.' && self.peek().is_some_and(|b| b.is_ascii_digit())) {
                tokens.push(self.read_number());
                continue;
            }

            if byte.is_ascii_alphabetic() || byte == b'_' {
                tokens.push(self.read_identifier());
                continue;
            }

            let kind = match byte {
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Star,
                b'/' => TokenKind::Slash,
                b'=' => TokenKind::Assign,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'{' => TokenKind::LBrace,
                b'}' => TokenKind::RBrace,
                b';' => TokenKind::Semicolon,
                b',' => TokenKind::Comma,
                b'.' => TokenKind::Dot,
                _ => {
                    return Err(LexError {
                        ch: self.source[self.pos..].chars().next().unwrap_or('\u{fffd}'),
                        line: self.line,
                        column: self.column,
                    });
                }
            };
            tokens.push(Token {
                kind,
                lexeme: (byte as char).to_string(),
                line: self.line,
                column: self.column,
            });
            self.advance();
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: self.line,
            column: self.column,
        });
        Ok(tokens)
    }

    fn current(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if let Some(byte) = self.current() {
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        // The two slashes, then everything up to (not including) the newline.
        while self.current().is_some_and(|b| b != b'\n') {
            self.advance();
        }
    }

    /// Greedily consumes digits and at most one '.'. No numeric
    /// interpretation happens here; the lexeme keeps the textual run.
    fn read_number(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let start = self.pos;
        let mut has_decimal = false;

        while let Some(byte) = self.current() {
            if byte.is_ascii_digit() {
                self.advance();
            } else if byte == b'.' && !has_decimal {
                has_decimal = true;
                self.advance();
            } else {
                break;
            }
        }

        Token {
            kind: TokenKind::Number,
            lexeme: self.source[start..self.pos].to_owned(),
            line,
            column,
        }
    }

    fn read_identifier(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let start = self.pos;

        while self
            .current()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.advance();
        }

        let lexeme = &self.source[start..self.pos];
        Token {
            kind: TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier),
            lexeme: lexeme.to_owned(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_source_yields_eof_only() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }

    #[test]
    fn keywords_and_types() {
        assert_eq!(
            kinds("shader vertex fragment input output uniform main"),
            vec![
                TokenKind::Shader,
                TokenKind::Vertex,
                TokenKind::Fragment,
                TokenKind::Input,
                TokenKind::Output,
                TokenKind::Uniform,
                TokenKind::Main,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("vec2 vec3 vec4 mat4 float int"),
            vec![
                TokenKind::Vec2,
                TokenKind::Vec3,
                TokenKind::Vec4,
                TokenKind::Mat4,
                TokenKind::Float,
                TokenKind::Int,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn identifiers_keep_their_text() {
        let tokens = tokenize("gl_Position _tmp color2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "gl_Position");
        assert_eq!(tokens[1].lexeme, "_tmp");
        assert_eq!(tokens[2].lexeme, "color2");
    }

    #[test]
    fn numbers_take_at_most_one_decimal_point() {
        let tokens = tokenize("42 3.14 .5 1.").unwrap();
        let lexemes: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(lexemes, vec!["42", "3.14", ".5", "1."]);
    }

    #[test]
    fn dotted_number_splits_at_second_dot() {
        // "1.2.3" lexes as the number "1.2" followed by ".3".
        let tokens = tokenize("1.2.3").unwrap();
        assert_eq!(tokens[0].lexeme, "1.2");
        assert_eq!(tokens[1].lexeme, ".3");
    }

    #[test]
    fn member_access_dot_is_punctuation() {
        assert_eq!(
            kinds("position.xyz"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn punctuation_set() {
        assert_eq!(
            kinds("+ - * / = ( ) { } ; , ."),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Assign,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_discarded() {
        let tokens = tokenize("a // comment with = ; tokens\nb").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].lexeme, "a");
        assert_eq!(tokens[1].lexeme, "b");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn comment_at_end_of_input() {
        let tokens = tokenize("x // trailing").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn slash_alone_is_division() {
        assert_eq!(
            kinds("a / b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = tokenize("ab cd\n  ef").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 4));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
    }

    #[test]
    fn unexpected_character_reports_position() {
        let err = tokenize("x = @").unwrap_err();
        assert_eq!(err.ch, '@');
        assert_eq!((err.line, err.column), (1, 5));
        assert!(err.to_string().contains("'@'"));
    }

    #[test]
    fn is_type_covers_the_six_types() {
        for kind in [
            TokenKind::Vec2,
            TokenKind::Vec3,
            TokenKind::Vec4,
            TokenKind::Mat4,
            TokenKind::Float,
            TokenKind::Int,
        ] {
            assert!(kind.is_type());
        }
        assert!(!TokenKind::Identifier.is_type());
        assert!(!TokenKind::Shader.is_type());
    }
}
