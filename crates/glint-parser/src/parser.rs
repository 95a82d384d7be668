//! Recursive-descent parser with explicit precedence climbing.
//!
//! Grammar (left-associative, `+ -` binding looser than `* /`):
//!
//! ```text
//! program     := shader_decl*
//! shader_decl := 'shader' ('vertex'|'fragment') '{' shader_body '}'
//! shader_body := ( 'input' var_decl | 'output' var_decl | main_block )*
//! main_block  := 'main' '{' statement* '}'
//! statement   := primary '=' expression ';'
//! expression  := term (('+'|'-') term)*
//! term        := factor (('*'|'/') factor)*
//! factor      := primary
//! primary     := number | type '(' args ')' | identifier ('.' identifier | '(' args ')')?
//!              | '(' expression ')'
//! ```
//!
//! No recovery: the first error terminates parsing. No semantic checks
//! happen here beyond what the tree invariants require (one declaration per
//! stage, unique input/output names, lvalue assignment targets).

use glint_ast::{BinOp, Expr, Program, ShaderDecl, Stage, Stmt, VarDecl};
use thiserror::Error;

use crate::lexer::{Token, TokenKind};

/// A syntax error: what was expected, and where.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl SyntaxError {
    fn at(token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            column: token.column,
        }
    }
}

/// Parses a lexer token sequence into a [`Program`].
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Takes ownership of the token sequence. A missing terminal `Eof`
    /// token is supplied, so hand-built sequences are accepted too.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map_or((1, 1), |t| (t.line, t.column + t.lexeme.len() as u32));
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                line,
                column,
            });
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parse shader declarations until end of input.
    pub fn parse(mut self) -> Result<Program, SyntaxError> {
        let mut program = Program::default();
        while !self.check(TokenKind::Eof) {
            let decl = self.parse_shader_decl(&program)?;
            program.shaders.push(decl);
        }
        Ok(program)
    }

    fn parse_shader_decl(&mut self, program: &Program) -> Result<ShaderDecl, SyntaxError> {
        self.expect(TokenKind::Shader, "expected 'shader' declaration")?;

        let stage_token = self.current().clone();
        let stage = match stage_token.kind {
            TokenKind::Vertex => Stage::Vertex,
            TokenKind::Fragment => Stage::Fragment,
            _ => {
                return Err(SyntaxError::at(
                    &stage_token,
                    "expected 'vertex' or 'fragment' after 'shader'",
                ));
            }
        };
        self.advance();
        if program.shader(stage).is_some() {
            return Err(SyntaxError::at(
                &stage_token,
                format!("duplicate '{stage}' shader declaration"),
            ));
        }

        self.expect(TokenKind::LBrace, "expected '{' after shader stage")?;

        let mut decl = ShaderDecl::new(stage);
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            match self.current().kind {
                TokenKind::Input => {
                    self.advance();
                    let var = self.parse_var_decl(&decl)?;
                    decl.inputs.push(var);
                }
                TokenKind::Output => {
                    self.advance();
                    let var = self.parse_var_decl(&decl)?;
                    decl.outputs.push(var);
                }
                TokenKind::Main => {
                    self.advance();
                    self.expect(TokenKind::LBrace, "expected '{' after 'main'")?;
                    while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
                        decl.statements.push(self.parse_statement()?);
                    }
                    self.expect(TokenKind::RBrace, "expected '}' after main block")?;
                }
                _ => {
                    let token = self.current();
                    return Err(SyntaxError::at(
                        token,
                        format!("unexpected {} in shader body", describe(token)),
                    ));
                }
            }
        }

        self.expect(TokenKind::RBrace, "expected '}' at end of shader declaration")?;
        Ok(decl)
    }

    /// `type identifier ';'` after an `input` or `output` keyword. The name
    /// must be unique across both lists of the enclosing declaration.
    fn parse_var_decl(&mut self, decl: &ShaderDecl) -> Result<VarDecl, SyntaxError> {
        let ty = self.parse_type()?;

        let name_token = self.current().clone();
        if name_token.kind != TokenKind::Identifier {
            return Err(SyntaxError::at(&name_token, "expected identifier after type"));
        }
        if decl.declares(&name_token.lexeme) {
            return Err(SyntaxError::at(
                &name_token,
                format!("duplicate input/output name '{}'", name_token.lexeme),
            ));
        }
        self.advance();

        self.expect(TokenKind::Semicolon, "expected ';' after variable declaration")?;
        Ok(VarDecl {
            ty,
            name: name_token.lexeme,
        })
    }

    fn parse_type(&mut self) -> Result<String, SyntaxError> {
        let token = self.current().clone();
        if !token.kind.is_type() {
            return Err(SyntaxError::at(&token, "expected type specifier"));
        }
        self.advance();
        Ok(token.lexeme)
    }

    fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let target_token = self.current().clone();
        let target = self.parse_primary()?;
        if target.base_name().is_none() {
            return Err(SyntaxError::at(
                &target_token,
                "expected assignment target (identifier or member access)",
            ));
        }

        self.expect(TokenKind::Assign, "expected '=' in assignment")?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after statement")?;

        Ok(Stmt::Assign { target, value })
    }

    fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // Factor coincides with primary; the language has no unary operators.
    fn parse_factor(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Literal(token.lexeme))
            }

            // Type names used as constructors must be called.
            kind if kind.is_type() => {
                self.advance();
                if self.check(TokenKind::LParen) {
                    self.parse_call(token.lexeme)
                } else {
                    Err(SyntaxError::at(
                        self.current(),
                        format!("expected '(' after type constructor '{}'", token.lexeme),
                    ))
                }
            }

            TokenKind::Identifier => {
                self.advance();
                if self.check(TokenKind::Dot) {
                    self.advance();
                    let member = self.current().clone();
                    if member.kind != TokenKind::Identifier {
                        return Err(SyntaxError::at(&member, "expected member name after '.'"));
                    }
                    self.advance();
                    Ok(Expr::Member {
                        object: Box::new(Expr::Identifier(token.lexeme)),
                        member: member.lexeme,
                    })
                } else if self.check(TokenKind::LParen) {
                    self.parse_call(token.lexeme)
                } else {
                    Ok(Expr::Identifier(token.lexeme))
                }
            }

            // Parentheses group without creating a node.
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "expected ')' after expression")?;
                Ok(expr)
            }

            _ => Err(SyntaxError::at(
                &token,
                format!("unexpected {} in expression", describe(&token)),
            )),
        }
    }

    fn parse_call(&mut self, function: String) -> Result<Expr, SyntaxError> {
        self.expect(TokenKind::LParen, "expected '(' after function name")?;

        let mut arguments = Vec::new();
        if !self.check(TokenKind::RParen) {
            arguments.push(self.parse_expression()?);
            while self.check(TokenKind::Comma) {
                self.advance();
                arguments.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::RParen, "expected ')' after function arguments")?;
        Ok(Expr::Call {
            function,
            arguments,
        })
    }

    fn current(&self) -> &Token {
        // `new` guarantees a terminal Eof and `advance` never passes it.
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<(), SyntaxError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            let token = self.current();
            Err(SyntaxError::at(
                token,
                format!("{message} (got {})", describe(token)),
            ))
        }
    }
}

fn describe(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        "end of input".to_owned()
    } else {
        format!("'{}'", token.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(source: &str) -> Result<Program, SyntaxError> {
        Parser::new(tokenize(source).expect("should tokenize")).parse()
    }

    fn parse_value(source: &str) -> Expr {
        // Wraps an expression in a minimal program and digs it back out.
        let program = parse(&format!(
            "shader vertex {{ main {{ x = {source}; }} }}"
        ))
        .expect("should parse");
        let Stmt::Assign { value, .. } = program.shaders[0].statements[0].clone();
        value
    }

    #[test]
    fn empty_program() {
        let program = parse("").unwrap();
        assert!(program.shaders.is_empty());
    }

    #[test]
    fn full_shader_declaration() {
        let program = parse(
            "shader vertex {\
               input vec3 position;\
               input vec3 normal;\
               output vec3 fragColor;\
               main { gl_Position = vec4(position, 1.0); }\
             }",
        )
        .unwrap();

        assert_eq!(program.shaders.len(), 1);
        let shader = &program.shaders[0];
        assert_eq!(shader.stage, Stage::Vertex);
        assert_eq!(shader.inputs.len(), 2);
        assert_eq!(shader.inputs[0].ty, "vec3");
        assert_eq!(shader.inputs[0].name, "position");
        assert_eq!(shader.outputs.len(), 1);
        assert_eq!(shader.statements.len(), 1);
    }

    #[test]
    fn both_stages_in_one_source() {
        let program = parse(
            "shader vertex { main { gl_Position = vec4(0, 0, 0, 1); } }\
             shader fragment { output vec4 color; main { color = vec4(1, 1, 1, 1); } }",
        )
        .unwrap();
        assert!(program.shader(Stage::Vertex).is_some());
        assert!(program.shader(Stage::Fragment).is_some());
    }

    #[test]
    fn precedence_multiplication_binds_tighter() {
        // a + b * c parses as a + (b * c).
        let value = parse_value("a + b * c");
        let Expr::Binary { op, left, right } = value else {
            panic!("expected Binary, got something else");
        };
        assert_eq!(op, BinOp::Add);
        assert_eq!(*left, Expr::Identifier("a".into()));
        assert!(matches!(*right, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn operators_are_left_associative() {
        // a - b - c parses as (a - b) - c.
        let value = parse_value("a - b - c");
        let Expr::Binary { op, left, right } = value else {
            panic!("expected Binary");
        };
        assert_eq!(op, BinOp::Sub);
        assert!(matches!(*left, Expr::Binary { op: BinOp::Sub, .. }));
        assert_eq!(*right, Expr::Identifier("c".into()));
    }

    #[test]
    fn parentheses_group_without_a_node() {
        // (a + b) * c puts the addition on the left of the multiply;
        // the parentheses themselves leave no trace.
        let value = parse_value("(a + b) * c");
        let Expr::Binary { op, left, .. } = value else {
            panic!("expected Binary");
        };
        assert_eq!(op, BinOp::Mul);
        assert!(matches!(*left, Expr::Binary { op: BinOp::Add, .. }));

        assert_eq!(parse_value("(((a)))"), Expr::Identifier("a".into()));
    }

    #[test]
    fn member_access_and_calls() {
        assert_eq!(
            parse_value("position.xyz"),
            Expr::Member {
                object: Box::new(Expr::Identifier("position".into())),
                member: "xyz".into(),
            }
        );
        assert_eq!(
            parse_value("vec3(1, 0, 0)"),
            Expr::Call {
                function: "vec3".into(),
                arguments: vec![
                    Expr::Literal("1".into()),
                    Expr::Literal("0".into()),
                    Expr::Literal("0".into()),
                ],
            }
        );
        assert_eq!(
            parse_value("normalize(n)"),
            Expr::Call {
                function: "normalize".into(),
                arguments: vec![Expr::Identifier("n".into())],
            }
        );
        assert_eq!(
            parse_value("foo()"),
            Expr::Call {
                function: "foo".into(),
                arguments: vec![],
            }
        );
    }

    #[test]
    fn member_access_as_assignment_target() {
        let program =
            parse("shader vertex { main { gl_Position.x = 1.0; } }").unwrap();
        let Stmt::Assign { target, .. } = program.shaders[0].statements[0].clone();
        assert_eq!(target.base_name(), Some("gl_Position"));
    }

    #[test]
    fn literal_lexeme_is_preserved() {
        assert_eq!(parse_value("1.0"), Expr::Literal("1.0".into()));
        assert_eq!(parse_value(".5"), Expr::Literal(".5".into()));
    }

    #[test]
    fn error_on_missing_semicolon() {
        let err = parse("shader vertex { main { x = 1.0 } }").unwrap_err();
        assert!(err.message.contains("expected ';' after statement"));
    }

    #[test]
    fn error_on_bad_stage() {
        let err = parse("shader compute { }").unwrap_err();
        assert!(err.message.contains("'vertex' or 'fragment'"));
    }

    #[test]
    fn error_on_duplicate_stage() {
        let err = parse("shader vertex { } shader vertex { }").unwrap_err();
        assert!(err.message.contains("duplicate 'vertex'"));
    }

    #[test]
    fn error_on_duplicate_io_name() {
        let err =
            parse("shader vertex { input vec3 position; output vec3 position; }").unwrap_err();
        assert!(err.message.contains("duplicate input/output name 'position'"));
    }

    #[test]
    fn error_on_non_lvalue_target() {
        let err = parse("shader vertex { main { 1.0 = x; } }").unwrap_err();
        assert!(err.message.contains("assignment target"));
    }

    #[test]
    fn error_on_uniform_in_body() {
        // `uniform` is lexed as a keyword but has no grammar production.
        let err = parse("shader vertex { uniform mat4 mvp; }").unwrap_err();
        assert!(err.message.contains("unexpected 'uniform'"));
    }

    #[test]
    fn error_on_bare_type_constructor() {
        let err = parse("shader vertex { main { x = vec3; } }").unwrap_err();
        assert!(err.message.contains("expected '(' after type constructor 'vec3'"));
    }

    #[test]
    fn error_positions_point_at_the_offending_token() {
        let err = parse("shader vertex {\n  banana\n}").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
    }

    #[test]
    fn error_at_end_of_input() {
        let err = parse("shader vertex { main {").unwrap_err();
        assert!(err.message.contains("end of input"));
    }
}
