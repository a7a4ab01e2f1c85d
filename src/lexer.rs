use std::fmt::Display;

use enum_as_inner::EnumAsInner;

use crate::{
    diagnostic::{Diagnostic, LexErrorKind},
    driver::DriverError,
    make_diagnostic,
    tokens::{TokenGroup, TokenTable, TokenType},
    utils::string::{is_word_char, parse_integer_lexeme},
};

mod number;
mod quoted;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TokenPosition {
    pub line: usize,
    pub col: usize,
}

impl Display for TokenPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, EnumAsInner)]
pub enum Literal {
    Integer(i64),
    Real(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    /// Numeric value for integer classes and reals.
    pub value: Option<Literal>,
    pub pos: TokenPosition,
}

static EOF_TOKEN: Token = Token {
    token_type: TokenType::EOF,
    lexeme: String::new(),
    value: None,
    pos: TokenPosition { line: 0, col: 0 },
};

const OPERATOR_CHARS: &str = "!*/%+-<>=&|.";

pub(crate) struct Scanner<'a> {
    chars: Vec<char>,
    cursor: usize,
    line: usize,
    col: usize,
    table: &'a TokenTable,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Scanner<'a> {
    fn new(source: &str, table: &'a TokenTable) -> Self {
        Self {
            chars: source.chars().collect(),
            cursor: 0,
            line: 1,
            col: 1,
            table,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn pos(&self) -> TokenPosition {
        TokenPosition {
            line: self.line,
            col: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.cursor + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.cursor += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(&pred) {
            self.bump();
            count += 1;
        }
        count
    }

    fn text_from(&self, start: usize) -> String {
        self.chars[start..self.cursor].iter().collect()
    }

    /// Consumes an alphanumeric/underscore run stuck to the end of a number.
    fn eat_trailing_word(&mut self) -> bool {
        self.eat_while(is_word_char) > 0
    }

    fn push(&mut self, token_type: TokenType, start: usize, pos: TokenPosition) {
        self.push_value(token_type, start, pos, None);
    }

    fn push_value(
        &mut self,
        token_type: TokenType,
        start: usize,
        pos: TokenPosition,
        value: Option<Literal>,
    ) {
        self.tokens.push(Token {
            token_type,
            lexeme: self.text_from(start),
            value,
            pos,
        });
    }

    fn error(&mut self, kind: LexErrorKind, text: String, pos: TokenPosition) {
        self.diagnostics.push(make_diagnostic!(Lex(kind), text, pos));
    }

    fn run(&mut self) {
        while let Some(ch) = self.peek() {
            let start = self.cursor;
            let pos = self.pos();

            match ch {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '0'..='9' => self.scan_number(start, pos),
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.bump();
                    self.eat_while(|c| c.is_ascii_digit());
                    self.error(LexErrorKind::InvalidReal, self.text_from(start), pos);
                }
                c if c.is_alphabetic() || c == '_' => self.scan_word(start, pos),
                '/' if matches!(self.peek_at(1), Some('/' | '*')) => self.skip_comment(start, pos),
                c if OPERATOR_CHARS.contains(c) => self.scan_operator(start, pos),
                '\'' => self.scan_character(start, pos),
                '"' => self.scan_string(start, pos),
                c => {
                    self.bump();
                    match TokenTable::delimiter(c) {
                        Some(token_type) => self.push(token_type, start, pos),
                        None => self.error(
                            LexErrorKind::UnexpectedCharacter,
                            c.to_string(),
                            pos,
                        ),
                    }
                }
            }
        }
    }

    fn scan_word(&mut self, start: usize, pos: TokenPosition) {
        self.eat_while(is_word_char);
        let word = self.text_from(start);
        let token_type = self.table.keyword(&word).unwrap_or(TokenType::Id);
        self.push(token_type, start, pos);
    }

    fn scan_operator(&mut self, start: usize, pos: TokenPosition) {
        self.eat_while(|c| OPERATOR_CHARS.contains(c));
        let spelling = self.text_from(start);
        match self.table.operator(&spelling) {
            Some(token_type) => self.push(token_type, start, pos),
            None => self.error(LexErrorKind::InvalidOperator, spelling, pos),
        }
    }
}

/// Scans the whole source. Malformed lexemes are reported and dropped, so the
/// returned stream only ever holds well-formed tokens.
pub fn tokenize(source: &str, table: &TokenTable) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut scanner = Scanner::new(source, table);
    scanner.run();
    (scanner.tokens, scanner.diagnostics)
}

/// Renders tokens in the `<lexeme>\t\t<code>` listing form.
pub fn tokens_listing(tokens: &[Token], table: &TokenTable) -> String {
    tokens
        .iter()
        .map(|token| match table.code(token.token_type) {
            Some(code) => format!("{}\t\t{}\n", token.lexeme, code),
            None => format!("{}\t\tUNKNOWN\n", token.lexeme),
        })
        .collect()
}

/// Reads a token listing back. Each token is positioned at its listing line.
pub fn read_tokens_listing(text: &str, table: &TokenTable) -> Result<Vec<Token>, DriverError> {
    let mut tokens = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let bad_line = |reason: &str| DriverError::Listing {
            line: line_no,
            reason: reason.to_owned(),
        };

        let (lexeme, code) = line
            .rsplit_once("\t\t")
            .ok_or_else(|| bad_line("expected '<lexeme>\\t\\t<code>'"))?;

        let token_type = match code.trim() {
            "UNKNOWN" => lexeme
                .chars()
                .next()
                .and_then(TokenTable::delimiter)
                .or_else(|| table.operator(lexeme))
                .ok_or_else(|| bad_line("unknown token without a code"))?,
            code => {
                let code = code
                    .parse::<u32>()
                    .map_err(|_| bad_line("category code is not a number"))?;
                table
                    .by_code(code)
                    .ok_or_else(|| bad_line("category code is not in the token table"))?
            }
        };

        let value = if token_type.is_integer_class() {
            let value = parse_integer_lexeme(lexeme, token_type)
                .ok_or_else(|| bad_line("malformed integer literal"))?;
            Some(Literal::Integer(value))
        } else if token_type == TokenType::Real {
            let value = lexeme
                .parse::<f64>()
                .map_err(|_| bad_line("malformed real literal"))?;
            Some(Literal::Real(value))
        } else {
            None
        };

        if token_type.group() == Some(TokenGroup::Keyword) && table.keyword(lexeme) != Some(token_type)
        {
            return Err(bad_line("keyword code does not match the lexeme"));
        }

        tokens.push(Token {
            token_type,
            lexeme: lexeme.to_owned(),
            value,
            pos: TokenPosition {
                line: line_no,
                col: 1,
            },
        });
    }

    Ok(tokens)
}

#[derive(Debug, Clone)]
pub struct TokenIter<'a> {
    buffer: &'a [Token],
    pos: usize,
}

impl<'a> TokenIter<'a> {
    pub fn new(buffer: &'a [Token]) -> Self {
        Self { buffer, pos: 0 }
    }

    pub fn advance(&mut self) {
        if self.pos < self.buffer.len() {
            self.pos += 1;
        }
    }

    /// The current token, or a synthesized `EOF` past the end.
    pub fn peek(&self) -> &'a Token {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> &'a Token {
        self.buffer.get(self.pos + n).unwrap_or(&EOF_TOKEN)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &'a Token {
        let token = self.peek();
        self.advance();
        token
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.buffer.len()
    }

    /// Position for diagnostics at the current token; past the end it is the
    /// position of the last token.
    pub fn current_pos(&self) -> TokenPosition {
        match self.buffer.get(self.pos) {
            Some(token) => token.pos,
            None => self.buffer.last().map_or(TokenPosition::default(), |t| t.pos),
        }
    }
}
