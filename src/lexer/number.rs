use crate::{
    diagnostic::LexErrorKind,
    lexer::{Literal, Scanner, TokenPosition},
    tokens::TokenType,
    utils::string::parse_integer_lexeme,
};

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

impl Scanner<'_> {
    pub(super) fn scan_number(&mut self, start: usize, pos: TokenPosition) {
        if self.peek() == Some('0') {
            match self.peek_at(1) {
                Some('x' | 'X') => return self.scan_hex(start, pos),
                Some('.') => {
                    self.bump();
                    return self.scan_real(start, pos);
                }
                Some(c) if is_digit(c) => {
                    self.bump();
                    self.eat_while(is_digit);
                    if matches!(self.peek(), Some('.' | 'e' | 'E')) {
                        return self.scan_real(start, pos);
                    }
                    return self.finish_octal(start, pos);
                }
                _ => {}
            }
        }

        self.eat_while(is_digit);
        if matches!(self.peek(), Some('.' | 'e' | 'E')) {
            self.scan_real(start, pos);
        } else {
            self.finish_decimal(start, pos);
        }
    }

    fn scan_hex(&mut self, start: usize, pos: TokenPosition) {
        self.bump();
        self.bump();
        let mut valid = true;

        if self.eat_while(|c| c.is_ascii_hexdigit()) == 0 {
            self.error(LexErrorKind::InvalidHex, self.text_from(start), pos);
            valid = false;
        }
        if self.eat_trailing_word() {
            self.error(LexErrorKind::InvalidHexFormat, self.text_from(start), pos);
            valid = false;
        }

        if valid {
            self.push_integer(TokenType::Hex, start, pos);
        }
    }

    /// The digit run starting with `0` has already been consumed.
    fn finish_octal(&mut self, start: usize, pos: TokenPosition) {
        let digits = self.text_from(start);
        let mut valid = true;

        if digits.contains(['8', '9']) || digits.starts_with("00") {
            self.error(LexErrorKind::InvalidOctal, digits, pos);
            valid = false;
        }
        if self.eat_trailing_word() {
            self.error(LexErrorKind::InvalidOctalFormat, self.text_from(start), pos);
            valid = false;
        }

        if valid {
            self.push_integer(TokenType::Octal, start, pos);
        }
    }

    fn finish_decimal(&mut self, start: usize, pos: TokenPosition) {
        let digits = self.text_from(start);
        let mut valid = true;

        if digits.len() > 1 && digits.starts_with('0') {
            self.error(LexErrorKind::InvalidDecimal, digits, pos);
            valid = false;
        }
        if self.eat_trailing_word() {
            self.error(LexErrorKind::InvalidDecimalFormat, self.text_from(start), pos);
            valid = false;
        }

        if valid {
            self.push_integer(TokenType::Integer, start, pos);
        }
    }

    fn push_integer(&mut self, token_type: TokenType, start: usize, pos: TokenPosition) {
        let lexeme = self.text_from(start);
        match parse_integer_lexeme(&lexeme, token_type) {
            Some(value) => self.push_value(token_type, start, pos, Some(Literal::Integer(value))),
            None => self.error(LexErrorKind::IntegerOutOfRange, lexeme, pos),
        }
    }

    /// Continues a real after its integer part: an optional fraction, an
    /// optional exponent, and nothing word-like after that.
    fn scan_real(&mut self, start: usize, pos: TokenPosition) {
        let mut valid = true;

        if self.peek() == Some('.') {
            self.bump();
            if self.eat_while(is_digit) == 0 {
                valid = false;
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.eat_while(is_digit) == 0 {
                valid = false;
            }
        }

        if self.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '.') > 0 {
            valid = false;
        }

        let lexeme = self.text_from(start);
        match lexeme.parse::<f64>() {
            Ok(value) if valid => {
                self.push_value(TokenType::Real, start, pos, Some(Literal::Real(value)))
            }
            _ => self.error(LexErrorKind::InvalidReal, lexeme, pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        diagnostic::{DiagnosticKind, LexErrorKind},
        lexer::{Literal, tokenize},
        tokens::{TokenTable, TokenType},
    };

    fn lex_errors(src: &str) -> Vec<LexErrorKind> {
        let (_, diagnostics) = tokenize(src, &TokenTable::default());
        diagnostics
            .into_iter()
            .map(|d| match d.kind {
                DiagnosticKind::Lex(kind) => kind,
                other => panic!("unexpected diagnostic {other:?}"),
            })
            .collect()
    }

    #[test]
    fn standalone_zero_is_decimal() {
        let (tokens, diagnostics) = tokenize("0;", &TokenTable::default());
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].token_type, TokenType::Integer);
        assert_eq!(tokens[0].value, Some(Literal::Integer(0)));
    }

    #[test]
    fn hex_without_digits_and_with_tail() {
        assert_eq!(lex_errors("0x"), vec![LexErrorKind::InvalidHex]);
        assert_eq!(lex_errors("0x1g"), vec![LexErrorKind::InvalidHexFormat]);
        assert_eq!(
            lex_errors("0xz"),
            vec![LexErrorKind::InvalidHex, LexErrorKind::InvalidHexFormat]
        );
    }

    #[test]
    fn octal_rules() {
        assert_eq!(lex_errors("089"), vec![LexErrorKind::InvalidOctal]);
        assert_eq!(lex_errors("007"), vec![LexErrorKind::InvalidOctal]);
        assert_eq!(lex_errors("017abc"), vec![LexErrorKind::InvalidOctalFormat]);

        let (tokens, _) = tokenize("017", &TokenTable::default());
        assert_eq!(tokens[0].value, Some(Literal::Integer(15)));
    }

    #[test]
    fn zero_prefixed_run_becomes_real() {
        let (tokens, diagnostics) = tokenize("012.5", &TokenTable::default());
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].token_type, TokenType::Real);
        assert_eq!(tokens[0].value, Some(Literal::Real(12.5)));
    }

    #[test]
    fn real_rules() {
        assert_eq!(lex_errors("1."), vec![LexErrorKind::InvalidReal]);
        assert_eq!(lex_errors("0.x"), vec![LexErrorKind::InvalidReal]);
        assert_eq!(lex_errors("1e"), vec![LexErrorKind::InvalidReal]);
        assert_eq!(lex_errors("1.5.2"), vec![LexErrorKind::InvalidReal]);
        assert_eq!(lex_errors("2.5f"), vec![LexErrorKind::InvalidReal]);
        assert!(lex_errors("1.5e+3 2E-2 7e1").is_empty());
    }

    #[test]
    fn decimal_with_letters() {
        assert_eq!(lex_errors("12ab"), vec![LexErrorKind::InvalidDecimalFormat]);
        assert_eq!(lex_errors("0abc"), vec![LexErrorKind::InvalidDecimalFormat]);
    }

    #[test]
    fn integer_overflow() {
        assert_eq!(
            lex_errors("99999999999999999999"),
            vec![LexErrorKind::IntegerOutOfRange]
        );
        assert_eq!(
            lex_errors("0xFFFFFFFFFFFFFFFFFF"),
            vec![LexErrorKind::IntegerOutOfRange]
        );
    }
}
