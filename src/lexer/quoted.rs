use crate::{
    diagnostic::LexErrorKind,
    lexer::{Scanner, TokenPosition},
    tokens::TokenType,
};

const ESCAPES: &str = "tnr\\'\"";

impl Scanner<'_> {
    pub(super) fn skip_comment(&mut self, start: usize, pos: TokenPosition) {
        self.bump();
        if self.bump() == Some('/') {
            self.eat_while(|c| c != '\n');
            return;
        }

        loop {
            match (self.peek(), self.peek_at(1)) {
                (None, _) => {
                    self.error(LexErrorKind::InvalidComment, self.text_from(start), pos);
                    return;
                }
                (Some('*'), Some('/')) => {
                    self.bump();
                    self.bump();
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// A character literal holds exactly one character or one escape pair.
    /// Whitespace inside the quotes ends the literal with an error and is left
    /// for the main loop.
    pub(super) fn scan_character(&mut self, start: usize, pos: TokenPosition) {
        self.bump();
        let mut escaped = false;

        loop {
            match self.peek() {
                Some('\'') => break,
                None => {
                    self.error(LexErrorKind::InvalidCharacter, self.text_from(start), pos);
                    return;
                }
                Some(c) if c.is_whitespace() => {
                    self.error(LexErrorKind::InvalidCharacter, self.text_from(start), pos);
                    return;
                }
                Some('\\') if self.peek_at(1).is_some_and(|c| ESCAPES.contains(c)) => {
                    escaped = true;
                    self.bump();
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.bump();

        let expected = if escaped { 4 } else { 3 };
        if self.cursor - start == expected {
            self.push(TokenType::Character, start, pos);
        } else {
            self.error(LexErrorKind::InvalidCharacter, self.text_from(start), pos);
        }
    }

    pub(super) fn scan_string(&mut self, start: usize, pos: TokenPosition) {
        self.bump();

        loop {
            match self.peek() {
                Some('"') => break,
                None | Some('\n') => {
                    self.error(LexErrorKind::InvalidString, self.text_from(start), pos);
                    return;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.bump();
        self.push(TokenType::String, start, pos);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        diagnostic::{DiagnosticKind, LexErrorKind},
        lexer::tokenize,
        tokens::{TokenTable, TokenType},
    };

    fn kinds(src: &str) -> (Vec<TokenType>, Vec<DiagnosticKind>) {
        let (tokens, diagnostics) = tokenize(src, &TokenTable::default());
        (
            tokens.into_iter().map(|t| t.token_type).collect(),
            diagnostics.into_iter().map(|d| d.kind).collect(),
        )
    }

    #[test]
    fn character_literals() {
        assert_eq!(kinds("'a'").0, vec![TokenType::Character]);
        assert_eq!(kinds("'\\n'").0, vec![TokenType::Character]);
        assert_eq!(kinds("'\\''").0, vec![TokenType::Character]);

        let (tokens, diagnostics) = kinds("'ab'");
        assert!(tokens.is_empty());
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::Lex(LexErrorKind::InvalidCharacter)]
        );
    }

    #[test]
    fn character_with_space_restarts_scanning() {
        let (tokens, diagnostics) = kinds("' x");
        assert_eq!(tokens, vec![TokenType::Id]);
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::Lex(LexErrorKind::InvalidCharacter)]
        );
    }

    #[test]
    fn unterminated_string_and_comment() {
        let (tokens, diagnostics) = kinds("\"abc\nx");
        assert_eq!(tokens, vec![TokenType::Id]);
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::Lex(LexErrorKind::InvalidString)]
        );

        let (tokens, diagnostics) = kinds("x /* never closed");
        assert_eq!(tokens, vec![TokenType::Id]);
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::Lex(LexErrorKind::InvalidComment)]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let (tokens, diagnostics) = kinds("a // b c\n/* d\n e */ f");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens, vec![TokenType::Id, TokenType::Id]);
    }
}
