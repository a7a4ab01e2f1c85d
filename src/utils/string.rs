use crate::tokens::TokenType;

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Converts a decimal, octal (`017`) or hexadecimal (`0x1F`) lexeme to its
/// value. `None` if the digits do not fit in an `i64` or are malformed.
pub fn parse_integer_lexeme(lexeme: &str, token_type: TokenType) -> Option<i64> {
    match token_type {
        TokenType::Hex => {
            let digits = lexeme
                .strip_prefix("0x")
                .or_else(|| lexeme.strip_prefix("0X"))?;
            i64::from_str_radix(digits, 16).ok()
        }
        TokenType::Octal => i64::from_str_radix(lexeme.strip_prefix('0')?, 8).ok(),
        TokenType::Integer => lexeme.parse().ok(),
        _ => None,
    }
}
