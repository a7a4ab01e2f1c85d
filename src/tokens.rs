use std::collections::HashMap;

use serde::Deserialize;
use strum::{EnumIter, IntoEnumIterator};

use crate::driver::DriverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenGroup {
    Keyword,
    Operator,
    Delimiter,
    Class,
}

macro_rules! define_tokens {
    (@group keyword) => {TokenGroup::Keyword};
    (@group operator) => {TokenGroup::Operator};
    (@group delimiter) => {TokenGroup::Delimiter};
    (@group class) => {TokenGroup::Class};

    (@code) => {None};
    (@code $code:literal) => {Some($code)};

    ($($token:ident : [$group:ident] $spelling:literal $(= $code:literal)?), *) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
        pub enum TokenType {
            $($token, )*
            EOF
        }

        impl TokenType {
            /// Spelling for keywords, operators and delimiters, or the class
            /// name for literal classes.
            pub fn spelling(&self) -> &'static str {
                match self {
                    $(
                        TokenType::$token => $spelling,
                    )*
                    TokenType::EOF => "EOF"
                }
            }

            pub fn group(&self) -> Option<TokenGroup> {
                match self {
                    $(
                        TokenType::$token => Some(define_tokens!(@group $group)),
                    )*
                    TokenType::EOF => None
                }
            }

            fn builtin_code(&self) -> Option<u32> {
                match self {
                    $(
                        TokenType::$token => define_tokens!(@code $($code)?),
                    )*
                    TokenType::EOF => None
                }
            }
        }
    };
}

define_tokens! {
    // Keywords
    Int      :[keyword] "int"      = 101,
    Float    :[keyword] "float"    = 102,
    Char     :[keyword] "char"     = 103,
    Break    :[keyword] "break"    = 104,
    Const    :[keyword] "const"    = 105,
    Return   :[keyword] "return"   = 106,
    Void     :[keyword] "void"     = 107,
    Continue :[keyword] "continue" = 108,
    Do       :[keyword] "do"       = 109,
    While    :[keyword] "while"    = 110,
    If       :[keyword] "if"       = 111,
    Else     :[keyword] "else"     = 112,
    For      :[keyword] "for"      = 113,

    // Operators
    Not      :[operator] "!",
    Star     :[operator] "*"  = 202,
    Slash    :[operator] "/"  = 203,
    Percent  :[operator] "%",
    Plus     :[operator] "+"  = 205,
    Minus    :[operator] "-"  = 206,
    Lt       :[operator] "<"  = 207,
    Le       :[operator] "<=" = 208,
    Gt       :[operator] ">"  = 209,
    Ge       :[operator] ">=" = 210,
    EqEq     :[operator] "==" = 211,
    Ne       :[operator] "!=" = 212,
    AndAnd   :[operator] "&&" = 213,
    OrOr     :[operator] "||" = 214,
    Eq       :[operator] "="  = 215,
    Dot      :[operator] ".",

    // Delimiters
    OpenCurly :[delimiter] "{" = 301,
    CloseCurly:[delimiter] "}" = 302,
    Semi      :[delimiter] ";" = 303,
    Comma     :[delimiter] "," = 304,
    OpenPar   :[delimiter] "(" = 305,
    ClosePar  :[delimiter] ")" = 306,
    OpenSqu   :[delimiter] "[" = 307,
    CloseSqu  :[delimiter] "]" = 308,

    // Literal classes
    Integer  :[class] "integer"    = 400,
    Octal    :[class] "octal"      = 401,
    Hex      :[class] "hex"        = 402,
    Character:[class] "character"  = 500,
    String   :[class] "string"     = 600,
    Id       :[class] "identifier" = 700,
    Real     :[class] "real"       = 800
}

impl TokenType {
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenType::Int | TokenType::Float | TokenType::Char | TokenType::Void
        )
    }

    pub fn is_integer_class(&self) -> bool {
        matches!(self, TokenType::Integer | TokenType::Octal | TokenType::Hex)
    }
}

#[derive(Debug, Deserialize)]
struct TokenEntry {
    #[serde(rename = "type")]
    spelling: String,
    value: String,
}

/// Category codes keyed by token kind. A kind missing from the table is not
/// recognised by the scanner (keywords fall back to identifiers, operators
/// become invalid).
#[derive(Debug, Clone)]
pub struct TokenTable {
    codes: HashMap<TokenType, u32>,
}

impl Default for TokenTable {
    fn default() -> Self {
        let codes = TokenType::iter()
            .filter_map(|t| t.builtin_code().map(|code| (t, code)))
            .collect();

        Self { codes }
    }
}

impl TokenTable {
    /// Reads the `[{"type": "int", "value": "101"}, ...]` form. Entries that
    /// name an unknown spelling are ignored; kinds the JSON does not mention
    /// keep their built-in code.
    pub fn from_json(json: &str) -> Result<Self, DriverError> {
        let entries: Vec<TokenEntry> = serde_json::from_str(json)?;
        let mut table = Self::default();

        for entry in entries {
            let Some(token_type) = TokenType::iter().find(|t| t.spelling() == entry.spelling)
            else {
                continue;
            };
            let code = entry
                .value
                .trim()
                .parse()
                .map_err(|_| DriverError::BadTokenCode(entry.spelling.clone(), entry.value))?;
            table.codes.insert(token_type, code);
        }

        Ok(table)
    }

    pub fn code(&self, token_type: TokenType) -> Option<u32> {
        self.codes.get(&token_type).copied()
    }

    pub fn contains(&self, token_type: TokenType) -> bool {
        self.codes.contains_key(&token_type)
    }

    pub fn keyword(&self, spelling: &str) -> Option<TokenType> {
        self.lookup(TokenGroup::Keyword, spelling)
    }

    pub fn operator(&self, spelling: &str) -> Option<TokenType> {
        self.lookup(TokenGroup::Operator, spelling)
    }

    pub fn delimiter(ch: char) -> Option<TokenType> {
        TokenType::iter().find(|t| {
            t.group() == Some(TokenGroup::Delimiter) && t.spelling().starts_with(ch)
        })
    }

    /// Reverse lookup used when reading a token listing back.
    pub fn by_code(&self, code: u32) -> Option<TokenType> {
        self.codes
            .iter()
            .find_map(|(t, c)| if *c == code { Some(*t) } else { None })
    }

    fn lookup(&self, group: TokenGroup, spelling: &str) -> Option<TokenType> {
        TokenType::iter()
            .find(|t| t.group() == Some(group) && t.spelling() == spelling)
            .filter(|t| self.contains(*t))
    }
}
