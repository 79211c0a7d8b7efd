use super::ExprError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Question,
    Colon,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Not,
    Assign,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub position: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        let position = i;
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let text = &source[start..i];
                let value = text.parse::<f64>().map_err(|_| ExprError::Parse {
                    position: start,
                    message: format!("invalid number `{}`", text),
                })?;
                tokens.push(Spanned {
                    token: Token::Num(value),
                    position,
                });
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Spanned {
                    token: Token::Ident(source[start..i].to_string()),
                    position,
                });
            }
            '+' => {
                tokens.push(Spanned { token: Token::Plus, position });
                i += 1;
            }
            '-' => {
                tokens.push(Spanned { token: Token::Minus, position });
                i += 1;
            }
            '*' => {
                tokens.push(Spanned { token: Token::Star, position });
                i += 1;
            }
            '/' => {
                tokens.push(Spanned { token: Token::Slash, position });
                i += 1;
            }
            '%' => {
                tokens.push(Spanned { token: Token::Percent, position });
                i += 1;
            }
            '^' => {
                tokens.push(Spanned { token: Token::Caret, position });
                i += 1;
            }
            '(' => {
                tokens.push(Spanned { token: Token::LParen, position });
                i += 1;
            }
            ')' => {
                tokens.push(Spanned { token: Token::RParen, position });
                i += 1;
            }
            ',' => {
                tokens.push(Spanned { token: Token::Comma, position });
                i += 1;
            }
            ';' => {
                tokens.push(Spanned { token: Token::Semicolon, position });
                i += 1;
            }
            '?' => {
                tokens.push(Spanned { token: Token::Question, position });
                i += 1;
            }
            ':' => {
                tokens.push(Spanned { token: Token::Colon, position });
                i += 1;
            }
            '<' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Spanned { token: Token::Le, position });
                    i += 2;
                } else {
                    tokens.push(Spanned { token: Token::Lt, position });
                    i += 1;
                }
            }
            '>' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Spanned { token: Token::Ge, position });
                    i += 2;
                } else {
                    tokens.push(Spanned { token: Token::Gt, position });
                    i += 1;
                }
            }
            '=' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Spanned { token: Token::EqEq, position });
                    i += 2;
                } else {
                    tokens.push(Spanned { token: Token::Assign, position });
                    i += 1;
                }
            }
            '!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    tokens.push(Spanned { token: Token::NotEq, position });
                    i += 2;
                } else {
                    tokens.push(Spanned { token: Token::Not, position });
                    i += 1;
                }
            }
            '&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    tokens.push(Spanned { token: Token::AndAnd, position });
                    i += 2;
                } else {
                    return Err(ExprError::Parse {
                        position,
                        message: "expected `&&`".to_string(),
                    });
                }
            }
            '|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    tokens.push(Spanned { token: Token::OrOr, position });
                    i += 2;
                } else {
                    return Err(ExprError::Parse {
                        position,
                        message: "expected `||`".to_string(),
                    });
                }
            }
            other => {
                return Err(ExprError::Parse {
                    position,
                    message: format!("unexpected character `{}`", other),
                });
            }
        }
    }

    Ok(tokens)
}
