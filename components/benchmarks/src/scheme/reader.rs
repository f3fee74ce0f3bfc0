//! S-expression reader.

use super::SchemeError;

/// A datum as read from source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// Exact integer
    Int(i64),
    /// `#t` / `#f`
    Bool(bool),
    /// Identifier
    Symbol(String),
    /// Parenthesized list
    List(Vec<Datum>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Quote,
    Atom(String),
}

fn tokenize(src: &str) -> Vec<(usize, Token)> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            '(' | '[' => {
                tokens.push((pos, Token::Open));
                chars.next();
            }
            ')' | ']' => {
                tokens.push((pos, Token::Close));
                chars.next();
            }
            '\'' => {
                tokens.push((pos, Token::Quote));
                chars.next();
            }
            ';' => {
                while let Some(&(_, c)) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut atom = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '\'' | ';') {
                        break;
                    }
                    atom.push(c);
                    chars.next();
                }
                tokens.push((pos, Token::Atom(atom)));
            }
        }
    }

    tokens
}

fn atom(text: &str, pos: usize) -> Result<Datum, SchemeError> {
    match text {
        "#t" | "#true" => return Ok(Datum::Bool(true)),
        "#f" | "#false" => return Ok(Datum::Bool(false)),
        _ => {}
    }
    if text.starts_with('#') {
        return Err(SchemeError::Read {
            pos,
            message: format!("unsupported syntax '{}'", text),
        });
    }

    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().map(Datum::Int).map_err(|_| SchemeError::Read {
            pos,
            message: format!("integer literal '{}' out of range", text),
        });
    }

    Ok(Datum::Symbol(text.to_string()))
}

/// Reads every datum in `src`.
pub fn read_all(src: &str) -> Result<Vec<Datum>, SchemeError> {
    let tokens = tokenize(src);
    let mut stack: Vec<Vec<Datum>> = Vec::new();
    let mut quotes: Vec<usize> = Vec::new();
    let mut top = Vec::new();

    for (pos, token) in tokens {
        let datum = match token {
            Token::Open => {
                stack.push(Vec::new());
                continue;
            }
            Token::Quote => {
                quotes.push(stack.len());
                continue;
            }
            Token::Close => match stack.pop() {
                Some(items) => Datum::List(items),
                None => {
                    return Err(SchemeError::Read {
                        pos,
                        message: "unexpected ')'".to_string(),
                    })
                }
            },
            Token::Atom(text) => atom(&text, pos)?,
        };

        // Wrap in (quote ...) for every pending quote opened at this depth
        let mut datum = datum;
        while quotes.last() == Some(&stack.len()) {
            quotes.pop();
            datum = Datum::List(vec![Datum::Symbol("quote".to_string()), datum]);
        }

        match stack.last_mut() {
            Some(items) => items.push(datum),
            None => top.push(datum),
        }
    }

    if !stack.is_empty() {
        return Err(SchemeError::Read {
            pos: src.len(),
            message: "unterminated list".to_string(),
        });
    }
    if !quotes.is_empty() {
        return Err(SchemeError::Read {
            pos: src.len(),
            message: "quote without datum".to_string(),
        });
    }

    Ok(top)
}
