#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(String),
    Ident(String),
    Power,
    Sign(char),
    Op(char),
    Open,
    Close,
    Comma,
    Other(String),
}

/// Rewrites author syntax into rhai syntax.
///
/// `^` becomes `**` and every literal becomes a float, so `10/4` is `2.5`.
/// rhai binds a leading `-` tighter than `**`, while authors expect
/// `-x^2 == -(x^2)`; a unary sign whose operand is a power chain therefore
/// gets that chain wrapped in parentheses.
pub(crate) fn rewrite_for_rhai(expr: &str) -> String {
    let tokens = tokenize(expr);
    let mut pieces = Vec::with_capacity(tokens.len());
    rewrite_tokens(&tokens, &mut pieces);
    pieces.join(" ")
}

fn rewrite_tokens(tokens: &[Token], pieces: &mut Vec<String>) {
    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        if matches!(token, Token::Sign(_)) && is_unary(tokens, index) {
            if let Some(end) = power_chain_end(tokens, index + 1) {
                pieces.push(render(token));
                pieces.push("(".to_string());
                rewrite_tokens(&tokens[index + 1..end], pieces);
                pieces.push(")".to_string());
                index = end;
                continue;
            }
        }
        pieces.push(render(token));
        index += 1;
    }
}

fn is_unary(tokens: &[Token], index: usize) -> bool {
    let previous = index.checked_sub(1).map(|previous| &tokens[previous]);
    !matches!(
        previous,
        Some(Token::Number(_) | Token::Ident(_) | Token::Close)
    )
}

/// End of `operand (^ operand)*` starting at `start`, only when at least one `^` follows.
fn power_chain_end(tokens: &[Token], start: usize) -> Option<usize> {
    let mut end = operand_end(tokens, start)?;
    let mut powered = false;
    while matches!(tokens.get(end), Some(Token::Power)) {
        end = operand_end(tokens, end + 1)?;
        powered = true;
    }
    powered.then_some(end)
}

fn operand_end(tokens: &[Token], start: usize) -> Option<usize> {
    match tokens.get(start)? {
        Token::Sign(_) => operand_end(tokens, start + 1),
        Token::Number(_) => Some(start + 1),
        Token::Ident(_) if matches!(tokens.get(start + 1), Some(Token::Open)) => {
            closing_paren(tokens, start + 1).map(|close| close + 1)
        }
        Token::Ident(_) => Some(start + 1),
        Token::Open => closing_paren(tokens, start).map(|close| close + 1),
        _ => None,
    }
}

fn closing_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        match token {
            Token::Open => depth += 1,
            Token::Close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn tokenize(source: &str) -> Vec<Token> {
    let chars = source.chars().collect::<Vec<_>>();
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        let ch = chars[index];
        if ch.is_whitespace() {
            index += 1;
            continue;
        }
        if ch.is_ascii_alphabetic() || ch == '_' {
            let start = index;
            while chars
                .get(index)
                .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '_')
            {
                index += 1;
            }
            tokens.push(Token::Ident(chars[start..index].iter().collect()));
            continue;
        }
        if ch.is_ascii_digit()
            || (ch == '.' && chars.get(index + 1).is_some_and(char::is_ascii_digit))
        {
            let start = index;
            index = number_end(&chars, index);
            tokens.push(Token::Number(chars[start..index].iter().collect()));
            continue;
        }

        let token = match ch {
            '^' => Token::Power,
            '*' if chars.get(index + 1) == Some(&'*') => {
                index += 1;
                Token::Power
            }
            '+' | '-' => Token::Sign(ch),
            '*' | '/' | '%' => Token::Op(ch),
            '(' => Token::Open,
            ')' => Token::Close,
            ',' => Token::Comma,
            _ => {
                let start = index;
                index += 1;
                while index < chars.len() && is_other(chars[index]) {
                    index += 1;
                }
                tokens.push(Token::Other(chars[start..index].iter().collect()));
                continue;
            }
        };
        tokens.push(token);
        index += 1;
    }
    tokens
}

fn is_other(ch: char) -> bool {
    !(ch.is_whitespace() || ch.is_ascii_alphanumeric() || "_.^*+-/%(),".contains(ch))
}

fn number_end(chars: &[char], mut index: usize) -> usize {
    while chars.get(index).is_some_and(char::is_ascii_digit) {
        index += 1;
    }
    if chars.get(index) == Some(&'.') {
        index += 1;
        while chars.get(index).is_some_and(char::is_ascii_digit) {
            index += 1;
        }
    }
    if matches!(chars.get(index), Some('e' | 'E')) {
        let mut exponent = index + 1;
        if matches!(chars.get(exponent), Some('+' | '-')) {
            exponent += 1;
        }
        if chars.get(exponent).is_some_and(char::is_ascii_digit) {
            index = exponent;
            while chars.get(index).is_some_and(char::is_ascii_digit) {
                index += 1;
            }
        }
    }
    index
}

fn render(token: &Token) -> String {
    match token {
        Token::Number(raw) => float_literal(raw),
        Token::Ident(text) | Token::Other(text) => text.clone(),
        Token::Power => "**".to_string(),
        Token::Sign(ch) | Token::Op(ch) => ch.to_string(),
        Token::Open => "(".to_string(),
        Token::Close => ")".to_string(),
        Token::Comma => ",".to_string(),
    }
}

fn float_literal(raw: &str) -> String {
    match raw.parse::<f64>() {
        Ok(value) => {
            let mut text = value.to_string();
            if !text.contains('.') {
                text.push_str(".0");
            }
            text
        }
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod math_syntax_tests {
    use super::*;

    #[test]
    fn rewrite_for_rhai_makes_literals_float_and_power_explicit() {
        assert_eq!(rewrite_for_rhai("10/4"), "10.0 / 4.0");
        assert_eq!(rewrite_for_rhai("x^2"), "x ** 2.0");
        assert_eq!(rewrite_for_rhai("x**2"), "x ** 2.0");
        assert_eq!(rewrite_for_rhai("abc12 + 1.5"), "abc12 + 1.5");
        assert_eq!(rewrite_for_rhai(".5 * 2e3"), "0.5 * 2000.0");
        assert_eq!(rewrite_for_rhai("(3)+q7r"), "( 3.0 ) + q7r");
        assert_eq!(rewrite_for_rhai("1 <= 2"), "1.0 <= 2.0");
    }

    #[test]
    fn unary_sign_wraps_the_whole_power_chain() {
        assert_eq!(rewrite_for_rhai("-2^2"), "- ( 2.0 ** 2.0 )");
        assert_eq!(rewrite_for_rhai("-x^2/2"), "- ( x ** 2.0 ) / 2.0");
        assert_eq!(rewrite_for_rhai("3*-x^2"), "3.0 * - ( x ** 2.0 )");
        assert_eq!(rewrite_for_rhai("-sin(x)^2"), "- ( sin ( x ) ** 2.0 )");
        assert_eq!(rewrite_for_rhai("2^-3^2"), "2.0 ** - ( 3.0 ** 2.0 )");
    }

    #[test]
    fn signs_outside_power_chains_are_untouched() {
        assert_eq!(rewrite_for_rhai("1 - 2^2"), "1.0 - 2.0 ** 2.0");
        assert_eq!(rewrite_for_rhai("(-2)^2"), "( - 2.0 ) ** 2.0");
        assert_eq!(rewrite_for_rhai("-x * 2"), "- x * 2.0");
        assert_eq!(rewrite_for_rhai("2^-1"), "2.0 ** - 1.0");
    }

    #[test]
    fn unbalanced_parentheses_pass_through_for_rhai_to_reject() {
        assert_eq!(rewrite_for_rhai("-(2^2"), "- ( 2.0 ** 2.0");
    }
}
