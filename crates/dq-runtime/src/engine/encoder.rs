use std::cmp::Reverse;
use std::collections::BTreeMap;

use dq_core::DynQuizError;
use rand::Rng;

use crate::helpers::rhai_bridge::{CONSTANT_NAMES, FUNCTION_NAMES};

const TOKEN_HEAD: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const TOKEN_TAIL: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub(crate) const RESERVED_WORDS: &[&str] = &[
    "mod", "to", "in", "and", "xor", "or", "not", "end", "true", "false", "let", "const", "if",
    "else", "switch", "do", "while", "until", "loop", "for", "continue", "break", "return",
    "throw", "try", "catch", "import", "export", "as", "global", "private", "fn", "this", "is",
    "call", "curry", "print", "debug", "eval", "var", "static", "shared", "with", "goto", "exit",
    "match", "case", "public", "protected", "new", "use", "module", "package", "super", "spawn",
    "thread", "go", "sync", "async", "await", "yield", "default", "void", "null", "nil",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub length: usize,
    pub max_attempts: usize,
}

/// Bijective map between author names and evaluator-safe tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    token_of: BTreeMap<String, String>,
    name_of: BTreeMap<String, String>,
    policy: TokenPolicy,
}

pub fn encode<'a, R, I>(
    names: I,
    policy: TokenPolicy,
    rng: &mut R,
) -> Result<Encoding, DynQuizError>
where
    R: Rng,
    I: IntoIterator<Item = &'a str>,
{
    let mut encoding = Encoding {
        token_of: BTreeMap::new(),
        name_of: BTreeMap::new(),
        policy,
    };
    let names = names.into_iter().collect::<Vec<_>>();
    for name in &names {
        encoding.token_of.insert((*name).to_string(), String::new());
    }
    for name in names {
        if encoding.token(name).is_some() {
            continue;
        }
        encoding.token_of.remove(name);
        encoding.assign_fresh(name, rng)?;
    }
    Ok(encoding)
}

impl Encoding {
    pub fn token(&self, name: &str) -> Option<&str> {
        self.token_of
            .get(name)
            .map(String::as_str)
            .filter(|token| !token.is_empty())
    }

    pub fn name(&self, token: &str) -> Option<&str> {
        self.name_of.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.name_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_of.is_empty()
    }

    /// Gives `name` a brand-new token; an existing mapping for `name` is an error.
    pub fn assign_fresh<R: Rng>(
        &mut self,
        name: &str,
        rng: &mut R,
    ) -> Result<String, DynQuizError> {
        if self.token(name).is_some() {
            return Err(DynQuizError::configuration(
                "CONFIG_NAME_ALREADY_ENCODED",
                format!("\"{}\" already has an internal token.", name),
            ));
        }

        for _ in 0..self.policy.max_attempts {
            let candidate = random_token(self.policy.length, rng);
            if self.accepts(&candidate, name) {
                self.token_of.insert(name.to_string(), candidate.clone());
                self.name_of.insert(candidate.clone(), name.to_string());
                return Ok(candidate);
            }
        }

        Err(DynQuizError::configuration(
            "CONFIG_TOKEN_SPACE_EXHAUSTED",
            format!(
                "Could not find a collision-free internal name for \"{}\" after {} attempts.",
                name, self.policy.max_attempts
            ),
        ))
    }

    fn accepts(&self, candidate: &str, pending_name: &str) -> bool {
        if RESERVED_WORDS.contains(&candidate)
            || FUNCTION_NAMES.contains(&candidate)
            || CONSTANT_NAMES.contains(&candidate)
        {
            return false;
        }
        let clashes_token = self
            .name_of
            .keys()
            .any(|token| token.contains(candidate) || candidate.contains(token.as_str()));
        if clashes_token {
            return false;
        }
        !self
            .token_of
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(pending_name))
            .any(|name| name.contains(candidate))
    }

    /// Rewrites every author name in `source` to its token, longest names first.
    pub fn substitute(&self, source: &str) -> String {
        let mut names = self
            .token_of
            .iter()
            .filter(|(_, token)| !token.is_empty())
            .collect::<Vec<_>>();
        names.sort_by_key(|(name, _)| Reverse(name.len()));

        let mut rewritten = source.to_string();
        for (name, token) in names {
            rewritten = replace_symbol(&rewritten, name, token);
        }
        rewritten
    }
}

fn random_token<R: Rng>(length: usize, rng: &mut R) -> String {
    let mut out = String::with_capacity(length);
    out.push(char::from(TOKEN_HEAD[rng.gen_range(0..TOKEN_HEAD.len())]));
    for _ in 1..length {
        out.push(char::from(TOKEN_TAIL[rng.gen_range(0..TOKEN_TAIL.len())]));
    }
    out
}

/// Replaces `symbol` wherever it is not glued to a neighbouring identifier,
/// so `R_1` is left alone inside `R_12` or inside an inserted token.
pub(crate) fn replace_symbol(source: &str, symbol: &str, replacement: &str) -> String {
    if symbol.is_empty() {
        return source.to_string();
    }
    let check_left = symbol.chars().next().is_some_and(is_identifier_char);
    let check_right = symbol.chars().next_back().is_some_and(is_identifier_char);

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    while let Some(found) = source[cursor..].find(symbol) {
        let start = cursor + found;
        let end = start + symbol.len();

        let left = source[..start].chars().next_back();
        let right = source[end..].chars().next();
        let left_ok = !check_left || !left.is_some_and(is_identifier_char);
        let right_ok = !check_right || !right.is_some_and(is_identifier_char);
        if left_ok && right_ok {
            out.push_str(&source[cursor..start]);
            out.push_str(replacement);
            cursor = end;
            continue;
        }

        let ch = source[start..]
            .chars()
            .next()
            .expect("non-empty suffix should have a char");
        let next = start + ch.len_utf8();
        out.push_str(&source[cursor..next]);
        cursor = next;
    }

    out.push_str(&source[cursor..]);
    out
}

pub(crate) fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
