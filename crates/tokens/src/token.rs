use std::borrow::Cow;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{TokenizeConfig, TokenizeMode};
use crate::error::TokenError;

/// Category assigned to a token when it is cut from the source text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Word,
    Number,
    Punct,
    Symbol,
    Url,
    Separator,
}

/// A token with its UTF-8 byte span in the source text.
///
/// Normalization and term reduction rewrite `text`; `start..end` keeps
/// pointing at the original span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// Byte offset (inclusive) in the source text.
    pub start: usize,
    /// Byte offset (exclusive) in the source text.
    pub end: usize,
    /// Category assigned at tokenization time.
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            kind,
        }
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Tokenizes `text` after validating `cfg`.
///
/// ```rust
/// use tokens::{tokenize, TokenizeConfig};
///
/// let cfg = TokenizeConfig { remove_punct: true, ..Default::default() };
/// let toks = tokenize("Hello, world!", &cfg).unwrap();
/// let texts: Vec<&str> = toks.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, ["Hello", "world"]);
/// ```
pub fn tokenize(text: &str, cfg: &TokenizeConfig) -> Result<Vec<Token>, TokenError> {
    cfg.validate()?;
    Ok(tokenize_iter(text, cfg).collect())
}

/// Returns a lazy token stream over `text`.
///
/// The stream is `Clone`, so it can be restarted from any point. The config
/// is not validated here; use [`tokenize`] or
/// [`TokenizeConfig::validate`] when the config comes from outside.
pub fn tokenize_iter<'a>(text: &'a str, cfg: &TokenizeConfig) -> Tokens<'a> {
    let text: Cow<'a, str> = if cfg.normalize_unicode {
        Cow::Owned(text.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(text)
    };
    Tokens {
        text,
        cfg: *cfg,
        pos: 0,
        pending: VecDeque::new(),
    }
}

/// Lazy, finite token stream produced by [`tokenize_iter`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: Cow<'a, str>,
    cfg: TokenizeConfig,
    pos: usize,
    pending: VecDeque<Token>,
}

impl Tokens<'_> {
    /// The text the spans refer to (normalized when NFKC is on).
    pub fn source(&self) -> &str {
        self.text.as_ref()
    }

    fn keeps(&self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::Word => true,
            TokenKind::Number => !self.cfg.remove_numbers,
            TokenKind::Punct => !self.cfg.remove_punct,
            TokenKind::Symbol => !self.cfg.remove_symbols,
            TokenKind::Url => !self.cfg.remove_url,
            TokenKind::Separator => !self.cfg.remove_separators,
        }
    }

    /// Cuts the next whitespace run or chunk starting at `pos` into `pending`.
    fn fill(&mut self) {
        let text: &str = self.text.as_ref();
        let rest = &text[self.pos..];
        let Some(first) = rest.chars().next() else {
            return;
        };

        let len = if first.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            self.pending.push_back(Token::new(
                &rest[..len],
                self.pos,
                self.pos + len,
                TokenKind::Separator,
            ));
            len
        } else {
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            segment_chunk(&rest[..len], self.pos, &self.cfg, &mut self.pending);
            len
        };
        self.pos += len;
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                if self.keeps(token.kind) {
                    return Some(token);
                }
                continue;
            }
            if self.pos >= self.text.len() {
                return None;
            }
            self.fill();
        }
    }
}

/// Splits one whitespace-free chunk into tokens.
fn segment_chunk(chunk: &str, offset: usize, cfg: &TokenizeConfig, out: &mut VecDeque<Token>) {
    if cfg.mode == TokenizeMode::Whitespace {
        let kind = if find_url(chunk).is_some() {
            TokenKind::Url
        } else {
            classify(chunk)
        };
        out.push_back(Token::new(chunk, offset, offset + chunk.len(), kind));
        return;
    }

    match find_url(chunk) {
        Some((url_start, url_end)) => {
            segment_words(&chunk[..url_start], offset, cfg, out);
            out.push_back(Token::new(
                &chunk[url_start..url_end],
                offset + url_start,
                offset + url_end,
                TokenKind::Url,
            ));
            segment_words(&chunk[url_end..], offset + url_end, cfg, out);
        }
        None => segment_words(chunk, offset, cfg, out),
    }
}

/// Unicode word-boundary segmentation with optional hyphen rejoining.
fn segment_words(part: &str, offset: usize, cfg: &TokenizeConfig, out: &mut VecDeque<Token>) {
    if part.is_empty() {
        return;
    }
    let mut spans: Vec<(usize, usize)> = part
        .split_word_bound_indices()
        .map(|(idx, seg)| (idx, idx + seg.len()))
        .collect();

    if !cfg.split_hyphens {
        spans = join_hyphenated(part, spans);
    }

    for (start, end) in spans {
        let text = &part[start..end];
        out.push_back(Token::new(
            text,
            offset + start,
            offset + end,
            classify(text),
        ));
    }
}

fn join_hyphenated(part: &str, spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut joined: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    let mut idx = 0;
    while idx < spans.len() {
        let (start, mut end) = spans[idx];
        idx += 1;
        if is_wordlike(&part[start..end]) {
            while idx + 1 < spans.len() {
                let (h_start, h_end) = spans[idx];
                let (w_start, w_end) = spans[idx + 1];
                if is_hyphen(&part[h_start..h_end]) && is_wordlike(&part[w_start..w_end]) {
                    end = w_end;
                    idx += 2;
                } else {
                    break;
                }
            }
        }
        joined.push((start, end));
    }
    joined
}

const HYPHENS: [char; 3] = ['-', '\u{2010}', '\u{2011}'];

fn is_hyphen(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| HYPHENS.contains(&c)) && chars.next().is_none()
}

fn is_wordlike(s: &str) -> bool {
    s.chars().any(char::is_alphanumeric)
}

const URL_PREFIXES: [&str; 4] = ["http://", "https://", "ftp://", "www."];

/// Locates the first URL inside a chunk, returning its byte range.
///
/// A URL starts at a scheme or `www.` that is not preceded by a letter or
/// digit, so `x,www.a.org` and `see:https://a.org` both yield the URL.
/// Trailing sentence punctuation stays outside it.
fn find_url(chunk: &str) -> Option<(usize, usize)> {
    let mut prev: Option<char> = None;
    for (start, c) in chunk.char_indices() {
        if !prev.is_some_and(char::is_alphanumeric) {
            if let Some(len) = url_len(&chunk[start..]) {
                return Some((start, start + len));
            }
        }
        prev = Some(c);
    }
    None
}

fn url_len(body: &str) -> Option<usize> {
    let prefix_len = URL_PREFIXES
        .iter()
        .find(|prefix| {
            body.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
        .map(|prefix| prefix.len())?;

    let trimmed = body.trim_end_matches([
        '.', ',', ';', ':', '!', '?', ')', ']', '>', '}', '"', '\'',
    ]);
    (trimmed.len() > prefix_len).then_some(trimmed.len())
}

fn is_number(text: &str) -> bool {
    text.chars().any(char::is_numeric)
        && text
            .chars()
            .all(|c| c.is_numeric() || matches!(c, '.' | ',' | '\''))
}

/// Assigns a [`TokenKind`] to a single segment.
pub(crate) fn classify(text: &str) -> TokenKind {
    if text.is_empty() {
        return TokenKind::Word;
    }
    if text.chars().all(char::is_whitespace) {
        return TokenKind::Separator;
    }
    // Rejoined ranges such as `1990-1994` count as numbers too.
    if text.split(HYPHENS).all(is_number) {
        return TokenKind::Number;
    }
    if text.chars().all(|c| c.is_punctuation()) {
        return TokenKind::Punct;
    }
    // Emoji sequences carry variation selectors and zero-width joiners
    // alongside the symbol code points.
    if text.chars().any(|c| c.is_symbol())
        && text
            .chars()
            .all(|c| c.is_symbol() || c.is_punctuation() || c.is_mark() || c == '\u{200D}')
    {
        return TokenKind::Symbol;
    }
    TokenKind::Word
}
