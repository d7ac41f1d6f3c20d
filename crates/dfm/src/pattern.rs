//! Feature patterns: exact strings or `*`/`?` globs.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A term pattern.
///
/// `*` matches any run of characters (including none) and `?` exactly one.
/// Strings without either are matched exactly.
///
/// Serialized as the bare pattern string and parsed back through
/// [`Pattern::new`], so a [`Pattern::exact`] holding `*` or `?` comes back
/// as a glob. Build such patterns in code rather than from config.
///
/// ```rust
/// use dfm::Pattern;
///
/// let p = Pattern::new("econom*");
/// assert!(p.matches("economy", false));
/// assert!(p.matches("Economic", true));
/// assert!(!p.matches("Economic", false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pattern {
    Exact(String),
    Glob(String),
}

impl Pattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if pattern.contains(['*', '?']) {
            Pattern::Glob(pattern)
        } else {
            Pattern::Exact(pattern)
        }
    }

    /// Treats `*` and `?` literally.
    pub fn exact(pattern: impl Into<String>) -> Self {
        Pattern::Exact(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Exact(p) | Pattern::Glob(p) => p,
        }
    }

    pub fn matches(&self, term: &str, case_insensitive: bool) -> bool {
        match (self, case_insensitive) {
            (Pattern::Exact(p), false) => p == term,
            (Pattern::Exact(p), true) => p.to_lowercase() == term.to_lowercase(),
            (Pattern::Glob(p), false) => glob_match(p, term),
            (Pattern::Glob(p), true) => glob_match(&p.to_lowercase(), &term.to_lowercase()),
        }
    }
}

/// True when any pattern matches `term`.
pub fn matches_any(patterns: &[Pattern], term: &str, case_insensitive: bool) -> bool {
    patterns.iter().any(|p| p.matches(term, case_insensitive))
}

// Greedy wildcard match with single-star backtracking, over chars.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < txt.len() {
        if p < pat.len() && (pat[p] == '?' || pat[p] == txt[t]) {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pat[p..].iter().all(|&c| c == '*')
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Pattern::new(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Pattern::new(value)
    }
}

impl From<Pattern> for String {
    fn from(value: Pattern) -> Self {
        match value {
            Pattern::Exact(p) | Pattern::Glob(p) => p,
        }
    }
}

impl FromStr for Pattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Pattern::new(s))
    }
}
