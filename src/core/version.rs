use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone)]
pub struct LooseVersion {
    pub raw: String,
}

impl LooseVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LooseVersion {}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.raw, &other.raw)
    }
}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Num(&'a str),
    Text(&'a str),
}

impl Token<'_> {
    fn as_str(&self) -> &str {
        match self {
            Token::Num(raw) | Token::Text(raw) => raw,
        }
    }
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '.' | '-' | '_' | '+')
}

fn tokenize(raw: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (idx, ch) in raw.char_indices() {
        if is_separator(ch) {
            if let Some((begin, numeric)) = start.take() {
                tokens.push(make_token(&raw[begin..idx], numeric));
            }
            continue;
        }
        let numeric = ch.is_ascii_digit();
        match start {
            Some((begin, current)) if current != numeric => {
                tokens.push(make_token(&raw[begin..idx], current));
                start = Some((idx, numeric));
            }
            Some(_) => {}
            None => start = Some((idx, numeric)),
        }
    }
    if let Some((begin, numeric)) = start {
        tokens.push(make_token(&raw[begin..], numeric));
    }
    tokens
}

fn make_token(raw: &str, numeric: bool) -> Token<'_> {
    if numeric {
        Token::Num(raw)
    } else {
        Token::Text(raw)
    }
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_tokens(a: &Token<'_>, b: &Token<'_>) -> Ordering {
    match (a, b) {
        (Token::Num(a), Token::Num(b)) => compare_numeric(a, b),
        _ => a.as_str().cmp(b.as_str()),
    }
}

pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = tokenize(a);
    let right = tokenize(b);
    for (l, r) in left.iter().zip(right.iter()) {
        let ord = compare_tokens(l, r);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

pub fn major_minor(raw: &str) -> (Option<&str>, Option<&str>) {
    let mut parts = raw.split('.');
    (parts.next(), parts.next())
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::core::version::{compare_versions, major_minor, sort_versions, LooseVersion};

    #[test]
    fn numeric_segments_compare_by_value() {
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(compare_versions("2.0", "10.0"), Ordering::Less);
        assert_eq!(compare_versions("1.01", "1.1"), Ordering::Equal);
        assert_eq!(
            compare_versions("1.123456789012345678901234567890", "1.9"),
            Ordering::Greater
        );
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0rc1"), Ordering::Less);
    }

    #[test]
    fn text_tokens_degrade_to_lexicographic() {
        assert_eq!(compare_versions("1.0a1", "1.0b1"), Ordering::Less);
        assert_eq!(compare_versions("1.0.post1", "1.0.dev1"), Ordering::Greater);
        assert_eq!(compare_versions("1.0.x", "1.0.5"), Ordering::Greater);
        assert_eq!(compare_versions("", "0"), Ordering::Less);
    }

    #[test]
    fn sorts_mixed_release_strings() {
        let mut versions: Vec<String> = ["2.0.0", "1.10", "1.2b3", "1.2", "0.9", "1.2.1"]
            .iter()
            .map(|v| v.to_string())
            .collect();
        sort_versions(&mut versions);
        assert_eq!(versions, vec!["0.9", "1.2", "1.2.1", "1.2b3", "1.10", "2.0.0"]);
    }

    #[test]
    fn loose_version_orders_like_comparator() {
        assert!(LooseVersion::new("3.0.0") > LooseVersion::new("2.9.9"));
        assert_eq!(LooseVersion::new("1.0"), LooseVersion::new("1.00"));
    }

    #[test]
    fn major_minor_takes_raw_fields() {
        assert_eq!(major_minor("1.5.0"), (Some("1"), Some("5")));
        assert_eq!(major_minor("2"), (Some("2"), None));
        assert_eq!(major_minor("1.0rc1.2"), (Some("1"), Some("0rc1")));
    }
}
