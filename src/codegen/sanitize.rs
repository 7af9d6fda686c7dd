//! Resource identifier sanitization.

use std::collections::HashSet;

const FALLBACK_NAME: &str = "resource";

/// Lowercase, fold everything outside `[a-z0-9_]` to `_`, prefix a leading
/// digit with `_`, and truncate to `max_len`.
pub fn sanitize_identifier(raw: &str, max_len: usize) -> String {
    let mut name: String = raw
        .trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() {
        name = FALLBACK_NAME.to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    // output is pure ASCII, byte truncation is safe
    name.truncate(max_len.max(1));
    name
}

/// Character set a target accepts in identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierStyle {
    /// `[a-z0-9_]`, collisions suffixed `_2`
    #[default]
    Snake,
    /// `[a-z0-9]` only, collisions suffixed `2`
    Alphanumeric,
}

/// [`sanitize_identifier`] without underscores. A leading digit is
/// prefixed with `r`.
pub fn sanitize_alphanumeric(raw: &str, max_len: usize) -> String {
    let mut name: String = sanitize_identifier(raw, usize::MAX)
        .chars()
        .filter(|c| *c != '_')
        .collect();

    if name.is_empty() {
        name = FALLBACK_NAME.to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, 'r');
    }

    name.truncate(max_len.max(1));
    name
}

/// Hands out unique sanitized names for one generation run
#[derive(Debug, Clone)]
pub struct NameAllocator {
    max_len: usize,
    style: IdentifierStyle,
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            style: IdentifierStyle::Snake,
            used: HashSet::new(),
        }
    }

    pub fn with_style(mut self, style: IdentifierStyle) -> Self {
        self.style = style;
        self
    }

    /// Treat `names` as already handed out
    pub fn with_reserved(mut self, names: &[&str]) -> Self {
        self.used.extend(names.iter().map(|name| name.to_string()));
        self
    }

    /// Sanitize `raw`, suffixing on collision while staying within the
    /// length bound.
    pub fn allocate(&mut self, raw: &str) -> String {
        let base = match self.style {
            IdentifierStyle::Snake => sanitize_identifier(raw, self.max_len),
            IdentifierStyle::Alphanumeric => sanitize_alphanumeric(raw, self.max_len),
        };
        if self.used.insert(base.clone()) {
            return base;
        }

        let separator = match self.style {
            IdentifierStyle::Snake => "_",
            IdentifierStyle::Alphanumeric => "",
        };
        let mut n = 2usize;
        loop {
            let suffix = format!("{}{}", separator, n);
            let keep = self.max_len.saturating_sub(suffix.len());
            let candidate = format!("{}{}", &base[..keep.min(base.len())], suffix);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_sanitization() {
        assert_eq!(sanitize_identifier("Web Server", 64), "web_server");
        assert_eq!(sanitize_identifier("api-gateway", 64), "api_gateway");
        assert_eq!(sanitize_identifier("9lives", 64), "_9lives");
        assert_eq!(sanitize_identifier("   ", 64), "resource");
        assert_eq!(sanitize_identifier("Datenbank-Ü", 64), "datenbank__");
        assert_eq!(sanitize_identifier("abcdefghijklmnopqrstuvwxyz", 24).len(), 24);
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let mut names = NameAllocator::new(64);
        assert_eq!(names.allocate("db"), "db");
        assert_eq!(names.allocate("DB"), "db_2");
        assert_eq!(names.allocate("db!"), "db_");
        assert_eq!(names.allocate("db"), "db_3");
    }

    #[test]
    fn test_suffix_respects_bound() {
        let mut names = NameAllocator::new(24);
        let long = "a".repeat(40);
        let first = names.allocate(&long);
        let second = names.allocate(&long);
        assert_eq!(first.len(), 24);
        assert_eq!(second.len(), 24);
        assert!(second.ends_with("_2"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_reserved_names_are_never_handed_out() {
        let mut names = NameAllocator::new(64).with_reserved(&["default", "ids"]);
        assert_eq!(names.allocate("Default"), "default_2");
        assert_eq!(names.allocate("default_"), "default_");
        assert_eq!(names.allocate("ids"), "ids_2");
    }

    #[test]
    fn test_alphanumeric_style() {
        assert_eq!(sanitize_alphanumeric("Web Server", 32), "webserver");
        assert_eq!(sanitize_alphanumeric("9lives", 32), "r9lives");
        assert_eq!(sanitize_alphanumeric("__", 32), "resource");

        let mut names = NameAllocator::new(8).with_style(IdentifierStyle::Alphanumeric);
        assert_eq!(names.allocate("app"), "app");
        assert_eq!(names.allocate("App"), "app2");
        assert_eq!(names.allocate("app2"), "app22");
        assert_eq!(names.allocate("abcdefghijk"), "abcdefgh");
        assert_eq!(names.allocate("abcdefghijk"), "abcdefg2");
    }

    proptest! {
        #[test]
        fn prop_sanitized_names_are_identifiers(raw in ".*", bound in prop::sample::select(vec![24usize, 32, 64])) {
            let re = regex::Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap();
            let name = sanitize_identifier(&raw, bound);
            prop_assert!(re.is_match(&name), "{:?} -> {:?}", raw, name);
            prop_assert!(name.len() <= bound);
        }

        #[test]
        fn prop_allocated_names_are_unique(raws in prop::collection::vec("[A-Za-z -]{0,30}", 1..20)) {
            let mut names = NameAllocator::new(24);
            let allocated: Vec<String> = raws.iter().map(|r| names.allocate(r)).collect();
            let unique: HashSet<&String> = allocated.iter().collect();
            prop_assert_eq!(unique.len(), allocated.len());
            prop_assert!(allocated.iter().all(|n| n.len() <= 24));
        }

        #[test]
        fn prop_alphanumeric_names_stay_alphanumeric(raws in prop::collection::vec(".{0,40}", 1..20)) {
            let re = regex::Regex::new(r"^[a-z][a-z0-9]*$").unwrap();
            let mut names = NameAllocator::new(32).with_style(IdentifierStyle::Alphanumeric);
            let allocated: Vec<String> = raws.iter().map(|r| names.allocate(r)).collect();
            let unique: HashSet<&String> = allocated.iter().collect();
            prop_assert_eq!(unique.len(), allocated.len());
            for name in &allocated {
                prop_assert!(re.is_match(name), "{:?}", name);
                prop_assert!(name.len() <= 32);
            }
        }
    }
}
