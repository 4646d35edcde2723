//! String helpers: prefix/suffix normalisation, blank checks and casing.

/// Case sensitivity for prefix and suffix comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    /// Compare characters exactly.
    #[default]
    Sensitive,
    /// Compare characters after Unicode lowercasing.
    Insensitive,
}

fn chars_eq(a: char, b: char, case: Case) -> bool {
    match case {
        Case::Sensitive => a == b,
        Case::Insensitive => a == b || a.to_lowercase().eq(b.to_lowercase()),
    }
}

/// Byte index where `suffix` starts in `s`, if `s` ends with it.
fn suffix_start(s: &str, suffix: &str, case: Case) -> Option<usize> {
    let mut chars = s.char_indices().rev();
    let mut start = s.len();
    for expected in suffix.chars().rev() {
        let (idx, c) = chars.next()?;
        if !chars_eq(c, expected, case) {
            return None;
        }
        start = idx;
    }
    Some(start)
}

/// Byte index just past `prefix` in `s`, if `s` starts with it.
fn prefix_end(s: &str, prefix: &str, case: Case) -> Option<usize> {
    let mut chars = s.char_indices();
    let mut end = 0;
    for expected in prefix.chars() {
        let (idx, c) = chars.next()?;
        if !chars_eq(c, expected, case) {
            return None;
        }
        end = idx + c.len_utf8();
    }
    Some(end)
}

/// Extension methods for string slices.
pub trait StrExt {
    /// Returns the string, appending `suffix` if it does not already end with it.
    fn ensure_suffix(&self, suffix: &str, case: Case) -> String;

    /// Returns the string with one trailing `suffix` removed, if present.
    fn ensure_no_suffix(&self, suffix: &str, case: Case) -> String;

    /// Returns the string, prepending `prefix` if it does not already start with it.
    fn ensure_prefix(&self, prefix: &str, case: Case) -> String;

    /// Returns the string with one leading `prefix` removed, if present.
    fn ensure_no_prefix(&self, prefix: &str, case: Case) -> String;

    /// True when the string is empty or only whitespace.
    fn is_blank(&self) -> bool;

    /// True when the string has at least one non-whitespace character.
    fn is_valued(&self) -> bool;

    /// Returns `fallback` when the string is blank, otherwise the string itself.
    fn or_if_blank<'a>(&'a self, fallback: &'a str) -> &'a str;

    /// Lowercases the string and uppercases the first character and every
    /// character following one of `delimiters`.
    ///
    /// With `keep_delimiter = false` the delimiters are dropped from the output.
    fn capitalize(&self, keep_delimiter: bool, delimiters: &[char]) -> String;

    /// Converts `snake_case` to `PascalCase`.
    ///
    /// Existing interior capitals are lowercased, so `helloWorld` becomes
    /// `Helloworld`.
    fn snake_to_pascal(&self) -> String;

    /// Removes every occurrence of `pattern`.
    fn remove_all(&self, pattern: &str) -> String;

    /// Lowercases the string only when `condition` holds.
    fn lower_if(&self, condition: bool) -> String;

    /// Uppercases the string only when `condition` holds.
    fn upper_if(&self, condition: bool) -> String;
}

impl StrExt for str {
    fn ensure_suffix(&self, suffix: &str, case: Case) -> String {
        match suffix_start(self, suffix, case) {
            Some(_) => self.to_string(),
            None => format!("{self}{suffix}"),
        }
    }

    fn ensure_no_suffix(&self, suffix: &str, case: Case) -> String {
        match suffix_start(self, suffix, case) {
            Some(start) if !suffix.is_empty() => self[..start].to_string(),
            _ => self.to_string(),
        }
    }

    fn ensure_prefix(&self, prefix: &str, case: Case) -> String {
        match prefix_end(self, prefix, case) {
            Some(_) => self.to_string(),
            None => format!("{prefix}{self}"),
        }
    }

    fn ensure_no_prefix(&self, prefix: &str, case: Case) -> String {
        match prefix_end(self, prefix, case) {
            Some(end) => self[end..].to_string(),
            None => self.to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }

    fn is_valued(&self) -> bool {
        !self.is_blank()
    }

    fn or_if_blank<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.is_blank() {
            fallback
        } else {
            self
        }
    }

    fn capitalize(&self, keep_delimiter: bool, delimiters: &[char]) -> String {
        let mut out = String::with_capacity(self.len());
        let mut upper_next = true;

        for c in self.chars() {
            if delimiters.contains(&c) {
                if keep_delimiter {
                    out.push(c);
                }
                upper_next = true;
            } else if upper_next {
                out.extend(c.to_uppercase());
                upper_next = false;
            } else {
                out.extend(c.to_lowercase());
            }
        }

        out
    }

    fn snake_to_pascal(&self) -> String {
        self.capitalize(false, &['_'])
    }

    fn remove_all(&self, pattern: &str) -> String {
        if pattern.is_empty() {
            return self.to_string();
        }
        self.replace(pattern, "")
    }

    fn lower_if(&self, condition: bool) -> String {
        if condition {
            self.to_lowercase()
        } else {
            self.to_string()
        }
    }

    fn upper_if(&self, condition: bool) -> String {
        if condition {
            self.to_uppercase()
        } else {
            self.to_string()
        }
    }
}

// ============================================================================
// Safe variants
// ============================================================================

/// Like [`StrExt::ensure_suffix`], but an absent string yields just the suffix.
pub fn ensure_suffix_opt(s: Option<&str>, suffix: &str, case: Case) -> String {
    match s {
        Some(s) => s.ensure_suffix(suffix, case),
        None => suffix.to_string(),
    }
}

/// Like [`StrExt::ensure_prefix`], but an absent string yields just the prefix.
pub fn ensure_prefix_opt(s: Option<&str>, prefix: &str, case: Case) -> String {
    match s {
        Some(s) => s.ensure_prefix(prefix, case),
        None => prefix.to_string(),
    }
}

/// Like [`StrExt::ensure_no_suffix`], passing `None` through.
pub fn ensure_no_suffix_opt(s: Option<&str>, suffix: &str, case: Case) -> Option<String> {
    s.map(|s| s.ensure_no_suffix(suffix, case))
}

/// Like [`StrExt::ensure_no_prefix`], passing `None` through.
pub fn ensure_no_prefix_opt(s: Option<&str>, prefix: &str, case: Case) -> Option<String> {
    s.map(|s| s.ensure_no_prefix(prefix, case))
}

/// True when the string is absent, empty or whitespace.
pub fn is_blank_opt(s: Option<&str>) -> bool {
    s.map_or(true, str::is_blank)
}

/// Trims surrounding whitespace, passing `None` through.
pub fn trim_opt(s: Option<&str>) -> Option<&str> {
    s.map(str::trim)
}

/// Trims the given characters from both ends, passing `None` through.
pub fn trim_chars_opt<'a>(s: Option<&'a str>, chars: &[char]) -> Option<&'a str> {
    s.map(|s| s.trim_matches(|c| chars.contains(&c)))
}

/// False when either side is absent, otherwise `haystack.contains(needle)`.
pub fn contains_opt(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match (haystack, needle) {
        (Some(h), Some(n)) => h.contains(n),
        _ => false,
    }
}

/// Replaces every `from` with `to`, passing `None` through.
pub fn replace_opt(s: Option<&str>, from: &str, to: &str) -> Option<String> {
    s.map(|s| s.replace(from, to))
}

/// Lowercases, passing `None` through.
pub fn lower_opt(s: Option<&str>) -> Option<String> {
    s.map(str::to_lowercase)
}

/// Uppercases, passing `None` through.
pub fn upper_opt(s: Option<&str>) -> Option<String> {
    s.map(str::to_uppercase)
}

/// Character-based substring that never panics.
///
/// Skips `start` characters and takes at most `len` (or all remaining when
/// `len` is `None`). Out-of-range requests yield an empty string.
pub fn substring_opt(s: Option<&str>, start: usize, len: Option<usize>) -> Option<String> {
    s.map(|s| {
        let rest = s.chars().skip(start);
        match len {
            Some(len) => rest.take(len).collect(),
            None => rest.collect(),
        }
    })
}
