//! Count-based pluralisation.
//!
//! Endings are chosen from the count: exactly one takes the base form, any
//! other count (including zero) the plural form. For irregular words pass the
//! stem, e.g. `pluralize(n, "entr", "ies", "y")`.

/// The word ending for `count`.
pub fn plural_suffix<'a>(count: u64, plural: &'a str, base: &'a str) -> &'a str {
    if count == 1 {
        base
    } else {
        plural
    }
}

/// `word` followed by the ending for `count`.
pub fn pluralize(count: u64, word: &str, plural: &str, base: &str) -> String {
    format!("{word}{}", plural_suffix(count, plural, base))
}

/// `word` with a plain `s` ending unless `count` is one.
pub fn pluralize_s(count: u64, word: &str) -> String {
    pluralize(count, word, "s", "")
}

/// Pluralisation driven by the number of items in an iterator.
///
/// Only the first two items are inspected.
pub trait PluralExt {
    /// The word ending for the number of items.
    fn plural_suffix<'a>(self, plural: &'a str, base: &'a str) -> &'a str;

    /// `word` followed by the ending for the number of items.
    fn pluralize(self, word: &str, plural: &str, base: &str) -> String;
}

impl<I: IntoIterator> PluralExt for I {
    fn plural_suffix<'a>(self, plural: &'a str, base: &'a str) -> &'a str {
        let count = self.into_iter().take(2).count() as u64;
        plural_suffix(count, plural, base)
    }

    fn pluralize(self, word: &str, plural: &str, base: &str) -> String {
        format!("{word}{}", PluralExt::plural_suffix(self, plural, base))
    }
}
