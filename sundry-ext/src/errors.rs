//! Flattening of error source chains into readable messages.

use std::error::Error;

/// Messages from `err` and each of its sources, outermost first.
///
/// Consecutive wrappers often repeat the inner message; repeats are kept
/// once, in first-seen order.
pub fn error_messages(err: &(dyn Error + 'static)) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    let mut current = Some(err);
    while let Some(e) = current {
        let message = e.to_string();
        if !messages.contains(&message) {
            messages.push(message);
        }
        current = e.source();
    }
    messages
}

/// [`error_messages`] joined with `delimiter`.
pub fn error_chain(err: &(dyn Error + 'static), delimiter: &str) -> String {
    error_messages(err).join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Wrapped {
        message: &'static str,
        source: Option<Box<dyn Error + 'static>>,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref()
        }
    }

    fn wrap(message: &'static str, inner: Option<Wrapped>) -> Wrapped {
        Wrapped {
            message,
            source: inner.map(|e| Box::new(e) as Box<dyn Error>),
        }
    }

    #[test]
    fn single_error() {
        let err = wrap("boom", None);
        assert_eq!(error_messages(&err), vec!["boom"]);
    }

    #[test]
    fn chain_is_outermost_first_and_deduplicated() {
        let inner = wrap("disk full", None);
        let middle = wrap("disk full", Some(inner));
        let outer = wrap("could not save", Some(middle));

        assert_eq!(error_messages(&outer), vec!["could not save", "disk full"]);
        assert_eq!(error_chain(&outer, " -> "), "could not save -> disk full");
    }

    #[test]
    fn works_with_io_errors() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
        assert_eq!(error_chain(&err, "\n"), "missing.txt");
    }
}
