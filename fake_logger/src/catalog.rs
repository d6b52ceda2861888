//! The line catalog.
//!
//! A [`Catalog`] is the fixed, ordered set of lines the emitter chooses from.
//! Every line carries a [`Severity`] whose tag prefixes the rendered text, for
//! example `[WARN]: shutting down.`. The catalog is never mutated once built.

use std::fmt;

/// Errors produced by [`Catalog`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A catalog must hold at least one entry.
    #[error("Catalog must not be empty")]
    Empty,
}

/// The severity tag of a catalog line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Rendered as `[INFO]`.
    Info,
    /// Rendered as `[ERR]`.
    Err,
    /// Rendered as `[WARN]`.
    Warn,
}

impl Severity {
    /// The literal tag that prefixes lines of this severity.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Info => "[INFO]",
            Self::Err => "[ERR]",
            Self::Warn => "[WARN]",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single line of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry {
    /// The severity tag of this line.
    pub severity: Severity,
    /// The text following the tag.
    pub message: &'static str,
}

impl Entry {
    /// Construct a new entry.
    #[must_use]
    pub const fn new(severity: Severity, message: &'static str) -> Self {
        Self { severity, message }
    }

    /// The rendered line, without a trailing newline.
    #[must_use]
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// The cat facts lines, in catalog order.
pub static CAT_FACTS: [Entry; 7] = [
    Entry::new(
        Severity::Info,
        r#"Today's fact: The technical term for "hairball" is "bezoar.""#,
    ),
    Entry::new(
        Severity::Info,
        "Today's fact: Abraham Lincoln kept four cats in the White House.",
    ),
    Entry::new(
        Severity::Info,
        "Today's fact: Adult cats only meow to communicate with humans.",
    ),
    Entry::new(Severity::Err, "The user has unsubscribed from cat facts!"),
    Entry::new(Severity::Err, "0 users are subscribed"),
    Entry::new(Severity::Warn, "shutting down."),
    Entry::new(Severity::Warn, "A new user subscribed to cat facts!"),
];

/// An ordered, immutable, non-empty set of [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    entries: &'static [Entry],
}

impl Catalog {
    /// Create a new [`Catalog`] over `entries`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if `entries` holds no lines.
    pub const fn new(entries: &'static [Entry]) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(Error::Empty);
        }
        Ok(Self { entries })
    }

    /// Number of entries. Never zero.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false, a catalog is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The entry at `idx`, if any.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&'static Entry> {
        self.entries.get(idx)
    }

    /// All entries in catalog order.
    #[must_use]
    pub const fn entries(&self) -> &'static [Entry] {
        self.entries
    }

    /// Iterate the entries in catalog order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'static, Entry> {
        self.entries.iter()
    }

    /// Whether `line`, without its trailing newline, is the rendering of one
    /// of this catalog's entries.
    #[must_use]
    pub fn contains_line(&self, line: &str) -> bool {
        self.entries.iter().any(|e| {
            line.strip_prefix(e.severity.tag())
                .and_then(|rest| rest.strip_prefix(": "))
                .is_some_and(|msg| msg == e.message)
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: &CAT_FACTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_cat_facts() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 7);

        let lines: Vec<String> = catalog.iter().map(Entry::line).collect();
        assert_eq!(
            lines,
            vec![
                r#"[INFO]: Today's fact: The technical term for "hairball" is "bezoar.""#,
                "[INFO]: Today's fact: Abraham Lincoln kept four cats in the White House.",
                "[INFO]: Today's fact: Adult cats only meow to communicate with humans.",
                "[ERR]: The user has unsubscribed from cat facts!",
                "[ERR]: 0 users are subscribed",
                "[WARN]: shutting down.",
                "[WARN]: A new user subscribed to cat facts!",
            ]
        );
    }

    #[test]
    fn severity_counts() {
        let catalog = Catalog::default();
        let count = |s: Severity| catalog.iter().filter(|e| e.severity == s).count();
        assert_eq!(count(Severity::Info), 3);
        assert_eq!(count(Severity::Err), 2);
        assert_eq!(count(Severity::Warn), 2);
    }

    #[test]
    fn empty_catalog_rejected() {
        static NOTHING: [Entry; 0] = [];
        assert_eq!(Catalog::new(&NOTHING), Err(Error::Empty));
    }

    #[test]
    fn contains_line_matches_only_rendered_entries() {
        let catalog = Catalog::default();
        for entry in catalog.iter() {
            assert!(catalog.contains_line(&entry.line()));
        }
        assert!(!catalog.contains_line("[INFO]: shutting down."));
        assert!(!catalog.contains_line("[WARN]:shutting down."));
        assert!(!catalog.contains_line("[WARN]: shutting down.\n"));
        assert!(!catalog.contains_line(""));
    }

    #[test]
    fn get_is_bounded() {
        let catalog = Catalog::default();
        assert_eq!(catalog.get(3), Some(&CAT_FACTS[3]));
        assert_eq!(catalog.get(7), None);
    }
}
