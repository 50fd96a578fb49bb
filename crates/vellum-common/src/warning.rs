//! Conversion warnings and colored terminal diagnostics.
//!
//! Two channels live here:
//! - [`Warnings`] is the ordered, append-only list handed back to the caller
//!   with every conversion. Messages describe subtrees that were dropped.
//! - [`warn_once`] prints developer diagnostics to stderr, de-duplicated so
//!   the same unsupported construct does not spam the terminal.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of diagnostics we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Ordered, append-only list of human-readable warnings.
///
/// A warning never fails the conversion; it records that some part of the
/// input was ignored and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    messages: Vec<String>,
}

impl Warnings {
    /// Create an empty warning list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Append a warning. Earlier entries are never touched.
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Number of warnings recorded so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if nothing has been reported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over the warnings in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Consume the list, returning the messages in report order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

/// Warn about an unsupported feature (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("CSS", "ignoring at-rule '@media'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[vellum {component}] ⚠ {message}").yellow());
    }
}

/// True if `warn_once` has printed this diagnostic since the last clear.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&format!("[{component}] {message}")))
}

/// Clear all recorded diagnostics (call when starting a new conversion)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
