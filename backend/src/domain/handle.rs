//! Student handle derivation and collision resolution.
//!
//! A handle is the human-readable login name a teacher hands to a student.
//! It is derived from the display name and made unique by appending a
//! numeric suffix one higher than the largest suffix already taken.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Generated login handle for a student account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Wrap a handle read back from the store.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Derive the collision-free base of a handle from a display name.
///
/// Returns `None` when the name holds no non-whitespace characters.
///
/// # Examples
/// ```
/// use backend::domain::base_handle;
///
/// assert_eq!(base_handle("Bob Smith").as_deref(), Some("BobS"));
/// assert_eq!(base_handle("ana").as_deref(), Some("Ana"));
/// assert_eq!(base_handle("mary jane watson").as_deref(), Some("MaryW"));
/// ```
pub fn base_handle(display_name: &str) -> Option<String> {
    let tokens: Vec<&str> = display_name.split_whitespace().collect();
    let (first, rest) = tokens.split_first()?;
    let mut base = capitalize(first);
    if let Some(last) = rest.last() {
        base.extend(last.chars().take(1).flat_map(char::to_uppercase));
    }
    Some(base)
}

/// Suffix carried by `candidate` relative to `base`, if it belongs to the
/// base's collision family.
///
/// An exact match counts as suffix 1; `base` followed by ASCII digits counts
/// as that number. Anything else sharing the prefix is unrelated.
fn collision_suffix(base: &str, candidate: &str) -> Option<u64> {
    let rest = candidate.strip_prefix(base)?;
    if rest.is_empty() {
        return Some(1);
    }
    if !rest.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    // Saturate absurdly long digit runs instead of rejecting them.
    Some(rest.parse::<u64>().unwrap_or(u64::MAX - 1))
}

/// Pick the next free handle for `base` given every stored handle that
/// starts with it.
///
/// Gaps are never filled: with `BobS` and `BobS3` taken the result is
/// `BobS4`, not `BobS2`.
///
/// # Examples
/// ```
/// use backend::domain::next_handle;
///
/// assert_eq!(next_handle("BobS", &[]).as_ref(), "BobS");
/// assert_eq!(next_handle("BobS", &["BobS".to_owned()]).as_ref(), "BobS2");
/// assert_eq!(
///     next_handle("BobS", &["BobS".to_owned(), "BobS3".to_owned()]).as_ref(),
///     "BobS4",
/// );
/// ```
pub fn next_handle(base: &str, existing: &[String]) -> Handle {
    let highest = existing
        .iter()
        .filter_map(|candidate| collision_suffix(base, candidate))
        .max();
    match highest {
        None => Handle(base.to_owned()),
        Some(max) => {
            let next = max
                .max(1)
                .checked_add(1)
                .unwrap_or_else(|| lowest_free_suffix(base, existing));
            Handle(format!("{base}{next}"))
        }
    }
}

/// Smallest suffix from 2 upwards that no stored handle uses.
///
/// Only reached once the top of the `u64` range is taken.
fn lowest_free_suffix(base: &str, existing: &[String]) -> u64 {
    let used: HashSet<u64> = existing
        .iter()
        .filter_map(|candidate| collision_suffix(base, candidate))
        .collect();
    (2..=u64::MAX)
        .find(|suffix| !used.contains(suffix))
        .unwrap_or(u64::MAX)
}
