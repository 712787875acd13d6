//! Slug derivation and uniqueness resolution.

use std::collections::HashSet;

use chrono::Utc;
use unicode_normalization::UnicodeNormalization;

/// Prefix for titles that produce an empty slug.
const FALLBACK_PREFIX: &str = "project";

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Derive a URL-safe slug from free text.
///
/// Diacritics are stripped after NFD decomposition, the text is lowercased,
/// and every run of characters outside `[a-z0-9]` becomes a single hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(lower);
            } else {
                pending_hyphen = true;
            }
        }
    }

    slug
}

/// Pick a slug for `title` that is not in `existing`.
///
/// Collisions are resolved by probing `base-2`, `base-3`, ... in order.
pub fn allocate_unique<'a, I>(existing: I, title: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: HashSet<&str> = existing.into_iter().collect();

    let mut base = slugify(title);
    if base.is_empty() {
        base = format!("{}-{}", FALLBACK_PREFIX, Utc::now().timestamp_millis());
    }

    if !taken.contains(base.as_str()) {
        return base;
    }

    let mut counter: u64 = 2;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}
