//! URL slugs for categories, subcategories and products.
//!
//! Slugs are generated once from the entity name when it is created. Uniqueness is
//! enforced by the database; a collision is reported to the caller, never resolved
//! by appending a suffix here.

use std::str::FromStr;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lowercase ASCII slug of `name`. Accents are stripped via NFD; empty when nothing survives.
pub fn generate_slug(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    // Start true to skip leading separators
    let mut prev_was_hyphen = true;
    for c in cleaned.chars() {
        if c.is_whitespace() || c == '-' {
            if !prev_was_hyphen {
                slug.push('-');
            }
            prev_was_hyphen = true;
        } else {
            slug.push(c);
            prev_was_hyphen = false;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// `prefix` plus the first word of `name`, reduced to ASCII letters and digits.
pub fn prefixed_first_word_slug(prefix: &str, name: &str) -> String {
    let word: String = name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if word.is_empty() {
        return word;
    }
    format!("{prefix}{word}")
}

/// How category slugs are derived. Subcategories and products always use [`generate_slug`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugStrategy {
    FullName,
    PrefixedFirstWord { prefix: String },
}

impl SlugStrategy {
    pub fn slug_for(&self, name: &str) -> String {
        match self {
            SlugStrategy::FullName => generate_slug(name),
            SlugStrategy::PrefixedFirstWord { prefix } => prefixed_first_word_slug(prefix, name),
        }
    }
}

impl FromStr for SlugStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full-name" => Ok(SlugStrategy::FullName),
            "prefixed-first-word" => Ok(SlugStrategy::PrefixedFirstWord {
                prefix: String::new(),
            }),
            other => Err(anyhow::anyhow!("unknown slug strategy `{other}`")),
        }
    }
}
