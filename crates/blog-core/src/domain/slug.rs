//! Slug rules: suggestion from a title and shape validation.

use crate::error::DomainError;

/// Maximum length, in characters, of a slug.
pub const SLUG_MAX_LEN: usize = 300;

/// Derive a URL-safe slug from free text.
///
/// Common Latin accents are folded to ASCII, other non-ASCII characters are
/// dropped, the result is lowercased, runs of whitespace and dashes collapse
/// into a single `-`, and leading/trailing `-` and `_` are stripped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(fold_char) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }

    let edge = |c: char| c == '-' || c == '_';
    let capped: String = slug.trim_matches(edge).chars().take(SLUG_MAX_LEN).collect();
    capped.trim_end_matches(edge).to_string()
}

/// Check that a slug is non-empty, short enough, and only uses
/// ASCII letters, digits, `-` and `_`.
pub fn validate(slug: &str) -> Result<(), DomainError> {
    if slug.is_empty() {
        return Err(DomainError::Validation("Slug is required".to_string()));
    }
    if slug.chars().count() > SLUG_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "Slug must be at most {SLUG_MAX_LEN} characters"
        )));
    }
    if !is_slug(slug) {
        return Err(DomainError::Validation(
            "Slug may only contain letters, numbers, underscores or hyphens".to_string(),
        ));
    }
    Ok(())
}

pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn fold_char(c: char) -> impl Iterator<Item = char> {
    let folded: &'static str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' => "A",
        'æ' => "ae",
        'Æ' => "AE",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ę' | 'Ě' => "E",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' => "I",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ō' => "O",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' => "Y",
        'ś' | 'š' => "s",
        'Ś' | 'Š' => "S",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ß' => "ss",
        _ => "",
    };
    let keep = folded.is_empty().then_some(c);
    folded.chars().chain(keep)
}
