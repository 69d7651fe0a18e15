//! Section keys
//!
//! A section key is either a fixed name (`foreword`, `about_author`) or a
//! chapter key starting with `chapter_`. The chapter number is the first
//! `_`-delimited token after the prefix, so `chapter_1_early_years` is
//! chapter 1 and `chapter_intro` has no number.

/// Sections every book starts with, in display order
pub const BASE_SECTIONS: [&str; 4] = ["title_page", "copyright", "dedication", "acknowledgments"];

/// Prefix shared by all chapter keys
pub const CHAPTER_PREFIX: &str = "chapter_";

/// Chapters the editor never offers to delete
pub const PROTECTED_CHAPTERS: [&str; 2] = ["chapter_1", "chapter_2"];

/// Whether `key` names a chapter
pub fn is_chapter(key: &str) -> bool {
    key.starts_with(CHAPTER_PREFIX)
}

/// Numeric part of a chapter key, if it has one
pub fn chapter_number(key: &str) -> Option<u32> {
    let rest = key.strip_prefix(CHAPTER_PREFIX)?;
    let token = rest.split('_').next()?;
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Sort rank for a chapter key; unnumbered chapters go last
pub fn chapter_rank(key: &str) -> u64 {
    chapter_number(key).map(u64::from).unwrap_or(u64::MAX)
}

/// Key for chapter `n`
pub fn chapter_key(n: u32) -> String {
    format!("{}{}", CHAPTER_PREFIX, n)
}

/// Whether the editor refuses to delete this chapter
pub fn is_protected_chapter(key: &str) -> bool {
    PROTECTED_CHAPTERS.contains(&key)
}

/// Display name for a section key: `about_author` -> `About Author`
pub fn humanize(key: &str) -> String {
    title_case(&key.replace('_', " "))
}

/// Capitalize the first letter of every run of letters, lowercase the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}
