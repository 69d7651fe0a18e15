//! Section order policy
//!
//! Content is stored as an unordered mapping; the display and export order is
//! derived from the book's format every time it is needed. The result is
//! always a permutation of the keys passed in: absent keys are never
//! invented, and keys the format does not know about are appended at the end
//! in input order.

use std::collections::HashSet;

use crate::catalog::{self, OrderRule};
use crate::models::{BookFormat, Content};
use crate::section::{chapter_rank, is_chapter, BASE_SECTIONS};

/// Order the given section keys for display and export
pub fn section_order<'a, I>(format: BookFormat, keys: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let keys: Vec<&'a str> = keys.into_iter().collect();
    let mut placer = Placer::new(&keys);

    for key in BASE_SECTIONS {
        placer.place(key);
    }

    match catalog::spec(format).order {
        OrderRule::Chaptered { lead, tail } => {
            placer.place(lead);

            let mut chapters: Vec<&'a str> = keys
                .iter()
                .copied()
                .filter(|key| is_chapter(key))
                .collect();
            chapters.sort_by(|a, b| chapter_rank(a).cmp(&chapter_rank(b)).then(a.cmp(b)));
            for key in chapters {
                placer.place(key);
            }

            for key in tail {
                placer.place(key);
            }
        }
        OrderRule::Sequential => {
            for key in catalog::spec(format).section_keys() {
                placer.place(key);
            }
        }
    }

    for key in &keys {
        placer.place(key);
    }

    placer.order
}

/// Order the sections of a content mapping
pub fn content_order(format: BookFormat, content: &Content) -> Vec<&str> {
    section_order(format, content.keys().map(String::as_str))
}

/// Appends keys that are present and not yet placed
struct Placer<'a> {
    present: Vec<&'a str>,
    placed: HashSet<&'a str>,
    order: Vec<&'a str>,
}

impl<'a> Placer<'a> {
    fn new(keys: &[&'a str]) -> Self {
        Self {
            present: keys.to_vec(),
            placed: HashSet::with_capacity(keys.len()),
            order: Vec::with_capacity(keys.len()),
        }
    }

    fn place(&mut self, key: &str) {
        // Take the caller's borrow from the input so the output lives as long as it
        if let Some(&found) = self.present.iter().find(|k| **k == key) {
            if self.placed.insert(found) {
                self.order.push(found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::template;

    fn sorted(mut keys: Vec<&str>) -> Vec<&str> {
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_novel_chapters_sort_numerically() {
        let order = section_order(BookFormat::Novel, ["chapter_2", "chapter_10", "chapter_1"]);
        assert_eq!(order, vec!["chapter_1", "chapter_2", "chapter_10"]);
    }

    #[test]
    fn test_novel_full_template_order() {
        let content = template(BookFormat::Novel, "T", "A");
        let order = content_order(BookFormat::Novel, &content);
        assert_eq!(
            order,
            vec![
                "title_page",
                "copyright",
                "dedication",
                "acknowledgments",
                "prologue",
                "chapter_1",
                "chapter_2",
                "epilogue",
                "about_author",
            ]
        );
    }

    #[test]
    fn test_memoir_named_chapters() {
        let order = section_order(
            BookFormat::Memoir,
            [
                "afterword",
                "chapter_2_growing_up",
                "foreword",
                "chapter_1_early_years",
                "title_page",
            ],
        );
        assert_eq!(
            order,
            vec![
                "title_page",
                "foreword",
                "chapter_1_early_years",
                "chapter_2_growing_up",
                "afterword",
            ]
        );
    }

    #[test]
    fn test_unnumbered_chapter_sorts_last() {
        let order = section_order(
            BookFormat::TechnicalBusiness,
            ["chapter_appendix", "chapter_3", "conclusion", "chapter_1"],
        );
        assert_eq!(
            order,
            vec!["chapter_1", "chapter_3", "chapter_appendix", "conclusion"]
        );
    }

    #[test]
    fn test_absent_fixed_keys_are_skipped() {
        let order = section_order(BookFormat::Novel, ["epilogue", "copyright"]);
        assert_eq!(order, vec!["copyright", "epilogue"]);
    }

    #[test]
    fn test_sequential_format_follows_template_order() {
        let content = template(BookFormat::Cookbook, "T", "A");
        let order = content_order(BookFormat::Cookbook, &content);
        assert_eq!(
            &order[4..],
            &["introduction", "appetizers", "main_courses", "desserts"]
        );
    }

    #[test]
    fn test_unknown_keys_are_appended() {
        let order = section_order(
            BookFormat::Novel,
            ["glossary", "chapter_1", "title_page", "maps"],
        );
        assert_eq!(order, vec!["title_page", "chapter_1", "glossary", "maps"]);

        let order = section_order(BookFormat::PoetryCollection, ["zebra", "notes", "alpha"]);
        assert_eq!(order, vec!["notes", "zebra", "alpha"]);
    }

    #[test]
    fn test_order_is_a_permutation() {
        let extra = ["chapter_7", "chapter_x", "custom", "prologue", "notes"];
        for format in BookFormat::ALL {
            let content = template(format, "T", "A");
            let mut keys: Vec<&str> = content.keys().map(String::as_str).collect();
            keys.extend(extra.iter().filter(|k| !content.contains_key(**k)));

            // every prefix of the key list is a valid subset
            for n in 0..=keys.len() {
                let subset = &keys[..n];
                let order = section_order(format, subset.iter().copied());
                assert_eq!(sorted(order), sorted(subset.to_vec()), "{:?}", format);
            }
        }
    }

    #[test]
    fn test_duplicate_input_placed_once() {
        let order = section_order(BookFormat::Memoir, ["foreword", "foreword"]);
        assert_eq!(order, vec!["foreword"]);
    }
}
