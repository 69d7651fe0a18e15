//! Format template catalog
//!
//! One table row per supported format: display name, the sections a new book
//! starts with (beyond the four base sections) and how sections are ordered.
//! Adding a format means adding a row here and a variant to [`BookFormat`].

use chrono::{Datelike, Local};

use crate::models::{BookFormat, Content};

/// How a format orders its sections after the base prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderRule {
    /// Lead section, numbered chapters, then a fixed tail
    Chaptered {
        lead: &'static str,
        tail: &'static [&'static str],
    },
    /// Template order, then anything else
    Sequential,
}

/// Catalog entry for one format
#[derive(Debug)]
pub struct FormatSpec {
    pub format: BookFormat,
    pub key: &'static str,
    pub display_name: &'static str,
    /// Format-specific sections in template order; `{author}` is substituted
    pub sections: &'static [(&'static str, &'static str)],
    pub order: OrderRule,
}

impl FormatSpec {
    /// Whether chapters can be added to and removed from books of this format
    pub fn has_chapters(&self) -> bool {
        matches!(self.order, OrderRule::Chaptered { .. })
    }

    /// Keys of the format-specific template sections
    pub fn section_keys(&self) -> impl Iterator<Item = &'static str> {
        self.sections.iter().map(|(key, _)| *key)
    }
}

static CATALOG: [FormatSpec; 6] = [
    FormatSpec {
        format: BookFormat::Novel,
        key: "novel",
        display_name: "Novel",
        sections: &[
            ("prologue", "# Prologue\n\n[Set the stage for your story...]"),
            ("chapter_1", "# Chapter 1\n\n[Begin your story here...]"),
            ("chapter_2", "# Chapter 2\n\n[Continue your narrative...]"),
            ("epilogue", "# Epilogue\n\n[Conclude your story...]"),
            ("about_author", "About the Author\n\n{author} is..."),
        ],
        order: OrderRule::Chaptered {
            lead: "prologue",
            tail: &["epilogue", "about_author"],
        },
    },
    FormatSpec {
        format: BookFormat::PoetryCollection,
        key: "poetry_collection",
        display_name: "Poetry Collection",
        sections: &[
            ("introduction", "# Introduction\n\n[Introduce your poetry collection...]"),
            (
                "section_1_love",
                "# Love & Relationships\n\n[Your first poem here...]\n\n---\n\n[Second poem here...]",
            ),
            ("section_2_nature", "# Nature & Seasons\n\n[Nature-themed poems...]"),
            ("section_3_life", "# Life & Growth\n\n[Reflective poems...]"),
            ("section_4_dreams", "# Dreams & Aspirations\n\n[Inspirational poems...]"),
            ("notes", "# Notes\n\n[Background on your poems...]"),
        ],
        order: OrderRule::Sequential,
    },
    FormatSpec {
        format: BookFormat::Memoir,
        key: "memoir",
        display_name: "Memoir",
        sections: &[
            ("foreword", "# Foreword\n\n[Why you're telling your story...]"),
            (
                "chapter_1_early_years",
                "# Chapter 1: Early Years\n\n[Your childhood memories...]",
            ),
            (
                "chapter_2_growing_up",
                "# Chapter 2: Growing Up\n\n[Your teenage years...]",
            ),
            ("afterword", "# Afterword\n\n[Final thoughts and hopes...]"),
        ],
        order: OrderRule::Chaptered {
            lead: "foreword",
            tail: &["afterword"],
        },
    },
    FormatSpec {
        format: BookFormat::Cookbook,
        key: "cookbook",
        display_name: "Cookbook",
        sections: &[
            (
                "introduction",
                "# Introduction\n\n[Your cooking philosophy and story...]",
            ),
            (
                "appetizers",
                "# Appetizers & Starters\n\n## Recipe Name\n\n**Ingredients:**\n- Ingredient 1\n- Ingredient 2\n\n**Instructions:**\n1. Step 1\n2. Step 2\n\n**Serves:** 4\n**Prep Time:** 15 minutes\n**Cook Time:** 20 minutes",
            ),
            ("main_courses", "# Main Courses\n\n[Your main dish recipes...]"),
            ("desserts", "# Desserts\n\n[Your dessert recipes...]"),
        ],
        order: OrderRule::Sequential,
    },
    FormatSpec {
        format: BookFormat::ChildrensBook,
        key: "children_s_book",
        display_name: "Children's Book",
        sections: &[
            (
                "chapter_1",
                "# Chapter 1\n\n[Once upon a time...]\n\n[Illustration note: Describe the scene for an illustrator]",
            ),
            (
                "chapter_2",
                "# Chapter 2\n\n[Continue the adventure...]\n\n[Illustration note: What should be shown here]",
            ),
            (
                "activities",
                "# Fun Activities\n\n[Coloring pages, puzzles, or games related to your story...]",
            ),
        ],
        order: OrderRule::Sequential,
    },
    FormatSpec {
        format: BookFormat::TechnicalBusiness,
        key: "technical_business",
        display_name: "Technical/Business",
        sections: &[
            ("preface", "# Preface\n\n[Why this book is needed...]"),
            (
                "chapter_1_introduction",
                "# Chapter 1: Introduction\n\n[Introduce the topic and objectives...]",
            ),
            (
                "chapter_2_fundamentals",
                "# Chapter 2: Fundamentals\n\n[Basic concepts and principles...]",
            ),
            ("conclusion", "# Conclusion\n\n[Summary and final thoughts...]"),
            ("bibliography", "# Bibliography\n\n[Sources and references...]"),
        ],
        order: OrderRule::Chaptered {
            lead: "preface",
            tail: &["conclusion", "bibliography"],
        },
    },
];

/// All catalog entries, in menu order
pub fn all() -> &'static [FormatSpec] {
    &CATALOG
}

/// Catalog entry for a format
pub fn spec(format: BookFormat) -> &'static FormatSpec {
    let row = match format {
        BookFormat::Novel => 0,
        BookFormat::PoetryCollection => 1,
        BookFormat::Memoir => 2,
        BookFormat::Cookbook => 3,
        BookFormat::ChildrensBook => 4,
        BookFormat::TechnicalBusiness => 5,
    };
    &CATALOG[row]
}

/// Look up a catalog entry by its stored key
pub fn spec_by_key(key: &str) -> Option<&'static FormatSpec> {
    CATALOG.iter().find(|spec| spec.key == key)
}

/// Initial content for a new book, dated with the current year
pub fn template(format: BookFormat, title: &str, author: &str) -> Content {
    template_for_year(format, title, author, Local::now().year())
}

/// Initial content for a new book with an explicit copyright year
pub fn template_for_year(format: BookFormat, title: &str, author: &str, year: i32) -> Content {
    let mut content = Content::new();
    content.insert("title_page".into(), format!("{}\n\nby {}", title, author));
    content.insert(
        "copyright".into(),
        format!("Copyright © {} by {}\nAll rights reserved.", year, author),
    );
    content.insert(
        "dedication".into(),
        "[Dedicate your book to someone special...]".into(),
    );
    content.insert(
        "acknowledgments".into(),
        "[Thank those who helped make this book possible...]".into(),
    );

    for (key, text) in spec(format).sections {
        content.insert((*key).to_string(), text.replace("{author}", author));
    }
    content
}

/// Boilerplate for a chapter added after creation
pub fn chapter_boilerplate(n: u32) -> String {
    format!("# Chapter {}\n\n[Write your chapter content here...]", n)
}
