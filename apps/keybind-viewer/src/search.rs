//! Search filtering and match highlighting.
//!
//! A search is split into lowercase whitespace-separated terms. A keybind
//! matches when every term appears in its file name, key or binding.

use crate::keybinds::{Keybind, KeybindFile};
use regex::{Regex, RegexBuilder};

/// One row of the flattened search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub file_name: &'a str,
    pub key: &'a str,
    pub binding: &'a str,
}

/// A piece of a highlighted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            highlighted: false,
        }
    }

    fn matched(text: &'a str) -> Self {
        Self {
            text,
            highlighted: true,
        }
    }
}

/// Lowercased, non-empty, whitespace-separated terms.
pub fn search_terms(search: &str) -> Vec<String> {
    search
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn matches_terms(terms: &[String], file_name: &str, keybind: &Keybind) -> bool {
    let name = file_name.to_lowercase();
    let key = keybind.key.to_lowercase();
    let binding = keybind.binding.to_lowercase();
    terms.iter().all(|term| {
        name.contains(term.as_str()) || key.contains(term.as_str()) || binding.contains(term.as_str())
    })
}

/// Every keybind across all files whose fields cover all search terms,
/// in file order then keybind order.
pub fn filter<'a>(files: &'a [KeybindFile], search: &str) -> Vec<SearchHit<'a>> {
    let terms = search_terms(search);
    let terms = &terms;
    files
        .iter()
        .flat_map(move |file| {
            file.keybinds
                .iter()
                .filter(move |kb| matches_terms(terms, &file.name, kb))
                .map(move |kb| SearchHit {
                    file_name: &file.name,
                    key: &kb.key,
                    binding: &kb.binding,
                })
        })
        .collect()
}

/// Splits strings into plain and highlighted segments for one search.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    pub fn new(search: &str) -> Self {
        let terms = search_terms(search);
        if terms.is_empty() {
            return Self { pattern: None };
        }

        // Terms are matched literally; `c++` must not become a quantifier.
        let alternation = terms
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = match RegexBuilder::new(&alternation).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(error = %err, "highlight pattern rejected");
                None
            }
        };
        Self { pattern }
    }

    /// Segments whose concatenation is exactly `text`.
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let Some(pattern) = &self.pattern else {
            return vec![Segment::plain(text)];
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for m in pattern.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            if m.start() > last {
                segments.push(Segment::plain(&text[last..m.start()]));
            }
            segments.push(Segment::matched(m.as_str()));
            last = m.end();
        }
        if last < text.len() || segments.is_empty() {
            segments.push(Segment::plain(&text[last..]));
        }
        segments
    }
}

/// Convenience wrapper for a single string.
pub fn highlight<'a>(text: &'a str, search: &str) -> Vec<Segment<'a>> {
    Highlighter::new(search).segments(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_files() -> Vec<KeybindFile> {
        vec![
            KeybindFile::new("Editor", vec![Keybind::new("Format", "Ctrl+Shift+F")]),
            KeybindFile::new("Global", vec![Keybind::new("Save", "Ctrl+S")]),
        ]
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms("  Ctrl   S\tFoo "), vec!["ctrl", "s", "foo"]);
        assert!(search_terms("   ").is_empty());
        assert!(search_terms("").is_empty());
    }

    #[test]
    fn test_filter_example() {
        let files = sample_files();
        // `s` is also inside `Ctrl+Shift+F`, so both rows match.
        let hits = filter(&files, "ctrl s");
        assert_eq!(
            hits,
            vec![
                SearchHit {
                    file_name: "Editor",
                    key: "Format",
                    binding: "Ctrl+Shift+F",
                },
                SearchHit {
                    file_name: "Global",
                    key: "Save",
                    binding: "Ctrl+S",
                },
            ]
        );

        let hits = filter(&files, "ctrl save");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_name, "Global");
    }

    #[test]
    fn test_filter_no_results() {
        let files = sample_files();
        assert!(filter(&files, "zzz").is_empty());
    }

    #[test]
    fn test_filter_matches_file_name() {
        let files = sample_files();
        let hits = filter(&files, "EDIT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "Format");
    }

    #[test]
    fn test_filter_terms_may_hit_different_fields() {
        let files = sample_files();
        let hits = filter(&files, "global ctrl");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_name, "Global");
    }

    #[test]
    fn test_filter_whitespace_only_returns_everything() {
        let files = sample_files();
        let hits = filter(&files, "   ");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].file_name, "Editor");
        assert_eq!(hits[1].file_name, "Global");
    }

    #[test]
    fn test_filter_preserves_flatten_order() {
        let files = vec![
            KeybindFile::new("a", vec![Keybind::new("x1", "k"), Keybind::new("x2", "k")]),
            KeybindFile::new("b", vec![Keybind::new("x3", "k")]),
        ];
        let keys: Vec<&str> = filter(&files, "x").iter().map(|h| h.key).collect();
        assert_eq!(keys, vec!["x1", "x2", "x3"]);
    }

    #[test]
    fn test_highlight_empty_search_is_plain() {
        assert_eq!(highlight("Ctrl+S", ""), vec![Segment::plain("Ctrl+S")]);
        assert_eq!(highlight("Ctrl+S", "   "), vec![Segment::plain("Ctrl+S")]);
    }

    #[test]
    fn test_highlight_marks_matches_case_insensitively() {
        let segments = highlight("Ctrl+Shift+S", "ctrl s");
        assert_eq!(
            segments,
            vec![
                Segment::matched("Ctrl"),
                Segment::plain("+"),
                Segment::matched("S"),
                Segment::plain("hift+"),
                Segment::matched("S"),
            ]
        );
    }

    #[test]
    fn test_highlight_special_characters_are_literal() {
        let segments = highlight("g++ (build)", "++ (");
        assert_eq!(
            segments,
            vec![
                Segment::plain("g"),
                Segment::matched("++"),
                Segment::plain(" "),
                Segment::matched("("),
                Segment::plain("build)"),
            ]
        );
    }

    #[test]
    fn test_highlight_no_match() {
        assert_eq!(highlight("Save", "zzz"), vec![Segment::plain("Save")]);
    }

    #[test]
    fn test_highlight_empty_text() {
        assert_eq!(highlight("", "a"), vec![Segment::plain("")]);
    }

    fn keybind_strategy() -> impl Strategy<Value = Keybind> {
        ("[a-zA-Z+ ]{0,8}", "[a-zA-Z+ ]{0,8}").prop_map(|(k, b)| Keybind::new(k, b))
    }

    fn files_strategy() -> impl Strategy<Value = Vec<KeybindFile>> {
        prop::collection::vec(
            ("[a-zA-Z]{1,6}", prop::collection::vec(keybind_strategy(), 0..5))
                .prop_map(|(name, keybinds)| KeybindFile::new(name, keybinds)),
            0..5,
        )
    }

    proptest! {
        #[test]
        fn prop_highlight_reassembles_input(text in "\\PC{0,24}", search in "\\PC{0,12}") {
            let segments = highlight(&text, &search);
            prop_assert_eq!(joined(&segments), text);
        }

        #[test]
        fn prop_search_built_from_a_row_finds_that_row(
            files in files_strategy(),
            pick in any::<prop::sample::Index>(),
            cuts in any::<[prop::sample::Index; 6]>(),
        ) {
            let rows: Vec<(&str, &Keybind)> = files
                .iter()
                .flat_map(|f| f.keybinds.iter().map(move |kb| (f.name.as_str(), kb)))
                .collect();
            prop_assume!(!rows.is_empty());
            let (name, kb) = rows[pick.index(rows.len())];

            // One slice of each field, upper-cased to exercise case folding.
            let slice = |field: &str, a: &prop::sample::Index, b: &prop::sample::Index| {
                let (i, j) = (a.index(field.len() + 1), b.index(field.len() + 1));
                field[i.min(j)..i.max(j)].to_uppercase()
            };
            let search = format!(
                "{} {} {}",
                slice(name, &cuts[0], &cuts[1]),
                slice(kb.key.as_str(), &cuts[2], &cuts[3]),
                slice(kb.binding.as_str(), &cuts[4], &cuts[5]),
            );

            let hits = filter(&files, &search);
            let expected = SearchHit { file_name: name, key: &kb.key, binding: &kb.binding };
            prop_assert!(hits.contains(&expected), "{:?} missing for {:?}", expected, search);
        }

        #[test]
        fn prop_term_absent_everywhere_excludes_all(
            files in files_strategy(),
            search in "[a-zA-Z+ ]{0,6}",
        ) {
            // `#` never occurs in generated fields.
            let search = format!("{} #", search);
            prop_assert!(filter(&files, &search).is_empty());
        }

        #[test]
        fn prop_hits_keep_flatten_order(files in files_strategy(), search in "[a-zA-Z+ ]{1,4}") {
            let flat: Vec<SearchHit> = filter(&files, "");
            let hits = filter(&files, &search);
            let mut rest = flat.iter();
            for hit in &hits {
                prop_assert!(rest.any(|row| row == hit));
            }
        }

        #[test]
        fn prop_whitespace_search_keeps_all(files in files_strategy(), search in "[ \t]{1,5}") {
            let total: usize = files.iter().map(|f| f.keybinds.len()).sum();
            prop_assert_eq!(filter(&files, &search).len(), total);
        }
    }
}
