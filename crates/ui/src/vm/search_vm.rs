use services::SearchResults;
use study_core::model::StudyRecord;

use crate::vm::markdown_vm::{plain_text_html, render_markdown};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHitVm {
    pub key: String,
    pub title: String,
    pub body_html: String,
    pub example: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSectionVm {
    pub label: &'static str,
    pub hits: Vec<SearchHitVm>,
}

/// Group results by record kind, vocabulary first.
///
/// Grammar explanations and note contents are Markdown; everything else is
/// plain text.
#[must_use]
pub fn map_search_results(results: &SearchResults) -> Vec<SearchSectionVm> {
    let mut sections: Vec<SearchSectionVm> = Vec::new();
    for (position, record) in results.records.iter().enumerate() {
        let label = record.kind_label();
        let hit = map_hit(position, record);
        match sections.iter_mut().find(|section| section.label == label) {
            Some(section) => section.hits.push(hit),
            None => sections.push(SearchSectionVm {
                label,
                hits: vec![hit],
            }),
        }
    }
    sections
}

fn map_hit(position: usize, record: &StudyRecord) -> SearchHitVm {
    let (body_html, example) = match record {
        StudyRecord::Vocabulary(v) => (plain_text_html(&v.meaning), v.example.clone()),
        StudyRecord::Grammar(g) => (render_markdown(&g.explanation), g.examples.first().cloned()),
        StudyRecord::Note(n) => (render_markdown(&n.content), None),
        StudyRecord::TestQuestion(q) => (plain_text_html(q.correct_answer()), q.hint().map(str::to_string)),
    };
    SearchHitVm {
        key: format!("{}-{position}", record.kind_label()),
        title: record.title().to_string(),
        body_html,
        example,
    }
}

#[must_use]
pub fn summary_label(results: &SearchResults) -> String {
    match results.records.len() {
        0 if results.query.is_empty() => String::new(),
        0 => format!("No results for \"{}\"", results.query),
        1 => format!("1 result for \"{}\"", results.query),
        n => format!("{n} results for \"{}\"", results.query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{GrammarRecord, NoteRecord, VocabularyRecord};

    fn results() -> SearchResults {
        SearchResults {
            query: "eat".into(),
            records: vec![
                StudyRecord::Vocabulary(VocabularyRecord {
                    id: 1,
                    word: "食べる".into(),
                    meaning: "to eat".into(),
                    example: Some("ご飯を食べる".into()),
                }),
                StudyRecord::Grammar(GrammarRecord {
                    id: 2,
                    pattern: "〜ながら".into(),
                    explanation: "while *doing*".into(),
                    examples: vec!["食べながら話す".into()],
                }),
                StudyRecord::Note(NoteRecord {
                    id: 3,
                    title: None,
                    content: "eat <script>x</script>".into(),
                }),
                StudyRecord::Vocabulary(VocabularyRecord {
                    id: 4,
                    word: "食事".into(),
                    meaning: "meal".into(),
                    example: None,
                }),
            ],
        }
    }

    #[test]
    fn groups_by_kind_in_first_seen_order() {
        let sections = map_search_results(&results());
        let labels: Vec<_> = sections.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Vocabulary", "Grammar", "Note"]);
        assert_eq!(sections[0].hits.len(), 2);
        assert_eq!(sections[2].hits[0].title, "Untitled note");
    }

    #[test]
    fn markdown_bodies_are_rendered_and_sanitized() {
        let sections = map_search_results(&results());
        assert!(sections[1].hits[0].body_html.contains("<em>doing</em>"));
        assert!(!sections[2].hits[0].body_html.contains("script"));
        assert_eq!(sections[0].hits[0].example.as_deref(), Some("ご飯を食べる"));
    }

    #[test]
    fn summary_counts_results() {
        assert_eq!(summary_label(&results()), "4 results for \"eat\"");
        assert_eq!(summary_label(&SearchResults::empty("")), "");
        assert_eq!(summary_label(&SearchResults::empty("zzz")), "No results for \"zzz\"");
    }
}
