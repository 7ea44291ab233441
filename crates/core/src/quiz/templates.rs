use crate::model::{Question, QuestionId};

pub const TEMPLATE_COUNT: usize = 4;

const TEMPLATES: [(&str, &str, [&str; 4], &str); TEMPLATE_COUNT] = [
    ("食べる", "たべる", ["たべる", "のむ", "いく", "くる"], "to eat"),
    ("飲む", "のむ", ["いく", "のむ", "くる", "たべる"], "to drink"),
    ("行く", "いく", ["くる", "たべる", "いく", "のむ"], "to go"),
    ("来る", "くる", ["のむ", "いく", "たべる", "くる"], "to come"),
];

/// The fixed fallback set used when no remote questions are available.
///
/// Ids run from `-1` to `-4` so they are never sent to the remote scorer.
#[must_use]
pub fn template_questions() -> Vec<Question> {
    (1_i64..)
        .zip(TEMPLATES)
        .map(|(n, (prompt, answer, options, hint))| {
            Question::choice(
                QuestionId::new(-n),
                prompt,
                answer,
                options.iter().map(|o| (*o).to_string()).collect(),
            )
            .with_hint(hint)
        })
        .collect()
}
