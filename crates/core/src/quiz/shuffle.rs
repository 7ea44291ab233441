use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::Question;

/// Uniform in-place Fisher–Yates shuffle.
pub fn shuffle_questions<R: Rng + ?Sized>(questions: &mut [Question], rng: &mut R) {
    questions.shuffle(rng);
}

/// Shuffle, then keep at most `limit` questions.
#[must_use]
pub fn prepare_questions<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    limit: Option<usize>,
    rng: &mut R,
) -> Vec<Question> {
    shuffle_questions(&mut questions, rng);
    if let Some(limit) = limit {
        questions.truncate(limit);
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn source(n: i64) -> Vec<Question> {
        (1..=n)
            .map(|i| Question::typed(QuestionId::new(i), format!("q{i}"), format!("a{i}")))
            .collect()
    }

    fn ids(questions: &[Question]) -> Vec<i64> {
        questions.iter().map(|q| q.id().value()).collect()
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=12 {
            let shuffled = prepare_questions(source(n), None, &mut rng);
            let mut got = ids(&shuffled);
            got.sort_unstable();
            assert_eq!(got, (1..=n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn limit_truncates_to_distinct_source_items() {
        let mut rng = StdRng::seed_from_u64(11);
        let prepared = prepare_questions(source(25), Some(10), &mut rng);
        assert_eq!(prepared.len(), 10);
        let unique: BTreeSet<i64> = ids(&prepared).into_iter().collect();
        assert_eq!(unique.len(), 10);
        assert!(unique.iter().all(|id| (1..=25).contains(id)));
    }

    #[test]
    fn limit_above_len_keeps_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(prepare_questions(source(4), Some(10), &mut rng).len(), 4);
    }
}
