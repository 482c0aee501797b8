//! Shared score ranking
//!
//! Top-N selection used by mutation parent picking and the scored
//! repositories. The sort is total: descending score, then creation time
//! ascending, then id ascending, so equal-score fixtures rank
//! reproducibly.

use crate::record::Scored;
use std::cmp::Ordering;

/// Sort records by descending score and keep the first `n`
///
/// NaN scores compare as equal and fall through to the time/id keys.
#[must_use]
pub fn top_by_score<R: Scored>(mut records: Vec<R>, n: usize) -> Vec<R> {
    records.sort_by(compare);
    records.truncate(n);
    records
}

fn compare<R: Scored>(a: &R, b: &R) -> Ordering {
    b.score()
        .partial_cmp(&a.score())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.record_id().cmp(&b.record_id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SessionId;
    use crate::record::Idea;

    fn idea(session: SessionId, title: &str, score: f64) -> Idea {
        Idea::new(session, title, "d", 1, vec![]).with_score(score)
    }

    #[test]
    fn ranks_by_descending_score() {
        let session = SessionId::new();
        let ideas = vec![
            idea(session, "low", 1.0),
            idea(session, "high", 5.0),
            idea(session, "mid", 3.0),
        ];
        let top = top_by_score(ideas, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].title, "high");
        assert_eq!(top[1].title, "mid");
    }

    #[test]
    fn ties_break_on_creation_order() {
        let session = SessionId::new();
        let first = idea(session, "first", 2.0);
        let second = idea(session, "second", 2.0);
        let top = top_by_score(vec![second, first.clone()], 1);
        // Same score: earlier creation wins; ULID ids settle exact ties.
        assert!(top[0].created_at <= first.created_at);
    }

    #[test]
    fn n_larger_than_input_returns_all() {
        let session = SessionId::new();
        let top = top_by_score(vec![idea(session, "only", 1.0)], 10);
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn nan_scores_do_not_panic() {
        let session = SessionId::new();
        let ideas = vec![idea(session, "nan", f64::NAN), idea(session, "ok", 1.0)];
        let top = top_by_score(ideas, 2);
        assert_eq!(top.len(), 2);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_is_sorted_and_bounded(
                scores in proptest::collection::vec(0.0f64..100.0, 0..32),
                n in 0usize..40,
            ) {
                let session = SessionId::new();
                let ideas: Vec<Idea> = scores
                    .iter()
                    .map(|&score| idea(session, "idea", score))
                    .collect();
                let input_len = ideas.len();

                let top = top_by_score(ideas, n);
                prop_assert_eq!(top.len(), n.min(input_len));
                for pair in top.windows(2) {
                    prop_assert!(pair[0].score >= pair[1].score);
                }
            }
        }
    }
}
