use std::cmp::Ordering;

use crate::{models::CategoryLabel, services::scoring::ScoreVector};

/// Number of categories selected per request
pub const TOP_CATEGORIES: usize = 3;

/// Picks the `n` highest-scoring categories, best first.
///
/// The sort is stable, so categories with equal scores keep the backend's
/// native enumeration order. Returns `min(n, scores.len())` pairs.
pub fn select_top(scores: &ScoreVector, n: usize) -> Vec<(CategoryLabel, f64)> {
    let mut ranked: Vec<(CategoryLabel, f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked.truncate(n);
    ranked
}

/// Descending order for scores; incomparable values compare equal
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use CategoryLabel::*;

    #[test]
    fn test_orders_by_score() {
        let scores = ScoreVector::from_entries([
            (MathBasic, 0.1),
            (ScienceAdvanced, 0.7),
            (LanguageAdvanced, 0.3),
            (GeneralStudies, 0.2),
        ]);
        assert_eq!(
            select_top(&scores, 3),
            vec![(ScienceAdvanced, 0.7), (LanguageAdvanced, 0.3), (GeneralStudies, 0.2)]
        );
    }

    #[test]
    fn test_ties_keep_native_order() {
        let scores = ScoreVector::from_entries([
            (GeneralStudies, 0.5),
            (MathBasic, 0.5),
            (ScienceBasic, 0.9),
            (MathAdvanced, 0.5),
        ]);
        assert_eq!(
            select_top(&scores, 3),
            vec![(ScienceBasic, 0.9), (GeneralStudies, 0.5), (MathBasic, 0.5)]
        );
    }

    #[test]
    fn test_all_tied_is_deterministic() {
        let scores = ScoreVector::from_entries(CategoryLabel::ALL.map(|label| (label, 1.0)));
        for _ in 0..10 {
            let selected: Vec<CategoryLabel> =
                select_top(&scores, 4).into_iter().map(|(label, _)| label).collect();
            assert_eq!(selected, CategoryLabel::ALL[..4].to_vec());
        }
    }

    #[test]
    fn test_n_larger_than_scores() {
        let scores = ScoreVector::from_entries([(MathBasic, 0.1), (MathAdvanced, 0.2)]);
        assert_eq!(select_top(&scores, 3).len(), 2);
        assert!(select_top(&scores, 0).is_empty());
        assert!(select_top(&ScoreVector::default(), 3).is_empty());
    }
}
