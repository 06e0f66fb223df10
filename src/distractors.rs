//! Plausible wrong answers for multiple-choice questions.
//!
//! Candidates are ranked by an additive visual-similarity score so that the
//! decoys shown next to a flag are the ones most easily confused with it.

use crate::catalog::Item;
use crate::config::QuizConfig;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

const SAME_CATEGORY_SCORE: u32 = 2;
const SHARED_COLOR_SCORE: u32 = 2;
const IDENTICAL_PALETTE_BONUS: u32 = 6;
const SAME_LAYOUT_SCORE: u32 = 3;

fn palette(item: &Item) -> HashSet<String> {
    item.colors.iter().map(|c| c.to_lowercase()).collect()
}

/// Symmetric similarity between two items
pub fn similarity(a: &Item, b: &Item) -> u32 {
    let mut score = 0;

    if a.category.eq_ignore_ascii_case(&b.category) {
        score += SAME_CATEGORY_SCORE;
    }

    let colors_a = palette(a);
    let colors_b = palette(b);
    let shared = colors_a.intersection(&colors_b).count() as u32;
    score += shared * SHARED_COLOR_SCORE;

    if !colors_a.is_empty() && colors_a == colors_b && a.colors.len() == b.colors.len() {
        score += IDENTICAL_PALETTE_BONUS;
    }

    if !a.layout.is_empty() && a.layout.eq_ignore_ascii_case(&b.layout) {
        score += SAME_LAYOUT_SCORE;
    }

    score
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistractorSelector {
    /// Minimum score for the high-similarity candidate set
    threshold: u32,
    /// Size of the best-ranked fallback set
    fallback_pool_size: usize,
}

impl DistractorSelector {
    pub fn new(threshold: u32, fallback_pool_size: usize) -> Self {
        Self {
            threshold,
            fallback_pool_size,
        }
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(config.similarity_threshold, config.fallback_pool_size)
    }

    /// Every item of `pool` except the target, best match first
    ///
    /// Equal scores keep their pool order.
    pub fn rank<'a>(&self, target: &Item, pool: &'a [Item]) -> Vec<(&'a Item, u32)> {
        let mut scored: Vec<(&Item, u32)> = pool
            .iter()
            .filter(|candidate| candidate.code != target.code)
            .map(|candidate| (candidate, similarity(target, candidate)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
    }

    /// Up to `count` distinct decoys for `target`, never the target itself
    ///
    /// Draws from the high-similarity set when it holds enough candidates,
    /// otherwise from the best-ranked fallback set. Pools smaller than
    /// `count` yield every available item.
    pub fn select<R: Rng + ?Sized>(
        &self,
        target: &Item,
        pool: &[Item],
        count: usize,
        rng: &mut R,
    ) -> Vec<Item> {
        let mut seen = HashSet::new();
        let ranked: Vec<(&Item, u32)> = self
            .rank(target, pool)
            .into_iter()
            .filter(|(item, _)| seen.insert(item.code.as_str()))
            .collect();

        let high: Vec<&Item> = ranked
            .iter()
            .filter(|(_, score)| *score >= self.threshold)
            .map(|(item, _)| *item)
            .collect();

        let mut candidates = if high.len() >= count {
            high
        } else {
            ranked
                .iter()
                .take(self.fallback_pool_size.max(count))
                .map(|(item, _)| *item)
                .collect()
        };

        candidates.shuffle(rng);
        candidates.into_iter().take(count).cloned().collect()
    }
}

impl Default for DistractorSelector {
    fn default() -> Self {
        Self::from_config(&QuizConfig::default())
    }
}

/// Answer options: the target plus its decoys, in random order
pub fn answer_options<R: Rng + ?Sized>(target: &Item, distractors: Vec<Item>, rng: &mut R) -> Vec<Item> {
    let mut options = distractors;
    options.push(target.clone());
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scenario() -> (Item, Vec<Item>) {
        let a = Item::new("A", "Alpha", "X", &["red", "white"], "stripes");
        let b = Item::new("B", "Beta", "X", &["red", "white"], "stripes");
        let c = Item::new("C", "Gamma", "Y", &["blue"], "cross");
        let d = Item::new("D", "Delta", "Y", &["blue"], "stripes");
        (a, vec![b, c, d])
    }

    fn codes(items: &[Item]) -> HashSet<String> {
        items.iter().map(|i| i.code.clone()).collect()
    }

    #[test]
    fn test_similarity_components() {
        let (a, pool) = scenario();
        assert_eq!(similarity(&a, &pool[0]), 15);
        assert_eq!(similarity(&a, &pool[1]), 0);
        assert_eq!(similarity(&a, &pool[2]), 3);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let (a, pool) = scenario();
        for other in &pool {
            assert_eq!(similarity(&a, other), similarity(other, &a));
        }
    }

    #[test]
    fn test_color_comparison_ignores_case() {
        let a = Item::new("a", "a", "X", &["Red", "WHITE"], "");
        let b = Item::new("b", "b", "Y", &["red", "white"], "");
        assert_eq!(similarity(&a, &b), 2 * 2 + 6);
    }

    #[test]
    fn test_identical_palette_beats_shared_category() {
        let target = Item::new("t", "t", "X", &["green", "white"], "disc");
        let lookalike = Item::new("l", "l", "Y", &["green", "white"], "disc");
        let neighbour = Item::new("n", "n", "X", &["black"], "cross");
        assert!(similarity(&target, &lookalike) > similarity(&target, &neighbour));
    }

    #[test]
    fn test_partial_palette_gets_no_bonus() {
        let a = Item::new("a", "a", "X", &["red", "white", "blue"], "");
        let b = Item::new("b", "b", "Y", &["red", "white"], "");
        assert_eq!(similarity(&a, &b), 4);
    }

    #[test]
    fn test_rank_orders_by_score_and_excludes_target() {
        let (a, mut pool) = scenario();
        pool.push(a.clone());
        let ranked = DistractorSelector::default().rank(&a, &pool);

        let order: Vec<&str> = ranked.iter().map(|(i, _)| i.code.as_str()).collect();
        assert_eq!(order, vec!["B", "D", "C"]);
        assert_eq!(ranked[0].1, 15);
    }

    #[test]
    fn test_small_pool_returns_every_other_item() {
        let (a, pool) = scenario();
        let mut rng = StdRng::seed_from_u64(7);
        let selected = DistractorSelector::default().select(&a, &pool, 3, &mut rng);

        assert_eq!(selected.len(), 3);
        assert_eq!(
            codes(&selected),
            ["B", "C", "D"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn test_never_includes_target() {
        let (a, mut pool) = scenario();
        pool.push(a.clone());
        let selector = DistractorSelector::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = selector.select(&a, &pool, 3, &mut rng);
            assert!(selected.iter().all(|i| i.code != "A"));
            assert_eq!(selected.len(), 3);
        }
    }

    #[test]
    fn test_tiny_pool_degrades_gracefully() {
        let (a, pool) = scenario();
        let mut rng = StdRng::seed_from_u64(1);
        let selected = DistractorSelector::default().select(&a, &pool[..1], 3, &mut rng);
        assert_eq!(selected.len(), 1);

        let none = DistractorSelector::default().select(&a, &[], 3, &mut rng);
        assert!(none.is_empty());
    }

    #[test]
    fn test_prefers_high_similarity_set_when_large_enough() {
        let target = Item::new("t", "t", "X", &["red", "white"], "stripes");
        let mut pool = vec![
            Item::new("h1", "h1", "X", &["red", "white"], "stripes"),
            Item::new("h2", "h2", "X", &["red"], "stripes"),
            Item::new("h3", "h3", "Y", &["red", "white"], "cross"),
        ];
        for i in 0..10 {
            let code = format!("low{}", i);
            pool.push(Item::new(&code, &code, "Z", &["green"], "disc"));
        }
        let selector = DistractorSelector::default();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = selector.select(&target, &pool, 3, &mut rng);
            assert_eq!(
                codes(&selected),
                ["h1", "h2", "h3"].iter().map(|s| s.to_string()).collect()
            );
        }
    }

    #[test]
    fn test_fallback_limited_to_top_ranked() {
        let target = Item::new("t", "t", "X", &["red"], "stripes");
        let mut pool = vec![Item::new("near", "near", "Y", &["red"], "stripes")];
        for i in 0..5 {
            let code = format!("far{}", i);
            pool.push(Item::new(&code, &code, "Z", &["green"], "disc"));
        }
        let selector = DistractorSelector::new(5, 3);
        let mut rng = StdRng::seed_from_u64(3);
        let selected = selector.select(&target, &pool, 3, &mut rng);

        assert_eq!(selected.len(), 3);
        assert!(selected.iter().any(|i| i.code == "near"));
    }

    #[test]
    fn test_duplicate_codes_in_pool_are_not_repeated() {
        let (a, pool) = scenario();
        let mut doubled = pool.clone();
        doubled.extend(pool);
        let mut rng = StdRng::seed_from_u64(11);
        let selected = DistractorSelector::default().select(&a, &doubled, 3, &mut rng);
        assert_eq!(codes(&selected).len(), 3);
    }

    #[test]
    fn test_answer_options_contain_target_once() {
        let (a, pool) = scenario();
        let mut rng = StdRng::seed_from_u64(5);
        let options = answer_options(&a, pool, &mut rng);
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|i| i.code == "A").count(), 1);
    }
}
