//! Attribute <-> score conversion.
//!
//! Forward: category score = round(mean(attrs) * 5), overall = weighted category scores / 5.
//! Inverse: a target category or overall score is turned back into attribute maps. The
//! inverse is lossy (attributes are integers), so `set_overall_score` runs a bounded
//! correction pass and accepts whatever drift remains.
//!
//! Rounding is half-to-even throughout.

use crate::config::{
    clamp_to, ATTRIBUTE_RANGE, ATTRIBUTE_TO_CATEGORY_SCALE, CATEGORY_SCORE_RANGE,
    CATEGORY_TO_ATTRIBUTE_SCALE, CORRECTION_WINDOW, GK_WEIGHT, MENTAL_WEIGHT,
    OVERALL_DRIFT_TOLERANCE, OVERALL_SCORE_DIVISOR, OVERALL_SCORE_RANGE, PHYSICAL_WEIGHT,
    TECHNICAL_WEIGHT,
};
use crate::models::{Attribute, AttributeMap, Category, PlayerAttributes};
use serde::{Deserialize, Serialize};

fn round_half_even(x: f64) -> i64 {
    x.round_ties_even() as i64
}

fn clamp_attribute(value: i64) -> Attribute {
    // ATTRIBUTE_RANGE fits in u8
    clamp_to(value, &ATTRIBUTE_RANGE) as Attribute
}

fn weight(category: Category) -> i64 {
    match category {
        Category::Technical => TECHNICAL_WEIGHT,
        Category::Mental => MENTAL_WEIGHT,
        Category::Physical => PHYSICAL_WEIGHT,
        Category::Goalkeeping => GK_WEIGHT,
    }
}

fn mean(attrs: &AttributeMap) -> f64 {
    let total: u32 = attrs.values().map(|v| u32::from(*v)).sum();
    f64::from(total) / attrs.len() as f64
}

/// Score of one category. An empty map scores 0 (not clamped to the 5..=100 floor).
pub fn category_score(attrs: &AttributeMap) -> u32 {
    if attrs.is_empty() {
        return 0;
    }
    round_half_even(mean(attrs) * ATTRIBUTE_TO_CATEGORY_SCALE) as u32
}

pub fn technical_score(attrs: &PlayerAttributes) -> u32 {
    category_score(&attrs.technical)
}

pub fn mental_score(attrs: &PlayerAttributes) -> u32 {
    category_score(&attrs.mental)
}

pub fn physical_score(attrs: &PlayerAttributes) -> u32 {
    category_score(&attrs.physical)
}

pub fn gk_score(attrs: &PlayerAttributes) -> u32 {
    category_score(&attrs.goalkeeping)
}

/// Overall score in 10..=200.
pub fn overall_score(attrs: &PlayerAttributes) -> u32 {
    CategoryScores::from_attributes(attrs).overall()
}

/// The four category scores of a player.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub technical: u32,
    pub mental: u32,
    pub physical: u32,
    pub goalkeeping: u32,
}

impl CategoryScores {
    pub fn from_attributes(attrs: &PlayerAttributes) -> Self {
        Self {
            technical: technical_score(attrs),
            mental: mental_score(attrs),
            physical: physical_score(attrs),
            goalkeeping: gk_score(attrs),
        }
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Technical => self.technical,
            Category::Mental => self.mental,
            Category::Physical => self.physical,
            Category::Goalkeeping => self.goalkeeping,
        }
    }

    fn with(mut self, category: Category, score: u32) -> Self {
        match category {
            Category::Technical => self.technical = score,
            Category::Mental => self.mental = score,
            Category::Physical => self.physical = score,
            Category::Goalkeeping => self.goalkeeping = score,
        }
        self
    }

    /// tech*3 + mental*2 + phys*3 + gk*2
    pub fn weighted_sum(&self) -> i64 {
        Category::ALL
            .iter()
            .map(|&c| i64::from(self.get(c)) * weight(c))
            .sum()
    }

    fn rounded_overall(&self) -> i64 {
        round_half_even(self.weighted_sum() as f64 / OVERALL_SCORE_DIVISOR as f64)
    }

    /// Overall score, clamped to 10..=200.
    pub fn overall(&self) -> u32 {
        clamp_to(self.rounded_overall(), &OVERALL_SCORE_RANGE) as u32
    }
}

/// Attribute map for `category` where every attribute equals round(score / 5).
///
/// The score is clamped to 5..=100 first; the result is flat, not shaped.
pub fn set_category_score(category: Category, target_score: i64) -> AttributeMap {
    let score = clamp_to(target_score, &CATEGORY_SCORE_RANGE);
    let avg = score as f64 / CATEGORY_TO_ATTRIBUTE_SCALE;
    category.uniform(clamp_attribute(round_half_even(avg)))
}

/// Attributes for all four categories that reproduce `target_score` as closely as possible.
///
/// Technical, mental and physical share a base score interpolated from the overall range;
/// goalkeeping absorbs the remainder. Rounding drift after the attribute conversion is
/// corrected by one pass over goalkeeping candidates.
///
/// Near the top of the range goalkeeping saturates at 100 and cannot absorb the drift alone
/// (195 still comes back as 192). So when the drift exceeds `OVERALL_DRIFT_TOLERANCE` after
/// the goalkeeping pass, one pass over physical candidates follows, which keeps every target
/// in 10..=200 within the tolerance.
pub fn set_overall_score(target_score: i64) -> PlayerAttributes {
    let overall = clamp_to(target_score, &OVERALL_SCORE_RANGE);

    let (overall_min, overall_max) = (*OVERALL_SCORE_RANGE.start(), *OVERALL_SCORE_RANGE.end());
    let (category_min, category_max) =
        (*CATEGORY_SCORE_RANGE.start(), *CATEGORY_SCORE_RANGE.end());

    let normalized = (overall - overall_min) as f64 / (overall_max - overall_min) as f64;
    let target_category_score =
        category_min as f64 + normalized * (category_max - category_min) as f64;
    let base = clamp_to(target_category_score.floor() as i64, &CATEGORY_SCORE_RANGE);

    let others = base * (TECHNICAL_WEIGHT + MENTAL_WEIGHT + PHYSICAL_WEIGHT);
    let gk_exact = (overall * OVERALL_SCORE_DIVISOR - others) as f64 / GK_WEIGHT as f64;
    let gk = clamp_to(round_half_even(gk_exact), &CATEGORY_SCORE_RANGE);

    let attrs = PlayerAttributes {
        technical: set_category_score(Category::Technical, base),
        mental: set_category_score(Category::Mental, base),
        physical: set_category_score(Category::Physical, base),
        goalkeeping: set_category_score(Category::Goalkeeping, gk),
    };

    let attrs = correct_category(attrs, Category::Goalkeeping, gk, overall);
    let drift = (i64::from(overall_score(&attrs)) - overall).abs();
    if drift > OVERALL_DRIFT_TOLERANCE {
        log::debug!("overall {overall}: drift {drift} after goalkeeping pass, correcting physical");
        correct_category(attrs, Category::Physical, base, overall)
    } else {
        attrs
    }
}

/// Single pass over `anchor + adjustment + offset` candidates for one category.
///
/// Keeps the first candidate that strictly improves on the current distance to `target`.
fn correct_category(
    attrs: PlayerAttributes,
    category: Category,
    anchor: i64,
    target: i64,
) -> PlayerAttributes {
    let scores = CategoryScores::from_attributes(&attrs);
    let achieved = scores.rounded_overall();
    if achieved == target {
        return attrs;
    }

    let shortfall = target * OVERALL_SCORE_DIVISOR - scores.weighted_sum();
    let adjustment = round_half_even(shortfall as f64 / weight(category) as f64);

    let mut best_diff = (achieved - target).abs();
    let mut best_map = None;
    for offset in CORRECTION_WINDOW {
        let trial_score = clamp_to(anchor + adjustment + offset, &CATEGORY_SCORE_RANGE);
        let trial_map = set_category_score(category, trial_score);
        let trial = scores
            .with(category, category_score(&trial_map))
            .rounded_overall();
        let diff = (trial - target).abs();
        if diff < best_diff {
            best_diff = diff;
            best_map = Some(trial_map);
        }
    }

    match best_map {
        Some(map) => attrs.with(category, map),
        None => attrs,
    }
}

/// Change one attribute to `new_value` and scale the others by the resulting change in mean.
///
/// The changed attribute is clamped to 1..=20; the others are scaled by the unclamped value,
/// then rounded and clamped. Any `i64` is accepted. Unknown keys and empty maps are returned unchanged.
pub fn adjust_category_by_single_attr(
    attrs: &AttributeMap,
    changed_key: &str,
    new_value: i64,
) -> AttributeMap {
    let Some(&old_value) = attrs.get(changed_key) else {
        return attrs.clone();
    };
    let old_value = i64::from(old_value).max(1);

    let count = attrs.len() as f64;
    let current_total: i64 = attrs.values().map(|v| i64::from(*v)).sum();
    let current_avg = current_total as f64 / count;
    let new_total = current_total.saturating_sub(old_value).saturating_add(new_value);
    let new_avg = new_total as f64 / count;
    let ratio = if current_avg > 0.0 {
        new_avg / current_avg
    } else {
        1.0
    };

    attrs
        .iter()
        .map(|(key, &value)| {
            let adjusted = if key == changed_key {
                clamp_attribute(new_value)
            } else {
                clamp_attribute(round_half_even(f64::from(value) * ratio))
            };
            (key.clone(), adjusted)
        })
        .collect()
}

/// Scale every attribute so the category mean moves to `target_score / 5`, keeping its shape.
pub fn adjust_category_by_score(attrs: &AttributeMap, target_score: i64) -> AttributeMap {
    if attrs.is_empty() {
        return attrs.clone();
    }
    let current_avg = mean(attrs);
    let target_avg = target_score as f64 / CATEGORY_TO_ATTRIBUTE_SCALE;
    let ratio = if current_avg > 0.0 {
        target_avg / current_avg
    } else {
        1.0
    };
    attrs
        .iter()
        .map(|(key, &value)| {
            (
                key.clone(),
                clamp_attribute(round_half_even(f64::from(value) * ratio)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(values: &[(&str, Attribute)]) -> AttributeMap {
        values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn empty_category_scores_zero() {
        assert_eq!(category_score(&AttributeMap::new()), 0);
    }

    #[test]
    fn halves_round_to_even() {
        // 35 / 14 * 5 = 12.5
        let mut technical = Category::Technical.uniform(2);
        for key in Category::Technical.keys().take(7) {
            technical.insert(key.to_string(), 3);
        }
        assert_eq!(category_score(&technical), 12);

        // 12 / 8 * 5 = 7.5
        let mut physical = Category::Physical.uniform(1);
        for key in Category::Physical.keys().take(4) {
            physical.insert(key.to_string(), 2);
        }
        assert_eq!(category_score(&physical), 8);
    }

    #[test]
    fn overall_weights_categories() {
        let attrs = PlayerAttributes::uniform(10)
            .with(Category::Technical, Category::Technical.uniform(20))
            .with(Category::Goalkeeping, Category::Goalkeeping.uniform(1));
        // (100*3 + 50*2 + 50*3 + 5*2) / 5 = 112
        assert_eq!(overall_score(&attrs), 112);
    }

    #[test]
    fn set_category_score_clamps_target() {
        assert!(set_category_score(Category::Mental, 500).values().all(|v| *v == 20));
        assert!(set_category_score(Category::Mental, -3).values().all(|v| *v == 1));
        assert!(set_category_score(Category::Mental, 52).values().all(|v| *v == 10));
    }

    #[test]
    fn set_overall_score_endpoints_are_exact() {
        assert_eq!(set_overall_score(10), PlayerAttributes::uniform(1));
        assert_eq!(set_overall_score(200), PlayerAttributes::uniform(20));
        assert_eq!(set_overall_score(0), PlayerAttributes::uniform(1));
        assert_eq!(set_overall_score(999), PlayerAttributes::uniform(20));
    }

    #[test]
    fn goalkeeping_pass_corrects_drift() {
        // base 52 -> attributes of 10 (score 50); gk 54 -> 11 (55) gives 102 before correction
        let attrs = set_overall_score(105);
        assert_eq!(overall_score(&attrs), 104);
        assert!(attrs.technical.values().all(|v| *v == 10));
        assert!(attrs.goalkeeping.values().all(|v| *v == 12));
    }

    #[test]
    fn physical_pass_runs_when_goalkeeping_saturates() {
        let attrs = set_overall_score(195);
        assert!(attrs.goalkeeping.values().all(|v| *v == 20));
        assert!(attrs.physical.values().all(|v| *v == 20));
        assert_eq!(overall_score(&attrs), 195);
    }

    #[test]
    fn single_attr_scales_the_rest() {
        let attrs = map(&[("a", 10), ("b", 10), ("c", 10), ("d", 10)]);
        // mean 10 -> 12.5, ratio 1.25
        let out = adjust_category_by_single_attr(&attrs, "a", 20);
        assert_eq!(out["a"], 20);
        assert_eq!(out["b"], 12);
        assert_eq!(out["c"], 12);
        assert_eq!(out["d"], 12);
    }

    #[test]
    fn single_attr_clamps_changed_value() {
        let attrs = map(&[("a", 10), ("b", 10)]);
        let out = adjust_category_by_single_attr(&attrs, "a", 40);
        assert_eq!(out["a"], 20);
        assert_eq!(out["b"], 20);
    }

    #[test]
    fn single_attr_accepts_extreme_values() {
        let physical = Category::Physical.uniform(10);
        let high = adjust_category_by_single_attr(&physical, "pace", i64::MAX);
        assert!(high.values().all(|v| *v == 20));

        let low = adjust_category_by_single_attr(&physical, "pace", i64::MIN);
        assert!(low.values().all(|v| *v == 1));
    }

    #[test]
    fn single_attr_unknown_key_is_noop() {
        let attrs = map(&[("a", 4), ("b", 6)]);
        assert_eq!(adjust_category_by_single_attr(&attrs, "zzz", 20), attrs);
        assert!(adjust_category_by_single_attr(&AttributeMap::new(), "a", 5).is_empty());
    }

    #[test]
    fn score_adjustment_keeps_shape() {
        let attrs = map(&[("a", 4), ("b", 8), ("c", 12)]);
        // mean 8 -> target 80/5 = 16, ratio 2
        let out = adjust_category_by_score(&attrs, 80);
        assert_eq!(out, map(&[("a", 8), ("b", 16), ("c", 20)]));
    }
}
