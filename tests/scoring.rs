//! Integration tests for attribute <-> score conversion.

use club_team_manager::{
    adjust_category_by_score, adjust_category_by_single_attr, gk_score, mental_score,
    overall_score, physical_score, set_category_score, set_overall_score, technical_score,
    AttributeMap, Category, CategoryScores, Player, PlayerAttributes, Rated,
};
use proptest::prelude::*;

#[test]
fn all_ones_score_the_minimum() {
    let attrs = PlayerAttributes::uniform(1);
    assert_eq!(technical_score(&attrs), 5);
    assert_eq!(mental_score(&attrs), 5);
    assert_eq!(physical_score(&attrs), 5);
    assert_eq!(gk_score(&attrs), 5);
    assert_eq!(overall_score(&attrs), 10);
}

#[test]
fn all_twenties_score_the_maximum() {
    let attrs = PlayerAttributes::uniform(20);
    assert_eq!(
        CategoryScores::from_attributes(&attrs),
        CategoryScores {
            technical: 100,
            mental: 100,
            physical: 100,
            goalkeeping: 100,
        }
    );
    assert_eq!(overall_score(&attrs), 200);
}

#[test]
fn player_overall_matches_attribute_overall() {
    let player = Player::with_attributes("Keeper", set_overall_score(150));
    assert_eq!(player.overall_score(), overall_score(&player.attributes));
    assert_eq!(player.summary().overall, 150);
}

#[test]
fn every_overall_target_round_trips_within_two() {
    for target in 10..=200 {
        let achieved = i64::from(overall_score(&set_overall_score(target)));
        assert!(
            (achieved - target).abs() <= 2,
            "target {target} came back as {achieved}"
        );
    }
}

#[test]
fn set_overall_score_fills_every_catalog_key() {
    let attrs = set_overall_score(123);
    for category in Category::ALL {
        let map = attrs.get(category);
        assert!(category.keys().all(|k| map.contains_key(k)));
        assert_eq!(map.len(), category.keys().count());
    }
}

fn any_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Technical),
        Just(Category::Mental),
        Just(Category::Physical),
        Just(Category::Goalkeeping),
    ]
}

fn attributes() -> impl Strategy<Value = PlayerAttributes> {
    (
        prop::collection::vec(1u8..=20, 14),
        prop::collection::vec(1u8..=20, 14),
        prop::collection::vec(1u8..=20, 8),
        prop::collection::vec(1u8..=20, 5),
    )
        .prop_map(|(t, m, p, g)| {
            let fill = |category: Category, values: Vec<u8>| -> AttributeMap {
                category.keys().map(str::to_string).zip(values).collect()
            };
            PlayerAttributes {
                technical: fill(Category::Technical, t),
                mental: fill(Category::Mental, m),
                physical: fill(Category::Physical, p),
                goalkeeping: fill(Category::Goalkeeping, g),
            }
        })
}

proptest! {
    #[test]
    fn scores_stay_in_range(attrs in attributes()) {
        let scores = CategoryScores::from_attributes(&attrs);
        for category in Category::ALL {
            prop_assert!((5..=100).contains(&scores.get(category)));
        }
        prop_assert!((10..=200).contains(&overall_score(&attrs)));
    }

    #[test]
    fn raising_one_attribute_never_lowers_its_category(
        attrs in attributes(),
        category in any_category(),
        idx in 0usize..5,
    ) {
        let map = attrs.get(category);
        let key = category.keys().nth(idx).unwrap().to_string();
        let before = club_team_manager::category_score(map);
        let mut raised = map.clone();
        let v = raised[&key];
        raised.insert(key, (v + 1).min(20));
        prop_assert!(club_team_manager::category_score(&raised) >= before);
    }

    #[test]
    fn set_category_score_is_flat(category in any_category(), target in -50i64..200) {
        let map = set_category_score(category, target);
        let first = *map.values().next().unwrap();
        prop_assert!(map.values().all(|v| *v == first));
        prop_assert!((1..=20).contains(&first));
    }

    #[test]
    fn adjustments_keep_attributes_in_range(
        attrs in attributes(),
        category in any_category(),
        value in -5i64..30,
        target in 0i64..150,
    ) {
        let map = attrs.get(category);
        let key = category.keys().next().unwrap();
        let single = adjust_category_by_single_attr(map, key, value);
        prop_assert_eq!(single.len(), map.len());
        prop_assert!(single.values().all(|v| (1..=20).contains(v)));
        prop_assert_eq!(i64::from(single[key]), value.clamp(1, 20));

        let scaled = adjust_category_by_score(map, target);
        prop_assert_eq!(scaled.len(), map.len());
        prop_assert!(scaled.values().all(|v| (1..=20).contains(v)));
    }
}
