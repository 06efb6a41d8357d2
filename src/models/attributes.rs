//! Attribute categories, their fixed catalogs, and a player's attribute maps.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single skill rating, kept in 1..=20.
pub type Attribute = u8;

/// Attribute name -> value for one category.
pub type AttributeMap = BTreeMap<String, Attribute>;

/// Technical attributes in display order: (key, label).
pub const TECHNICAL_ATTRS: [(&str, &str); 14] = [
    ("corners", "Corners"),
    ("crossing", "Crossing"),
    ("dribbling", "Dribbling"),
    ("finishing", "Finishing"),
    ("first_touch", "First Touch"),
    ("free_kick_taking", "Free Kick Taking"),
    ("heading", "Heading"),
    ("long_shots", "Long Shots"),
    ("long_throws", "Long Throws"),
    ("marking", "Marking"),
    ("passing", "Passing"),
    ("penalty_taking", "Penalty Taking"),
    ("tackling", "Tackling"),
    ("technique", "Technique"),
];

pub const MENTAL_ATTRS: [(&str, &str); 14] = [
    ("aggression", "Aggression"),
    ("anticipation", "Anticipation"),
    ("bravery", "Bravery"),
    ("composure", "Composure"),
    ("concentration", "Concentration"),
    ("decisions", "Decisions"),
    ("determination", "Determination"),
    ("flair", "Flair"),
    ("leadership", "Leadership"),
    ("off_the_ball", "Off The Ball"),
    ("positioning", "Positioning"),
    ("teamwork", "Teamwork"),
    ("vision", "Vision"),
    ("work_rate", "Work Rate"),
];

pub const PHYSICAL_ATTRS: [(&str, &str); 8] = [
    ("acceleration", "Acceleration"),
    ("agility", "Agility"),
    ("balance", "Balance"),
    ("jumping_reach", "Jumping Reach"),
    ("natural_fitness", "Natural Fitness"),
    ("pace", "Pace"),
    ("stamina", "Stamina"),
    ("strength", "Strength"),
];

pub const GK_ATTRS: [(&str, &str); 5] = [
    ("handling", "Handling"),
    ("reflexes", "Reflexes"),
    ("one_on_ones", "One-on-Ones"),
    ("diving", "Diving"),
    ("rushing_out", "Rushing Out"),
];

/// One of the four attribute groups.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Mental,
    Physical,
    #[serde(alias = "gk")]
    Goalkeeping,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Technical,
        Category::Mental,
        Category::Physical,
        Category::Goalkeeping,
    ];

    /// The fixed (key, label) catalog for this category, in display order.
    pub fn catalog(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Technical => &TECHNICAL_ATTRS,
            Category::Mental => &MENTAL_ATTRS,
            Category::Physical => &PHYSICAL_ATTRS,
            Category::Goalkeeping => &GK_ATTRS,
        }
    }

    pub fn keys(self) -> impl Iterator<Item = &'static str> {
        self.catalog().iter().map(|(key, _)| *key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Technical => "Technical",
            Category::Mental => "Mental",
            Category::Physical => "Physical",
            Category::Goalkeeping => "Goalkeeping",
        }
    }

    /// Whether `key` belongs to this category's catalog.
    pub fn contains(self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }

    /// Map with every catalog key set to `value`.
    pub fn uniform(self, value: Attribute) -> AttributeMap {
        self.keys().map(|k| (k.to_string(), value)).collect()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A player's four attribute maps.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub technical: AttributeMap,
    pub mental: AttributeMap,
    pub physical: AttributeMap,
    #[serde(alias = "gk")]
    pub goalkeeping: AttributeMap,
}

impl PlayerAttributes {
    /// Every attribute in every category set to `value`.
    pub fn uniform(value: Attribute) -> Self {
        Self {
            technical: Category::Technical.uniform(value),
            mental: Category::Mental.uniform(value),
            physical: Category::Physical.uniform(value),
            goalkeeping: Category::Goalkeeping.uniform(value),
        }
    }

    /// Each attribute drawn uniformly from 1..=20.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut draw = |category: Category| -> AttributeMap {
            category
                .keys()
                .map(|k| (k.to_string(), rng.gen_range(1..=20)))
                .collect()
        };
        Self {
            technical: draw(Category::Technical),
            mental: draw(Category::Mental),
            physical: draw(Category::Physical),
            goalkeeping: draw(Category::Goalkeeping),
        }
    }

    pub fn get(&self, category: Category) -> &AttributeMap {
        match category {
            Category::Technical => &self.technical,
            Category::Mental => &self.mental,
            Category::Physical => &self.physical,
            Category::Goalkeeping => &self.goalkeeping,
        }
    }

    /// Replace one category's map, returning the updated attributes.
    pub fn with(mut self, category: Category, attrs: AttributeMap) -> Self {
        match category {
            Category::Technical => self.technical = attrs,
            Category::Mental => self.mental = attrs,
            Category::Physical => self.physical = attrs,
            Category::Goalkeeping => self.goalkeeping = attrs,
        }
        self
    }
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::uniform(10)
    }
}
