use serde::{Deserialize, Serialize};

use super::record::{Nutrient, NutritionRecord, MACRO_FIELDS, SECTIONS};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub key: Option<String>,
    pub name: Option<String>,
    pub food_group: Option<String>,
}

impl From<&NutritionRecord> for FoodSummary {
    fn from(r: &NutritionRecord) -> Self {
        Self {
            key: r.key(),
            name: r.name(),
            food_group: r.food_group(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<FoodSummary>,
}

#[derive(Debug, Serialize)]
pub struct FactSection {
    pub title: &'static str,
    pub nutrients: Vec<Nutrient>,
}

#[derive(Debug, Serialize)]
pub struct FoodFacts {
    pub key: Option<String>,
    pub name: Option<String>,
    pub food_group: Option<String>,
    pub macros: Vec<Nutrient>,
    /// Only sections with at least one usable value.
    pub sections: Vec<FactSection>,
}

impl From<&NutritionRecord> for FoodFacts {
    fn from(r: &NutritionRecord) -> Self {
        let all = r.nutrients();
        let pick = |fields: &[&str]| -> Vec<Nutrient> {
            all.iter()
                .filter(|n| fields.contains(&n.name.as_str()))
                .cloned()
                .collect()
        };
        let sections = SECTIONS
            .iter()
            .filter_map(|&(title, fields)| {
                let nutrients = pick(fields);
                (!nutrients.is_empty()).then_some(FactSection { title, nutrients })
            })
            .collect();
        Self {
            key: r.key(),
            name: r.name(),
            food_group: r.food_group(),
            macros: pick(MACRO_FIELDS),
            sections,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub count: usize,
}
