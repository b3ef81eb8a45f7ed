use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel the dataset uses for "no measurement".
const NULL_SENTINEL: &str = "NULL";

/// Fields that identify or label a food rather than measure it.
const LABEL_FIELDS: &[&str] = &["id", "ID", "Name", "Food Group"];

pub const MACRO_FIELDS: &[&str] = &["Protein (g)", "Fat (g)", "Carbohydrate (g)"];

pub const SECTIONS: &[(&str, &[&str])] = &[
    (
        "Macronutrients",
        &[
            "Calories",
            "Fat (g)",
            "Saturated Fats (g)",
            "Trans Fatty Acids (g)",
            "Fatty acids, total monounsaturated (mg)",
            "Fatty acids, total polyunsaturated (mg)",
            "Protein (g)",
            "Carbohydrate (g)",
            "Net-Carbs (g)",
            "Sugars (g)",
            "Added Sugar (g)",
            "Total sugar alcohols (g)",
            "Starch (g)",
            "Fiber (g)",
            "Soluble Fiber (g)",
            "Insoluble Fiber (g)",
            "Alcohol (g)",
            "Water (g)",
        ],
    ),
    (
        "Sugars & Sweeteners",
        &[
            "Sugars (g)",
            "Sucrose (g)",
            "Glucose (Dextrose) (g)",
            "Fructose (g)",
            "Lactose (g)",
            "Maltose (g)",
            "Galactose (g)",
            "Added Sugar (g)",
            "Total sugar alcohols (g)",
        ],
    ),
    (
        "Carbohydrates Breakdown",
        &[
            "Carbohydrate (g)",
            "Net-Carbs (g)",
            "Starch (g)",
            "Total sugar alcohols (g)",
        ],
    ),
    (
        "Fatty Acids & Omegas (mg)",
        &[
            "Fatty acids, total monounsaturated (mg)",
            "Fatty acids, total polyunsaturated (mg)",
            "18:3 n-3 c,c,c (ALA) (mg)",
            "20:5 n-3 (EPA) (mg)",
            "22:5 n-3 (DPA) (mg)",
            "22:6 n-3 (DHA) (mg)",
            "Omega 3s (mg)",
            "Omega 6s (mg)",
        ],
    ),
    (
        "Cholesterol & Lipids",
        &[
            "Cholesterol (mg)",
            "PRAL score",
            "Trans Fatty Acids (g)",
            "Fatty acids, total monounsaturated (mg)",
            "Fatty acids, total polyunsaturated (mg)",
        ],
    ),
    (
        "Minerals",
        &[
            "Calcium (mg)",
            "Iron, Fe (mg)",
            "Potassium, K (mg)",
            "Magnesium (mg)",
            "Phosphorus, P (mg)",
            "Sodium (mg)",
            "Chlorine (mg)",
            "Zinc, Zn (mg)",
            "Copper, Cu (mg)",
            "Manganese (mg)",
            "Selenium, Se (mcg)",
            "Fluoride, F (mcg)",
            "Molybdenum (mcg)",
        ],
    ),
    (
        "Vitamins & Carotenoids",
        &[
            "Vitamin A, IU (IU)",
            "Vitamin A, RAE (mcg)",
            "Retinol (mcg)",
            "Carotene, beta (mcg)",
            "Carotene, alpha (mcg)",
            "Lycopene (mcg)",
            "Lutein + Zeaxanthin (mcg)",
            "Vitamin C (mg)",
            "Vitamin D (mcg)",
            "Vitamin D2 (ergocalciferol) (mcg)",
            "Vitamin D3 (cholecalciferol) (mcg)",
            "Vitamin D (IU) (IU)",
            "Vitamin E (Alpha-Tocopherol) (mg)",
            "Vitamin K (mcg)",
            "Dihydrophylloquinone (mcg)",
            "Menaquinone-4 (mcg)",
        ],
    ),
    (
        "B-Vitamins",
        &[
            "Thiamin (B1) (mg)",
            "Riboflavin (B2) (mg)",
            "Niacin (B3) (mg)",
            "Pantothenic acid (B5) (mg)",
            "Vitamin B6 (mg)",
            "Vitamin B-12 (mcg)",
            "Biotin (B7) (mcg)",
            "Folate (B9) (mcg)",
            "Folic acid (mcg)",
            "Food Folate (mcg)",
            "Folate DFE (mcg)",
            "Choline (mg)",
            "Betaine (mg)",
        ],
    ),
    (
        "Amino Acids (mg)",
        &[
            "Tryptophan (mg)",
            "Threonine (mg)",
            "Isoleucine (mg)",
            "Leucine (mg)",
            "Lysine (mg)",
            "Methionine (mg)",
            "Cystine (mg)",
            "Phenylalanine (mg)",
            "Tyrosine (mg)",
            "Valine (mg)",
            "Arginine (mg)",
            "Histidine (mg)",
            "Alanine (mg)",
            "Aspartic acid (mg)",
            "Glutamic acid (mg)",
            "Glycine (mg)",
            "Proline (mg)",
            "Serine (mg)",
            "Hydroxyproline (mg)",
        ],
    ),
    (
        "Servings & Portions",
        &[
            "Serving Weight 1 (g)",
            "Serving Description 1 (g)",
            "Serving Weight 2 (g)",
            "Serving Description 2 (g)",
            "Serving Weight 3 (g)",
            "Serving Description 3 (g)",
            "Serving Weight 4 (g)",
            "Serving Description 4 (g)",
            "Serving Weight 5 (g)",
            "Serving Description 5 (g)",
            "Serving Weight 6 (g)",
            "Serving Description 6 (g)",
            "Serving Weight 7 (g)",
            "Serving Description 7 (g)",
            "Serving Weight 8 (g)",
            "Serving Description 8 (g)",
            "Serving Weight 9 (g)",
            "Serving Description 9 (g)",
            "200 Calorie Weight (g)",
        ],
    ),
    (
        "Other Nutritional Info",
        &[
            "Cholesterol (mg)",
            "PRAL score",
            "Net-Carbs (g)",
            "200 Calorie Weight (g)",
            "Water (g)",
            "Omega 3s (mg)",
            "Omega 6s (mg)",
        ],
    ),
];

/// One food item from the static dataset: a flat key/value object, read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutritionRecord(Map<String, Value>);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
    pub unit: &'static str,
}

impl NutritionRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// String or number field as text; blank strings count as absent.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First non-empty of `id`, `ID`, `Name`.
    pub fn key(&self) -> Option<String> {
        self.text("id")
            .or_else(|| self.text("ID"))
            .or_else(|| self.text("Name"))
    }

    pub fn name(&self) -> Option<String> {
        self.text("Name")
    }

    pub fn food_group(&self) -> Option<String> {
        self.text("Food Group")
    }

    pub fn matches_key(&self, key: &str) -> bool {
        ["id", "ID", "Name"]
            .iter()
            .any(|f| self.text(f).as_deref() == Some(key))
    }

    /// Numeric view of the record. Fields holding the `NULL` sentinel or
    /// anything non-numeric are left out; the rest of the record is unaffected.
    pub fn nutrients(&self) -> Vec<Nutrient> {
        self.0
            .iter()
            .filter(|(k, _)| !LABEL_FIELDS.contains(&k.as_str()))
            .filter_map(|(k, v)| {
                numeric_value(v).map(|amount| Nutrient {
                    name: k.clone(),
                    amount,
                    unit: unit_for(k),
                })
            })
            .collect()
    }
}

fn numeric_value(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == NULL_SENTINEL {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Unit implied by the key suffix convention.
pub fn unit_for(key: &str) -> &'static str {
    if key.contains("(g)") {
        "g"
    } else if key.contains("(mg)") {
        "mg"
    } else if key.contains("(mcg)") {
        "mcg"
    } else if key.contains("(IU)") {
        "IU"
    } else {
        ""
    }
}
