use crate::domain::model::NO_AYURVEDIC_USE;
use crate::utils::error::{PlantError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const BUILTIN_COMMON_NAMES: &[(&str, &str)] = &[
    ("Aloe vera", "Aloe"),
    ("Ficus benjamina", "Weeping Fig"),
    ("Ocimum basilicum", "Tulsi"),
    ("Mangifera indica", "Mango Tree"),
    ("Rosa indica", "Indian Rose"),
    ("Azadirachta indica", "Neem"),
    ("Ocimum tenuiflorum", "Tulsi"),
    ("Bougainvillea", "Paper Flower"),
    ("Dalbergia sissoo", "Sheesam"),
    ("Hibiscus rosa-sinensis", "Hibiscus"),
    ("Bougainvillea glabra", "Paper Flower"),
    ("Bougainvillea spectabilis", "Paper Flower"),
];

const BOUGAINVILLEA_USE: &str = "Used for treating coughs, respiratory issues, and skin infections.";
const OCIMUM_USE: &str = "Commonly used for digestion, respiratory health, and immunity boosting.";

const BUILTIN_AYURVEDIC_USES: &[(&str, &str)] = &[
    ("Aloe vera", "Used for skin healing, digestion, and cooling body heat."),
    (
        "Ficus benjamina",
        "Used for treating infections and as an anti-inflammatory.",
    ),
    ("Ocimum basilicum", OCIMUM_USE),
    (
        "Mangifera indica",
        "Used for improving digestion and as an antioxidant.",
    ),
    (
        "Rosa indica",
        "Known for cooling effects, improving skin health, and boosting immunity.",
    ),
    (
        "Azadirachta indica",
        "Neem treats acne and has anti-inflammatory properties.",
    ),
    ("Ocimum tenuiflorum", OCIMUM_USE),
    ("Bougainvillea", BOUGAINVILLEA_USE),
    (
        "Dalbergia sissoo",
        "Used for obesity, vitiligo, fever, wounds, and intestinal parasites.",
    ),
    (
        "Hibiscus rosa-sinensis",
        "Promotes healthy hair, supports skin, and removes excess body heat.",
    ),
    ("Bougainvillea glabra", BOUGAINVILLEA_USE),
    ("Bougainvillea spectabilis", BOUGAINVILLEA_USE),
];

/// Extra entries loaded from a TOML file at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceOverrides {
    #[serde(default)]
    pub common_names: HashMap<String, String>,
    #[serde(default)]
    pub ayurvedic_uses: HashMap<String, String>,
}

/// Static knowledge keyed by exact scientific name. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    common_names: HashMap<String, String>,
    ayurvedic_uses: HashMap<String, String>,
}

impl ReferenceTables {
    pub fn builtin() -> Self {
        let collect = |entries: &[(&str, &str)]| {
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };

        Self {
            common_names: collect(BUILTIN_COMMON_NAMES),
            ayurvedic_uses: collect(BUILTIN_AYURVEDIC_USES),
        }
    }

    /// Built-in tables extended (and overridden) by the entries in a TOML file.
    pub fn with_overrides_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlantError::IoError)?;
        let overrides = Self::parse_overrides(&content)?;
        Ok(Self::builtin().merge(overrides))
    }

    pub fn parse_overrides(content: &str) -> Result<ReferenceOverrides> {
        toml::from_str(content).map_err(|e| PlantError::ConfigValidationError {
            field: "reference".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn merge(mut self, overrides: ReferenceOverrides) -> Self {
        self.common_names.extend(overrides.common_names);
        self.ayurvedic_uses.extend(overrides.ayurvedic_uses);
        self
    }

    /// Common name, or the scientific name itself when the table has no entry.
    pub fn common_name(&self, scientific_name: &str) -> String {
        self.common_names
            .get(scientific_name)
            .cloned()
            .unwrap_or_else(|| scientific_name.to_string())
    }

    pub fn ayurvedic_use(&self, scientific_name: &str) -> String {
        self.ayurvedic_uses
            .get(scientific_name)
            .cloned()
            .unwrap_or_else(|| NO_AYURVEDIC_USE.to_string())
    }

    /// Number of distinct species known to either table.
    pub fn len(&self) -> usize {
        self.common_names
            .keys()
            .chain(self.ayurvedic_uses.keys())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.common_names.is_empty() && self.ayurvedic_uses.is_empty()
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}
