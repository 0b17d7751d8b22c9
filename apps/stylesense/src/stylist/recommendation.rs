//! Text-based outfit recommendation: request and result shapes.

use serde::{Deserialize, Serialize};

use crate::llm_client::repair::lenient_number;

pub const DEFAULT_OCCASION: &str = "Casual";
pub const DEFAULT_WEATHER: &str = "Perfectly Seasonal";
pub const DEFAULT_LOCATION: &str = "Current Location";

/// What the user is dressing for. Built per request, never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub occasion: String,
    pub weather: String,
    pub location: String,
    pub style_vibe: String,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            occasion: DEFAULT_OCCASION.to_string(),
            weather: DEFAULT_WEATHER.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            style_vibe: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationResult {
    pub title: String,
    pub description: String,
    pub outfit: Outfit,
    #[serde(deserialize_with = "lenient_number")]
    pub style_score: f64,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outfit {
    pub top: OutfitItem,
    pub bottom: OutfitItem,
    pub shoes: OutfitItem,
    pub accessories: Vec<OutfitItem>,
}

impl Outfit {
    /// Every piece of the look in display order.
    pub fn pieces(&self) -> impl Iterator<Item = (&'static str, &OutfitItem)> {
        [("Top", &self.top), ("Bottom", &self.bottom), ("Shoes", &self.shoes)]
            .into_iter()
            .chain(self.accessories.iter().map(|a| ("Accessory", a)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutfitItem {
    pub name: String,
    pub shop_url: String,
}
