//! Shape of the image-analysis blueprint.
//!
//! Every field is optional on the wire: models drop keys they have nothing to
//! say about, and a partially filled blueprint is still worth rendering.

use serde::{Deserialize, Serialize};

use crate::llm_client::repair::lenient_number;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisResult {
    pub detected_items: Vec<DetectedItem>,
    pub style_aesthetic: String,
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suitable_outfits: Vec<SuggestedOutfit>,
    pub skintone_analysis: String,
    pub palette: Vec<String>,
    pub feedback: String,
    pub evolved_look_description: String,
    pub addons: Vec<Addon>,
    pub grooming: Grooming,
    pub skincare: Skincare,
    pub wardrobe: Vec<WardrobePick>,
    pub sneakers: Vec<SneakerPick>,
    #[serde(deserialize_with = "lenient_number")]
    pub style_confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Suggestion {
    pub text: String,
    pub shop_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestedOutfit {
    pub occasion: String,
    pub items: Vec<OutfitPiece>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutfitPiece {
    pub name: String,
    pub color: String,
    pub shop_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Addon {
    pub name: String,
    pub reason: String,
    pub shop_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Grooming {
    pub hairstyle: String,
    pub beard_style: String,
    pub saloon_advice: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skincare {
    pub advice: String,
    pub routine: Vec<String>,
    pub products: Vec<SkincareProduct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkincareProduct {
    pub name: String,
    pub brand: String,
    pub shop_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WardrobePick {
    pub category: String,
    pub recommendation: String,
    pub shop_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SneakerPick {
    pub model: String,
    pub colorway: String,
    pub reason: String,
    pub shop_url: String,
}
