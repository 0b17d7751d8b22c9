// All prompt templates for the stylist.
// Reuses cross-cutting fragments from llm_client::prompts.
//
// Profile values are interpolated verbatim: missing preferences render as
// empty text, and nothing is validated here.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, SHOPPING_LINK_INSTRUCTION};
use crate::models::user::UserProfile;
use crate::stylist::recommendation::RecommendationRequest;

/// Image analysis blueprint. Replace: {gender}, {skin_tone}, {json_only}, {shopping}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r##"Analyze this user's photo. Act as a Luxury Image Architect (Stylist + Master Barber + Dermatologist).
User Info: {gender}, {skin_tone} skin tone.

TASK: Provide a total image upgrade blueprint. Focus strictly on technical text advice.

JSON SCHEMA: {
  "detectedItems": [{"type": "string", "color": "string", "pattern": "string"}],
  "styleAesthetic": "string",
  "suggestions": [{"text": "string", "shopUrl": "string"}],
  "skintoneAnalysis": "Technical analysis of skin-outfit color theory.",
  "palette": ["#hexcode"],
  "feedback": "Technical style feedback.",
  "evolvedLookDescription": "A 3-paragraph vivid text visualization of their UPGRADED look. Describe fabric textures, fit, and atmosphere.",
  "addons": [{"name": "string", "reason": "string", "shopUrl": "string"}],
  "grooming": {
    "hairstyle": "Technical haircut name",
    "beardStyle": "Facial hair trimming instructions",
    "saloonAdvice": "Words to say to the barber."
  },
  "skincare": {
    "advice": "Skin-tone specific care for {skin_tone} skin.",
    "routine": ["Step 1", "Step 2", "Step 3"],
    "products": [
      {"name": "Specific Product Name", "brand": "Brand Name", "shopUrl": "Google Shopping Link"}
    ]
  },
  "wardrobe": [
    {"category": "Shirt", "recommendation": "string", "shopUrl": "string"},
    {"category": "T-Shirt", "recommendation": "string", "shopUrl": "string"},
    {"category": "Pants", "recommendation": "string", "shopUrl": "string"},
    {"category": "Joggers", "recommendation": "string", "shopUrl": "string"},
    {"category": "Chinos", "recommendation": "string", "shopUrl": "string"},
    {"category": "Bootcut", "recommendation": "string", "shopUrl": "string"},
    {"category": "Jeans", "recommendation": "string", "shopUrl": "string"}
  ],
  "sneakers": [{"model": "string", "colorway": "string", "reason": "string", "shopUrl": "string"}],
  "styleConfidence": 85
}

{shopping}
{json_only}"##;

/// Text outfit recommendation.
/// Replace: {gender}, {skin_tone}, {age}, {budget}, {colors}, {occasion},
///          {weather}, {location}, {style_vibe}, {json_only}, {shopping}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r##"Act as a High-End Fashion Stylist.
User Profile: {gender}, Age: {age}, Skin Tone: {skin_tone}, Budget: {budget}, Preferred Colors: {colors}.
Occasion: {occasion}. Weather: {weather}. Location: {location}. Aesthetic: {style_vibe}.

Generate a complete outfit. No images.

JSON SCHEMA: {
  "title": "Short name for the look",
  "description": "Two sentences describing the look.",
  "outfit": {
    "top": {"name": "Technical garment name", "shopUrl": "string"},
    "bottom": {"name": "Technical garment name", "shopUrl": "string"},
    "shoes": {"name": "Technical footwear name", "shopUrl": "string"},
    "accessories": [{"name": "string", "shopUrl": "string"}]
  },
  "styleScore": 90,
  "reasoning": "Why this works for the occasion, weather and skin tone.",
  "visualPrompt": "One-sentence editorial photo description of the look."
}

{shopping}
{json_only}"##;

/// Consultation chat system instruction. Replace: {gender}, {skin_tone}
pub const CONSULTATION_INSTRUCTION_TEMPLATE: &str = "\
You are StyleSense Assistant, a top-tier technical fashion consultant.
USER PROFILE: Gender is **{gender}**, Skin Tone is **{skin_tone}**.
CRITICAL: Provide technical clothing names (e.g., 'relaxed tapered chinos', 'bootcut dark wash jeans').
SKINCARE: Suggest routines for **{skin_tone}** skin.
FORMAT: Use Markdown. Always include Google Shopping redirect links for all items suggested.";

/// Opening line of a consultation. Replace: {first_name}, {gender}, {skin_tone}
pub const CONSULTATION_GREETING_TEMPLATE: &str = "\
Hello {first_name}, I'm your dedicated StyleSense assistant. I'm ready to provide technical \
advice on **{gender}** fashion and **{skin_tone}** skintone routines. How can I assist your \
wardrobe today?";

pub fn analysis_prompt(profile: &UserProfile) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{gender}", profile.gender())
        .replace("{skin_tone}", profile.skin_tone())
        .replace("{shopping}", SHOPPING_LINK_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
}

pub fn recommendation_prompt(profile: &UserProfile, request: &RecommendationRequest) -> String {
    let prefs = profile.preferences.as_ref();
    let age = prefs.map(|p| p.age.as_str()).unwrap_or_default();
    let budget = prefs.map(|p| p.budget.as_str()).unwrap_or_default();
    let colors = prefs.map(|p| p.colors.join(", ")).unwrap_or_default();

    RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{gender}", profile.gender())
        .replace("{skin_tone}", profile.skin_tone())
        .replace("{age}", age)
        .replace("{budget}", budget)
        .replace("{colors}", &colors)
        .replace("{occasion}", &request.occasion)
        .replace("{weather}", &request.weather)
        .replace("{location}", &request.location)
        .replace("{style_vibe}", &request.style_vibe)
        .replace("{shopping}", SHOPPING_LINK_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
}

pub fn consultation_instruction(profile: &UserProfile) -> String {
    CONSULTATION_INSTRUCTION_TEMPLATE
        .replace("{gender}", profile.gender())
        .replace("{skin_tone}", profile.skin_tone())
}

pub fn consultation_greeting(profile: &UserProfile) -> String {
    CONSULTATION_GREETING_TEMPLATE
        .replace("{first_name}", profile.first_name())
        .replace("{gender}", profile.gender())
        .replace("{skin_tone}", profile.skin_tone())
}
