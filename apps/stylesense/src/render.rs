//! Terminal result cards.
//!
//! Every renderer returns a `String` so commands decide where it goes and
//! tests can inspect it. Colour follows `colored`'s terminal detection.

use colored::Colorize;

use crate::errors::ErrorReport;
use crate::models::history::{HistoryEntry, HistoryRecord};
use crate::models::user::UserProfile;
use crate::stylist::analysis::AnalysisResult;
use crate::stylist::recommendation::RecommendationResult;

const RULE_WIDTH: usize = 60;

#[derive(Default)]
struct Card {
    lines: Vec<String>,
}

impl Card {
    fn title(mut self, title: &str) -> Self {
        self.lines.push("━".repeat(RULE_WIDTH).dimmed().to_string());
        self.lines.push(format!("  {}", title.bold()));
        self.lines.push("━".repeat(RULE_WIDTH).dimmed().to_string());
        self
    }

    fn section(&mut self, heading: &str) {
        self.lines.push(String::new());
        self.lines.push(format!("  {}", heading.to_uppercase().cyan().bold()));
    }

    fn field(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.lines.push(format!("  {} {}", format!("{label}:").bold(), value));
        }
    }

    fn item(&mut self, text: &str, shop_url: &str) {
        if shop_url.is_empty() {
            self.lines.push(format!("    • {text}"));
        } else {
            self.lines
                .push(format!("    • {text} {}", format!("<{shop_url}>").dimmed()));
        }
    }

    fn paragraph(&mut self, text: &str) {
        if !text.is_empty() {
            self.lines.push(format!("  {text}"));
        }
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn score(value: f64) -> String {
    let text = format!("{value:.0}/100");
    if value >= 75.0 {
        text.green().to_string()
    } else if value >= 50.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

pub fn analysis_card(result: &AnalysisResult) -> String {
    let mut card = Card::default().title("STYLE BLUEPRINT");
    card.field("Aesthetic", &result.style_aesthetic);
    card.field("Confidence", &score(result.style_confidence));
    card.paragraph(&result.feedback);

    if !result.detected_items.is_empty() {
        card.section("Detected");
        for item in &result.detected_items {
            let text = [item.color.as_str(), item.pattern.as_str(), item.kind.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            card.item(&text, "");
        }
    }

    if !result.skintone_analysis.is_empty() || !result.palette.is_empty() {
        card.section("Colour");
        card.paragraph(&result.skintone_analysis);
        card.field("Palette", &result.palette.join(", "));
    }

    if !result.suggestions.is_empty() {
        card.section("Upgrades");
        for s in &result.suggestions {
            card.item(&s.text, &s.shop_url);
        }
    }

    for outfit in &result.suitable_outfits {
        card.section(&format!("For {}", outfit.occasion));
        for piece in &outfit.items {
            card.item(&format!("{} ({})", piece.name, piece.color), &piece.shop_url);
        }
    }

    if !result.evolved_look_description.is_empty() {
        card.section("Evolved look");
        card.paragraph(&result.evolved_look_description);
    }

    if !result.addons.is_empty() {
        card.section("Add-ons");
        for addon in &result.addons {
            card.item(&format!("{}: {}", addon.name, addon.reason), &addon.shop_url);
        }
    }

    let grooming = &result.grooming;
    if !grooming.hairstyle.is_empty() || !grooming.beard_style.is_empty() {
        card.section("Grooming");
        card.field("Hair", &grooming.hairstyle);
        card.field("Beard", &grooming.beard_style);
        card.paragraph(&grooming.saloon_advice);
    }

    let skincare = &result.skincare;
    if !skincare.advice.is_empty() || !skincare.routine.is_empty() || !skincare.products.is_empty()
    {
        card.section("Skincare");
        card.paragraph(&skincare.advice);
        for (i, step) in skincare.routine.iter().enumerate() {
            card.lines.push(format!("    {}. {step}", i + 1));
        }
        for product in &skincare.products {
            card.item(&format!("{} by {}", product.name, product.brand), &product.shop_url);
        }
    }

    if !result.wardrobe.is_empty() {
        card.section("Wardrobe");
        for pick in &result.wardrobe {
            card.item(
                &format!("{}: {}", pick.category, pick.recommendation),
                &pick.shop_url,
            );
        }
    }

    if !result.sneakers.is_empty() {
        card.section("Sneakers");
        for pick in &result.sneakers {
            card.item(
                &format!("{} ({}): {}", pick.model, pick.colorway, pick.reason),
                &pick.shop_url,
            );
        }
    }

    card.finish()
}

pub fn recommendation_card(result: &RecommendationResult) -> String {
    let mut card = Card::default().title(&result.title);
    card.field("Style score", &score(result.style_score));
    card.paragraph(&result.description);

    card.section("Outfit");
    for (label, piece) in result.outfit.pieces() {
        if !piece.name.is_empty() {
            card.item(&format!("{label}: {}", piece.name), &piece.shop_url);
        }
    }

    if !result.reasoning.is_empty() {
        card.section("Why it works");
        card.paragraph(&result.reasoning);
    }
    card.finish()
}

pub fn history_list(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", "No saved looks yet.".dimmed());
    }

    let mut card = Card::default().title("STYLE HISTORY");
    for (i, entry) in entries.iter().enumerate() {
        let kind = match &entry.record {
            HistoryRecord::Analysis(_) => "analysis".magenta(),
            HistoryRecord::Recommendation(_) => "recommendation".blue(),
        };
        card.lines.push(format!(
            "  {:>2}. {}  {:<16} {}",
            i + 1,
            entry.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            kind,
            entry.record.headline()
        ));
    }
    card.finish()
}

pub fn profile_card(user: &UserProfile) -> String {
    let mut card = Card::default().title(&user.name);
    card.field("Email", &user.email);
    if let Some(prefs) = &user.preferences {
        card.section("Preferences");
        card.field("Gender", &prefs.gender);
        card.field("Age", &prefs.age);
        card.field("Colours", &prefs.colors.join(", "));
        card.field("Budget", &prefs.budget);
        card.field("Skin tone", prefs.skin_tone.as_deref().unwrap_or_default());
    }
    card.finish()
}

pub fn error_card(report: &ErrorReport) -> String {
    let mut out = format!("{} {}", "✗".red().bold(), report.message.red());
    out.push_str(&format!(" {}", format!("[{}]", report.code).dimmed()));
    if let Some(hint) = report.hint {
        out.push_str(&format!("\n  {}", hint.yellow()));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Preferences;
    use crate::stylist::analysis::{Grooming, Suggestion};
    use crate::stylist::recommendation::{Outfit, OutfitItem};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_analysis_card_lists_sections_with_content() {
        plain();
        let result = AnalysisResult {
            style_aesthetic: "Dark academia".to_string(),
            style_confidence: 81.0,
            palette: vec!["#2F4F4F".to_string(), "#8B4513".to_string()],
            suggestions: vec![Suggestion {
                text: "Swap the hoodie for a wool overshirt".to_string(),
                shop_url: "https://shop.example/overshirt".to_string(),
            }],
            grooming: Grooming {
                hairstyle: "Textured crop".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let card = analysis_card(&result);
        assert!(card.contains("Aesthetic: Dark academia"));
        assert!(card.contains("81/100"));
        assert!(card.contains("Palette: #2F4F4F, #8B4513"));
        assert!(card.contains("• Swap the hoodie for a wool overshirt <https://shop.example/overshirt>"));
        assert!(card.contains("Hair: Textured crop"));
        assert!(!card.contains("SNEAKERS"));
    }

    #[test]
    fn test_recommendation_card_skips_empty_pieces() {
        plain();
        let result = RecommendationResult {
            title: "Rooftop Dinner".to_string(),
            style_score: 88.0,
            outfit: Outfit {
                top: OutfitItem {
                    name: "Black knit polo".to_string(),
                    shop_url: String::new(),
                },
                ..Default::default()
            },
            reasoning: "Monochrome reads sharp at night.".to_string(),
            ..Default::default()
        };

        let card = recommendation_card(&result);
        assert!(card.contains("Rooftop Dinner"));
        assert!(card.contains("• Top: Black knit polo"));
        assert!(!card.contains("Bottom:"));
        assert!(card.contains("WHY IT WORKS"));
    }

    #[test]
    fn test_history_list_numbers_entries() {
        plain();
        assert!(history_list(&[]).contains("No saved looks yet."));

        let entries = vec![HistoryEntry {
            record: HistoryRecord::Recommendation(RecommendationResult {
                title: "Gallery Opening".to_string(),
                ..Default::default()
            }),
            timestamp: "2026-03-01T10:00:00Z".parse().unwrap(),
        }];
        let list = history_list(&entries);
        assert!(list.contains(" 1. 2026-03-01 10:00"));
        assert!(list.contains("Gallery Opening"));
    }

    #[test]
    fn test_profile_and_error_cards() {
        plain();
        let user = UserProfile::new(
            "Sam Lee".to_string(),
            "sam@example.com".to_string(),
            Preferences::initial(None, None),
        );
        let card = profile_card(&user);
        assert!(card.contains("Email: sam@example.com"));
        assert!(card.contains("Gender: Masculine"));

        let report = ErrorReport {
            code: "SERVER_OVERLOADED",
            message: "The AI service is overloaded".to_string(),
            hint: Some("Wait a moment and run the command again."),
        };
        let out = error_card(&report);
        assert!(out.contains("[SERVER_OVERLOADED]"));
        assert!(out.contains("Wait a moment"));
    }
}
