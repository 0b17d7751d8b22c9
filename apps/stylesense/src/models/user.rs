use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_GENDER: &str = "Masculine";
pub const DEFAULT_SKIN_TONE: &str = "Light";

/// Styling preferences attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub gender: String,
    pub age: String,
    #[serde(default)]
    pub colors: Vec<String>,
    pub budget: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
}

impl Preferences {
    /// Preferences assigned at registration.
    pub fn initial(gender: Option<String>, skin_tone: Option<String>) -> Self {
        Self {
            gender: gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            age: "25".to_string(),
            colors: vec!["Black".to_string()],
            budget: "Mid-range".to_string(),
            skin_tone: Some(skin_tone.unwrap_or_else(|| DEFAULT_SKIN_TONE.to_string())),
        }
    }
}

impl Default for Preferences {
    /// Fallback shown when a profile never stored preferences.
    fn default() -> Self {
        Self {
            gender: "Unisex".to_string(),
            age: "25".to_string(),
            colors: vec!["Black".to_string()],
            budget: "Mid-range".to_string(),
            skin_tone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl UserProfile {
    pub fn new(name: String, email: String, preferences: Preferences) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            preferences: Some(preferences),
        }
    }

    pub fn gender(&self) -> &str {
        self.preferences
            .as_ref()
            .map(|p| p.gender.as_str())
            .unwrap_or_default()
    }

    pub fn skin_tone(&self) -> &str {
        self.preferences
            .as_ref()
            .and_then(|p| p.skin_tone.as_deref())
            .unwrap_or_default()
    }

    /// First word of the display name, used in greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// A user record as kept in the users collection. Passwords are stored in
/// plaintext; the store is a local convenience, not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub password: String,
}
