use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    #[default]
    New,
}

/// Static prompt/answer pair as it appears in a deck definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTemplate {
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl CardTemplate {
    pub fn new(front: &str, back: &str, emoji: Option<&str>) -> Self {
        Self {
            front: front.to_string(),
            back: back.to_string(),
            emoji: emoji.map(str::to_string),
        }
    }
}

/// A card instance inside a study session.
///
/// `front` doubles as the business key for the remembered/forgotten
/// collections; `key` only tells apart instances in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub key: Uuid,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub status: CardStatus,
    pub level: u32,
    pub faces: CardFaces,
}

impl Card {
    /// Materialise a fresh card: level 0, status `new`, new identity key.
    pub fn from_template(template: &CardTemplate) -> Self {
        Self {
            key: Uuid::new_v4(),
            front: template.front.clone(),
            back: template.back.clone(),
            emoji: template.emoji.clone(),
            status: CardStatus::New,
            level: 0,
            faces: CardFaces::parse(&template.front, &template.back),
        }
    }

    pub fn with_level(&self, level: u32) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    /// Copy of this card one level lower, floored at zero.
    pub fn forgotten(&self) -> Self {
        self.with_level(self.level.saturating_sub(1))
    }

    pub fn remembered(&self) -> Self {
        self.with_level(self.level.saturating_add(1))
    }
}

/// Display segments of a card. Missing segments are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFaces {
    pub primary: String,
    pub phonetic: String,
    pub translation: String,
    pub secondary: String,
}

impl CardFaces {
    pub fn parse(front: &str, back: &str) -> Self {
        let front_parts = split_segments(front);
        let back_parts = split_segments(back);

        Self {
            primary: front_parts.first().cloned().unwrap_or_default(),
            phonetic: front_parts.get(1).cloned().unwrap_or_default(),
            translation: back_parts.first().cloned().unwrap_or_default(),
            secondary: back_parts.get(1..).map(|rest| rest.join("\n")).unwrap_or_default(),
        }
    }
}

fn split_segments(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split('\n').map(|s| s.trim().to_string()).collect()
}
