//! Static access-code → deck mapping.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::card::CardTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckTheme {
    pub card_color: String,
    pub card_back_color: String,
}

impl DeckTheme {
    pub fn new(card_color: &str, card_back_color: Option<&str>) -> Self {
        Self {
            card_color: card_color.to_string(),
            card_back_color: card_back_color.unwrap_or(card_color).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDefinition {
    pub code: String,
    pub title: String,
    pub cards: Vec<CardTemplate>,
    pub theme: DeckTheme,
}

impl DeckDefinition {
    pub fn sample_card(&self) -> Option<&CardTemplate> {
        self.cards.first()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    decks: BTreeMap<String, DeckDefinition>,
}

impl Catalog {
    pub fn new(decks: impl IntoIterator<Item = DeckDefinition>) -> Self {
        Self {
            decks: decks.into_iter().map(|d| (d.code.clone(), d)).collect(),
        }
    }

    /// The decks shipped with the application.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, code: &str) -> Option<&DeckDefinition> {
        self.decks.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeckDefinition> {
        self.decks.values()
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

pub const CHINESE_VOCABULARY_CODE: &str = "LearnChinesewithHelen1295";
pub const PINYIN_PRACTICE_CODE: &str = "PinyinPractice";

const CHINESE_VOCABULARY: &[(&str, &str, &str)] = &[
    ("爸爸\nbà ba", "dad\nพ่อ", "👨‍👧‍👦"),
    ("别\nbié", "don't\nอย่า", "🚫"),
    ("朋友\npéng yǒu", "friend\nเพื่อน", "👫"),
    ("怕\npà", "to fear\nกลัว", "😨"),
    ("妈妈\nmā ma", "mom\nแม่", "👩‍👧‍👦"),
    ("买\nmǎi", "to buy\nซื้อ", "🛒"),
    ("饭\nfàn", "meal\nข้าว", "🍽️"),
    ("富\nfù", "rich\nรวย", "💰"),
    ("奶奶\nnǎi nai", "grandmother\nยาย", "👵"),
    ("你\nnǐ", "you\nคุณ", "👤"),
    ("老\nlǎo", "old\nแก่", "🧓"),
    ("来\nlái", "to come\nมา", "➡️"),
    ("大\ndà", "big\nใหญ่", "📏"),
    ("得\ndé", "to get\nได้รับ", "🏆"),
    ("跳\ntiào", "to jump\nกระโดด", "🤸"),
    ("调\ntiáo", "to adjust\nปรับ", "⚙️"),
    ("猪\nzhū", "pig\nหมู", "🐷"),
    ("住\nzhù", "to live\nอาศัย", "🏠"),
    ("吃\nchī", "to eat\nกิน", "🍽️"),
    ("出\nchū", "to go out\nออกไป", "🚪"),
    ("高\ngāo", "high\nสูง", "📏"),
    ("个\ngè", "measure word\nลักษณนาม", "📊"),
    ("裤\nkù", "trousers\nกางเกง", "👖"),
    ("可以\nkě yǐ", "can\nสามารถ", "✅"),
    ("虎\nhǔ", "tiger\nเสือ", "🐅"),
    ("好\nhǎo", "good\nดี", "👍"),
    ("家\njiā", "home\nบ้าน", "🏡"),
    ("就\njiù", "then\nแล้ว", "⏭️"),
    ("小\nxiǎo", "small\nเล็ก", "🐭"),
    ("喜欢\nxǐ huān", "to like\nชอบ", "❤️"),
];

const PINYIN_CARDS: &[(&str, &str, &str)] = &[
    ("ang", "ang\nFinal compound: 'ahng' sound\nเสียงสระผสม: 'อาง'", "🗣️"),
    ("ing", "ing\nFinal compound: 'eeng' sound\nเสียงสระผสม: 'อิง'", "🗣️"),
    ("en", "en\nFinal compound: 'uhn' sound\nเสียงสระผสม: 'เอิน'", "🗣️"),
    ("ai", "ai\nFinal compound: 'eye' sound\nเสียงสระผสม: 'ไอ'", "🗣️"),
    ("ao", "ao\nFinal compound: 'aow' sound\nเสียงสระผสม: 'เอา'", "🗣️"),
];

fn templates(rows: &[(&str, &str, &str)]) -> Vec<CardTemplate> {
    rows.iter()
        .map(|(front, back, emoji)| CardTemplate::new(front, back, Some(emoji)))
        .collect()
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new([
        DeckDefinition {
            code: CHINESE_VOCABULARY_CODE.to_string(),
            title: "Chinese Vocabulary".to_string(),
            cards: templates(CHINESE_VOCABULARY),
            theme: DeckTheme::new("#E0F7FA", Some("#CFEEF5")),
        },
        DeckDefinition {
            code: PINYIN_PRACTICE_CODE.to_string(),
            title: "Pinyin Practice".to_string(),
            cards: templates(PINYIN_CARDS),
            theme: DeckTheme::new("#E8F5E9", Some("#DFF0E0")),
        },
    ])
});
