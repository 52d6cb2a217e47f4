//! Pronunciation dispatch: work out what language a card segment is in and
//! whether the server fetches audio for it or the client speaks it locally.

use serde::Serialize;

use crate::constants::LOCAL_SPEECH_RATE;
use crate::services::tts_provider::TtsProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LanguageTag {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "th-TH")]
    ThTh,
    #[serde(rename = "en-US")]
    EnUs,
}

impl LanguageTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZhCn => "zh-CN",
            Self::ThTh => "th-TH",
            Self::EnUs => "en-US",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextKind {
    PrimaryScript,
    PhoneticAid,
    SecondaryTranslation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub lang: LanguageTag,
    pub kind: TextKind,
}

const PINYIN_SYLLABLES: &[&str] = &[
    "ba", "pa", "ma", "fa", "da", "ta", "na", "la", "ga", "ka", "ha", "ji", "qi", "xi", "zhi",
    "chi", "shi", "ri", "zi", "ci", "si", "ya", "wa", "yuan", "ying", "yang", "yong", "you", "yan",
    "yin", "ai", "ei", "ao", "ou", "an", "en", "ang", "eng", "ong", "ia", "ie", "iao", "iou",
    "ian", "in", "iang", "ing", "iong", "ua", "uo", "uai", "ui", "uan", "un", "uang", "ueng", "ue",
];

const TONE_MARKS: &str = "āáǎàēéěèīíǐìōóǒòūúǔùǖǘǚǜ";

fn is_thai(c: char) -> bool {
    ('\u{0E00}'..='\u{0E7F}').contains(&c)
}

fn is_han(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
}

fn looks_like_pinyin(text: &str) -> bool {
    let lower = text.to_lowercase();
    if lower.chars().any(|c| TONE_MARKS.contains(c)) {
        return true;
    }
    let mut words = lower.split_whitespace().peekable();
    words.peek().is_some() && words.all(|w| PINYIN_SYLLABLES.contains(&w))
}

/// Classify a text segment. Returns `None` when there is nothing to say.
pub fn classify(text: &str) -> Option<Classification> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let classification = if text.chars().any(is_thai) {
        Classification {
            lang: LanguageTag::ThTh,
            kind: TextKind::SecondaryTranslation,
        }
    } else if text.chars().any(is_han) {
        Classification {
            lang: LanguageTag::ZhCn,
            kind: TextKind::PrimaryScript,
        }
    } else if looks_like_pinyin(text) {
        Classification {
            lang: LanguageTag::ZhCn,
            kind: TextKind::PhoneticAid,
        }
    } else {
        Classification {
            lang: LanguageTag::EnUs,
            kind: TextKind::SecondaryTranslation,
        }
    };
    Some(classification)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pronunciation {
    /// Audio fetched from the synthesis endpoint.
    Audio {
        classification: Classification,
        audio: Vec<u8>,
    },
    /// The client should use its own speech synthesis.
    Local {
        classification: Classification,
        rate: f32,
    },
    /// Synthesis failed and there is no fallback; the failure was logged.
    Silent { classification: Classification },
}

#[derive(Debug, Clone)]
pub struct Pronouncer {
    tts: TtsProvider,
}

impl Pronouncer {
    pub fn new(tts: TtsProvider) -> Self {
        Self { tts }
    }

    /// Decide how `text` gets spoken. Never fails: synthesis errors are
    /// logged and turned into a fallback.
    pub async fn pronounce(&self, text: &str) -> Option<Pronunciation> {
        let classification = classify(text)?;
        let text = text.trim();

        let outcome = match classification.lang {
            LanguageTag::ZhCn => match self.tts.synthesize(text, classification.lang).await {
                Ok(audio) => Pronunciation::Audio {
                    classification,
                    audio,
                },
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        lang = classification.lang.as_str(),
                        "External TTS failed"
                    );
                    Pronunciation::Silent { classification }
                }
            },
            LanguageTag::ThTh => match self.tts.synthesize(text, classification.lang).await {
                Ok(audio) => Pronunciation::Audio {
                    classification,
                    audio,
                },
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        lang = classification.lang.as_str(),
                        "External TTS failed, falling back to local speech"
                    );
                    Pronunciation::Local {
                        classification,
                        rate: LOCAL_SPEECH_RATE,
                    }
                }
            },
            LanguageTag::EnUs => Pronunciation::Local {
                classification,
                rate: LOCAL_SPEECH_RATE,
            },
        };

        tracing::debug!(
            lang = classification.lang.as_str(),
            kind = ?classification.kind,
            "Pronunciation dispatched"
        );
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TtsConfig;

    fn pronouncer(enabled: bool) -> Pronouncer {
        Pronouncer::new(TtsProvider::new(&TtsConfig {
            enabled,
            mock: true,
            api_url: String::new(),
            timeout_secs: 1,
        }))
    }

    fn lang(text: &str) -> Option<LanguageTag> {
        classify(text).map(|c| c.lang)
    }

    #[test]
    fn classifies_scripts() {
        assert_eq!(
            classify("爸爸").unwrap(),
            Classification {
                lang: LanguageTag::ZhCn,
                kind: TextKind::PrimaryScript
            }
        );
        assert_eq!(classify("พ่อ").unwrap().lang, LanguageTag::ThTh);
        assert_eq!(classify("dad").unwrap().lang, LanguageTag::EnUs);
        assert_eq!(classify("to go out").unwrap().kind, TextKind::SecondaryTranslation);
    }

    #[test]
    fn classifies_pinyin() {
        assert_eq!(classify("bà ba").unwrap().kind, TextKind::PhoneticAid);
        assert_eq!(classify("ang").unwrap().kind, TextKind::PhoneticAid);
        assert_eq!(lang("ma ma"), Some(LanguageTag::ZhCn));
        assert_eq!(lang("ZHŪ"), Some(LanguageTag::ZhCn));
    }

    #[test]
    fn english_words_containing_syllables_stay_english() {
        assert_eq!(lang("friend"), Some(LanguageTag::EnUs));
        assert_eq!(lang("measure word"), Some(LanguageTag::EnUs));
        assert_eq!(lang("grandmother"), Some(LanguageTag::EnUs));
    }

    #[test]
    fn thai_wins_over_other_scripts() {
        assert_eq!(lang("เสียงสระผสม: 'อาง'"), Some(LanguageTag::ThTh));
        assert_eq!(lang("你 คุณ"), Some(LanguageTag::ThTh));
    }

    #[test]
    fn blank_text_has_nothing_to_say() {
        assert!(classify("").is_none());
        assert!(classify(" \n\t").is_none());
    }

    #[tokio::test]
    async fn chinese_uses_external_audio() {
        let outcome = pronouncer(true).pronounce("你").await.unwrap();
        assert!(matches!(outcome, Pronunciation::Audio { .. }));
    }

    #[tokio::test]
    async fn chinese_failure_is_silent() {
        let outcome = pronouncer(false).pronounce("nǐ").await.unwrap();
        assert!(matches!(outcome, Pronunciation::Silent { .. }));
    }

    #[tokio::test]
    async fn thai_failure_falls_back_to_local() {
        let outcome = pronouncer(false).pronounce("คุณ").await.unwrap();
        match outcome {
            Pronunciation::Local {
                classification,
                rate,
            } => {
                assert_eq!(classification.lang, LanguageTag::ThTh);
                assert!((rate - LOCAL_SPEECH_RATE).abs() < f32::EPSILON);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn english_is_local() {
        let outcome = pronouncer(true).pronounce("friend").await.unwrap();
        assert!(matches!(outcome, Pronunciation::Local { .. }));
        assert!(pronouncer(true).pronounce("   ").await.is_none());
    }
}
