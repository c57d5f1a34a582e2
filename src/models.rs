//! Normalized dictionary entries, as produced by the mapper and written to JSON.

use crate::tags::{
    Dialect, Field, FrequencyRating, GlossaryType, KanjiInfo, Language, Miscellaneous,
    PartOfSpeech, ReadingInfo,
};
use serde::{Deserialize, Serialize};

// --- Entry ---

/// One headword group of the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// `ent_seq`: unique, assigned by the dictionary maintainers.
    pub id: u64,
    /// At least one per entry.
    pub reading_elements: Vec<ReadingElement>,
    /// At least one per entry.
    pub sense_elements: Vec<SenseElement>,
    /// Always empty: kanji elements are not mapped yet.
    #[serde(default)]
    pub kanji_elements: Vec<KanjiElement>,
}

impl Entry {
    /// The first reading's text, which JMdict lists as the primary one.
    pub fn primary_reading(&self) -> Option<&str> {
        self.reading_elements
            .first()
            .map(|element| element.reading.reading.as_str())
    }

    /// Whether any reading carries one of the closed priority markers.
    pub fn is_common(&self) -> bool {
        self.reading_elements.iter().any(|element| {
            element
                .frequency_rating
                .iter()
                .any(|rating| matches!(rating, FrequencyRating::Known(_)))
        })
    }

    /// All translations of all senses, in source order.
    pub fn translations(&self) -> impl Iterator<Item = &Translation> {
        self.sense_elements
            .iter()
            .flat_map(|sense| sense.glossary.iter())
    }
}

// --- Reading Element ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingElement {
    pub reading: JapaneseReading,
    /// False when `re_nokanji` marks the reading as not a true kanji reading.
    pub is_true_kanji_reading: bool,
    /// `re_restr`: kanji forms this reading is restricted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset_of_non_kana_readings: Option<Vec<String>>,
    /// `re_inf`, one slot per source token; `None` for tokens this crate does not know.
    #[serde(default)]
    pub reading_info: Vec<Option<ReadingInfo>>,
    /// `re_pri`, in source order.
    #[serde(default)]
    pub frequency_rating: Vec<FrequencyRating>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JapaneseReading {
    pub reading: String,
    /// Hiragana before Katakana; empty when the text has neither.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kana_type: Vec<KanaType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KanaType {
    Hiragana,
    Katakana,
}

// --- Kanji Element ---

/// Declared for completeness; the mapper never produces one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanjiElement {
    pub kanji: String,
    #[serde(default)]
    pub kanji_info: Vec<Option<KanjiInfo>>,
    #[serde(default)]
    pub frequency_rating: Vec<FrequencyRating>,
}

// --- Sense Element ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenseElement {
    /// Ordered by usage frequency, most common first. Never re-sorted.
    pub glossary: Vec<Translation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Option<Field>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miscellaneous: Option<Vec<Option<Miscellaneous>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<PartOfSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexeme_restrictions: Option<Vec<LexemeRestriction>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub language: Language,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glossary_type: Option<GlossaryType>,
}

/// `stagr` / `stagk`: the sense only applies to the listed readings or kanji forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexemeRestriction {
    #[serde(rename = "type")]
    pub kind: LexemeType,
    pub contents: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LexemeType {
    Reading,
    Kanji,
}

impl std::fmt::Display for KanaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                KanaType::Hiragana => "hiragana",
                KanaType::Katakana => "katakana",
            }
        )
    }
}

impl std::fmt::Display for LexemeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LexemeType::Reading => "reading",
                LexemeType::Kanji => "kanji",
            }
        )
    }
}
