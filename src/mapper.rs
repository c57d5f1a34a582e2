//! Maps raw `<entry>` trees onto the typed [`Entry`] model.
//!
//! Mapping is pure: no I/O, no shared state. Only structural defects (no
//! reading group, no sense group, unparsable `ent_seq`) fail an entry; unknown
//! tags never do.

use crate::error::{JmdictError, Result};
use crate::models::{
    Entry, JapaneseReading, KanaType, KanjiElement, LexemeRestriction, LexemeType,
    ReadingElement, SenseElement, Translation,
};
use crate::raw::{RawEntry, RawGloss, RawKanjiElement, RawReadingElement, RawSense};
use crate::tags::{
    Dialect, Field, FrequencyRating, GlossaryType, Language, Miscellaneous, PartOfSpeech,
    ReadingInfo, TagEnum,
};
use log::{debug, warn};
use rayon::prelude::*;

/// Maps one raw entry.
pub fn map_entry(raw: &RawEntry) -> Result<Entry> {
    let id = parse_id(&raw.ent_seq)?;

    if raw.r_ele.is_empty() {
        return Err(JmdictError::MissingReadingElements { id });
    }
    if raw.sense.is_empty() {
        return Err(JmdictError::MissingSenseElements { id });
    }

    Ok(Entry {
        id,
        reading_elements: raw.r_ele.iter().map(map_reading_element).collect(),
        sense_elements: raw.sense.iter().map(map_sense_element).collect(),
        kanji_elements: map_kanji_elements(&raw.k_ele),
    })
}

fn parse_id(ent_seq: &[String]) -> Result<u64> {
    let text = ent_seq
        .first()
        .ok_or_else(|| JmdictError::MalformedIdentifier(String::new()))?;
    text.trim()
        .parse()
        .map_err(|_| JmdictError::MalformedIdentifier(text.clone()))
}

/// Which kana blocks occur in `text`: Hiragana (U+3040-U+309F) and/or
/// Katakana (U+30A0-U+30FF), in that order.
pub fn classify_kana(text: &str) -> Vec<KanaType> {
    let has_hiragana = text.chars().any(|c| matches!(c, '\u{3040}'..='\u{309F}'));
    let has_katakana = text.chars().any(|c| matches!(c, '\u{30A0}'..='\u{30FF}'));

    let mut kana = Vec::with_capacity(2);
    if has_hiragana {
        kana.push(KanaType::Hiragana);
    }
    if has_katakana {
        kana.push(KanaType::Katakana);
    }
    kana
}

fn map_reading_element(raw: &RawReadingElement) -> ReadingElement {
    ReadingElement {
        reading: JapaneseReading {
            reading: raw.reb.clone(),
            kana_type: classify_kana(&raw.reb),
        },
        is_true_kanji_reading: !raw.has_no_kanji_marker(),
        subset_of_non_kana_readings: non_empty(&raw.re_restr),
        reading_info: raw.re_inf.iter().map(|t| ReadingInfo::resolve(t)).collect(),
        frequency_rating: raw
            .re_pri
            .iter()
            .map(|t| FrequencyRating::resolve(t))
            .collect(),
    }
}

fn map_sense_element(raw: &RawSense) -> SenseElement {
    SenseElement {
        glossary: map_glossary(&raw.gloss),
        sense_info: raw.s_inf.first().cloned(),
        antonyms: non_empty(&raw.ant),
        fields: resolve_fields(&raw.field),
        miscellaneous: resolve_miscellaneous(&raw.misc),
        dialect: resolve_first::<Dialect>(&raw.dial),
        part_of_speech: resolve_first::<PartOfSpeech>(&raw.pos),
        lexeme_restrictions: map_lexeme_restrictions(&raw.stagk, &raw.stagr),
    }
}

/// Source order is kept as is: JMdict lists the most common gloss first.
fn map_glossary(glosses: &[RawGloss]) -> Vec<Translation> {
    glosses.iter().map(map_translation).collect()
}

fn map_translation(gloss: &RawGloss) -> Translation {
    let language = match gloss.lang() {
        None => Language::English,
        Some(code) => Language::resolve(code).unwrap_or_else(|| {
            debug!("Unknown gloss language {:?}, assuming English", code);
            Language::English
        }),
    };

    Translation {
        language,
        translation: gloss.text().to_string(),
        glossary_type: gloss.g_type().and_then(GlossaryType::resolve),
    }
}

fn resolve_fields(tokens: &[String]) -> Option<Vec<Option<Field>>> {
    if tokens.is_empty() {
        return None;
    }
    Some(tokens.iter().map(|t| Field::resolve(t)).collect())
}

fn resolve_miscellaneous(tokens: &[String]) -> Option<Vec<Option<Miscellaneous>>> {
    if tokens.is_empty() {
        return None;
    }
    Some(tokens.iter().map(|t| Miscellaneous::resolve(t)).collect())
}

/// Single-valued tags: the first token decides, unknown tokens give `None`.
fn resolve_first<T: TagEnum>(tokens: &[String]) -> Option<T> {
    tokens.first().and_then(|t| T::resolve(t))
}

fn map_lexeme_restrictions(stagk: &[String], stagr: &[String]) -> Option<Vec<LexemeRestriction>> {
    let mut restrictions = Vec::new();
    if !stagr.is_empty() {
        restrictions.push(LexemeRestriction {
            kind: LexemeType::Reading,
            contents: stagr.to_vec(),
        });
    }
    if !stagk.is_empty() {
        restrictions.push(LexemeRestriction {
            kind: LexemeType::Kanji,
            contents: stagk.to_vec(),
        });
    }
    (!restrictions.is_empty()).then_some(restrictions)
}

// TODO: map <k_ele> (keb, ke_inf, ke_pri) once KanjiElement has a settled design.
fn map_kanji_elements(_raw: &[RawKanjiElement]) -> Vec<KanjiElement> {
    Vec::new()
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

// --- Batch Mapping ---

/// Maps every entry in parallel. Results come back in input order.
pub fn map_entries(raw: &[RawEntry]) -> Vec<Result<Entry>> {
    raw.par_iter().map(map_entry).collect()
}

/// Outcome counts of [`map_dictionary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingReport {
    pub mapped: usize,
    pub skipped: usize,
}

/// Maps every entry, logging and skipping the ones that fail.
pub fn map_dictionary(raw: &[RawEntry]) -> (Vec<Entry>, MappingReport) {
    let mut report = MappingReport::default();
    let mut entries = Vec::with_capacity(raw.len());

    for (index, result) in map_entries(raw).into_iter().enumerate() {
        match result {
            Ok(entry) => {
                report.mapped += 1;
                entries.push(entry);
            }
            Err(e) => {
                warn!("Skipping entry #{}: {}", index, e);
                report.skipped += 1;
            }
        }
    }

    debug!(
        "Mapped {} entries ({} skipped).",
        report.mapped, report.skipped
    );
    (entries, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::AttributedText;
    use crate::tags::Priority;

    fn reading(reb: &str) -> RawReadingElement {
        RawReadingElement {
            reb: reb.to_string(),
            ..Default::default()
        }
    }

    fn sense(glosses: &[&str]) -> RawSense {
        RawSense {
            gloss: glosses.iter().map(|g| RawGloss::from(*g)).collect(),
            ..Default::default()
        }
    }

    fn entry(id: &str, r_ele: Vec<RawReadingElement>, sense: Vec<RawSense>) -> RawEntry {
        RawEntry {
            ent_seq: vec![id.to_string()],
            k_ele: Vec::new(),
            r_ele,
            sense,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_classify_kana() {
        assert_eq!(classify_kana("ひらがな"), vec![KanaType::Hiragana]);
        assert_eq!(classify_kana("アイス"), vec![KanaType::Katakana]);
        assert_eq!(
            classify_kana("アイスクリームを"),
            vec![KanaType::Hiragana, KanaType::Katakana]
        );
        assert_eq!(
            classify_kana("ギターひき"),
            vec![KanaType::Hiragana, KanaType::Katakana]
        );
        assert!(classify_kana("漢字").is_empty());
        assert!(classify_kana("romaji").is_empty());
    }

    #[test]
    fn test_map_minimal_entry() {
        let raw = entry("1000000", vec![reading("ゆめ")], vec![sense(&["dream"])]);
        let mapped = map_entry(&raw).unwrap();

        assert_eq!(mapped.id, 1000000);
        assert_eq!(mapped.reading_elements.len(), 1);
        let element = &mapped.reading_elements[0];
        assert_eq!(element.reading.reading, "ゆめ");
        assert_eq!(element.reading.kana_type, vec![KanaType::Hiragana]);
        assert!(element.is_true_kanji_reading);
        assert_eq!(element.subset_of_non_kana_readings, None);
        assert!(element.reading_info.is_empty());
        assert!(element.frequency_rating.is_empty());

        let sense = &mapped.sense_elements[0];
        assert_eq!(sense.glossary.len(), 1);
        assert_eq!(sense.glossary[0].translation, "dream");
        assert_eq!(sense.glossary[0].language, Language::English);
        assert_eq!(sense.glossary[0].glossary_type, None);
        assert_eq!(sense.fields, None);
        assert_eq!(sense.miscellaneous, None);
        assert_eq!(sense.dialect, None);
        assert_eq!(sense.part_of_speech, None);
        assert_eq!(sense.lexeme_restrictions, None);
        assert_eq!(sense.antonyms, None);
        assert_eq!(sense.sense_info, None);
        assert!(mapped.kanji_elements.is_empty());
    }

    #[test]
    fn test_glossary_order_is_preserved() {
        let raw = entry("1", vec![reading("いぬ")], vec![sense(&["dog", "canine", "cur"])]);
        let mapped = map_entry(&raw).unwrap();
        let glossary: Vec<_> = mapped.sense_elements[0]
            .glossary
            .iter()
            .map(|t| t.translation.as_str())
            .collect();
        assert_eq!(glossary, ["dog", "canine", "cur"]);
    }

    #[test]
    fn test_attributed_gloss() {
        let mut raw_sense = sense(&[]);
        raw_sense.gloss = vec![
            RawGloss::Attributed(AttributedText {
                text: "Hund".into(),
                lang: Some("ger".into()),
                g_type: None,
            }),
            RawGloss::Attributed(AttributedText {
                text: "man's best friend".into(),
                lang: None,
                g_type: Some("fig".into()),
            }),
            RawGloss::Attributed(AttributedText {
                text: "kutya".into(),
                lang: Some("xyz".into()),
                g_type: Some("bogus".into()),
            }),
        ];
        let raw = entry("2", vec![reading("いぬ")], vec![raw_sense]);
        let glossary = &map_entry(&raw).unwrap().sense_elements[0].glossary;

        assert_eq!(glossary[0].language, Language::German);
        assert_eq!(glossary[0].glossary_type, None);
        assert_eq!(glossary[1].language, Language::English);
        assert_eq!(glossary[1].glossary_type, Some(GlossaryType::Figurative));
        assert_eq!(glossary[2].language, Language::English);
        assert_eq!(glossary[2].glossary_type, None);
        assert_eq!(glossary[2].translation, "kutya");
    }

    #[test]
    fn test_frequency_ratings() {
        let mut element = reading("ゆめ");
        element.re_pri = strings(&["news1", "nf32", "ichi1"]);
        let raw = entry("3", vec![element], vec![sense(&["dream"])]);
        let ratings = &map_entry(&raw).unwrap().reading_elements[0].frequency_rating;
        assert_eq!(
            ratings,
            &vec![
                FrequencyRating::Known(Priority::News1),
                FrequencyRating::Raw("nf32".into()),
                FrequencyRating::Known(Priority::Ichi1),
            ]
        );
    }

    #[test]
    fn test_reading_flags_and_info() {
        let mut element = reading("ハイ");
        element.re_nokanji = Some(serde::de::IgnoredAny);
        element.re_restr = strings(&["肺"]);
        element.re_inf = strings(&["&ik;", "&unknown;"]);
        let raw = entry("4", vec![element], vec![sense(&["yes"])]);
        let element = &map_entry(&raw).unwrap().reading_elements[0];

        assert!(!element.is_true_kanji_reading);
        assert_eq!(element.subset_of_non_kana_readings, Some(strings(&["肺"])));
        assert_eq!(
            element.reading_info,
            vec![Some(ReadingInfo::IrregularKanaUsage), None]
        );
    }

    #[test]
    fn test_lexeme_restrictions() {
        assert_eq!(map_lexeme_restrictions(&[], &[]), None);

        let only_reading = map_lexeme_restrictions(&[], &strings(&["X"])).unwrap();
        assert_eq!(
            only_reading,
            vec![LexemeRestriction {
                kind: LexemeType::Reading,
                contents: strings(&["X"]),
            }]
        );

        let both = map_lexeme_restrictions(&strings(&["漢"]), &strings(&["かん"])).unwrap();
        assert_eq!(both.len(), 2);
        assert_eq!(both[0].kind, LexemeType::Reading);
        assert_eq!(both[1].kind, LexemeType::Kanji);
        assert_eq!(both[1].contents, strings(&["漢"]));
    }

    #[test]
    fn test_sense_tags() {
        let mut raw_sense = sense(&["computer"]);
        raw_sense.field = strings(&["&comp;", "&nope;"]);
        raw_sense.misc = strings(&["&uk;"]);
        raw_sense.dial = strings(&["&ksb;"]);
        raw_sense.pos = strings(&["&n;", "&vs;"]);
        raw_sense.ant = strings(&["アナログ"]);
        raw_sense.s_inf = strings(&["usu. in compounds", "second"]);
        let raw = entry("5", vec![reading("コンピュータ")], vec![raw_sense]);
        let sense = &map_entry(&raw).unwrap().sense_elements[0];

        assert_eq!(sense.fields, Some(vec![Some(Field::Computing), None]));
        assert_eq!(
            sense.miscellaneous,
            Some(vec![Some(Miscellaneous::WrittenOnlyInKana)])
        );
        assert_eq!(sense.dialect, Some(Dialect::Kansai));
        assert_eq!(sense.part_of_speech, Some(PartOfSpeech::CommonNoun));
        assert_eq!(sense.antonyms, Some(strings(&["アナログ"])));
        assert_eq!(sense.sense_info.as_deref(), Some("usu. in compounds"));
    }

    #[test]
    fn test_unknown_single_tags_are_dropped() {
        let mut raw_sense = sense(&["x"]);
        raw_sense.dial = strings(&["&atlantis;"]);
        raw_sense.pos = strings(&["&n-made-up;"]);
        let raw = entry("6", vec![reading("x")], vec![raw_sense]);
        let sense = &map_entry(&raw).unwrap().sense_elements[0];
        assert_eq!(sense.dialect, None);
        assert_eq!(sense.part_of_speech, None);
    }

    #[test]
    fn test_missing_groups_fail() {
        let no_readings = entry("7", Vec::new(), vec![sense(&["x"])]);
        assert!(matches!(
            map_entry(&no_readings),
            Err(JmdictError::MissingReadingElements { id: 7 })
        ));

        let no_senses = entry("8", vec![reading("x")], Vec::new());
        assert!(matches!(
            map_entry(&no_senses),
            Err(JmdictError::MissingSenseElements { id: 8 })
        ));
    }

    #[test]
    fn test_malformed_identifier() {
        let raw = entry("10x", vec![reading("x")], vec![sense(&["x"])]);
        assert!(matches!(
            map_entry(&raw),
            Err(JmdictError::MalformedIdentifier(ref s)) if s == "10x"
        ));

        let mut raw = entry("1", vec![reading("x")], vec![sense(&["x"])]);
        raw.ent_seq.clear();
        assert!(matches!(
            map_entry(&raw),
            Err(JmdictError::MalformedIdentifier(_))
        ));

        let raw = entry("-1", vec![reading("x")], vec![sense(&["x"])]);
        assert!(map_entry(&raw).is_err());
    }

    #[test]
    fn test_kanji_elements_stay_empty() {
        let mut raw = entry("9", vec![reading("かんじ")], vec![sense(&["kanji"])]);
        raw.k_ele.push(RawKanjiElement {
            keb: "漢字".into(),
            ke_inf: Vec::new(),
            ke_pri: strings(&["news1"]),
        });
        assert!(map_entry(&raw).unwrap().kanji_elements.is_empty());
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let mut element = reading("ゆめ");
        element.re_pri = strings(&["news1", "nf05"]);
        let raw = entry("11", vec![element], vec![sense(&["dream", "vision"])]);
        let first = serde_json::to_vec(&map_entry(&raw).unwrap()).unwrap();
        let second = serde_json::to_vec(&map_entry(&raw).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_preserves_order_and_skips_failures() {
        let raw: Vec<RawEntry> = (0..200)
            .map(|i| {
                if i % 50 == 7 {
                    entry(&i.to_string(), Vec::new(), vec![sense(&["x"])])
                } else {
                    entry(&i.to_string(), vec![reading("x")], vec![sense(&["x"])])
                }
            })
            .collect();

        let results = map_entries(&raw);
        assert_eq!(results.len(), 200);
        assert!(results[7].is_err());
        assert_eq!(results[8].as_ref().unwrap().id, 8);

        let (entries, report) = map_dictionary(&raw);
        assert_eq!(report, MappingReport { mapped: 196, skipped: 4 });
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
