use jmdict_rs::parse::parse_jmdict;
use jmdict_rs::{
    Dialect, Entry, Field, FrequencyRating, GlossaryType, JmdictError, KanaType, Language,
    LexemeType, Miscellaneous, PartOfSpeech, Priority, ReadingInfo, export, map_dictionary,
    map_entry,
};
use tempfile::tempdir;

const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE JMdict [
<!ELEMENT JMdict (entry*)>
<!ENTITY adj-na "adjectival nouns or quasi-adjectives (keiyodoshi)">
<!ENTITY n "noun (common) (futsuumeishi)">
<!ENTITY vs "noun or participle which takes the aux. verb suru">
<!ENTITY comp "computing">
<!ENTITY uk "word usually written using kana alone">
<!ENTITY ksb "Kansai-ben">
<!ENTITY ik "word containing irregular kana usage">
]>
<JMdict>
<entry>
<ent_seq>1000000</ent_seq>
<r_ele>
<reb>ヽ</reb>
</r_ele>
<r_ele>
<reb>くりかえし</reb>
</r_ele>
<sense>
<pos>&n;</pos>
<gloss>repetition mark in katakana</gloss>
</sense>
</entry>
<entry>
<ent_seq>1114000</ent_seq>
<k_ele>
<keb>電子計算機</keb>
</k_ele>
<r_ele>
<reb>コンピューター</reb>
<re_pri>gai1</re_pri>
<re_pri>nf05</re_pri>
</r_ele>
<r_ele>
<reb>コンピュータ</reb>
<re_nokanji/>
<re_inf>&ik;</re_inf>
</r_ele>
<sense>
<stagr>コンピューター</stagr>
<pos>&n;</pos>
<field>&comp;</field>
<misc>&uk;</misc>
<dial>&ksb;</dial>
<s_inf>esp. コンピュータ in technical writing</s_inf>
<gloss>computer</gloss>
<gloss g_type="expl">electronic computing machine</gloss>
<gloss xml:lang="ger">Computer</gloss>
<gloss xml:lang="fre">ordinateur</gloss>
</sense>
</entry>
<entry>
<ent_seq>2000000</ent_seq>
<r_ele>
<reb>からっぽ</reb>
</r_ele>
</entry>
</JMdict>
"#;

#[tokio::test]
async fn fixture_maps_end_to_end() {
    let raw = parse_jmdict(FIXTURE.to_string()).await.unwrap();
    assert_eq!(raw.entries.len(), 3);

    let (entries, report) = map_dictionary(&raw.entries);
    assert_eq!(report.mapped, 2);
    assert_eq!(report.skipped, 1);

    let first = &entries[0];
    assert_eq!(first.id, 1000000);
    assert_eq!(first.reading_elements.len(), 2);
    assert_eq!(first.reading_elements[0].reading.kana_type, vec![KanaType::Katakana]);
    assert_eq!(first.reading_elements[1].reading.kana_type, vec![KanaType::Hiragana]);
    assert_eq!(
        first.sense_elements[0].part_of_speech,
        Some(PartOfSpeech::CommonNoun)
    );

    let computer = &entries[1];
    assert_eq!(computer.id, 1114000);
    assert!(computer.kanji_elements.is_empty());
    assert!(computer.is_common());

    let long = &computer.reading_elements[0];
    assert!(long.is_true_kanji_reading);
    assert_eq!(
        long.frequency_rating,
        vec![
            FrequencyRating::Known(Priority::Gai1),
            FrequencyRating::Raw("nf05".into())
        ]
    );

    let short = &computer.reading_elements[1];
    assert!(!short.is_true_kanji_reading);
    assert_eq!(short.reading_info, vec![Some(ReadingInfo::IrregularKanaUsage)]);

    let sense = &computer.sense_elements[0];
    assert_eq!(sense.fields, Some(vec![Some(Field::Computing)]));
    assert_eq!(
        sense.miscellaneous,
        Some(vec![Some(Miscellaneous::WrittenOnlyInKana)])
    );
    assert_eq!(sense.dialect, Some(Dialect::Kansai));
    assert_eq!(
        sense.sense_info.as_deref(),
        Some("esp. コンピュータ in technical writing")
    );

    let restrictions = sense.lexeme_restrictions.as_ref().unwrap();
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].kind, LexemeType::Reading);
    assert_eq!(restrictions[0].contents, vec!["コンピューター".to_string()]);

    let glossary: Vec<(&str, Language, Option<GlossaryType>)> = sense
        .glossary
        .iter()
        .map(|t| (t.translation.as_str(), t.language, t.glossary_type))
        .collect();
    assert_eq!(
        glossary,
        vec![
            ("computer", Language::English, None),
            (
                "electronic computing machine",
                Language::English,
                Some(GlossaryType::Explanation)
            ),
            ("Computer", Language::German, None),
            ("ordinateur", Language::French, None),
        ]
    );
}

#[tokio::test]
async fn entry_without_senses_is_a_mapping_failure() {
    let raw = parse_jmdict(FIXTURE.to_string()).await.unwrap();
    let result = map_entry(&raw.entries[2]);
    assert!(matches!(
        result,
        Err(JmdictError::MissingSenseElements { id: 2000000 })
    ));
    assert!(result.unwrap_err().is_entry_failure());
}

#[tokio::test]
async fn exported_entries_round_trip() {
    let raw = parse_jmdict(FIXTURE.to_string()).await.unwrap();
    let (entries, _) = map_dictionary(&raw.entries);

    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("JMdict.json");
    export::write_entries(&path, &entries, false).unwrap();
    let restored: Vec<Entry> = export::read_entries(&path).unwrap();
    assert_eq!(restored, entries);

    // Same input, same bytes.
    let (again, _) = map_dictionary(&raw.entries);
    assert_eq!(
        serde_json::to_string(&again).unwrap(),
        serde_json::to_string(&entries).unwrap()
    );
}
