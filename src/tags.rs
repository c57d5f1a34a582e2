//! Closed tag vocabularies used by JMdict and the resolver that maps source
//! tokens onto them.
//!
//! Each enumeration is declared once with its literal token (e.g. `&comp;`).
//! That token drives resolution, `Display`, and serde, so exported data stays
//! stable even if variants are renamed.
//!
//! See <http://www.edrdg.org/jmdict/jmdict_dtd_h.html> for the upstream tag lists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A closed enumeration whose members are identified by a literal source token.
pub trait TagEnum: Copy + Sized + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// The literal token this member is written as in the source markup.
    fn token(&self) -> &'static str;

    /// Returns the member whose token equals `token` exactly, or `None`.
    ///
    /// Unknown tokens are expected: the dictionary vocabulary grows
    /// independently of this crate.
    fn resolve(token: &str) -> Option<Self>;
}

/// Builds the token -> member table for `T`. Called once per enumeration.
fn build_table<T: TagEnum>() -> HashMap<&'static str, T> {
    T::ALL.iter().map(|member| (member.token(), *member)).collect()
}

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $token)] $variant, )+
        }

        impl TagEnum for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant, )+ ];

            fn token(&self) -> &'static str {
                match self {
                    $( $name::$variant => $token, )+
                }
            }

            fn resolve(token: &str) -> Option<Self> {
                static TABLE: LazyLock<HashMap<&'static str, $name>> =
                    LazyLock::new(build_table::<$name>);
                TABLE.get(token).copied()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

tag_enum! {
    /// `<dial>`: regional dialect a word or phrase originates from.
    pub enum Dialect {
        Brazilian => "&bra;",
        Hokkaido => "&hob;",
        Kansai => "&ksb;",
        Kantou => "&ktb;",
        Kyoto => "&kyb;",
        Kyuushuu => "&kyu;",
        Nagano => "&nab;",
        Osaka => "&osb;",
        Ryuukyuu => "&rkb;",
        Touhoku => "&thb;",
        Tosa => "&tsb;",
        Tsugaru => "&tsug;",
    }
}

tag_enum! {
    /// `<field>`: field of application of an entry or sense.
    pub enum Field {
        Agriculture => "&agric;",
        Anatomy => "&anat;",
        Archeology => "&archeol;",
        Architecture => "&archit;",
        Art => "&art;",
        Astronomy => "&astron;",
        Audiovisual => "&audvid;",
        Aviation => "&aviat;",
        Baseball => "&baseb;",
        Biochemistry => "&biochem;",
        Biology => "&biol;",
        Botany => "&bot;",
        Buddhism => "&Buddh;",
        Business => "&bus;",
        CardGames => "&cards;",
        Chemistry => "&chem;",
        Christianity => "&Christn;",
        Clothing => "&cloth;",
        Computing => "&comp;",
        Crystallography => "&cryst;",
        Dentistry => "&dent;",
        Ecology => "&ecol;",
        Economics => "&econ;",
        Electricity => "&elec;",
        Electronics => "&electr;",
        Embryology => "&embryo;",
        Engineering => "&engr;",
        Entomology => "&ent;",
        Film => "&film;",
        Finance => "&finc;",
        Fishing => "&fish;",
        Food => "&food;",
        Gardening => "&gardn;",
        Genetics => "&genet;",
        Geography => "&geogr;",
        Geology => "&geol;",
        Geometry => "&geom;",
        Go => "&go;",
        Golf => "&golf;",
        Grammar => "&gramm;",
        GreekMythology => "&grmyth;",
        Hanafuda => "&hanaf;",
        HorseRacing => "&horse;",
        Kabuki => "&kabuki;",
        Law => "&law;",
        Linguistics => "&ling;",
        Logic => "&logic;",
        MartialArts => "&MA;",
        Mahjong => "&mahj;",
        Manga => "&manga;",
        Mathematics => "&math;",
        MechanicalEngineering => "&mech;",
        Medicine => "&med;",
        Meteorology => "&met;",
        Military => "&mil;",
        Mining => "&mining;",
        Music => "&music;",
        Noh => "&noh;",
        Ornithology => "&ornith;",
        Paleontology => "&paleo;",
        Pathology => "&pathol;",
        Pharmacology => "&pharm;",
        Philosophy => "&phil;",
        Photography => "&photo;",
        Physics => "&physics;",
        Physiology => "&physiol;",
        Politics => "&politics;",
        Printing => "&print;",
        Psychiatry => "&psy;",
        Psychoanalysis => "&psyanal;",
        Psychology => "&psych;",
        Railway => "&rail;",
        RomanMythology => "&rommyth;",
        Shinto => "&Shinto;",
        Shogi => "&shogi;",
        Ski => "&ski;",
        Sports => "&sports;",
        Statistics => "&stat;",
        StockMarket => "&stockm;",
        Sumo => "&sumo;",
        Telecommunications => "&telec;",
        Trademark => "&tradem;",
        Television => "&tv;",
        VideoGames => "&vidg;",
        Zoology => "&zool;",
    }
}

tag_enum! {
    /// `<re_pri>` / `<ke_pri>`: the closed part of the priority vocabulary.
    ///
    /// The open-ended `nfXX` ranks are not members; see [`FrequencyRating`].
    pub enum Priority {
        /// First 12,000 words of the Mainichi Shimbun wordfreq list.
        News1 => "news1",
        News2 => "news2",
        /// "Ichimango goi bunruishuu".
        Ichi1 => "ichi1",
        Ichi2 => "ichi2",
        /// Common words absent from the other lists.
        Spec1 => "spec1",
        Spec2 => "spec2",
        /// Common loanwords.
        Gai1 => "gai1",
        Gai2 => "gai2",
    }
}

tag_enum! {
    /// `g_type` attribute of `<gloss>`.
    pub enum GlossaryType {
        Literal => "lit",
        Figurative => "fig",
        Explanation => "expl",
    }
}

tag_enum! {
    /// `<misc>`: other properties of an entry or sense.
    pub enum Miscellaneous {
        Abbreviation => "&abbr;",
        Archaic => "&arch;",
        Character => "&char;",
        ChildlikeLanguage => "&chn;",
        Colloquial => "&col;",
        CompanyName => "&company;",
        Creature => "&creat;",
        DatedTerm => "&dated;",
        Deity => "&dei;",
        Derogatory => "&derog;",
        Document => "&doc;",
        Euphemistic => "&euph;",
        Event => "&ev;",
        FamiliarLanguage => "&fam;",
        Feminine => "&fem;",
        Fiction => "&fict;",
        Formal => "&form;",
        GivenName => "&given;",
        Group => "&group;",
        Historical => "&hist;",
        /// Sonkeigo.
        Honorific => "&hon;",
        /// Kenjougo.
        Humble => "&hum;",
        Idiomatic => "&id;",
        Jocular => "&joc;",
        Legend => "&leg;",
        MangaSlang => "&m;",
        Masculine => "&male;",
        Mythology => "&myth;",
        InternetSlang => "&net;",
        Object => "&obj;",
        Obsolete => "&obs;",
        OnomatopoeicOrMimetic => "&on;",
        Organization => "&organization;",
        Other => "&oth;",
        Person => "&person;",
        Place => "&place;",
        Poetical => "&poet;",
        /// Teineigo.
        Polite => "&pol;",
        ProductName => "&product;",
        Proverb => "&proverb;",
        Quotation => "&quote;",
        Rare => "&rare;",
        Religious => "&relig;",
        Sensitive => "&sens;",
        Service => "&serv;",
        ShipName => "&ship;",
        Slang => "&sl;",
        RailwayStation => "&station;",
        Surname => "&surname;",
        WrittenOnlyInKana => "&uk;",
        UnclassifiedName => "&unclass;",
        Vulgar => "&vulg;",
        Works => "&work;",
        X => "&X;",
        Yojijukugo => "&yoji;",
    }
}

tag_enum! {
    /// `xml:lang` attribute of `<gloss>`. Absent means English.
    pub enum Language {
        English => "eng",
        German => "ger",
        French => "fre",
        Russian => "rus",
        Spanish => "spa",
        Hungarian => "hun",
        Slovenian => "slv",
        Dutch => "dut",
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

tag_enum! {
    /// `<pos>`: part-of-speech annotation of a sense.
    pub enum PartOfSpeech {
        PrenominalNounOrVerb => "&adj-f;",
        KeiyoushiAdjective => "&adj-i;",
        KeiyoushiAdjectiveException => "&adj-ix;",
        KariAdjective => "&adj-kari;",
        KuAdjective => "&adj-ku;",
        KeiyodoshiAdjective => "&adj-na;",
        FormalNaAdjective => "&adj-nari;",
        AdjectiveWithNoParticle => "&adj-no;",
        RentaishiAdjectivalPrenoun => "&adj-pn;",
        ShikuAdjective => "&adj-shiku;",
        TaruAdjective => "&adj-t;",
        FukushiAdverb => "&adv;",
        AdverbWithToParticle => "&adv-to;",
        Auxiliary => "&aux;",
        AuxiliaryAdjective => "&aux-adj;",
        AuxiliaryVerb => "&aux-v;",
        Conjunction => "&conj;",
        Copula => "&cop;",
        Counter => "&ctr;",
        Expression => "&exp;",
        /// Kandoushi.
        Interjection => "&int;",
        /// Futsuumeishi.
        CommonNoun => "&n;",
        /// Fukushitekimeishi.
        AdverbialNoun => "&n-adv;",
        ProperNoun => "&n-pr;",
        PrefixNoun => "&n-pref;",
        SuffixNoun => "&n-suf;",
        /// Jisoumeishi.
        TemporalNoun => "&n-t;",
        Numeric => "&num;",
        Pronoun => "&pn;",
        Prefix => "&pref;",
        Particle => "&prt;",
        Suffix => "&suf;",
        Unclassified => "&unc;",
        UnspecifiedVerb => "&v-unspec;",
        Ichidan => "&v1;",
        KureruIchidan => "&v1-s;",
        NidanEndingWithU => "&v2a-s;",
        UpperNidanEndingWithBu => "&v2b-k;",
        LowerNidanEndingWithBu => "&v2b-s;",
        UpperNidanEndingWithDzu => "&v2d-k;",
        LowerNidanEndingWithDzu => "&v2d-s;",
        UpperNidanEndingWithGu => "&v2g-k;",
        LowerNidanEndingWithGu => "&v2g-s;",
        UpperNidanEndingWithFu => "&v2h-k;",
        LowerNidanEndingWithFu => "&v2h-s;",
        UpperNidanEndingWithKu => "&v2k-k;",
        LowerNidanEndingWithKu => "&v2k-s;",
        UpperNidanEndingWithMu => "&v2m-k;",
        LowerNidanEndingWithMu => "&v2m-s;",
        LowerNidanEndingWithNu => "&v2n-s;",
        UpperNidanEndingWithRu => "&v2r-k;",
        LowerNidanEndingWithRu => "&v2r-s;",
        LowerNidanEndingWithSu => "&v2s-s;",
        UpperNidanEndingWithTsu => "&v2t-k;",
        LowerNidanEndingWithTsu => "&v2t-s;",
        LowerNidanEndingWithUAndWeConjugation => "&v2w-s;",
        UpperNidanEndingWithYu => "&v2y-k;",
        LowerNidanEndingWithYu => "&v2y-s;",
        LowerNidanEndingWithZu => "&v2z-s;",
        YodanEndingWithBu => "&v4b;",
        YodanEndingWithGu => "&v4g;",
        YodanEndingWithFu => "&v4h;",
        YodanEndingWithKu => "&v4k;",
        YodanEndingWithMu => "&v4m;",
        YodanEndingWithNu => "&v4n;",
        YodanEndingWithRu => "&v4r;",
        YodanEndingWithSu => "&v4s;",
        YodanEndingWithTsu => "&v4t;",
        AruGodan => "&v5aru;",
        GodanEndingWithBu => "&v5b;",
        GodanEndingWithGu => "&v5g;",
        GodanEndingWithKu => "&v5k;",
        IkuYukuGodan => "&v5k-s;",
        GodanEndingWithMu => "&v5m;",
        GodanEndingWithNu => "&v5n;",
        GodanEndingWithRu => "&v5r;",
        IrregularGodanEndingWithRu => "&v5r-i;",
        GodanEndingWithSu => "&v5s;",
        GodanEndingWithTsu => "&v5t;",
        GodanEndingWithU => "&v5u;",
        SpecialGodanEndingWithU => "&v5u-s;",
        GodanEndingWithUru => "&v5uru;",
        Intransitive => "&vi;",
        KuruVerb => "&vk;",
        IrregularNuVerb => "&vn;",
        IrregularRuVerb => "&vr;",
        NounOrParticipleUsingSuru => "&vs;",
        SuVerb => "&vs-c;",
        IncludedSuruVerb => "&vs-i;",
        SpecialSuruVerb => "&vs-s;",
        TransitiveVerb => "&vt;",
        ZuruIchidan => "&vz;",
    }
}

tag_enum! {
    /// `<re_inf>`: irregularities of a reading.
    pub enum ReadingInfo {
        Gikun => "&gikun;",
        IrregularKanaUsage => "&ik;",
        ObsoleteKanaUsage => "&ok;",
        SearchOnlyKanaForm => "&sK;",
    }
}

tag_enum! {
    /// `<ke_inf>`: irregularities of a kanji form.
    ///
    /// Kanji elements are not mapped yet, so nothing produces this today.
    pub enum KanjiInfo {
        Ateji => "&ateji;",
        IrregularKanaUsage => "&ik;",
        IrregularKanjiUsage => "&iK;",
        IrregularOkuriganaUsage => "&io;",
        OutdatedKanji => "&oK;",
        RarelyUsedKanjiForm => "&rK;",
        SearchOnlyKanjiForm => "&sK;",
    }
}

/// A `<re_pri>` marker: either a known priority list or a raw token such as
/// `nf32` (the numeric frequency ranks are open-ended).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencyRating {
    Known(Priority),
    Raw(String),
}

impl FrequencyRating {
    /// Resolves `token` against [`Priority`], keeping it verbatim when it is
    /// not a member.
    pub fn resolve(token: &str) -> Self {
        match Priority::resolve(token) {
            Some(priority) => FrequencyRating::Known(priority),
            None => FrequencyRating::Raw(token.to_string()),
        }
    }

    /// The token as it appears in the source.
    pub fn as_str(&self) -> &str {
        match self {
            FrequencyRating::Known(priority) => priority.token(),
            FrequencyRating::Raw(raw) => raw,
        }
    }

    /// The `nfXX` rank (1-48, 500 words per bucket) if this is a raw `nf` marker.
    pub fn nf_rank(&self) -> Option<u8> {
        match self {
            FrequencyRating::Raw(raw) => raw.strip_prefix("nf")?.parse().ok(),
            FrequencyRating::Known(_) => None,
        }
    }
}

impl fmt::Display for FrequencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
