//! The raw per-entry tree, as deserialized from JMdict XML.
//!
//! Every repeatable sub-tag is a `Vec`, so "absent" and "empty" look the same
//! here; the mapper decides what absence means for each field. Tag values are
//! kept as the literal tokens (`&n;`, `news1`, ...) and resolved later.

use serde::de::IgnoredAny;
use serde::Deserialize;

/// Root `<JMdict>` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDictionary {
    #[serde(rename = "entry", default)]
    pub entries: Vec<RawEntry>,
}

/// One `<entry>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub ent_seq: Vec<String>,
    #[serde(default)]
    pub k_ele: Vec<RawKanjiElement>,
    #[serde(default)]
    pub r_ele: Vec<RawReadingElement>,
    #[serde(default)]
    pub sense: Vec<RawSense>,
}

/// `<k_ele>`. Deserialized so documents load, but not mapped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawKanjiElement {
    #[serde(default)]
    pub keb: String,
    #[serde(default)]
    pub ke_inf: Vec<String>,
    #[serde(default)]
    pub ke_pri: Vec<String>,
}

/// `<r_ele>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReadingElement {
    #[serde(default)]
    pub reb: String,
    /// Presence marker; the element has no content.
    #[serde(default)]
    pub re_nokanji: Option<IgnoredAny>,
    #[serde(default)]
    pub re_restr: Vec<String>,
    #[serde(default)]
    pub re_inf: Vec<String>,
    #[serde(default)]
    pub re_pri: Vec<String>,
}

impl RawReadingElement {
    pub fn has_no_kanji_marker(&self) -> bool {
        self.re_nokanji.is_some()
    }
}

/// `<sense>`. `xref` and `lsource` are not modeled and are skipped by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSense {
    #[serde(default)]
    pub stagk: Vec<String>,
    #[serde(default)]
    pub stagr: Vec<String>,
    #[serde(default)]
    pub pos: Vec<String>,
    #[serde(default)]
    pub ant: Vec<String>,
    #[serde(default)]
    pub field: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
    #[serde(default)]
    pub s_inf: Vec<String>,
    #[serde(default)]
    pub dial: Vec<String>,
    #[serde(default)]
    pub gloss: Vec<RawGloss>,
}

/// A `<gloss>`: either bare text or text carrying `xml:lang` / `g_type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "GlossNode")]
pub enum RawGloss {
    Plain(String),
    Attributed(AttributedText),
}

/// Text content with the attributes the mapper cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributedText {
    pub text: String,
    pub lang: Option<String>,
    pub g_type: Option<String>,
}

impl RawGloss {
    pub fn text(&self) -> &str {
        match self {
            RawGloss::Plain(text) => text,
            RawGloss::Attributed(attributed) => &attributed.text,
        }
    }

    pub fn lang(&self) -> Option<&str> {
        match self {
            RawGloss::Plain(_) => None,
            RawGloss::Attributed(attributed) => attributed.lang.as_deref(),
        }
    }

    pub fn g_type(&self) -> Option<&str> {
        match self {
            RawGloss::Plain(_) => None,
            RawGloss::Attributed(attributed) => attributed.g_type.as_deref(),
        }
    }
}

impl From<&str> for RawGloss {
    fn from(text: &str) -> Self {
        RawGloss::Plain(text.to_string())
    }
}

/// The shape quick-xml produces for a `<gloss>` element.
///
/// quick-xml drops the namespace prefix from attribute names, so `xml:lang`
/// arrives as `@lang`.
#[derive(Debug, Deserialize)]
struct GlossNode {
    #[serde(rename = "@lang", default)]
    lang: Option<String>,
    #[serde(rename = "@g_type", default)]
    g_type: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

impl From<GlossNode> for RawGloss {
    fn from(node: GlossNode) -> Self {
        if node.lang.is_none() && node.g_type.is_none() {
            RawGloss::Plain(node.text)
        } else {
            RawGloss::Attributed(AttributedText {
                text: node.text,
                lang: node.lang,
                g_type: node.g_type,
            })
        }
    }
}
