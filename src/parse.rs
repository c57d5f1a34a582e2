use crate::error::{JmdictError, Result};
use crate::raw::RawDictionary;
use log::debug;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use tokio::task;

/// Entity names XML defines without a DTD.
const PREDEFINED_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

static ENTITY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&([A-Za-z_][A-Za-z0-9_.-]*);").expect("entity pattern is valid")
});

/// Escapes DTD-defined entity references (`&n;` -> `&amp;n;`) so the parser
/// keeps them as literal tag tokens instead of expanding or rejecting them.
pub fn escape_entity_references(xml: &str) -> Cow<'_, str> {
    ENTITY_REFERENCE.replace_all(xml, |caps: &Captures| {
        let name = &caps[1];
        if PREDEFINED_ENTITIES.contains(&name) {
            caps[0].to_string()
        } else {
            format!("&amp;{};", name)
        }
    })
}

/// Parses JMdict XML into the raw entry tree on the current thread.
pub fn parse_jmdict_str(xml_content: &str) -> Result<RawDictionary> {
    let escaped = escape_entity_references(xml_content);
    from_str(&escaped).map_err(JmdictError::from)
}

/// Parses JMdict XML content into a RawDictionary using spawn_blocking.
pub async fn parse_jmdict(xml_content: String) -> Result<RawDictionary> {
    debug!("Starting JMdict XML parsing (using spawn_blocking)...");
    let dictionary = task::spawn_blocking(move || parse_jmdict_str(&xml_content)).await??;
    debug!(
        "Successfully parsed JMdict XML into {} raw entries.",
        dictionary.entries.len()
    );
    Ok(dictionary)
}
