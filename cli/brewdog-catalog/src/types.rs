//! Catalog record types.
//!
//! These mirror the subset of the catalog's beer objects that the browser
//! displays. Everything else in a response is ignored on deserialization.

use serde::{Deserialize, Deserializer, Serialize};

use crate::transform::SortColumn;

/// A single beer as returned by the catalog API.
///
/// Records are read-only once fetched; the only identity is [Beer::id].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub abv: Abv,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Beer {
    /// The textual value of `column` for this record.
    ///
    /// Sorting and filtering both operate on this text.
    pub fn field(&self, column: SortColumn) -> &str {
        match column {
            SortColumn::Name => &self.name,
            SortColumn::Description => &self.description,
            SortColumn::Tagline => &self.tagline,
            SortColumn::Abv => self.abv.as_str(),
        }
    }
}

/// Alcohol by volume, kept as the text the catalog sent.
///
/// The catalog serves ABV as a JSON number, but the browser orders it as
/// text (`"10.0"` sorts before `"9.0"`), so the value is never parsed into a
/// float. Both numbers and strings are accepted on input.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Abv(String);

impl Abv {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Abv {
    fn from(value: &str) -> Self {
        Abv(value.to_string())
    }
}

impl<'de> Deserialize<'de> for Abv {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAbv {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawAbv::deserialize(deserializer)? {
            RawAbv::Number(number) => Abv(number.to_string()),
            RawAbv::Text(text) => Abv(text),
        })
    }
}

/// Build a [Beer] with only the fields tests usually care about.
#[cfg(any(test, feature = "tests"))]
pub fn beer(id: u64, name: &str, tagline: &str, description: &str, abv: &str) -> Beer {
    Beer {
        id,
        name: name.to_string(),
        description: description.to_string(),
        tagline: tagline.to_string(),
        abv: Abv::from(abv),
        image_url: Some(format!("https://images.punkapi.com/v2/{id}.png")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_catalog_record_ignoring_extra_fields() {
        let value = json!({
            "id": 1,
            "name": "Buzz",
            "tagline": "A Real Bitter Experience.",
            "first_brewed": "09/2007",
            "description": "A light, crisp and bitter IPA brewed with English and American hops.",
            "image_url": "https://images.punkapi.com/v2/keg.png",
            "abv": 4.5,
            "ibu": 60,
            "ingredients": { "malt": [] }
        });

        let beer: Beer = serde_json::from_value(value).unwrap();
        assert_eq!(beer, Beer {
            id: 1,
            name: "Buzz".to_string(),
            description: "A light, crisp and bitter IPA brewed with English and American hops."
                .to_string(),
            tagline: "A Real Bitter Experience.".to_string(),
            abv: Abv::from("4.5"),
            image_url: Some("https://images.punkapi.com/v2/keg.png".to_string()),
        });
    }

    #[test]
    fn abv_keeps_number_text() {
        let abvs: Vec<Abv> = serde_json::from_value(json!([10.0, 9, "7.5"])).unwrap();
        let texts = abvs.iter().map(Abv::as_str).collect::<Vec<_>>();
        assert_eq!(texts, ["10.0", "9", "7.5"]);
    }

    #[test]
    fn missing_image_url_is_none() {
        let beer: Beer = serde_json::from_value(json!({
            "id": 7,
            "name": "AB:12",
            "tagline": "Imperial Black Belgian Ale.",
            "description": "An Imperial Black Belgian Ale.",
            "abv": 11.2,
            "image_url": null
        }))
        .unwrap();
        assert_eq!(beer.image_url, None);
        assert_eq!(beer.field(SortColumn::Abv), "11.2");
    }
}
