//! Catalog entity records.
//!
//! [`EntitySummary`] is the row-level record delivered by list and search
//! pages; [`EntityDetail`] is the full record fetched lazily for one detail
//! view. Both decode straight from the API's JSON, with missing arrays and
//! strings defaulting to empty so minor schema drift degrades instead of
//! failing the whole record.

use serde::{Deserialize, Serialize};

/// Language tag of the description shown on the detail screen.
pub const PREFERRED_DESCRIPTION_LANGUAGE: &str = "en_us";

/// Placeholder for detail fields the API left empty.
pub const UNKNOWN_VALUE: &str = "Unknown";

/// One entity as it appears in a list or search page.
///
/// Identity is `id`; two summaries with the same id are the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub href: String,
    #[serde(rename = "image", default)]
    pub image_url: String,
}

impl EntitySummary {
    /// Creates a summary with the given fields.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        href: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            href: href.into(),
            image_url: image_url.into(),
        }
    }

    /// Catalog number as shown in list rows, e.g. `#007`.
    #[must_use]
    pub fn display_number(&self) -> String {
        display_number(self.id)
    }
}

/// Formats an entity id as a zero-padded catalog number.
///
/// ```
/// assert_eq!(digidex::domain::entity::display_number(7), "#007");
/// assert_eq!(digidex::domain::entity::display_number(1234), "#1234");
/// ```
#[must_use]
pub fn display_number(id: i64) -> String {
    format!("#{id:03}")
}

/// One server-paginated slice of the entity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<EntitySummary>,
    pub page_index: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl Page {
    /// Returns `true` when no page follows `page` according to this response.
    ///
    /// An empty page also counts as the end of the list, so a server that
    /// over-reports `total_pages` cannot keep the client fetching forever.
    #[must_use]
    pub fn is_last_after(&self, page: u32) -> bool {
        self.items.is_empty() || page.saturating_add(1) >= self.total_pages
    }
}

/// Full record for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityDetail {
    pub id: i64,
    pub name: String,
    pub x_antibody: bool,
    pub images: Vec<Image>,
    pub levels: Vec<Level>,
    pub types: Vec<EntityType>,
    pub attributes: Vec<Attribute>,
    pub fields: Vec<Field>,
    pub release_date: String,
    pub descriptions: Vec<Description>,
    pub skills: Vec<Skill>,
    pub prior_evolutions: Vec<Evolution>,
    pub next_evolutions: Vec<Evolution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub href: String,
    pub transparent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Level {
    pub id: i64,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityType {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub id: i64,
    pub attribute: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub id: i64,
    pub field: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    pub origin: String,
    pub language: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: i64,
    pub skill: String,
    pub translation: String,
    pub description: String,
}

/// Reference to a related entity in an evolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Evolution {
    pub id: i64,
    pub digimon: String,
    pub condition: String,
    pub image: String,
    pub url: String,
}

/// Presentation-ready fields of the detail screen.
///
/// Picks the first level, type and attribute (falling back to
/// [`UNKNOWN_VALUE`]) and the English description, mirroring what the detail
/// view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSummary {
    pub id: i64,
    pub name: String,
    pub number: String,
    pub image_url: Option<String>,
    pub level: String,
    pub kind: String,
    pub attribute: String,
    pub release_date: String,
    pub description: Option<String>,
}

impl From<&EntityDetail> for DetailSummary {
    fn from(detail: &EntityDetail) -> Self {
        fn first_or_unknown(value: Option<&str>) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or(UNKNOWN_VALUE)
                .to_string()
        }

        Self {
            id: detail.id,
            name: detail.name.clone(),
            number: display_number(detail.id),
            image_url: detail.images.first().map(|image| image.href.clone()),
            level: first_or_unknown(detail.levels.first().map(|l| l.level.as_str())),
            kind: first_or_unknown(detail.types.first().map(|t| t.kind.as_str())),
            attribute: first_or_unknown(detail.attributes.first().map(|a| a.attribute.as_str())),
            release_date: detail.release_date.clone(),
            description: detail
                .descriptions
                .iter()
                .find(|d| d.language == PREFERRED_DESCRIPTION_LANGUAGE)
                .map(|d| d.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 289,
        "name": "Agumon",
        "xAntibody": false,
        "images": [{"href": "https://digi-api.com/images/digimon/w/Agumon.png", "transparent": false}],
        "levels": [{"id": 4, "level": "Child"}, {"id": 5, "level": "Rookie"}],
        "types": [{"id": 152, "type": "Reptile"}],
        "attributes": [{"id": 2, "attribute": "Vaccine"}],
        "fields": [{"id": 6, "field": "Metal Empire", "image": "https://digi-api.com/images/etc/fields/Metal_Empire.png"}],
        "releaseDate": "1997",
        "descriptions": [
            {"origin": "reference_book", "language": "jap", "description": "..."},
            {"origin": "reference_book", "language": "en_us", "description": "A Reptile Digimon."}
        ],
        "skills": [{"id": 1, "skill": "Pepper Breath", "translation": "Baby Flame", "description": "Spits fire."}],
        "priorEvolutions": [{"id": 12, "digimon": "Koromon", "condition": "", "image": "", "url": ""}],
        "nextEvolutions": []
    }"#;

    #[test]
    fn decodes_detail_record() {
        let detail: EntityDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.id, 289);
        assert_eq!(detail.types[0].kind, "Reptile");
        assert_eq!(detail.prior_evolutions[0].digimon, "Koromon");
        assert!(detail.next_evolutions.is_empty());
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let detail: EntityDetail = serde_json::from_str(r#"{"id": 1, "name": "Botamon"}"#).unwrap();
        assert!(detail.levels.is_empty());
        assert!(detail.skills.is_empty());
        assert_eq!(detail.release_date, "");
    }

    #[test]
    fn detail_summary_picks_primary_values() {
        let detail: EntityDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        let summary = DetailSummary::from(&detail);

        assert_eq!(summary.number, "#289");
        assert_eq!(summary.level, "Child");
        assert_eq!(summary.kind, "Reptile");
        assert_eq!(summary.attribute, "Vaccine");
        assert_eq!(summary.description.as_deref(), Some("A Reptile Digimon."));
        assert_eq!(
            summary.image_url.as_deref(),
            Some("https://digi-api.com/images/digimon/w/Agumon.png")
        );
    }

    #[test]
    fn detail_summary_falls_back_to_unknown() {
        let detail = EntityDetail {
            id: 3,
            name: "Punimon".into(),
            ..EntityDetail::default()
        };
        let summary = DetailSummary::from(&detail);

        assert_eq!(summary.level, UNKNOWN_VALUE);
        assert_eq!(summary.kind, UNKNOWN_VALUE);
        assert_eq!(summary.attribute, UNKNOWN_VALUE);
        assert!(summary.description.is_none());
        assert!(summary.image_url.is_none());
    }

    #[test]
    fn empty_page_is_last() {
        let page = Page {
            items: vec![],
            page_index: 0,
            total_pages: 10,
            total_items: 200,
        };
        assert!(page.is_last_after(0));
    }

    #[test]
    fn last_page_detected_from_total() {
        let page = Page {
            items: vec![EntitySummary::new(1, "Agumon", "", "")],
            page_index: 2,
            total_pages: 3,
            total_items: 41,
        };
        assert!(page.is_last_after(2));
        assert!(!page.is_last_after(1));
    }
}
