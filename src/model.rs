//! In-memory entity model and translation configuration
//!
//! OCX structural entities are property bags: a name, an identifier, a
//! GUID and an ordered list of string properties. Rather than an
//! inheritance ladder, one [`EntityInfo`] value is embedded in each
//! concrete entity. The entities themselves are transient; they live while
//! a subtree is walked and are discarded once the shapes are emitted.

use crate::dom::Element;

/// Attributes harvested into the property bag when present
const HARVESTED_ATTRIBUTES: &[&str] = &["functionType", "tightness", "category"];

/// Name, identity and ordered properties shared by all OCX entities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityInfo {
    /// The `id` attribute, when present
    pub id: Option<String>,
    /// The display `name` attribute, when present
    pub name: Option<String>,
    /// The `GUIDRef` attribute, when present
    pub guid: Option<String>,
    /// Ordered key/value properties harvested from the element
    pub properties: Vec<(String, String)>,
}

impl EntityInfo {
    /// Harvest identity and properties from an entity element
    ///
    /// Picks up `id`, `name` and `GUIDRef`, a fixed set of descriptive
    /// attributes, and the text of a nested `Description` child.
    pub fn from_element(element: &Element) -> Self {
        let mut info = EntityInfo {
            id: element.attr("id").map(str::to_string),
            name: element.attr("name").map(str::to_string),
            guid: element.attr("GUIDRef").map(str::to_string),
            properties: Vec::new(),
        };

        for key in HARVESTED_ATTRIBUTES {
            if let Some(value) = element.attr(key) {
                info.properties.push((key.to_string(), value.to_string()));
            }
        }
        if let Some(description) = element.first_child("Description") {
            let text = description.text();
            if !text.is_empty() {
                info.properties.push(("Description".to_string(), text));
            }
        }

        info
    }

    /// Display label: the name, falling back to id, then to `unnamed`
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("unnamed")
    }
}

/// A panel while its subtree is being walked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    /// Identity and harvested properties
    pub info: EntityInfo,
}

impl Panel {
    /// Build a panel model from its element
    pub fn from_element(element: &Element) -> Self {
        Self {
            info: EntityInfo::from_element(element),
        }
    }
}

/// A plate composed into a panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plate {
    /// Identity and harvested properties
    pub info: EntityInfo,
}

impl Plate {
    /// Build a plate model from its element
    pub fn from_element(element: &Element) -> Self {
        Self {
            info: EntityInfo::from_element(element),
        }
    }
}

/// Toggles for the panel translation stages
///
/// Passed into the orchestrator and threaded by reference into every
/// reader; there is no process-wide mutable configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Read panel and plate outer contours
    pub read_outer_contours: bool,
    /// Read panel surfaces (inline or by GUID reference)
    pub read_panel_surfaces: bool,
    /// Restrict the panel surface by its outer contour when both exist
    pub bound_panel_surface: bool,
    /// Read the plates composed into each panel
    pub read_plates: bool,
}

impl TranslatorConfig {
    /// Configuration with every stage enabled
    pub fn new() -> Self {
        Self {
            read_outer_contours: true,
            read_panel_surfaces: true,
            bound_panel_surface: true,
            read_plates: true,
        }
    }

    /// Toggle outer contour reading, builder style
    pub fn with_outer_contours(mut self, enabled: bool) -> Self {
        self.read_outer_contours = enabled;
        self
    }

    /// Toggle panel surface reading, builder style
    pub fn with_panel_surfaces(mut self, enabled: bool) -> Self {
        self.read_panel_surfaces = enabled;
        self
    }

    /// Toggle contour-bounded panel surfaces, builder style
    pub fn with_bound_panel_surface(mut self, enabled: bool) -> Self {
        self.bound_panel_surface = enabled;
        self
    }

    /// Toggle plate reading, builder style
    pub fn with_plates(mut self, enabled: bool) -> Self {
        self.read_plates = enabled;
        self
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_entity_info_harvest() {
        let doc = Document::parse(
            r#"<ocx:Panel xmlns:ocx="urn:test" id="P1" name="Deck 1"
                          ocx:GUIDRef="guid-1" functionType="DECK" tightness="WaterTight">
                 <ocx:Description>Main deck panel</ocx:Description>
               </ocx:Panel>"#,
        )
        .unwrap();

        let info = EntityInfo::from_element(&doc.root);
        assert_eq!(info.id.as_deref(), Some("P1"));
        assert_eq!(info.name.as_deref(), Some("Deck 1"));
        assert_eq!(info.guid.as_deref(), Some("guid-1"));
        assert_eq!(info.label(), "Deck 1");
        assert!(info
            .properties
            .contains(&("functionType".to_string(), "DECK".to_string())));
        assert!(info
            .properties
            .contains(&("Description".to_string(), "Main deck panel".to_string())));
    }

    #[test]
    fn test_entity_label_fallbacks() {
        let mut info = EntityInfo::default();
        assert_eq!(info.label(), "unnamed");
        info.id = Some("P7".to_string());
        assert_eq!(info.label(), "P7");
    }

    #[test]
    fn test_config_builder() {
        let config = TranslatorConfig::new().with_plates(false);
        assert!(config.read_outer_contours);
        assert!(!config.read_plates);
    }
}
