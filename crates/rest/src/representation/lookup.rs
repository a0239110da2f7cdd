//! Language, school type and school field representations.

use kore_persistence::ResourceType;
use kore_persistence::models::{Language, SchoolFieldName, SchoolTypeName};
use serde_json::{Value, json};

use super::Renderer;

impl Renderer {
    /// Renders a language.
    pub fn language(&self, language: &Language) -> Value {
        json!({
            "url": self.url(ResourceType::Language, language.id),
            "id": language.id,
            "name": language.name,
        })
    }

    /// Renders a school type name.
    pub fn school_type(&self, kind: &SchoolTypeName) -> Value {
        json!({
            "url": self.url(ResourceType::SchoolType, kind.id),
            "id": kind.id,
            "name": kind.name,
            "description": kind.description,
        })
    }

    /// Renders a school field name. The field's description is its name.
    pub fn school_field(&self, field: &SchoolFieldName) -> Value {
        json!({
            "url": self.url(ResourceType::SchoolField, field.id),
            "id": field.id,
            "name": field.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::NamePolicy;

    #[test]
    fn test_school_field_name_comes_from_description() {
        let renderer = Renderer::new("http://testserver", NamePolicy::default());
        let value = renderer.school_field(&SchoolFieldName {
            id: 1,
            description: "kauppa".to_string(),
        });
        assert_eq!(
            value,
            json!({"url": "http://testserver/v1/school_field/1/", "id": 1, "name": "kauppa"})
        );
    }
}
