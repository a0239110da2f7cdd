//! Building and school building representations.

use kore_persistence::ResourceType;
use kore_persistence::models::{Address, Building, Photo, School, SchoolBuilding};
use serde_json::{Map, Value, json};

use super::{BuildingDoc, Renderer, SchoolBuildingDoc, media, school};

impl Renderer {
    /// Renders a building with the schools that used it.
    pub fn building(&self, doc: &BuildingDoc) -> Value {
        let mut value = self.building_for_school(&doc.building);
        if let Value::Object(map) = &mut value {
            map.insert(
                "schools".to_string(),
                Value::Array(
                    doc.school_buildings
                        .iter()
                        .map(|(school_building, school)| {
                            self.school_building_for_building(school_building, school)
                        })
                        .collect(),
                ),
            );
        }
        value
    }

    /// Renders a school's use of a building with the building, photos and
    /// school.
    pub fn school_building(&self, doc: &SchoolBuildingDoc) -> Value {
        let school_building = &doc.school_building;
        let mut map = Map::new();
        map.insert(
            "url".to_string(),
            json!(self.url(ResourceType::SchoolBuilding, school_building.id)),
        );
        map.insert("id".to_string(), json!(school_building.id));
        map.insert(
            "building".to_string(),
            self.building_for_school(&school_building.building),
        );
        map.insert("photos".to_string(), photos(&school_building.photos));
        map.insert("school".to_string(), self.school(&doc.school));
        usage_fields(&mut map, school_building);
        Value::Object(map)
    }

    /// Renders a school's use of a building as nested in the school.
    pub fn school_building_for_school(&self, school_building: &SchoolBuilding) -> Value {
        let mut map = Map::new();
        map.insert(
            "url".to_string(),
            json!(self.url(ResourceType::SchoolBuilding, school_building.id)),
        );
        map.insert("id".to_string(), json!(school_building.id));
        map.insert(
            "building".to_string(),
            self.building_for_school(&school_building.building),
        );
        map.insert("photos".to_string(), photos(&school_building.photos));
        usage_fields(&mut map, school_building);
        Value::Object(map)
    }

    fn school_building_for_building(&self, school_building: &SchoolBuilding, school: &School) -> Value {
        let mut map = Map::new();
        map.insert(
            "url".to_string(),
            json!(self.url(ResourceType::SchoolBuilding, school_building.id)),
        );
        map.insert("id".to_string(), json!(school_building.id));
        map.insert("photos".to_string(), photos(&school_building.photos));
        map.insert("school".to_string(), self.school(school));
        usage_fields(&mut map, school_building);
        Value::Object(map)
    }

    /// Renders a building with its addresses.
    pub fn building_for_school(&self, building: &Building) -> Value {
        json!({
            "url": self.url(ResourceType::Building, building.id),
            "id": building.id,
            "neighborhood": building.neighborhood,
            "addresses": building.addresses.iter().map(address).collect::<Vec<_>>(),
            "construction_year": building.construction_year,
            "architect": building.architect,
            "architect_firm": building.architect_firm,
            "property_number": building.property_number,
            "sliced": building.sliced,
            "comment": building.comment,
            "reference": building.reference,
            "approx": building.approx,
            "owners": building.owners.iter().map(school::ownership).collect::<Vec<_>>(),
        })
    }
}

fn usage_fields(map: &mut Map<String, Value>, school_building: &SchoolBuilding) {
    map.insert("approx_begin".to_string(), json!(school_building.approx_begin));
    map.insert("approx_end".to_string(), json!(school_building.approx_end));
    let dates = &school_building.dates;
    map.insert("begin_day".to_string(), json!(dates.begin_day));
    map.insert("begin_month".to_string(), json!(dates.begin_month));
    map.insert(
        "begin_year".to_string(),
        json!(school_building.interval.begin_year),
    );
    map.insert("end_day".to_string(), json!(dates.end_day));
    map.insert("end_month".to_string(), json!(dates.end_month));
    map.insert("end_year".to_string(), json!(school_building.interval.end_year));
    map.insert("ownership".to_string(), json!(school_building.ownership));
    map.insert("reference".to_string(), json!(school_building.reference));
}

fn photos(photos: &[Photo]) -> Value {
    photos
        .iter()
        .map(|photo| {
            json!({
                "id": photo.id,
                "url": media::photo_url(&photo.url),
                "is_front": photo.is_front,
                "curated": photo.curated,
            })
        })
        .collect()
}

fn address(address: &Address) -> Value {
    json!({
        "id": address.id,
        "street_name_fi": address.street_name_fi,
        "street_name_sv": address.street_name_sv,
        "zip_code": address.zip_code,
        "municipality_fi": address.municipality_fi,
        "municipality_sv": address.municipality_sv,
        "location": media::location(address),
    })
}
