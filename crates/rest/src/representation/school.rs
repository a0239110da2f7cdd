//! School representations.

use kore_persistence::ResourceType;
use kore_persistence::models::{
    ArchiveData, Continuum, Employership, Founder, LifecycleEvent, OwnerFounder, Ownership, School,
    SchoolName, SchoolSummary,
};
use serde_json::{Value, json};

use super::Renderer;

impl Renderer {
    /// Renders a school with everything it embeds.
    pub fn school(&self, school: &School) -> Value {
        json!({
            "url": self.url(ResourceType::School, school.id),
            "id": school.id,
            "names": school.names.iter().map(school_name).collect::<Vec<_>>(),
            "languages": school.languages.iter().map(|l| json!({
                "id": l.id,
                "language": l.language,
                "begin_year": l.interval.begin_year,
                "end_year": l.interval.end_year,
            })).collect::<Vec<_>>(),
            "types": school.types.iter().map(|t| json!({
                "id": t.id,
                "type": self.school_type(&t.kind),
                "begin_year": t.interval.begin_year,
                "end_year": t.interval.end_year,
            })).collect::<Vec<_>>(),
            "fields": school.fields.iter().map(|f| json!({
                "id": f.id,
                "field": self.school_field(&f.field),
                "begin_year": f.interval.begin_year,
                "end_year": f.interval.end_year,
            })).collect::<Vec<_>>(),
            "genders": school.genders.iter().map(|g| json!({
                "id": g.id,
                "gender": g.gender,
                "begin_year": g.interval.begin_year,
                "end_year": g.interval.end_year,
            })).collect::<Vec<_>>(),
            "grade_counts": school.grade_counts.iter().map(|g| json!({
                "id": g.id,
                "number": g.number,
                "begin_year": g.interval.begin_year,
                "end_year": g.interval.end_year,
            })).collect::<Vec<_>>(),
            "buildings": school
                .buildings
                .iter()
                .map(|b| self.school_building_for_school(b))
                .collect::<Vec<_>>(),
            "owners": school.owners.iter().map(ownership).collect::<Vec<_>>(),
            "founders": school.founders.iter().map(founder).collect::<Vec<_>>(),
            "principals": school
                .principals
                .iter()
                .map(|e| self.employership_for_school(e))
                .collect::<Vec<_>>(),
            "special_features": school.special_features,
            "wartime_school": school.wartime_school,
            "nicknames": school.nicknames,
            "checked": school.checked,
            "archives": school.archives.iter().map(archive).collect::<Vec<_>>(),
            "lifecycle_event": school
                .lifecycle_events
                .iter()
                .map(lifecycle_event)
                .collect::<Vec<_>>(),
            "continuum_active": school
                .continuum_active
                .iter()
                .map(|c| self.continuum(c, Side::Active))
                .collect::<Vec<_>>(),
            "continuum_target": school
                .continuum_target
                .iter()
                .map(|c| self.continuum(c, Side::Target))
                .collect::<Vec<_>>(),
        })
    }

    /// Renders an employership as nested in its school. The principal's
    /// name follows the privacy rule for this employership's start year.
    pub fn employership_for_school(&self, employership: &Employership) -> Value {
        let begin_year = employership.interval.begin_year;
        let (surname, first_name) = self.names.names(&employership.principal, begin_year);
        json!({
            "id": employership.id,
            "principal": {
                "url": self.url(ResourceType::Principal, employership.principal.id),
                "id": employership.principal.id,
                "surname": surname,
                "first_name": first_name,
            },
            "school": employership.school_id,
            "begin_year": begin_year,
            "end_year": employership.interval.end_year,
            "reference": employership.reference,
        })
    }

    fn school_summary(&self, school: &SchoolSummary) -> Value {
        json!({
            "url": self.url(ResourceType::School, school.id),
            "id": school.id,
            "names": school.names.iter().map(school_name).collect::<Vec<_>>(),
        })
    }

    /// The school whose list a continuum appears in is linked; the other
    /// school is nested with its names.
    fn continuum(&self, continuum: &Continuum, side: Side) -> Value {
        let (active, target) = match side {
            Side::Active => (
                json!(self.url(ResourceType::School, continuum.active_school.id)),
                self.school_summary(&continuum.target_school),
            ),
            Side::Target => (
                self.school_summary(&continuum.active_school),
                json!(self.url(ResourceType::School, continuum.target_school.id)),
            ),
        };
        json!({
            "active_school": active,
            "description": translate_continuum(&continuum.description),
            "target_school": target,
            "day": continuum.day,
            "month": continuum.month,
            "year": continuum.year,
            "reference": continuum.reference,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Active,
    Target,
}

fn school_name(name: &SchoolName) -> Value {
    json!({
        "id": name.id,
        "value": name.value,
        "official_name": name.official,
        "other_names": name.other_names.iter().map(|other| json!({
            "value": other.value,
            "type": other.kind,
        })).collect::<Vec<_>>(),
        "begin_year": name.interval.begin_year,
        "end_year": name.interval.end_year,
        "reference": name.reference,
    })
}

fn owner_founder(party: &OwnerFounder) -> Value {
    json!({
        "id": party.id,
        "name": party.name,
        "additional_info": party.additional_info,
        "type": party.kind,
    })
}

/// An owner of a school or building.
pub(crate) fn ownership(ownership: &Ownership) -> Value {
    json!({
        "id": ownership.id,
        "owner": owner_founder(&ownership.owner),
        "begin_year": ownership.interval.begin_year,
        "end_year": ownership.interval.end_year,
        "reference": ownership.reference,
    })
}

fn founder(founder: &Founder) -> Value {
    json!({
        "id": founder.id,
        "founder": owner_founder(&founder.founder),
        "reference": founder.reference,
    })
}

fn archive(archive: &ArchiveData) -> Value {
    json!({
        "location": archive.location,
        "url": archive.url,
        "data_type": archive.data_type.as_ref().map(|t| json!({
            "id": t.id,
            "value": t.value,
        })),
        "begin_year": archive.interval.begin_year,
        "end_year": archive.interval.end_year,
    })
}

fn lifecycle_event(event: &LifecycleEvent) -> Value {
    json!({
        "description": event.description,
        "day": event.day,
        "month": event.month,
        "year": event.year,
        "decisionmaker": event.decisionmaker,
        "additional_info": event.additional_info,
    })
}

/// Translates the Finnish continuum verbs to English.
pub(crate) fn translate_continuum(description: &str) -> String {
    description
        .replace("yhdistyy", "joins")
        .replace("eroaa", "separates from")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::NamePolicy;
    use kore_persistence::ValidityInterval;
    use kore_persistence::models::PrincipalName;

    fn renderer() -> Renderer {
        Renderer::new("http://testserver", NamePolicy::default())
    }

    fn summary(id: i64, name: &str) -> SchoolSummary {
        SchoolSummary {
            id,
            names: vec![SchoolName {
                id: id * 10,
                value: name.to_string(),
                official: None,
                interval: ValidityInterval::new(Some(1900), None),
                reference: None,
                other_names: Vec::new(),
            }],
        }
    }

    fn school(id: i64) -> School {
        School {
            id,
            names: Vec::new(),
            languages: Vec::new(),
            types: Vec::new(),
            fields: Vec::new(),
            genders: Vec::new(),
            grade_counts: Vec::new(),
            buildings: Vec::new(),
            owners: Vec::new(),
            founders: Vec::new(),
            principals: Vec::new(),
            archives: Vec::new(),
            lifecycle_events: Vec::new(),
            continuum_active: Vec::new(),
            continuum_target: Vec::new(),
            special_features: None,
            wartime_school: None,
            nicknames: None,
            checked: false,
        }
    }

    fn town() -> OwnerFounder {
        OwnerFounder {
            id: 1,
            name: "Helsingin kaupunki".to_string(),
            additional_info: None,
            kind: "kunta".to_string(),
        }
    }

    fn employership(begin_year: Option<i64>) -> Employership {
        Employership {
            id: 4,
            school_id: 6,
            principal: PrincipalName {
                id: 3,
                surname: Some("Korhonen".to_string()),
                first_name: Some("Maija".to_string()),
            },
            interval: ValidityInterval::new(begin_year, None),
            reference: None,
        }
    }

    #[test]
    fn test_translate_continuum() {
        assert_eq!(translate_continuum("yhdistyy"), "joins");
        assert_eq!(translate_continuum("eroaa"), "separates from");
        assert_eq!(translate_continuum("muuttuu"), "muuttuu");
    }

    #[test]
    fn test_employership_for_school_redacts_recent_principal() {
        let value = renderer().employership_for_school(&employership(Some(1960)));
        assert_eq!(value["principal"]["surname"], Value::Null);
        assert_eq!(value["principal"]["first_name"], Value::Null);
        assert_eq!(value["principal"]["url"], "http://testserver/v1/principal/3/");

        let value = renderer().employership_for_school(&employership(Some(1940)));
        assert_eq!(value["principal"]["surname"], "Korhonen");
    }

    #[test]
    fn test_employership_for_school_redacts_unknown_start() {
        let value = renderer().employership_for_school(&employership(None));
        assert_eq!(value["principal"]["surname"], Value::Null);
    }

    #[test]
    fn test_school_continuum_sides() {
        let continuum = Continuum {
            id: 1,
            active_school: summary(4, "Kallion yhteiskoulu"),
            target_school: summary(1, "Helsingin Tyttölyseo"),
            description: "yhdistyy".to_string(),
            day: None,
            month: None,
            year: Some(1952),
            reference: None,
        };
        let school = School {
            continuum_active: vec![continuum],
            ..school(4)
        };
        let value = renderer().school(&school);
        let active = &value["continuum_active"][0];
        assert_eq!(active["active_school"], "http://testserver/v1/school/4/");
        assert_eq!(active["target_school"]["id"], 1);
        assert_eq!(
            active["target_school"]["names"][0]["value"],
            "Helsingin Tyttölyseo"
        );
        assert_eq!(active["description"], "joins");
        assert_eq!(value["url"], "http://testserver/v1/school/4/");
    }

    #[test]
    fn test_school_history_details() {
        use kore_persistence::models::{ArchiveDataType, GradeCount, OtherName};

        let school = School {
            names: vec![SchoolName {
                id: 10,
                value: "Helsingin Tyttölyseo".to_string(),
                official: None,
                interval: ValidityInterval::new(Some(1900), None),
                reference: None,
                other_names: vec![OtherName {
                    value: "Tyttis".to_string(),
                    kind: Some("lempinimi".to_string()),
                }],
            }],
            grade_counts: vec![GradeCount {
                id: 1,
                number: 8,
                interval: ValidityInterval::new(Some(1880), Some(1920)),
            }],
            owners: vec![Ownership {
                id: 2,
                owner: town(),
                interval: ValidityInterval::new(Some(1977), None),
                reference: None,
            }],
            founders: vec![Founder {
                id: 3,
                founder: town(),
                reference: Some("Helsingin koulut".to_string()),
            }],
            archives: vec![ArchiveData {
                location: Some("Kaupunginarkisto".to_string()),
                url: None,
                data_type: Some(ArchiveDataType {
                    id: 1,
                    value: "oppilasmatrikkeli".to_string(),
                }),
                interval: ValidityInterval::new(Some(1880), Some(1977)),
            }],
            lifecycle_events: vec![LifecycleEvent {
                id: 4,
                description: "perustaminen".to_string(),
                day: Some(1),
                month: Some(9),
                year: Some(1880),
                decisionmaker: Some("Senaatti".to_string()),
                additional_info: None,
            }],
            ..school(1)
        };

        let value = renderer().school(&school);
        assert_eq!(
            value["names"][0]["other_names"],
            json!([{"value": "Tyttis", "type": "lempinimi"}])
        );
        assert_eq!(value["grade_counts"][0]["number"], 8);
        assert_eq!(value["owners"][0]["owner"]["type"], "kunta");
        assert_eq!(value["owners"][0]["begin_year"], 1977);
        assert_eq!(value["founders"][0]["founder"]["name"], "Helsingin kaupunki");
        assert_eq!(value["archives"][0]["data_type"]["value"], "oppilasmatrikkeli");
        assert_eq!(value["archives"][0]["url"], Value::Null);
        assert_eq!(
            value["lifecycle_event"][0],
            json!({
                "description": "perustaminen",
                "day": 1,
                "month": 9,
                "year": 1880,
                "decisionmaker": "Senaatti",
                "additional_info": null,
            })
        );
    }
}
