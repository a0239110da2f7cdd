//! Principal and employership representations.

use kore_persistence::ResourceType;
use serde_json::{Value, json};

use super::{EmployershipDoc, PrincipalDoc, Renderer};

impl Renderer {
    /// Renders a principal with their employerships and employer schools.
    ///
    /// The earliest employership decides whether the name is shown; a
    /// principal without employerships is shown without a name.
    pub fn principal(&self, doc: &PrincipalDoc) -> Value {
        let principal = &doc.principal;
        let begin_year = principal
            .first_employership()
            .and_then(|e| e.interval.begin_year);
        let (surname, first_name) = self.names.names(&principal.name(), begin_year);

        let employers: Vec<Value> = principal
            .employers
            .iter()
            .filter_map(|employership| {
                let school = doc.schools.get(&employership.school_id)?;
                Some(json!({
                    "id": employership.id,
                    "school": self.school(school),
                    "begin_year": employership.interval.begin_year,
                    "end_year": employership.interval.end_year,
                    "reference": employership.reference,
                }))
            })
            .collect();

        json!({
            "url": self.url(ResourceType::Principal, principal.id),
            "id": principal.id,
            "surname": surname,
            "first_name": first_name,
            "employers": employers,
        })
    }

    /// Renders an employership with the principal and the full school.
    pub fn employership(&self, doc: &EmployershipDoc) -> Value {
        let mut value = self.employership_for_school(&doc.employership);
        if let Value::Object(map) = &mut value {
            map.insert("school".to_string(), self.school(&doc.school));
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use kore_persistence::ValidityInterval;
    use kore_persistence::models::{Employership, Principal, PrincipalName, School};

    use super::*;
    use crate::representation::NamePolicy;

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
            checked: true,
        }
    }

    fn lindqvist(first_begin: Option<i64>) -> PrincipalDoc {
        let name = PrincipalName {
            id: 2,
            surname: Some("Lindqvist".to_string()),
            first_name: Some("Gustav".to_string()),
        };
        let employers = vec![
            Employership {
                id: 2,
                school_id: 3,
                principal: name.clone(),
                interval: ValidityInterval::new(first_begin, Some(1940)),
                reference: None,
            },
            Employership {
                id: 3,
                school_id: 2,
                principal: name,
                interval: ValidityInterval::new(Some(1960), Some(1970)),
                reference: None,
            },
        ];
        PrincipalDoc {
            principal: Principal {
                id: 2,
                surname: Some("Lindqvist".to_string()),
                first_name: Some("Gustav".to_string()),
                employers,
            },
            schools: BTreeMap::from([(2, school(2)), (3, school(3))]),
        }
    }

    fn renderer() -> Renderer {
        Renderer::new("http://testserver", NamePolicy::default())
    }

    #[test]
    fn test_first_employership_decides() {
        let value = renderer().principal(&lindqvist(Some(1925)));
        assert_eq!(value["surname"], "Lindqvist");
        assert_eq!(value["first_name"], "Gustav");
        assert_eq!(value["employers"].as_array().unwrap().len(), 2);
        assert_eq!(value["employers"][0]["school"]["id"], 3);
    }

    #[test]
    fn test_late_first_employership_redacts() {
        let value = renderer().principal(&lindqvist(Some(1951)));
        assert_eq!(value["surname"], Value::Null);
        assert_eq!(value["first_name"], Value::Null);
    }

    #[test]
    fn test_principal_without_employers_redacted() {
        let mut doc = lindqvist(Some(1925));
        doc.principal.employers.clear();
        let value = renderer().principal(&doc);
        assert_eq!(value["surname"], Value::Null);
        assert_eq!(value["employers"], json!([]));
    }

    #[test]
    fn test_employership_embeds_full_school() {
        let doc = lindqvist(Some(1925));
        let value = renderer().employership(&EmployershipDoc {
            employership: doc.principal.employers[1].clone(),
            school: school(2),
        });
        assert_eq!(value["school"]["url"], "http://testserver/v1/school/2/");
        assert_eq!(value["school"]["checked"], true);
        assert_eq!(value["principal"]["surname"], Value::Null);
    }
}
