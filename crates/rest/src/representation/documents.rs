//! Entity aggregates that embed full schools.
//!
//! Principal, employership, building and school building representations
//! nest complete school representations. These documents gather the extra
//! loads so the renderer stays a pure function of its input.

use std::collections::BTreeMap;

use kore_persistence::SchoolStorage;
use kore_persistence::StorageResult;
use kore_persistence::models::{Building, Employership, Principal, School, SchoolBuilding};

/// A principal with the schools of their employerships.
#[derive(Debug, Clone)]
pub struct PrincipalDoc {
    /// The principal and their employerships, earliest first.
    pub principal: Principal,
    /// Employer schools by id.
    pub schools: BTreeMap<i64, School>,
}

/// An employership with its school.
#[derive(Debug, Clone)]
pub struct EmployershipDoc {
    /// The employership and the principal's name.
    pub employership: Employership,
    /// The employer school.
    pub school: School,
}

/// A building with every school that used it.
#[derive(Debug, Clone)]
pub struct BuildingDoc {
    /// The building and its addresses.
    pub building: Building,
    /// The school's use of the building, paired with the school.
    pub school_buildings: Vec<(SchoolBuilding, School)>,
}

/// A school's use of a building, with the school.
#[derive(Debug, Clone)]
pub struct SchoolBuildingDoc {
    /// The building use, with the building and photos.
    pub school_building: SchoolBuilding,
    /// The school using the building.
    pub school: School,
}

/// Loads a principal and every employer school.
pub fn load_principal<S>(storage: &S, id: i64) -> StorageResult<Option<PrincipalDoc>>
where
    S: SchoolStorage + ?Sized,
{
    let Some(principal) = storage.load_principal(id)? else {
        return Ok(None);
    };
    let mut schools = BTreeMap::new();
    for employership in &principal.employers {
        if schools.contains_key(&employership.school_id) {
            continue;
        }
        if let Some(school) = storage.load_school(employership.school_id)? {
            schools.insert(school.id, school);
        }
    }
    Ok(Some(PrincipalDoc { principal, schools }))
}

/// Loads an employership and its school.
pub fn load_employership<S>(storage: &S, id: i64) -> StorageResult<Option<EmployershipDoc>>
where
    S: SchoolStorage + ?Sized,
{
    let Some(employership) = storage.load_employership(id)? else {
        return Ok(None);
    };
    let school = storage.load_school(employership.school_id)?;
    Ok(school.map(|school| EmployershipDoc {
        employership,
        school,
    }))
}

/// Loads a building and the schools that used it.
pub fn load_building<S>(storage: &S, id: i64) -> StorageResult<Option<BuildingDoc>>
where
    S: SchoolStorage + ?Sized,
{
    let Some(building) = storage.load_building(id)? else {
        return Ok(None);
    };
    let mut school_buildings = Vec::new();
    for school_building_id in storage.school_buildings_of(id)? {
        if let Some(doc) = load_school_building(storage, school_building_id)? {
            school_buildings.push((doc.school_building, doc.school));
        }
    }
    Ok(Some(BuildingDoc {
        building,
        school_buildings,
    }))
}

/// Loads a school's use of a building and the school.
pub fn load_school_building<S>(storage: &S, id: i64) -> StorageResult<Option<SchoolBuildingDoc>>
where
    S: SchoolStorage + ?Sized,
{
    let Some(school_building) = storage.load_school_building(id)? else {
        return Ok(None);
    };
    let school = storage.load_school(school_building.school_id)?;
    Ok(school.map(|school| SchoolBuildingDoc {
        school_building,
        school,
    }))
}
