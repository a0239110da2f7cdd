//! Entity aggregates loaded from storage.
//!
//! Each top-level struct is what a `load_*` call on
//! [`SchoolStorage`](crate::core::SchoolStorage) returns: the entity row plus
//! the related rows its representation needs. Nested references to other
//! top-level entities carry only the id, or a summary where the
//! representation embeds a few columns of the other entity.

#![allow(missing_docs)]

use serde::Serialize;

use crate::types::ValidityInterval;

/// A language of instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Language {
    pub id: i64,
    pub name: String,
}

/// A school type, e.g. "lyseo".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolTypeName {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A school field, e.g. "kauppa".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolFieldName {
    pub id: i64,
    pub description: String,
}

/// One of a school's names and when it was used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolName {
    pub id: i64,
    pub value: String,
    pub official: Option<String>,
    #[serde(flatten)]
    pub interval: ValidityInterval,
    pub reference: Option<String>,
    pub other_names: Vec<OtherName>,
}

/// A variant of a school name, e.g. a colloquial or Swedish form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherName {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// How many grades a school had.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeCount {
    pub id: i64,
    pub number: i64,
    #[serde(flatten)]
    pub interval: ValidityInterval,
}

/// A party that owned or founded a school or building, e.g. a town or an
/// association.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerFounder {
    pub id: i64,
    pub name: String,
    pub additional_info: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// An owner of a school or building and when it owned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ownership {
    pub id: i64,
    pub owner: OwnerFounder,
    #[serde(flatten)]
    pub interval: ValidityInterval,
    pub reference: Option<String>,
}

/// A founder of a school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Founder {
    pub id: i64,
    pub founder: OwnerFounder,
    pub reference: Option<String>,
}

/// A kind of archived material, e.g. "oppilasmatrikkeli".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveDataType {
    pub id: i64,
    pub value: String,
}

/// Where a school's archived material is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveData {
    pub location: Option<String>,
    pub url: Option<String>,
    pub data_type: Option<ArchiveDataType>,
    #[serde(flatten)]
    pub interval: ValidityInterval,
}

/// A founding, closing or other turning point of a school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleEvent {
    pub id: i64,
    pub description: String,
    pub day: Option<i64>,
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub decisionmaker: Option<String>,
    pub additional_info: Option<String>,
}

/// Day and month precision for the ends of a validity interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DayPrecision {
    pub begin_day: Option<i64>,
    pub begin_month: Option<i64>,
    pub end_day: Option<i64>,
    pub end_month: Option<i64>,
}

/// A language a school taught in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolLanguage {
    pub id: i64,
    pub language: String,
    #[serde(flatten)]
    pub interval: ValidityInterval,
}

/// A type a school had.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolType {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: SchoolTypeName,
    #[serde(flatten)]
    pub interval: ValidityInterval,
}

/// A field a school taught.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolField {
    pub id: i64,
    pub field: SchoolFieldName,
    #[serde(flatten)]
    pub interval: ValidityInterval,
}

/// Which genders a school admitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolGender {
    pub id: i64,
    pub gender: String,
    #[serde(flatten)]
    pub interval: ValidityInterval,
}

/// Id and names of a school referenced from another entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolSummary {
    pub id: i64,
    pub names: Vec<SchoolName>,
}

/// A school joining or separating from another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Continuum {
    pub id: i64,
    pub active_school: SchoolSummary,
    pub target_school: SchoolSummary,
    pub description: String,
    pub day: Option<i64>,
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub reference: Option<String>,
}

/// A street address, optionally geolocated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Address {
    pub id: i64,
    pub street_name_fi: Option<String>,
    pub street_name_sv: Option<String>,
    pub zip_code: Option<String>,
    pub municipality_fi: Option<String>,
    pub municipality_sv: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A building and its addresses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    pub id: i64,
    pub neighborhood: Option<String>,
    pub addresses: Vec<Address>,
    pub construction_year: Option<i64>,
    pub architect: Option<String>,
    pub architect_firm: Option<String>,
    pub property_number: Option<String>,
    pub sliced: Option<bool>,
    pub comment: Option<String>,
    pub reference: Option<String>,
    pub approx: Option<bool>,
    pub owners: Vec<Ownership>,
}

/// A photo of a school building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    pub id: i64,
    pub url: String,
    pub is_front: bool,
    pub curated: bool,
}

/// A school's use of a building.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolBuilding {
    pub id: i64,
    pub school_id: i64,
    pub building: Building,
    pub photos: Vec<Photo>,
    #[serde(flatten)]
    pub interval: ValidityInterval,
    #[serde(flatten)]
    pub dates: DayPrecision,
    pub approx_begin: Option<bool>,
    pub approx_end: Option<bool>,
    pub ownership: Option<bool>,
    pub reference: Option<String>,
}

/// Name columns of a principal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrincipalName {
    pub id: i64,
    pub surname: Option<String>,
    pub first_name: Option<String>,
}

/// A principal's employment at one school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employership {
    pub id: i64,
    pub school_id: i64,
    pub principal: PrincipalName,
    #[serde(flatten)]
    pub interval: ValidityInterval,
    pub reference: Option<String>,
}

/// A principal with their employerships, earliest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    pub id: i64,
    pub surname: Option<String>,
    pub first_name: Option<String>,
    pub employers: Vec<Employership>,
}

/// A school with everything its representation embeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct School {
    pub id: i64,
    pub names: Vec<SchoolName>,
    pub languages: Vec<SchoolLanguage>,
    pub types: Vec<SchoolType>,
    pub fields: Vec<SchoolField>,
    pub genders: Vec<SchoolGender>,
    pub grade_counts: Vec<GradeCount>,
    pub buildings: Vec<SchoolBuilding>,
    pub owners: Vec<Ownership>,
    pub founders: Vec<Founder>,
    pub principals: Vec<Employership>,
    pub archives: Vec<ArchiveData>,
    pub lifecycle_events: Vec<LifecycleEvent>,
    pub continuum_active: Vec<Continuum>,
    pub continuum_target: Vec<Continuum>,
    pub special_features: Option<String>,
    pub wartime_school: Option<bool>,
    pub nicknames: Option<String>,
    pub checked: bool,
}

impl Principal {
    /// The employership whose start year decides whether the principal's
    /// name may be shown.
    pub fn first_employership(&self) -> Option<&Employership> {
        self.employers.first()
    }

    /// The principal's name columns.
    pub fn name(&self) -> PrincipalName {
        PrincipalName {
            id: self.id,
            surname: self.surname.clone(),
            first_name: self.first_name.clone(),
        }
    }
}
