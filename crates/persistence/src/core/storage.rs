//! The storage trait for the school register.

use crate::error::StorageResult;
use crate::filter::SqlFragment;
use crate::models::{
    Building, Employership, Language, Principal, School, SchoolBuilding, SchoolFieldName,
    SchoolTypeName,
};
use crate::types::{Page, Pagination, ResourceType};

/// Read access to the school register.
///
/// Loaders return `Ok(None)` when no entity has the id. Errors are reserved
/// for backend failures.
///
/// Calls are blocking. Implementations take a pooled connection per call
/// and hold no per-request state, so one instance is shared by every
/// request handler.
pub trait SchoolStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Loads a school with its names, types, fields, languages, genders,
    /// buildings, principals and continuum events.
    fn load_school(&self, id: i64) -> StorageResult<Option<School>>;

    /// Loads a principal with their employerships, earliest first.
    fn load_principal(&self, id: i64) -> StorageResult<Option<Principal>>;

    /// Loads one employership with the principal's name.
    fn load_employership(&self, id: i64) -> StorageResult<Option<Employership>>;

    /// Loads a building with its neighborhood and addresses.
    fn load_building(&self, id: i64) -> StorageResult<Option<Building>>;

    /// Loads a school's use of a building, with the building and photos.
    fn load_school_building(&self, id: i64) -> StorageResult<Option<SchoolBuilding>>;

    /// Loads a language.
    fn load_language(&self, id: i64) -> StorageResult<Option<Language>>;

    /// Loads a school type name.
    fn load_school_type(&self, id: i64) -> StorageResult<Option<SchoolTypeName>>;

    /// Loads a school field name.
    fn load_school_field(&self, id: i64) -> StorageResult<Option<SchoolFieldName>>;

    /// Returns the school building ids of a building, ascending.
    fn school_buildings_of(&self, building_id: i64) -> StorageResult<Vec<i64>>;

    /// Returns one page of the ids of `resource` entities matching
    /// `predicate`, ordered by id, with the total number of matches.
    ///
    /// # Arguments
    ///
    /// * `resource` - The resource type whose base table is queried
    /// * `predicate` - A condition on the base table; empty matches all
    /// * `pagination` - Which page to return
    fn query_ids(
        &self,
        resource: ResourceType,
        predicate: &SqlFragment,
        pagination: Pagination,
    ) -> StorageResult<Page<i64>>;

    /// Checks the backend is reachable.
    fn ping(&self) -> StorageResult<()>;
}
