//! Resource types exposed by the API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;

/// A resource type, named by its URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A school and its names, types, fields, languages and genders over time.
    School,
    /// A principal and their employerships.
    Principal,
    /// A principal's employment at one school.
    Employership,
    /// A building with its addresses.
    Building,
    /// A school's use of a building.
    SchoolBuilding,
    /// A language of instruction.
    Language,
    /// A school type name.
    SchoolType,
    /// A school field name.
    SchoolField,
}

impl ResourceType {
    /// All resource types, in API root order.
    pub const ALL: [ResourceType; 8] = [
        ResourceType::School,
        ResourceType::Principal,
        ResourceType::Employership,
        ResourceType::SchoolField,
        ResourceType::SchoolType,
        ResourceType::Language,
        ResourceType::Building,
        ResourceType::SchoolBuilding,
    ];

    /// Returns the URL path segment for this resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::School => "school",
            ResourceType::Principal => "principal",
            ResourceType::Employership => "employership",
            ResourceType::Building => "building",
            ResourceType::SchoolBuilding => "school_building",
            ResourceType::Language => "language",
            ResourceType::SchoolType => "school_type",
            ResourceType::SchoolField => "school_field",
        }
    }

    /// Returns the table holding one row per entity of this type.
    pub fn table(&self) -> &'static str {
        match self {
            ResourceType::School => "school",
            ResourceType::Principal => "principal",
            ResourceType::Employership => "employership",
            ResourceType::Building => "building",
            ResourceType::SchoolBuilding => "school_building",
            ResourceType::Language => "language",
            ResourceType::SchoolType => "school_type_name",
            ResourceType::SchoolField => "school_field_name",
        }
    }

    /// Returns true if single entities can be retrieved by id.
    ///
    /// Employerships are only listed; they are retrieved through their
    /// principal or school.
    pub fn supports_retrieve(&self) -> bool {
        !matches!(self, ResourceType::Employership)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ResourceError::UnknownResourceType {
                resource_type: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_path_segment() {
        for resource in ResourceType::ALL {
            assert_eq!(resource.as_str().parse::<ResourceType>(), Ok(resource));
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "pupil".parse::<ResourceType>().unwrap_err();
        assert_eq!(
            err,
            ResourceError::UnknownResourceType {
                resource_type: "pupil".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(ResourceType::SchoolType.table(), "school_type_name");
        assert_eq!(ResourceType::SchoolBuilding.table(), "school_building");
    }

    #[test]
    fn test_employership_is_list_only() {
        assert!(!ResourceType::Employership.supports_retrieve());
        assert!(ResourceType::Principal.supports_retrieve());
    }
}
