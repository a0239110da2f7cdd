//! JSON representations of register entities.
//!
//! A [`Renderer`] turns loaded entities into the JSON bodies served by the
//! API. Rendering is pure: everything a representation embeds is loaded
//! beforehand, see [`documents`].
//!
//! Every top-level and nested entity carries a `url` hyperlink and its `id`.
//!
//! # Example
//!
//! ```rust
//! use kore_persistence::ResourceType;
//! use kore_rest::representation::{NamePolicy, Renderer};
//!
//! let renderer = Renderer::new("https://kore.example.fi/", NamePolicy::default());
//! assert_eq!(
//!     renderer.url(ResourceType::School, 7),
//!     "https://kore.example.fi/v1/school/7/"
//! );
//! ```

pub mod documents;
mod building;
mod lookup;
mod media;
mod principal;
mod privacy;
mod school;

pub use documents::{BuildingDoc, EmployershipDoc, PrincipalDoc, SchoolBuildingDoc};
pub use media::{location, photo_url};
pub use privacy::NamePolicy;

use kore_persistence::ResourceType;

/// Builds entity representations.
#[derive(Debug, Clone)]
pub struct Renderer {
    base_url: String,
    names: NamePolicy,
}

impl Renderer {
    /// Creates a renderer linking to `base_url`.
    pub fn new(base_url: &str, names: NamePolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            names,
        }
    }

    /// The base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The privacy policy for principal names.
    pub fn name_policy(&self) -> NamePolicy {
        self.names
    }

    /// The API root URL.
    pub fn root_url(&self) -> String {
        format!("{}/v1/", self.base_url)
    }

    /// The list URL of a resource type.
    pub fn collection_url(&self, resource: ResourceType) -> String {
        format!("{}/v1/{}/", self.base_url, resource)
    }

    /// The hyperlink of one entity.
    pub fn url(&self, resource: ResourceType, id: i64) -> String {
        format!("{}/v1/{}/{}/", self.base_url, resource, id)
    }
}
