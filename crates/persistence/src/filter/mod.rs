//! Query filters.
//!
//! Translates API query parameters into SQL predicates over the historical
//! register. Filters are built from a handful of primitives:
//!
//! - [`TemporalRangeFilter`] - validity intervals overlapping a year window
//! - [`NameOrIdFilter`] - numeric input targets an id, text targets a name
//! - [`SynonymFilter`] - short codes mapped onto canonical stored values
//! - [`DualColumnSearch`], [`ObligatoryNameSearch`], [`TermSearch`] - substring search
//!
//! Each resource declares a [`FilterSet`] binding these primitives to its
//! relational paths. Applying a filter set ANDs the supplied filters;
//! parameters the set does not recognise are ignored.
//!
//! Every primitive is a pure function of its configuration and the raw input,
//! so filter sets are built once and shared across requests.

mod fragment;
mod lookup;
mod name_or_id;
mod name_search;
mod path;
mod sets;
mod synonym;
mod temporal;

pub use fragment::{SqlFragment, SqlParam};
pub use lookup::Lookup;
pub use name_or_id::{NameOrIdFilter, Target};
pub use name_search::{DualColumnSearch, MIN_SEARCH_LENGTH, ObligatoryNameSearch, TermSearch};
pub use path::{FieldPath, Hop};
pub use sets::{FilterKind, FilterSet, FilterSpec, QueryParams, apply_filters};
pub use synonym::{GENDERS, SynonymFilter, SynonymMap};
pub use temporal::{FROM_YEAR, TemporalRangeFilter, UNTIL_YEAR};
