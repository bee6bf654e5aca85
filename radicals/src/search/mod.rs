use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::graph::DecompositionGraph;
use crate::types::Distance;

pub mod similar;
mod worker;

pub use self::similar::{group_by_distance, Similar};
pub use self::worker::WithinDistance;

/// Which relatives a similarity search may reach.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Charge for differences in stroke count
    pub include_stroke_cost: bool,
    /// Include characters sharing a component on the opposite side
    pub include_parent_alternates: bool,
    /// Include siblings of the start character's components
    pub include_parent_siblings: bool,
}

impl SearchConfig {
    pub const fn default() -> SearchConfig {
        SearchConfig {
            include_stroke_cost: false,
            include_parent_alternates: true,
            include_parent_siblings: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::default()
    }
}

/// Errors reported to the caller of a search. None of them touch the graph or
/// the exclusion set.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The start character is not in the graph at all
    #[error("Unknown character '{0}'")]
    UnknownCharacter(SmolStr),

    /// The distance limit is negative or not a number
    #[error("Invalid maximum distance {0}")]
    InvalidDistance(Distance),
}

/// Starts a lazy search for characters within `max_distance` of `start`.
///
/// `exclusions` belongs to the caller: characters in it are skipped, and the
/// start character plus everything visited or yielded is added to it. Pass a
/// fresh set for every independent query, as leftovers from an earlier
/// search silently suppress results.
///
/// A start character without a recorded decomposition has no relatives and
/// yields nothing; a start character missing from the graph is an error.
pub fn within_distance<'a>(
    graph: &'a DecompositionGraph,
    start: &str,
    max_distance: Distance,
    exclusions: &'a mut HashSet<SmolStr>,
    config: &SearchConfig,
) -> Result<WithinDistance<'a>, SearchError> {
    if max_distance.is_nan() || max_distance < 0.0 {
        return Err(SearchError::InvalidDistance(max_distance));
    }

    let start = graph
        .index_of(start)
        .ok_or_else(|| SearchError::UnknownCharacter(start.into()))?;

    Ok(WithinDistance::new(
        graph,
        start,
        max_distance,
        exclusions,
        config.clone(),
    ))
}

impl DecompositionGraph {
    /// Collects every character within `max_distance` of `start`, using a
    /// fresh exclusion set.
    pub fn similar_to(
        &self,
        start: &str,
        max_distance: Distance,
        config: &SearchConfig,
    ) -> Result<Vec<Similar>, SearchError> {
        let mut exclusions = HashSet::new();
        Ok(within_distance(self, start, max_distance, &mut exclusions, config)?.collect())
    }
}
