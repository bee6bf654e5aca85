/*! Character decomposition graphs and visual similarity search.

Builds a graph out of a raw composition table (every character mapped to the
two components it is made of) and walks it to find characters that look
alike: characters sharing a component, on the same or the opposite side, and
characters further out reached by substituting more components. Each hop
adds to a distance and the walk stops at a caller-supplied limit.

# Usage examples

```no_run
use hashbrown::HashSet;
use radicals::cache::{self, CacheConfig};
use radicals::search::{within_distance, SearchConfig};

let graph = cache::load(&CacheConfig::default())?;

let mut exclusions = HashSet::new();
for similar in within_distance(&graph, "好", 2.0, &mut exclusions, &SearchConfig::default())? {
    println!("{} {}", similar.character(), similar.distance());
}
# Ok::<(), Box<dyn std::error::Error>>(())
```

Further examples can be found in `radicals-bin` in the same repository.

*/

#![warn(missing_docs)]
pub mod cache;
pub mod graph;
pub mod ordering;
pub mod paths;
pub mod raw;
pub mod search;

pub mod constants;
pub mod types;

pub use crate::graph::{DecompositionGraph, GraphBuilder, Node, Parent};
pub use crate::ordering::{enumerate_sorted, enumerate_sorted_with, Whitelist};
pub use crate::raw::RawTable;
pub use crate::search::{within_distance, SearchConfig, Similar};
