//! A character found by a similarity search.
use crate::types::Distance;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// A related character and how far it is from the search start
pub struct Similar {
    /// the related character
    pub character: SmolStr,
    /// accumulated cost from the start character
    pub distance: Distance,
}

impl Similar {
    /// creates a search result
    pub fn new(character: SmolStr, distance: Distance) -> Similar {
        Similar {
            character,
            distance,
        }
    }

    /// gets the related character
    pub fn character(&self) -> &str {
        &self.character
    }

    /// gets the distance from the start character
    pub fn distance(&self) -> Distance {
        self.distance
    }
}

impl PartialOrd for Similar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Similar {
    fn cmp(&self, other: &Self) -> Ordering {
        let x = self.distance.partial_cmp(&other.distance).unwrap_or(Equal);

        if let Equal = x {
            return self.character.cmp(&other.character);
        }

        x
    }
}

impl PartialEq for Similar {
    fn eq(&self, other: &Self) -> bool {
        self.character == other.character && self.distance == other.distance
    }
}

impl Eq for Similar {}

/// Sorts results by distance and collects characters of equal distance
/// together, keeping their emission order within a group.
pub fn group_by_distance<I>(results: I) -> Vec<(Distance, Vec<SmolStr>)>
where
    I: IntoIterator<Item = Similar>,
{
    let sorted = results.into_iter().sorted_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Equal)
    });

    sorted
        .group_by(|s| s.distance)
        .into_iter()
        .map(|(distance, group)| (distance, group.map(|s| s.character).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn similar(c: &str, d: Distance) -> Similar {
        Similar::new(c.into(), d)
    }

    #[test]
    fn test_ordering() {
        let mut v = vec![similar("b", 1.5), similar("c", 1.0), similar("a", 1.5)];
        v.sort();

        let order: Vec<&str> = v.iter().map(Similar::character).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_group_by_distance() {
        let groups = group_by_distance(vec![
            similar("如", 1.0),
            similar("妈", 1.25),
            similar("字", 1.0),
            similar("仔", 1.5),
        ]);

        assert_eq!(
            groups,
            vec![
                (1.0, vec![SmolStr::from("如"), SmolStr::from("字")]),
                (1.25, vec![SmolStr::from("妈")]),
                (1.5, vec![SmolStr::from("仔")]),
            ]
        );
    }

    #[test]
    fn test_group_by_distance_empty() {
        assert!(group_by_distance(Vec::new()).is_empty());
    }
}
