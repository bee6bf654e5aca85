//! Deterministic whole-graph enumeration, for laying characters out so that
//! those sharing components end up near each other.
use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use smol_str::SmolStr;

use crate::graph::DecompositionGraph;
use crate::types::{NodeIndex, StrokeCount};

/// Decides which characters an enumeration may yield.
pub trait Whitelist {
    /// Whether `character` may be yielded.
    fn permits(&self, character: &str) -> bool;
}

/// Permits every character.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Whitelist for AllowAll {
    #[inline(always)]
    fn permits(&self, _character: &str) -> bool {
        true
    }
}

impl Whitelist for HashSet<SmolStr> {
    fn permits(&self, character: &str) -> bool {
        self.contains(character)
    }
}

impl<V> Whitelist for HashMap<SmolStr, V> {
    fn permits(&self, character: &str) -> bool {
        self.contains_key(character)
    }
}

impl Whitelist for [&str] {
    fn permits(&self, character: &str) -> bool {
        self.contains(&character)
    }
}

/// Each `char` of the string is a permitted character.
impl Whitelist for str {
    fn permits(&self, character: &str) -> bool {
        let mut chars = character.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => self.contains(c),
            _ => false,
        }
    }
}

impl<W: Whitelist + ?Sized> Whitelist for &W {
    fn permits(&self, character: &str) -> bool {
        (**self).permits(character)
    }
}

/// Sort key putting unknown (zero) stroke counts last.
#[inline(always)]
fn stroke_key(stroke_count: StrokeCount) -> (bool, StrokeCount) {
    (stroke_count == 0, stroke_count)
}

/// Stable sort by ascending stroke count, specials last.
pub fn stroke_sort<I>(graph: &DecompositionGraph, nodes: I) -> Vec<NodeIndex>
where
    I: IntoIterator<Item = NodeIndex>,
{
    let mut nodes: Vec<NodeIndex> = nodes.into_iter().collect();
    nodes.sort_by_key(|&i| stroke_key(graph[i].stroke_count()));
    nodes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Queue {
    Left,
    Right,
}

/// Iterator over every non-special character of a graph, grouped by shared
/// components. See [`enumerate_sorted`].
pub struct SortedCharacters<'a, W: ?Sized> {
    graph: &'a DecompositionGraph,
    whitelist: &'a W,
    roots: std::vec::IntoIter<NodeIndex>,
    left: VecDeque<NodeIndex>,
    right: VecDeque<NodeIndex>,
    draining: Queue,
    seen: HashSet<NodeIndex>,
}

/// Enumerates all characters of `graph`.
///
/// Roots are taken in ascending stroke order (specials last). From each root
/// the left-descendant queue is drained first, breadth first, while right
/// descendants wait in their own queue; then the right queue is drained, and
/// so on until both are empty. Each character is yielded at most once across
/// all roots, and special pseudo-components are walked through but never
/// yielded.
pub fn enumerate_sorted(graph: &DecompositionGraph) -> SortedCharacters<'_, AllowAll> {
    enumerate_sorted_with(graph, &AllowAll)
}

/// Like [`enumerate_sorted`], additionally skipping characters the
/// whitelist does not permit. Skipped characters are still walked through.
pub fn enumerate_sorted_with<'a, W>(
    graph: &'a DecompositionGraph,
    whitelist: &'a W,
) -> SortedCharacters<'a, W>
where
    W: Whitelist + ?Sized,
{
    let roots = stroke_sort(
        graph,
        (0..graph.len())
            .map(NodeIndex::new)
            .filter(|&i| graph[i].is_root()),
    );

    SortedCharacters {
        graph,
        whitelist,
        roots: roots.into_iter(),
        left: VecDeque::new(),
        right: VecDeque::new(),
        draining: Queue::Left,
        seen: HashSet::with_capacity(graph.len()),
    }
}

impl<'a, W: Whitelist + ?Sized> SortedCharacters<'a, W> {
    fn visit(&mut self, index: NodeIndex) -> Option<&'a str> {
        if !self.seen.insert(index) {
            return None;
        }

        let graph = self.graph;
        let node = &graph[index];

        self.left
            .extend(stroke_sort(graph, node.descendants_left().iter().copied()));
        self.right
            .extend(stroke_sort(graph, node.descendants_right().iter().copied()));

        if node.stroke_count() != 0 && self.whitelist.permits(node.character()) {
            Some(node.character())
        } else {
            None
        }
    }
}

impl<'a, W: Whitelist + ?Sized> Iterator for SortedCharacters<'a, W> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let next = match self.draining {
                Queue::Left => match self.left.pop_front() {
                    Some(v) => v,
                    None => {
                        self.draining = Queue::Right;
                        continue;
                    }
                },
                Queue::Right => match self.right.pop_front() {
                    Some(v) => v,
                    None if !self.left.is_empty() => {
                        self.draining = Queue::Left;
                        continue;
                    }
                    None => {
                        let root = self.roots.next()?;
                        self.left.push_back(root);
                        self.right.push_back(root);
                        self.draining = Queue::Left;
                        continue;
                    }
                },
            };

            if let Some(character) = self.visit(next) {
                return Some(character);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::graph;

    const SAMPLE: &str = r#"{
        "好": [6, "LR", "女", "子"],
        "如": [6, "LR", "女", "口"],
        "汝": [6, "LR", "氵", "女"],
        "字": [6, "TB", "宀", "子"],
        "女": [3, null, null],
        "子": [3, null, null],
        "口": [3, null, null],
        "氵": [3, null, null],
        "宀": [3, null, null],
        "人": [2, null, null],
        "亻": [2, "LR", "人*", "x"]
    }"#;

    #[test]
    fn test_enumeration_order() {
        let g = graph(SAMPLE);
        let order: Vec<&str> = enumerate_sorted(&g).collect();

        // Roots by strokes: 人 (2), then 女 子 口 氵 宀 (3), then the
        // placeholders 人* and x. 亻 is only reachable through 人*.
        assert_eq!(
            order,
            vec!["人", "女", "好", "如", "汝", "子", "字", "口", "氵", "宀", "亻"]
        );
    }

    #[test]
    fn test_every_node_once_and_no_specials() {
        let g = graph(SAMPLE);
        let order: Vec<&str> = enumerate_sorted(&g).collect();

        let unique: HashSet<&str> = order.iter().copied().collect();
        assert_eq!(unique.len(), order.len());

        let expected: HashSet<&str> = g
            .iter()
            .filter(|n| !n.is_special())
            .map(|n| n.character())
            .collect();
        assert_eq!(unique, expected);

        for c in &order {
            assert!(!g.node(c).unwrap().is_special());
        }
    }

    #[test]
    fn test_whitelist() {
        let g = graph(SAMPLE);

        let order: Vec<&str> = enumerate_sorted_with(&g, "好字女").collect();
        assert_eq!(order, vec!["女", "好", "字"]);

        let list: &[&str] = &["如", "口"];
        let order: Vec<&str> = enumerate_sorted_with(&g, list).collect();
        assert_eq!(order, vec!["如", "口"]);

        let mut set: HashSet<SmolStr> = HashSet::new();
        set.insert("汝".into());
        let order: Vec<&str> = enumerate_sorted_with(&g, &set).collect();
        assert_eq!(order, vec!["汝"]);
    }

    #[test]
    fn test_left_queue_drained_before_right() {
        let g = graph(
            r#"{
                "A": [1, null, null],
                "L1": [2, "LR", "A", "B"],
                "R1": [2, "LR", "B", "A"],
                "L2": [3, "LR", "L1", "C"],
                "B": [1, null, null],
                "C": [1, null, null]
            }"#,
        );

        // From A: left queue gives L1 then (its left child) L2, only then the
        // right queue's R1.
        let order: Vec<&str> = enumerate_sorted(&g).collect();
        assert_eq!(order, vec!["A", "L1", "L2", "R1", "B", "C"]);
    }

    #[test]
    fn test_stroke_sort_puts_specials_last() {
        let g = graph(r#"{"a": [5, null, null], "b": [0, null, null], "c": [1, null, null]}"#);
        let sorted: Vec<&str> = stroke_sort(&g, (0..3).map(NodeIndex::new))
            .into_iter()
            .map(|i| g[i].character())
            .collect();

        assert_eq!(sorted, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_graph() {
        let g = DecompositionGraph::default();
        assert_eq!(enumerate_sorted(&g).count(), 0);
    }
}
