//! The decomposition graph: one node per character, with the two components
//! it splits into and the characters that in turn use it as a component.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeIndex`] only,
//! so the graph may contain cycles (the raw data does not rule them out)
//! without any ownership trouble. Once built the graph is immutable.
use std::collections::BTreeSet;

use hashbrown::HashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

use crate::raw::RawTable;
use crate::types::{CompositionType, NodeIndex, Side, StrokeCount};

pub mod builder;
pub mod error;

pub use self::builder::GraphBuilder;
use self::error::{BuildError, IntegrityError};

/// The two components a character decomposes into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    /// How the two components combine
    pub composition: Option<CompositionType>,
    /// Left (first) component
    pub left: NodeIndex,
    /// Right (second) component
    pub right: NodeIndex,
}

impl Parent {
    /// Component on the given side.
    #[inline(always)]
    pub fn component(&self, side: Side) -> NodeIndex {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// A character in the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    character: SmolStr,
    parent: Option<Parent>,
    descendants_left: BTreeSet<NodeIndex>,
    descendants_right: BTreeSet<NodeIndex>,
    stroke_count: StrokeCount,
}

impl Node {
    pub(crate) fn placeholder(character: SmolStr) -> Node {
        Node {
            character,
            parent: None,
            descendants_left: BTreeSet::new(),
            descendants_right: BTreeSet::new(),
            stroke_count: 0,
        }
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub(crate) fn key(&self) -> &SmolStr {
        &self.character
    }

    pub fn parent(&self) -> Option<&Parent> {
        self.parent.as_ref()
    }

    /// Composition type of this character's decomposition, if it has one.
    pub fn composition(&self) -> Option<&str> {
        self.parent.as_ref().and_then(|p| p.composition.as_deref())
    }

    /// Characters using this node as their component on `side`.
    pub fn descendants(&self, side: Side) -> &BTreeSet<NodeIndex> {
        match side {
            Side::Left => &self.descendants_left,
            Side::Right => &self.descendants_right,
        }
    }

    pub fn descendants_left(&self) -> &BTreeSet<NodeIndex> {
        &self.descendants_left
    }

    pub fn descendants_right(&self) -> &BTreeSet<NodeIndex> {
        &self.descendants_right
    }

    /// Stroke count, zero when unknown.
    pub fn stroke_count(&self) -> StrokeCount {
        self.stroke_count
    }

    /// Has no recorded decomposition.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Is not used as a component by anything.
    pub fn is_leaf(&self) -> bool {
        self.descendants_left.is_empty() && self.descendants_right.is_empty()
    }

    /// A root with unknown stroke count, i.e. a pseudo-component such as
    /// `人*` rather than a displayable radical.
    pub fn is_special(&self) -> bool {
        self.is_root() && self.stroke_count == 0
    }

    pub(crate) fn set_stroke_count(&mut self, stroke_count: StrokeCount) {
        self.stroke_count = stroke_count;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Parent>) {
        self.parent = parent;
    }

    pub(crate) fn descendants_mut(&mut self, side: Side) -> &mut BTreeSet<NodeIndex> {
        match side {
            Side::Left => &mut self.descendants_left,
            Side::Right => &mut self.descendants_right,
        }
    }

    fn references(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.parent
            .iter()
            .flat_map(|p| [p.left, p.right])
            .chain(self.descendants_left.iter().copied())
            .chain(self.descendants_right.iter().copied())
    }
}

/// Immutable character decomposition graph.
#[derive(Debug, Clone, Default)]
pub struct DecompositionGraph {
    nodes: Vec<Node>,
    index: HashMap<SmolStr, NodeIndex>,
}

impl DecompositionGraph {
    /// Builds the graph from a raw composition table.
    pub fn from_raw(raw: &RawTable) -> Result<DecompositionGraph, BuildError> {
        GraphBuilder::new().build(raw)
    }

    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        index: HashMap<SmolStr, NodeIndex>,
    ) -> DecompositionGraph {
        DecompositionGraph { nodes, index }
    }

    /// Rebuilds the lookup index over a node table, checking that every
    /// cross-reference stays inside the arena.
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Result<DecompositionGraph, IntegrityError> {
        if nodes.len() > u32::MAX as usize {
            return Err(IntegrityError::TooManyNodes(u32::MAX as usize));
        }

        let mut index = HashMap::with_capacity(nodes.len());

        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.character.clone(), NodeIndex::new(i)).is_some() {
                return Err(IntegrityError::DuplicateCharacter(node.character.clone()));
            }

            if let Some(bad) = node.references().find(|r| r.get() >= nodes.len()) {
                return Err(IntegrityError::DanglingIndex {
                    character: node.character.clone(),
                    index: bad,
                });
            }
        }

        Ok(DecompositionGraph { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, character: &str) -> bool {
        self.index.contains_key(character)
    }

    pub fn index_of(&self, character: &str) -> Option<NodeIndex> {
        self.index.get(character).copied()
    }

    pub fn node(&self, character: &str) -> Option<&Node> {
        self.index_of(character).map(|i| &self[i])
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.get())
    }

    /// All nodes in arena order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// The decomposition of `character`, if it has one.
    pub fn parent_of(&self, character: &str) -> Option<&Parent> {
        self.node(character).and_then(Node::parent)
    }

    pub fn stroke_count(&self, character: &str) -> Option<StrokeCount> {
        self.node(character).map(Node::stroke_count)
    }

    /// The two components of `character`, if it decomposes.
    pub fn components_of(&self, character: &str) -> Option<(&Node, &Node)> {
        self.node(character)
            .and_then(Node::parent)
            .map(|p| (&self[p.left], &self[p.right]))
    }

    /// Characters with no recorded decomposition.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    /// Characters not used as a component anywhere.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Pseudo-components: roots whose stroke count was never set.
    pub fn special(&self) -> impl Iterator<Item = &Node> {
        self.roots().filter(|n| n.stroke_count == 0)
    }
}

impl std::ops::Index<NodeIndex> for DecompositionGraph {
    type Output = Node;

    #[inline(always)]
    fn index(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.get()]
    }
}

impl<'a> IntoIterator for &'a DecompositionGraph {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl Serialize for DecompositionGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DecompositionGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nodes = Vec::<Node>::deserialize(deserializer)?;
        DecompositionGraph::from_nodes(nodes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn graph(json: &str) -> DecompositionGraph {
        let raw: RawTable = json.parse().unwrap();
        DecompositionGraph::from_raw(&raw).unwrap()
    }

    pub(crate) const HAO: &str = r#"{
        "好": [6, "LR", "女", "子"],
        "子": [3, null, null],
        "女": [3, null, null]
    }"#;

    #[test]
    fn test_lookup() {
        let g = graph(HAO);

        assert_eq!(g.len(), 3);
        assert!(g.contains("好"));
        assert!(!g.contains("如"));
        assert_eq!(g.node("子").unwrap().stroke_count(), 3);

        let hao = g.index_of("好").unwrap();
        assert_eq!(g[hao].character(), "好");
        assert_eq!(g.get(hao).map(Node::character), Some("好"));
    }

    #[test]
    fn test_components_of() {
        let g = graph(HAO);
        let (left, right) = g.components_of("好").unwrap();

        assert_eq!(left.character(), "女");
        assert_eq!(right.character(), "子");
        assert!(g.components_of("女").is_none());
        assert!(g.components_of("?").is_none());
    }

    #[test]
    fn test_parent_and_strokes_by_character() {
        let g = graph(HAO);

        assert_eq!(g.parent_of("好").and_then(|p| p.composition.as_deref()), Some("LR"));
        assert!(g.parent_of("子").is_none());
        assert_eq!(g.stroke_count("女"), Some(3));
        assert_eq!(g.stroke_count("?"), None);
    }

    #[test]
    fn test_structural_queries() {
        let g = graph(
            r#"{
                "好": [6, "LR", "女", "子"],
                "子": [3, null, null],
                "休": [6, "LR", "亻", "木"]
            }"#,
        );

        let mut roots: Vec<&str> = g.roots().map(Node::character).collect();
        roots.sort();
        assert_eq!(roots, vec!["亻", "女", "子", "木"]);

        let mut leaves: Vec<&str> = g.leaves().map(Node::character).collect();
        leaves.sort();
        assert_eq!(leaves, vec!["休", "好"]);

        // 子 has a stroke count of its own, the others are placeholders
        let mut special: Vec<&str> = g.special().map(Node::character).collect();
        special.sort();
        assert_eq!(special, vec!["亻", "女", "木"]);
    }

    #[test]
    fn test_from_nodes_rejects_dangling_index() {
        let mut node = Node::placeholder("x".into());
        node.descendants_mut(Side::Left).insert(NodeIndex::new(7));

        assert!(matches!(
            DecompositionGraph::from_nodes(vec![node]),
            Err(IntegrityError::DanglingIndex { .. })
        ));
    }

    #[test]
    fn test_from_nodes_rejects_duplicates() {
        let nodes = vec![Node::placeholder("x".into()), Node::placeholder("x".into())];

        assert!(matches!(
            DecompositionGraph::from_nodes(nodes),
            Err(IntegrityError::DuplicateCharacter(_))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let g = graph(HAO);
        let json = serde_json::to_string(&g).unwrap();
        let back: DecompositionGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(g.iter().collect::<Vec<_>>(), back.iter().collect::<Vec<_>>());
        assert_eq!(back.index_of("好"), g.index_of("好"));
    }
}
