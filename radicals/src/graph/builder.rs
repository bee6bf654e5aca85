use hashbrown::HashMap;
use smol_str::SmolStr;

use super::error::BuildError;
use super::{DecompositionGraph, Node, Parent};
use crate::raw::{RawEntry, RawTable};
use crate::types::{NodeIndex, Side};

/// Accumulates raw entries into a [`DecompositionGraph`].
///
/// This is the only place nodes are ever inserted: any component a
/// character refers to gets a placeholder node on first sight, so lookups
/// on the finished graph never miss.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    index: HashMap<SmolStr, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn with_capacity(capacity: usize) -> GraphBuilder {
        GraphBuilder {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Consumes every entry of `raw`, in table order.
    pub fn build(mut self, raw: &RawTable) -> Result<DecompositionGraph, BuildError> {
        if self.nodes.capacity() == 0 {
            self.nodes.reserve(raw.len());
        }

        for (character, fields) in raw.iter() {
            let entry = RawEntry::parse(character, fields)?;
            self.add_entry(character, &entry)?;
        }

        let graph = self.finish();
        log::debug!(
            "Built decomposition graph: {} entries, {} nodes, {} roots",
            raw.len(),
            graph.len(),
            graph.roots().count()
        );

        Ok(graph)
    }

    /// Records one character. Partial decompositions (a missing component, or
    /// a left component that is the character itself) leave it parentless.
    pub fn add_entry(&mut self, character: &str, entry: &RawEntry) -> Result<(), BuildError> {
        let this = self.node_entry(character)?;
        self.nodes[this.get()].set_stroke_count(entry.stroke_count);

        let left = entry.left.filter(|left| *left != character);

        let (left, right) = match (left, entry.right) {
            (Some(left), Some(right)) => (left, right),
            _ => {
                self.detach(this);
                return Ok(());
            }
        };

        let left = self.node_entry(left)?;
        let right = self.node_entry(right)?;

        self.detach(this);
        self.nodes[this.get()].set_parent(Some(Parent {
            composition: entry.composition.clone(),
            left,
            right,
        }));
        self.nodes[left.get()].descendants_mut(Side::Left).insert(this);
        self.nodes[right.get()].descendants_mut(Side::Right).insert(this);

        Ok(())
    }

    pub fn finish(self) -> DecompositionGraph {
        DecompositionGraph::from_parts(self.nodes, self.index)
    }

    /// Looks up `character`, inserting a placeholder if it is not there yet.
    fn node_entry(&mut self, character: &str) -> Result<NodeIndex, BuildError> {
        if let Some(&i) = self.index.get(character) {
            return Ok(i);
        }

        if self.nodes.len() >= u32::MAX as usize {
            return Err(BuildError::TooManyNodes(u32::MAX as usize));
        }

        let i = NodeIndex::new(self.nodes.len());
        let key = SmolStr::from(character);
        self.nodes.push(Node::placeholder(key.clone()));
        self.index.insert(key, i);
        Ok(i)
    }

    /// Drops a previously recorded decomposition, so re-adding a character
    /// does not leave it listed under its old components.
    fn detach(&mut self, this: NodeIndex) {
        let old = match self.nodes[this.get()].parent() {
            Some(p) => p.clone(),
            None => return,
        };

        self.nodes[old.left.get()]
            .descendants_mut(Side::Left)
            .remove(&this);
        self.nodes[old.right.get()]
            .descendants_mut(Side::Right)
            .remove(&this);
        self.nodes[this.get()].set_parent(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{graph, HAO};
    use serde_json::json;

    #[test]
    fn test_hao() {
        let g = graph(HAO);
        let hao = g.node("好").unwrap();
        let parent = hao.parent().unwrap();

        assert_eq!(parent.composition.as_deref(), Some("LR"));
        assert_eq!(g[parent.left].character(), "女");
        assert_eq!(g[parent.right].character(), "子");
        assert_eq!(hao.stroke_count(), 6);

        let nu = g.node("女").unwrap();
        let zi = g.node("子").unwrap();
        let hao_index = g.index_of("好").unwrap();
        assert_eq!(nu.descendants_left().iter().collect::<Vec<_>>(), vec![&hao_index]);
        assert!(nu.descendants_right().is_empty());
        assert_eq!(zi.descendants_right().iter().collect::<Vec<_>>(), vec![&hao_index]);
        assert!(zi.descendants_left().is_empty());
    }

    #[test]
    fn test_placeholders_for_undeclared_components() {
        let g = graph(r#"{"如": [6, "LR", "女", "口"]}"#);

        assert_eq!(g.len(), 3);

        for c in ["女", "口"] {
            let node = g.node(c).unwrap();
            assert!(node.is_root());
            assert!(node.is_special());
            assert_eq!(node.stroke_count(), 0);
        }
    }

    #[test]
    fn test_placeholder_stroke_count_filled_in_later() {
        let g = graph(r#"{"如": [6, "LR", "女", "口"], "女": [3, null, null]}"#);

        assert_eq!(g.node("女").unwrap().stroke_count(), 3);
        assert!(!g.node("女").unwrap().is_special());
        assert_eq!(g.node("女").unwrap().descendants_left().len(), 1);
    }

    #[test]
    fn test_missing_right_component_is_parentless() {
        let g = graph(r#"{"亻": [2, "LR", "人"]}"#);
        let node = g.node("亻").unwrap();

        assert!(node.is_root());
        assert_eq!(node.stroke_count(), 2);
        // the lone left component is not recorded at all
        assert!(!g.contains("人"));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_self_reference_is_parentless() {
        let g = graph(r#"{"口": [3, "LR", "口", "x"]}"#);

        assert!(g.node("口").unwrap().is_root());
        assert!(g.node("口").unwrap().is_leaf());
        assert!(!g.contains("x"));
    }

    #[test]
    fn test_too_few_fields_aborts() {
        let raw: RawTable = r#"{"好": [6, "LR", "女", "子"], "x": [1, "LR"]}"#.parse().unwrap();

        assert!(matches!(
            DecompositionGraph::from_raw(&raw),
            Err(BuildError::TooFewFields { found: 2, .. })
        ));
    }

    #[test]
    fn test_cycles_are_accepted() {
        let g = graph(r#"{"a": [1, "LR", "b", "c"], "b": [1, "LR", "a", "c"]}"#);

        let a = g.index_of("a").unwrap();
        let b = g.index_of("b").unwrap();
        assert_eq!(g[a].parent().unwrap().left, b);
        assert_eq!(g[b].parent().unwrap().left, a);
    }

    #[test]
    fn test_readding_moves_descendants() {
        let mut builder = GraphBuilder::new();
        let first = json!([6, "LR", "女", "子"]);
        let second = json!([6, "LR", "女", "口"]);

        builder
            .add_entry("好", &RawEntry::parse("好", &first).unwrap())
            .unwrap();
        builder
            .add_entry("好", &RawEntry::parse("好", &second).unwrap())
            .unwrap();

        let g = builder.finish();
        assert!(g.node("子").unwrap().descendants_right().is_empty());
        assert_eq!(g.node("口").unwrap().descendants_right().len(), 1);
        assert_eq!(g.node("女").unwrap().descendants_left().len(), 1);
    }

    #[test]
    fn test_does_not_mutate_raw_table() {
        let raw: RawTable = HAO.parse().unwrap();
        let before: Vec<_> = raw.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        DecompositionGraph::from_raw(&raw).unwrap();

        let after: Vec<_> = raw.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(before, after);
    }
}
