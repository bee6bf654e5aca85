use hashbrown::HashSet;
use smol_str::SmolStr;
use std::collections::btree_set;
use std::iter::FusedIterator;

use super::{SearchConfig, Similar};
use crate::constants::{COST_COMPOSITION, COST_RADICAL, COST_SIDE, COST_STROKE};
use crate::graph::{DecompositionGraph, Node, Parent};
use crate::types::{Distance, NodeIndex, Side};

/// (side of the start's parent to look at, side of that component's
/// descendants to take). Differing sides are opposite-side alternates.
const CANDIDATE_GROUPS: [(Side, Side); 4] = [
    (Side::Left, Side::Left),
    (Side::Right, Side::Right),
    (Side::Left, Side::Right),
    (Side::Right, Side::Left),
];

struct Context<'a> {
    graph: &'a DecompositionGraph,
    exclusions: &'a mut HashSet<SmolStr>,
    max_distance: Distance,
    config: SearchConfig,
}

impl<'a> Context<'a> {
    #[inline(always)]
    fn is_under_distance_limit(&self, distance: Distance) -> bool {
        distance <= self.max_distance
    }

    #[inline(always)]
    fn group_count(&self) -> usize {
        if self.config.include_parent_alternates {
            CANDIDATE_GROUPS.len()
        } else {
            2
        }
    }

    /// Cost of reaching `candidate` from `start` at `distance`, or `None` if
    /// it is excluded or over the limit.
    fn candidate_distance(&self, start: &Node, candidate: &Node, mut distance: Distance) -> Option<Distance> {
        if self.exclusions.contains(candidate.key()) {
            return None;
        }

        if self.config.include_stroke_cost {
            let difference = start.stroke_count().abs_diff(candidate.stroke_count());
            if difference > 0 {
                distance += COST_STROKE * difference as Distance;
            }
        }

        if candidate.composition() != start.composition() {
            distance += COST_COMPOSITION;
        }

        if self.is_under_distance_limit(distance) {
            Some(distance)
        } else {
            None
        }
    }
}

enum Stage<'a> {
    Start,
    Candidates {
        group: usize,
        iter: btree_set::Iter<'a, NodeIndex>,
    },
    Parents(Side),
    Deeper(usize),
    Done,
}

enum Step<'a> {
    Yield(Similar),
    Descend(Frame<'a>),
    Finished,
}

/// One level of the search, centred on `start`.
struct Frame<'a> {
    start: NodeIndex,
    distance: Distance,
    expand_parents: bool,
    go_deeper: bool,
    parent: Option<&'a Parent>,
    queue: Vec<(NodeIndex, Distance)>,
    stage: Stage<'a>,
}

impl<'a> Frame<'a> {
    fn new(start: NodeIndex, distance: Distance, expand_parents: bool, go_deeper: bool) -> Frame<'a> {
        Frame {
            start,
            distance,
            expand_parents,
            go_deeper,
            parent: None,
            queue: vec![],
            stage: Stage::Start,
        }
    }

    fn candidates(&self, cx: &Context<'a>, group: usize) -> Stage<'a> {
        let graph = cx.graph;

        match self.parent {
            Some(parent) if group < cx.group_count() => {
                let (component_side, descendant_side) = CANDIDATE_GROUPS[group];
                let component = &graph[parent.component(component_side)];

                Stage::Candidates {
                    group,
                    iter: component.descendants(descendant_side).iter(),
                }
            }
            Some(_) => {
                let distance = self.distance + COST_RADICAL;

                if !cx.is_under_distance_limit(distance) {
                    Stage::Done
                } else if self.expand_parents {
                    Stage::Parents(Side::Left)
                } else {
                    Stage::Deeper(0)
                }
            }
            None => Stage::Done,
        }
    }

    fn advance(&mut self, cx: &mut Context<'a>) -> Step<'a> {
        let graph = cx.graph;
        let start = &graph[self.start];

        loop {
            match &mut self.stage {
                Stage::Start => {
                    cx.exclusions.insert(start.key().clone());
                    self.parent = start.parent();

                    log::trace!(
                        "search '{}' at {} (parents: {}, deeper: {})",
                        start.character(),
                        self.distance,
                        self.expand_parents,
                        self.go_deeper
                    );

                    self.stage = self.candidates(cx, 0);
                }
                Stage::Candidates { group, iter } => {
                    let group = *group;
                    let base = match CANDIDATE_GROUPS[group] {
                        (a, b) if a == b => self.distance,
                        _ => self.distance + COST_SIDE,
                    };

                    let mut found = None;

                    for &index in iter {
                        let candidate = &graph[index];

                        if let Some(distance) = cx.candidate_distance(start, candidate, base) {
                            found = Some((index, distance));
                            break;
                        }
                    }

                    match found {
                        Some((index, distance)) => {
                            let candidate = graph[index].key().clone();
                            cx.exclusions.insert(candidate.clone());

                            if self.go_deeper {
                                self.queue.push((index, distance));
                            }

                            return Step::Yield(Similar::new(candidate, distance));
                        }
                        None => {
                            self.stage = self.candidates(cx, group + 1);

                            // Past the immediate siblings: one more radical differs.
                            if !matches!(self.stage, Stage::Candidates { .. }) {
                                self.distance += COST_RADICAL;
                            }
                        }
                    }
                }
                Stage::Parents(side) => {
                    let side = *side;

                    self.stage = match side {
                        Side::Left => Stage::Parents(Side::Right),
                        Side::Right => Stage::Deeper(0),
                    };

                    if let Some(parent) = self.parent {
                        return Step::Descend(Frame::new(
                            parent.component(side),
                            self.distance,
                            false,
                            false,
                        ));
                    }
                }
                Stage::Deeper(position) => {
                    while let Some(&(index, distance)) = self.queue.get(*position) {
                        *position += 1;

                        let distance = distance + COST_RADICAL;
                        if !cx.is_under_distance_limit(distance) {
                            continue;
                        }

                        return Step::Descend(Frame::new(index, distance, false, self.go_deeper));
                    }

                    self.stage = Stage::Done;
                }
                Stage::Done => return Step::Finished,
            }
        }
    }
}

/// Lazy, cost-bounded walk over the characters related to a start
/// character. Created by [`within_distance`](super::within_distance).
///
/// Nothing is computed until the first call to `next`, and dropping the
/// iterator part way through simply stops the search. Every character the
/// walk visits or yields is added to the exclusion set it was created with.
pub struct WithinDistance<'a> {
    cx: Context<'a>,
    stack: Vec<Frame<'a>>,
}

impl<'a> WithinDistance<'a> {
    pub(crate) fn new(
        graph: &'a DecompositionGraph,
        start: NodeIndex,
        max_distance: Distance,
        exclusions: &'a mut HashSet<SmolStr>,
        config: SearchConfig,
    ) -> WithinDistance<'a> {
        let root = Frame::new(start, COST_RADICAL, config.include_parent_siblings, true);

        WithinDistance {
            cx: Context {
                graph,
                exclusions,
                max_distance,
                config,
            },
            stack: vec![root],
        }
    }

    /// Number of nested searches currently in progress.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<'a> Iterator for WithinDistance<'a> {
    type Item = Similar;

    fn next(&mut self) -> Option<Similar> {
        loop {
            let frame = self.stack.last_mut()?;

            match frame.advance(&mut self.cx) {
                Step::Yield(similar) => return Some(similar),
                Step::Descend(frame) => self.stack.push(frame),
                Step::Finished => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'a> FusedIterator for WithinDistance<'a> {}
