//! Arena-based Aho–Corasick automaton.
//!
//! Nodes live in a flat `Vec`, referenced by `u32` index rather than pointers,
//! so failure links are plain integers and there is no cyclic ownership to
//! manage. Each node's transition table is a small hash map rather than a
//! dense 256-wide array — most DNA-alphabet nodes have at most a handful of
//! live edges, so a sparse map wins on memory without changing semantics.

use crate::pattern::PatternSet;
use rustc_hash::FxHashMap;

const ROOT: u32 = 0;

struct Node {
    transitions: FxHashMap<u8, u32>,
    failure: u32,
    /// Pattern indices reported on entering this node: those terminating
    /// here, plus (once failure links are built) everything inherited from
    /// `output(failure(self))`.
    output: Vec<u32>,
}

impl Node {
    fn new() -> Self {
        Node {
            transitions: FxHashMap::default(),
            failure: ROOT,
            output: Vec::new(),
        }
    }
}

/// A built, read-only Aho–Corasick automaton over a [`PatternSet`]'s
/// case-folded sequences.
pub struct Automaton {
    nodes: Vec<Node>,
}

impl Automaton {
    /// Build the trie and its failure links from every pattern's folded
    /// bytes. The pattern index used in `output` sets matches
    /// `patterns.patterns()`'s indexing.
    pub fn build(patterns: &PatternSet) -> Self {
        let mut nodes = vec![Node::new()];

        for (pattern_index, pattern) in patterns.patterns().iter().enumerate() {
            let mut current = ROOT;
            for &byte in &pattern.folded {
                current = match nodes[current as usize].transitions.get(&byte).copied() {
                    Some(next) => next,
                    None => {
                        nodes.push(Node::new());
                        let new_id = (nodes.len() - 1) as u32;
                        nodes[current as usize].transitions.insert(byte, new_id);
                        new_id
                    }
                };
            }
            nodes[current as usize].output.push(pattern_index as u32);
        }

        let mut automaton = Automaton { nodes };
        automaton.build_failure_links();
        automaton
    }

    fn build_failure_links(&mut self) {
        let mut queue = std::collections::VecDeque::new();

        let root_children: Vec<u32> = self.nodes[ROOT as usize]
            .transitions
            .values()
            .copied()
            .collect();
        for child in root_children {
            self.nodes[child as usize].failure = ROOT;
            queue.push_back(child);
        }

        while let Some(u) = queue.pop_front() {
            let edges: Vec<(u8, u32)> = self.nodes[u as usize]
                .transitions
                .iter()
                .map(|(&b, &v)| (b, v))
                .collect();

            for (byte, v) in edges {
                let mut s = self.nodes[u as usize].failure;
                while s != ROOT && !self.nodes[s as usize].transitions.contains_key(&byte) {
                    s = self.nodes[s as usize].failure;
                }
                let fail = self.nodes[s as usize]
                    .transitions
                    .get(&byte)
                    .copied()
                    .filter(|&target| target != v)
                    .unwrap_or(ROOT);
                self.nodes[v as usize].failure = fail;

                let inherited = self.nodes[fail as usize].output.clone();
                self.nodes[v as usize].output.extend(inherited);

                queue.push_back(v);
            }
        }
    }

    /// Number of trie nodes, for diagnostics.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Scan `data` from a fresh root state, invoking `on_match(end_index,
    /// pattern_index)` for every match ending at each byte, in (end-index
    /// ascending, output-set order) — the order the automaton naturally
    /// produces.
    pub fn scan<F: FnMut(usize, u32)>(&self, data: &[u8], mut on_match: F) {
        let mut state = ROOT;
        for (i, &byte) in data.iter().enumerate() {
            while state != ROOT && !self.nodes[state as usize].transitions.contains_key(&byte) {
                state = self.nodes[state as usize].failure;
            }
            state = self.nodes[state as usize]
                .transitions
                .get(&byte)
                .copied()
                .unwrap_or(ROOT);

            for &pattern_index in &self.nodes[state as usize].output {
                on_match(i, pattern_index);
            }
        }
    }
}
