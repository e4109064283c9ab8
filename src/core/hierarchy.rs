//! Tree building (stratify), value aggregation and the partition layout used
//! by the sunburst.

use std::collections::{HashMap, VecDeque};

use crate::core::datum::Datum;
use crate::error::{ChartError, ChartResult};

/// One node of a stratified tree.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub id: String,
    pub datum: Datum,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: usize,
    /// Longest distance to a leaf.
    pub height: usize,
    /// Own value plus the values of every descendant.
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

/// Arena-backed tree; index `root` is the single parentless node.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    root: usize,
}

impl Hierarchy {
    /// Links datums into a tree through their `id_field` / `parent_field`.
    ///
    /// Datums with an empty or absent parent are roots; there must be exactly
    /// one. Duplicate ids, unknown parents and cycles are rejected.
    pub fn stratify(data: &[Datum], id_field: &str, parent_field: &str) -> ChartResult<Self> {
        let mut nodes: Vec<HierarchyNode> = Vec::with_capacity(data.len());
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(data.len());
        for (index, datum) in data.iter().enumerate() {
            let id = datum.key(id_field).unwrap_or_default();
            if !id.is_empty() && by_id.insert(id.clone(), index).is_some() {
                return Err(ChartError::InvalidData(format!("duplicate hierarchy id: {id}")));
            }
            nodes.push(HierarchyNode {
                id,
                datum: datum.clone(),
                parent: None,
                children: Vec::new(),
                depth: 0,
                height: 0,
                value: 0.0,
                x0: 0.0,
                x1: 0.0,
                y0: 0.0,
                y1: 0.0,
            });
        }

        let mut root = None;
        for (index, datum) in data.iter().enumerate() {
            match datum.key(parent_field).filter(|parent| !parent.is_empty()) {
                None => {
                    if root.replace(index).is_some() {
                        return Err(ChartError::InvalidData("multiple hierarchy roots".to_owned()));
                    }
                }
                Some(parent_id) => {
                    let parent = *by_id.get(&parent_id).ok_or_else(|| {
                        ChartError::InvalidData(format!("missing hierarchy parent: {parent_id}"))
                    })?;
                    nodes[index].parent = Some(parent);
                    nodes[parent].children.push(index);
                }
            }
        }
        let root = root.ok_or_else(|| ChartError::InvalidData("no hierarchy root".to_owned()))?;

        let mut hierarchy = Self { nodes, root };
        let order = hierarchy.descendants();
        if order.len() != hierarchy.nodes.len() {
            return Err(ChartError::InvalidData("hierarchy contains a cycle".to_owned()));
        }
        for &index in &order {
            if let Some(parent) = hierarchy.nodes[index].parent {
                hierarchy.nodes[index].depth = hierarchy.nodes[parent].depth + 1;
            }
        }
        for &index in order.iter().rev() {
            let height = hierarchy.nodes[index]
                .children
                .iter()
                .map(|&child| hierarchy.nodes[child].height + 1)
                .max()
                .unwrap_or(0);
            hierarchy.nodes[index].height = height;
        }
        Ok(hierarchy)
    }

    #[must_use]
    pub fn root(&self) -> usize {
        self.root
    }

    #[must_use]
    pub fn node(&self, index: usize) -> &HierarchyNode {
        &self.nodes[index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node indices in breadth-first order starting at the root.
    #[must_use]
    pub fn descendants(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.root]);
        while let Some(index) = queue.pop_front() {
            if order.len() > self.nodes.len() {
                break;
            }
            order.push(index);
            queue.extend(self.nodes[index].children.iter().copied());
        }
        order
    }

    /// Path from the root's child down to `index` (the root is excluded).
    #[must_use]
    pub fn ancestry(&self, index: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            path.push(current);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Sets every node's value to its own `field` value (non-numbers count
    /// as zero) plus the values of its descendants.
    pub fn sum(&mut self, field: &str) {
        for index in self.descendants().into_iter().rev() {
            let own = self.nodes[index]
                .datum
                .number(field)
                .filter(|value| value.is_finite())
                .unwrap_or(0.0);
            let children: f64 = self.nodes[index]
                .children
                .iter()
                .map(|&child| self.nodes[child].value)
                .sum();
            self.nodes[index].value = own + children;
        }
    }

    /// Adjacency partition in the unit square: `x` spans are proportional
    /// to value, `y` bands are one per depth.
    pub fn partition(&mut self) {
        let levels = (self.nodes[self.root].height + 1) as f64;
        let root = self.root;
        self.nodes[root].x0 = 0.0;
        self.nodes[root].x1 = 1.0;
        for index in self.descendants() {
            let depth = self.nodes[index].depth as f64;
            self.nodes[index].y0 = depth / levels;
            self.nodes[index].y1 = (depth + 1.0) / levels;

            let (x0, x1, value) = {
                let node = &self.nodes[index];
                (node.x0, node.x1, node.value)
            };
            let scale = if value > 0.0 { (x1 - x0) / value } else { 0.0 };
            let mut cursor = x0;
            for child in self.nodes[index].children.clone() {
                let child_node = &mut self.nodes[child];
                child_node.x0 = cursor;
                cursor += child_node.value * scale;
                child_node.x1 = cursor;
            }
        }
    }
}
