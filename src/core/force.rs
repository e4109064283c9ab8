//! Velocity-Verlet force simulation for the network chart: link springs,
//! many-body repulsion and a centering force, cooled by a decaying alpha.

use std::collections::HashMap;
use std::f64::consts::PI;

const INITIAL_RADIUS: f64 = 10.0;
const ALPHA_MIN: f64 = 0.001;
const MAX_TICKS: usize = 10_000;

/// One simulated node. `fx`/`fy` pin the node while set.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

/// Spring between two node indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone)]
pub struct ForceSimulation {
    nodes: Vec<ForceNode>,
    links: Vec<ForceLink>,
    link_strengths: Vec<f64>,
    link_biases: Vec<f64>,
    link_distance: f64,
    charge: f64,
    center: (f64, f64),
    alpha: f64,
    alpha_target: f64,
    alpha_decay: f64,
    velocity_decay: f64,
    seed: u32,
}

impl ForceSimulation {
    /// Places `ids` on a phyllotaxis spiral and links them through
    /// `(source id, target id)` pairs. Pairs naming unknown ids are skipped.
    #[must_use]
    pub fn new(ids: &[String], links: &[(String, String)], center: (f64, f64)) -> Self {
        let golden = PI * (3.0 - 5f64.sqrt());
        let nodes: Vec<ForceNode> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
                let angle = index as f64 * golden;
                ForceNode {
                    id: id.clone(),
                    x: radius * angle.cos(),
                    y: radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    fx: None,
                    fy: None,
                }
            })
            .collect();

        let by_id: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.as_str(), index))
            .collect();
        let mut resolved = Vec::with_capacity(links.len());
        for (source, target) in links {
            match (by_id.get(source.as_str()), by_id.get(target.as_str())) {
                (Some(&source), Some(&target)) => resolved.push(ForceLink { source, target }),
                _ => tracing::warn!(%source, %target, "link references an unknown node"),
            }
        }

        let mut simulation = Self {
            nodes,
            links: Vec::new(),
            link_strengths: Vec::new(),
            link_biases: Vec::new(),
            link_distance: 50.0,
            charge: -30.0,
            center,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            velocity_decay: 0.6,
            seed: 1,
        };
        simulation.set_links(resolved);
        simulation
    }

    fn set_links(&mut self, links: Vec<ForceLink>) {
        let mut degree = vec![0usize; self.nodes.len()];
        for link in &links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
        self.link_strengths = links
            .iter()
            .map(|link| 1.0 / degree[link.source].min(degree[link.target]) as f64)
            .collect();
        self.link_biases = links
            .iter()
            .map(|link| {
                let source = degree[link.source] as f64;
                source / (source + degree[link.target] as f64)
            })
            .collect();
        self.links = links;
    }

    #[must_use]
    pub fn nodes(&self) -> &[ForceNode] {
        &self.nodes
    }

    #[must_use]
    pub fn links(&self) -> &[ForceLink] {
        &self.links
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_center(&mut self, center: (f64, f64)) {
        self.center = center;
    }

    /// Raises alpha back to at least `alpha` so the layout moves again.
    pub fn reheat(&mut self, alpha: f64) {
        self.alpha = self.alpha.max(alpha);
    }

    fn jiggle(&mut self) -> f64 {
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (f64::from(self.seed) / f64::from(u32::MAX) - 0.5) * 1e-6
    }

    /// Advances the simulation by one step.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;
        self.apply_links(alpha);
        self.apply_charge(alpha);
        self.apply_center();
        let decay = self.velocity_decay;
        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= decay;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= decay;
                    node.y += node.vy;
                }
            }
        }
    }

    /// Ticks until alpha cools below its minimum; returns the tick count.
    pub fn settle(&mut self) -> usize {
        let mut ticks = 0;
        while self.alpha >= ALPHA_MIN && ticks < MAX_TICKS {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn apply_links(&mut self, alpha: f64) {
        for index in 0..self.links.len() {
            let ForceLink { source, target } = self.links[index];
            let (s, t) = (&self.nodes[source], &self.nodes[target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = self.jiggle();
            }
            if y == 0.0 {
                y = self.jiggle();
            }
            let length = (x * x + y * y).sqrt();
            let factor = (length - self.link_distance) / length * alpha * self.link_strengths[index];
            x *= factor;
            y *= factor;
            let bias = self.link_biases[index];
            let t = &mut self.nodes[target];
            t.vx -= x * bias;
            t.vy -= y * bias;
            let s = &mut self.nodes[source];
            s.vx += x * (1.0 - bias);
            s.vy += y * (1.0 - bias);
        }
    }

    // Direct pairwise summation; network datasets stay small.
    fn apply_charge(&mut self, alpha: f64) {
        let count = self.nodes.len();
        for i in 0..count {
            let (mut dvx, mut dvy) = (0.0, 0.0);
            for j in 0..count {
                if i == j {
                    continue;
                }
                let mut x = self.nodes[j].x - self.nodes[i].x;
                let mut y = self.nodes[j].y - self.nodes[i].y;
                let mut distance2 = x * x + y * y;
                if x == 0.0 {
                    x = self.jiggle();
                    distance2 += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    distance2 += y * y;
                }
                if distance2 < 1.0 {
                    distance2 = distance2.sqrt();
                }
                dvx += x * self.charge * alpha / distance2;
                dvy += y * self.charge * alpha / distance2;
            }
            self.nodes[i].vx += dvx;
            self.nodes[i].vy += dvy;
        }
    }

    fn apply_center(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let count = self.nodes.len() as f64;
        let mean_x = self.nodes.iter().map(|node| node.x).sum::<f64>() / count;
        let mean_y = self.nodes.iter().map(|node| node.y).sum::<f64>() / count;
        let (shift_x, shift_y) = (self.center.0 - mean_x, self.center.1 - mean_y);
        for node in &mut self.nodes {
            node.x += shift_x;
            node.y += shift_y;
        }
    }

    /// Pins a node at `(x, y)` and keeps the simulation warm while dragging.
    pub fn pin(&mut self, index: usize, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.fx = Some(x);
            node.fy = Some(y);
            node.x = x;
            node.y = y;
            self.alpha_target = 0.3;
            self.reheat(0.3);
        }
    }

    /// Releases a pinned node and lets the simulation cool down again.
    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.fx = None;
            node.fy = None;
        }
        self.alpha_target = 0.0;
    }
}
