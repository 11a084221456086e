// Game data model
// Graph, coordinates and moves shared by the player, the journal and the replay tool

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D integer cell on the canvas
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Euclidean distance truncated to an integer
    pub fn distance(&self, other: &Coord) -> i64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt() as i64
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Vertex identity
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Edge identity
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

/// Undirected edge between source `s` and target `t`
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Edge {
    pub id: EdgeId,
    pub s: VertexId,
    pub t: VertexId,
}

impl Edge {
    /// Returns the endpoint opposite to `v`, or None if `v` is not an endpoint
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.s == v {
            Some(self.t)
        } else if self.t == v {
            Some(self.s)
        } else {
            None
        }
    }
}

/// Immutable graph supplied once per round
#[derive(Debug, Clone)]
pub struct Graph {
    vertices: Vec<VertexId>,
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
}

impl Graph {
    /// Builds a graph over vertices `0..vertex_count` from endpoint pairs.
    /// Pairs referencing unknown vertices are skipped.
    pub fn new(vertex_count: usize, pairs: &[(u32, u32)]) -> Self {
        let vertices: Vec<VertexId> = (0..vertex_count as u32).map(VertexId).collect();
        let mut incidence = vec![Vec::new(); vertex_count];
        let mut edges = Vec::with_capacity(pairs.len());

        for &(s, t) in pairs {
            if s as usize >= vertex_count || t as usize >= vertex_count {
                continue;
            }
            let id = EdgeId(edges.len() as u32);
            edges.push(Edge {
                id,
                s: VertexId(s),
                t: VertexId(t),
            });
            incidence[s as usize].push(id);
            if s != t {
                incidence[t as usize].push(id);
            }
        }

        Graph {
            vertices,
            edges,
            incidence,
        }
    }

    /// Cycle 0 - 1 - ... - (n-1) - 0
    pub fn cycle(n: usize) -> Self {
        let pairs: Vec<(u32, u32)> = (0..n as u32)
            .map(|i| (i, (i + 1) % n as u32))
            .filter(|(s, t)| s != t)
            .collect();
        Graph::new(n, &pairs)
    }

    /// Cycle visiting the vertices in a random order
    pub fn random_cycle<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut order: Vec<u32> = (0..n as u32).collect();
        order.shuffle(rng);
        let pairs: Vec<(u32, u32)> = (0..n)
            .map(|i| (order[i], order[(i + 1) % n]))
            .filter(|(s, t)| s != t)
            .collect();
        Graph::new(n, &pairs)
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertices.len()
    }

    /// Edges incident to `v`; empty for unknown vertices
    pub fn incident_edges(&self, v: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.incidence
            .get(v.index())
            .into_iter()
            .flatten()
            .map(move |id| &self.edges[id.0 as usize])
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.incidence.get(v.index()).map_or(0, |ids| ids.len())
    }

    /// Endpoint pairs in edge order, as written to the journal
    pub fn edge_pairs(&self) -> Vec<(u32, u32)> {
        self.edges.iter().map(|e| (e.s.0, e.t.0)).collect()
    }
}

/// A single placement: vertex onto coordinate
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct GameMove {
    pub vertex: VertexId,
    pub coord: Coord,
}

impl GameMove {
    pub fn new(vertex: VertexId, coord: Coord) -> Self {
        GameMove { vertex, coord }
    }
}

/// Which side of the game the player is on
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Max,
    Min,
}

impl Role {
    pub fn opponent(&self) -> Role {
        match self {
            Role::Max => Role::Min,
            Role::Min => Role::Max,
        }
    }

    /// True if `candidate` strictly beats `incumbent` for this role
    pub fn prefers(&self, candidate: u64, incumbent: u64) -> bool {
        match self {
            Role::Max => candidate > incumbent,
            Role::Min => candidate < incumbent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Max => "max",
            Role::Min => "min",
        }
    }
}
