// Per-round game state and the read-only snapshot handed to strategies

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::GameError;
use crate::spatial_index::{Geometry, SpatialIndex};
use crate::types::{Coord, EdgeId, GameMove, Graph, VertexId};

/// Partial vertex placement on the canvas.
///
/// A vertex is placed iff it has a coordinate iff that cell is marked used.
/// No two vertices share a cell.
#[derive(Debug, Clone)]
pub struct GameState {
    width: i32,
    height: i32,
    vertex_coordinates: HashMap<VertexId, Coord>,
    used: Vec<bool>,
    placed: HashSet<VertexId>,
}

impl GameState {
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width.max(0) as usize) * (height.max(0) as usize);
        GameState {
            width,
            height,
            vertex_coordinates: HashMap::new(),
            used: vec![false; cells],
            placed: HashSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.used.len()
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    fn cell(&self, c: Coord) -> usize {
        c.y as usize * self.width as usize + c.x as usize
    }

    /// False for used and out-of-bounds cells
    pub fn is_free(&self, c: Coord) -> bool {
        self.in_bounds(c) && !self.used[self.cell(c)]
    }

    pub fn is_placed(&self, v: VertexId) -> bool {
        self.placed.contains(&v)
    }

    pub fn coordinate_of(&self, v: VertexId) -> Option<Coord> {
        self.vertex_coordinates.get(&v).copied()
    }

    pub fn vertex_coordinates(&self) -> &HashMap<VertexId, Coord> {
        &self.vertex_coordinates
    }

    pub fn placed_vertices(&self) -> &HashSet<VertexId> {
        &self.placed
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn free_cells(&self) -> usize {
        self.used.len() - self.placed.len()
    }

    /// Checks a move without applying it
    pub fn validate(&self, graph: &Graph, mv: &GameMove) -> Result<(), GameError> {
        if !graph.contains(mv.vertex) {
            return Err(GameError::UnknownVertex(mv.vertex));
        }
        if !self.in_bounds(mv.coord) {
            return Err(GameError::OutOfBounds(mv.coord));
        }
        if self.is_placed(mv.vertex) {
            return Err(GameError::AlreadyPlaced(mv.vertex));
        }
        if !self.is_free(mv.coord) {
            return Err(GameError::Occupied(mv.coord));
        }
        Ok(())
    }

    /// Records the placement. Rejected moves leave the state untouched.
    pub fn apply_move(&mut self, graph: &Graph, mv: &GameMove) -> Result<(), GameError> {
        self.validate(graph, mv)?;
        let cell = self.cell(mv.coord);
        self.used[cell] = true;
        self.vertex_coordinates.insert(mv.vertex, mv.coord);
        self.placed.insert(mv.vertex);
        Ok(())
    }
}

/// Everything a strategy may read during a race: graph, placement, and both indices.
/// Only the scheduler's thread mutates it, through `apply`.
#[derive(Debug, Clone)]
pub struct RoundView {
    pub graph: Arc<Graph>,
    pub state: GameState,
    /// Drawn edges (both endpoints placed)
    pub edges: SpatialIndex<EdgeId>,
    /// Placed vertices
    pub points: SpatialIndex<VertexId>,
}

impl RoundView {
    pub fn new(graph: Arc<Graph>, width: i32, height: i32, big_tree_threshold: usize) -> Self {
        let expected = graph.vertex_count();
        RoundView {
            state: GameState::new(width, height),
            edges: SpatialIndex::new(width, height, expected, big_tree_threshold),
            points: SpatialIndex::new(width, height, expected, big_tree_threshold),
            graph,
        }
    }

    pub fn width(&self) -> i32 {
        self.state.width()
    }

    pub fn height(&self) -> i32 {
        self.state.height()
    }

    /// Applies a move and catches both indices up with it
    pub fn apply(&mut self, mv: &GameMove) -> Result<(), GameError> {
        self.state.apply_move(&self.graph, mv)?;
        self.points.insert(mv.vertex, Geometry::Point(mv.coord));
        let drawn = newly_drawn_edges(&self.graph, &self.state, mv.vertex);
        self.edges.bulk_insert(drawn);
        Ok(())
    }

    /// Pairs of drawn edges whose bounding boxes overlap. Edges sharing an endpoint always count,
    /// so this overestimates the real crossing number.
    pub fn estimated_crossings(&self) -> u64 {
        let overlaps: u64 = self
            .graph
            .edges()
            .iter()
            .filter_map(|e| {
                let s = self.state.coordinate_of(e.s)?;
                let t = self.state.coordinate_of(e.t)?;
                Some(self.edges.count_overlaps(&Geometry::Segment(s, t)).saturating_sub(1))
            })
            .sum();
        overlaps / 2
    }
}

/// Segments for every edge incident to `vertex` whose endpoints are both placed
pub fn newly_drawn_edges(graph: &Graph, state: &GameState, vertex: VertexId) -> Vec<(EdgeId, Geometry)> {
    let mut seen = HashSet::new();
    graph
        .incident_edges(vertex)
        .filter_map(|e| {
            let s = state.coordinate_of(e.s)?;
            let t = state.coordinate_of(e.t)?;
            if seen.insert(e.id) {
                Some((e.id, Geometry::Segment(s, t)))
            } else {
                None
            }
        })
        .collect()
}
