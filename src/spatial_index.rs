//! Incremental R-tree over drawn edges or placed vertices
//!
//! Crossing estimates are a bounding-box approximation: an entry "crosses" a query when
//! their minimum bounding rectangles intersect (boundaries inclusive). Near-parallel
//! segments with overlapping boxes are over-counted. Exact segment intersection is never
//! computed during play because testing every candidate cell that way does not fit the
//! per-move budget.

use rstar::{RStarInsertionStrategy, RTree, RTreeObject, RTreeParams, AABB};
use std::fmt;

use crate::types::Coord;

/// Stored or queried shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    /// Drawn edge between two placed endpoints
    Segment(Coord, Coord),
    /// Placed vertex
    Point(Coord),
}

impl Geometry {
    /// Minimum bounding rectangle
    pub fn envelope(&self) -> AABB<[i32; 2]> {
        match self {
            Geometry::Segment(a, b) => AABB::from_corners([a.x, a.y], [b.x, b.y]),
            Geometry::Point(p) => AABB::from_point([p.x, p.y]),
        }
    }
}

/// Inclusive axis-aligned cell rectangle on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min: Coord,
    pub max: Coord,
}

impl Rect {
    pub fn new(min: Coord, max: Coord) -> Self {
        Rect {
            min: Coord::new(min.x.min(max.x), min.y.min(max.y)),
            max: Coord::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Box of half-extent `(half_w, half_h)` around `center`, clipped to the canvas
    pub fn around(center: Coord, half_w: i32, half_h: i32, width: i32, height: i32) -> Self {
        let half_w = half_w.max(0);
        let half_h = half_h.max(0);
        Rect::new(
            Coord::new((center.x - half_w).max(0), (center.y - half_h).max(0)),
            Coord::new(
                (center.x + half_w).min(width - 1).max(0),
                (center.y + half_h).min(height - 1).max(0),
            ),
        )
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.y >= self.min.y && c.y <= self.max.y
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    pub fn cell_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    fn envelope(&self) -> AABB<[i32; 2]> {
        AABB::from_corners([self.min.x, self.min.y], [self.max.x, self.max.y])
    }
}

/// Tree parameter sets, chosen once per round from the expected entry count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSetup {
    /// Low branching factor for small graphs
    Small,
    /// Wider R*-tree nodes for large graphs
    Big,
}

#[derive(Debug, Clone, Copy)]
pub struct SmallTreeParams;

impl RTreeParams for SmallTreeParams {
    const MIN_SIZE: usize = 2;
    const MAX_SIZE: usize = 4;
    const REINSERTION_COUNT: usize = 1;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

#[derive(Debug, Clone, Copy)]
pub struct BigTreeParams;

impl RTreeParams for BigTreeParams {
    const MIN_SIZE: usize = 3;
    const MAX_SIZE: usize = 6;
    const REINSERTION_COUNT: usize = 2;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

#[derive(Debug, Clone)]
struct IndexEntry<P> {
    payload: P,
    geometry: Geometry,
}

impl<P> RTreeObject for IndexEntry<P> {
    type Envelope = AABB<[i32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.geometry.envelope()
    }
}

#[derive(Clone)]
enum Tree<P> {
    Small(RTree<IndexEntry<P>, SmallTreeParams>),
    Big(RTree<IndexEntry<P>, BigTreeParams>),
}

/// Append-only spatial index for one round
#[derive(Clone)]
pub struct SpatialIndex<P> {
    tree: Tree<P>,
    width: i32,
    height: i32,
}

impl<P: Clone> SpatialIndex<P> {
    /// Creates an empty index for a `width × height` canvas.
    /// `expected_entries` at or above `big_threshold` selects the big setup.
    pub fn new(width: i32, height: i32, expected_entries: usize, big_threshold: usize) -> Self {
        let tree = if expected_entries < big_threshold {
            Tree::Small(RTree::new_with_params())
        } else {
            Tree::Big(RTree::new_with_params())
        };
        SpatialIndex {
            tree,
            width,
            height,
        }
    }

    pub fn setup(&self) -> TreeSetup {
        match self.tree {
            Tree::Small(_) => TreeSetup::Small,
            Tree::Big(_) => TreeSetup::Big,
        }
    }

    pub fn len(&self) -> usize {
        match &self.tree {
            Tree::Small(t) => t.size(),
            Tree::Big(t) => t.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, payload: P, geometry: Geometry) {
        let entry = IndexEntry { payload, geometry };
        match &mut self.tree {
            Tree::Small(t) => t.insert(entry),
            Tree::Big(t) => t.insert(entry),
        }
    }

    /// Adds many entries at once; an empty tree is bulk loaded
    pub fn bulk_insert(&mut self, entries: Vec<(P, Geometry)>) {
        if entries.is_empty() {
            return;
        }
        let entries: Vec<IndexEntry<P>> = entries
            .into_iter()
            .map(|(payload, geometry)| IndexEntry { payload, geometry })
            .collect();

        if self.is_empty() {
            self.tree = match self.tree {
                Tree::Small(_) => Tree::Small(RTree::bulk_load_with_params(entries)),
                Tree::Big(_) => Tree::Big(RTree::bulk_load_with_params(entries)),
            };
            return;
        }

        for entry in entries {
            match &mut self.tree {
                Tree::Small(t) => t.insert(entry),
                Tree::Big(t) => t.insert(entry),
            }
        }
    }

    /// Number of stored entries whose bounding box intersects the query's bounding box.
    /// Approximates the crossings a segment would create.
    pub fn count_overlaps(&self, query: &Geometry) -> u64 {
        self.count_in_envelope(&query.envelope())
    }

    /// Splits the canvas into `tiling × tiling` tiles and returns the one overlapping the
    /// most entries. None if the index is empty or every tile counts zero.
    /// Ties go to the first tile in column-major order.
    pub fn highest_density_region(&self, tiling: usize) -> Option<Rect> {
        if self.is_empty() || self.width <= 0 || self.height <= 0 {
            return None;
        }
        let max_tiling = self.width.min(self.height) as usize;
        let tiling = tiling.clamp(1, max_tiling) as i32;
        let tile_w = self.width / tiling;
        let tile_h = self.height / tiling;

        let mut best: Option<(Rect, u64)> = None;
        for i in 0..tiling {
            for k in 0..tiling {
                let x1 = if i == tiling - 1 { self.width - 1 } else { (i + 1) * tile_w - 1 };
                let y1 = if k == tiling - 1 { self.height - 1 } else { (k + 1) * tile_h - 1 };
                let rect = Rect::new(Coord::new(i * tile_w, k * tile_h), Coord::new(x1, y1));
                let count = self.count_in_envelope(&rect.envelope());
                if best.map_or(true, |(_, c)| count > c) {
                    best = Some((rect, count));
                }
            }
        }

        best.filter(|(_, count)| *count > 0).map(|(rect, _)| rect)
    }

    fn count_in_envelope(&self, envelope: &AABB<[i32; 2]>) -> u64 {
        match &self.tree {
            Tree::Small(t) => t.locate_in_envelope_intersecting(envelope).count() as u64,
            Tree::Big(t) => t.locate_in_envelope_intersecting(envelope).count() as u64,
        }
    }
}

impl<P> fmt::Debug for SpatialIndex<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (setup, len) = match &self.tree {
            Tree::Small(t) => (TreeSetup::Small, t.size()),
            Tree::Big(t) => (TreeSetup::Big, t.size()),
        };
        f.debug_struct("SpatialIndex")
            .field("setup", &setup)
            .field("entries", &len)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Density grid resolution for the current progress: one tile while the canvas is sparse,
/// one more row and column per `step` placed vertices, capped by `max` and the canvas size.
pub fn density_tiling(placed: usize, step: usize, max: usize, width: i32, height: i32) -> usize {
    let canvas_cap = width.min(height).max(1) as usize;
    (1 + placed / step.max(1)).min(max.max(1)).min(canvas_cap)
}
