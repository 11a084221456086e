//! Strategy contract and the helpers every heuristic builds on
//!
//! A strategy is a stateless-per-call unit: it reads a `RoundView` snapshot and proposes one
//! `Candidate`. Candidates from different strategies are ranked only by their quality, so
//! quality must always come from `compute_move_quality`.

use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::{IndexConfig, StrategyConfig};
use crate::game_state::{GameState, RoundView};
use crate::pace::SampleParameters;
use crate::spatial_index::{Geometry, Rect};
use crate::types::{Coord, GameMove, Graph, Role, VertexId};

/// Stable identifiers used for logging, profiling, the journal and config switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyName {
    /// Random fallback computed on the scheduler thread
    Baseline,
    RandomMove,
    MaximizeOppositeCorner,
    MaximizeDenseRegion,
    MaximizeHighDegreeAngle,
    MaximizeLongestDiagonal,
    MaximizeGrid,
    MinimizeNextToOpponent,
    MinimizeBorderWalk,
    MinimizeEllipse,
    BruteforceCrossing,
}

impl StrategyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyName::Baseline => "baseline",
            StrategyName::RandomMove => "random_move",
            StrategyName::MaximizeOppositeCorner => "maximize_opposite_corner",
            StrategyName::MaximizeDenseRegion => "maximize_dense_region",
            StrategyName::MaximizeHighDegreeAngle => "maximize_high_degree_angle",
            StrategyName::MaximizeLongestDiagonal => "maximize_longest_diagonal",
            StrategyName::MaximizeGrid => "maximize_grid",
            StrategyName::MinimizeNextToOpponent => "minimize_next_to_opponent",
            StrategyName::MinimizeBorderWalk => "minimize_border_walk",
            StrategyName::MinimizeEllipse => "minimize_ellipse",
            StrategyName::BruteforceCrossing => "bruteforce_crossing",
        }
    }

    pub const ALL: [StrategyName; 11] = [
        StrategyName::Baseline,
        StrategyName::RandomMove,
        StrategyName::MaximizeOppositeCorner,
        StrategyName::MaximizeDenseRegion,
        StrategyName::MaximizeHighDegreeAngle,
        StrategyName::MaximizeLongestDiagonal,
        StrategyName::MaximizeGrid,
        StrategyName::MinimizeNextToOpponent,
        StrategyName::MinimizeBorderWalk,
        StrategyName::MinimizeEllipse,
        StrategyName::BruteforceCrossing,
    ];

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn parse(s: &str) -> Option<StrategyName> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed placement and its estimated crossing contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub vertex: VertexId,
    pub coord: Coord,
    pub quality: u64,
}

impl Candidate {
    /// Scores the placement with the shared quality function
    pub fn evaluate(view: &RoundView, vertex: VertexId, coord: Coord) -> Self {
        Candidate {
            vertex,
            coord,
            quality: compute_move_quality(view, vertex, coord),
        }
    }

    pub fn to_move(&self) -> GameMove {
        GameMove::new(self.vertex, self.coord)
    }
}

/// Match progress as seen by activation gates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 0-100, 100 means every vertex is placed
    pub percent_placed: f64,
    pub moves_remaining: usize,
    pub total_moves: usize,
}

impl Progress {
    pub fn moves_made(&self) -> usize {
        self.total_moves.saturating_sub(self.moves_remaining)
    }
}

/// Shared deadline of one race. Strategies poll it to stop early.
#[derive(Debug)]
pub struct RaceClock {
    deadline: Instant,
    cancelled: AtomicBool,
}

impl RaceClock {
    pub fn new(budget: Duration) -> Self {
        RaceClock {
            deadline: Instant::now() + budget,
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// True once the deadline passed or the scheduler stopped waiting
    pub fn expired(&self) -> bool {
        self.cancelled.load(Ordering::Acquire) || Instant::now() >= self.deadline
    }
}

/// Everything one strategy invocation may use
pub struct StrategyContext<'a> {
    pub view: &'a RoundView,
    pub ranking: &'a VertexRanking,
    pub role: Role,
    pub samples: SampleParameters,
    pub rng: StdRng,
    pub clock: &'a RaceClock,
    pub tuning: &'a StrategyConfig,
    pub index_tuning: &'a IndexConfig,
    pub retry_factor: u32,
}

impl<'a> StrategyContext<'a> {
    pub fn width(&self) -> i32 {
        self.view.width()
    }

    pub fn height(&self) -> i32 {
        self.view.height()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.samples.max(1) as usize
    }

    /// Free cells drawn around `center` within the given half extents
    pub fn sample_around(&mut self, center: Coord, half_w: i32, half_h: i32, count: usize) -> Vec<Coord> {
        let rect = Rect::around(center, half_w, half_h, self.width(), self.height());
        sample_free_in_rect(&self.view.state, &mut self.rng, rect, count, self.retry_factor)
    }

    pub fn sample_in(&mut self, rect: Rect, count: usize) -> Vec<Coord> {
        sample_free_in_rect(&self.view.state, &mut self.rng, rect, count, self.retry_factor)
    }

    pub fn choose_best(&self, vertices: &[VertexId], coords: &[Coord]) -> Option<Candidate> {
        choose_best(self.view, self.role, vertices, coords, self.clock)
    }
}

/// Uniform interface of every placement heuristic
pub trait Strategy: Send + Sync {
    fn name(&self) -> StrategyName;

    /// Activation gate; declining strategies are not raced this move
    fn is_eligible(&self, _progress: &Progress) -> bool {
        true
    }

    /// Placement while nothing is on the canvas yet. No crossing data exists at this point.
    fn opening(&self, _ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        None
    }

    /// Regular placement after the opponent's `last` move
    fn execute(&self, ctx: &mut StrategyContext<'_>, last: GameMove) -> Option<Candidate>;
}

/// Sum of bounding-box overlaps of every edge `vertex` would draw at `coord`.
///
/// For each incident edge whose other endpoint is placed, the segment from that endpoint to
/// `coord` is counted against the drawn-edge index.
pub fn compute_move_quality(view: &RoundView, vertex: VertexId, coord: Coord) -> u64 {
    view.graph
        .incident_edges(vertex)
        .filter_map(|e| e.other(vertex))
        .filter(|other| *other != vertex)
        .filter_map(|other| view.state.coordinate_of(other))
        .map(|anchor| view.edges.count_overlaps(&Geometry::Segment(anchor, coord)))
        .sum()
}

/// Up to `count` distinct free cells drawn uniformly from `rect`.
/// Gives up after `retry_factor × count` draws and returns what it found.
pub fn sample_free_in_rect<R: Rng + ?Sized>(
    state: &GameState,
    rng: &mut R,
    rect: Rect,
    count: usize,
    retry_factor: u32,
) -> Vec<Coord> {
    let mut found = Vec::with_capacity(count);
    if count == 0 || rect.width() <= 0 || rect.height() <= 0 {
        return found;
    }
    let attempts = count * retry_factor.max(1) as usize;
    for _ in 0..attempts {
        if found.len() >= count {
            break;
        }
        let c = Coord::new(
            rng.random_range(rect.min.x..=rect.max.x),
            rng.random_range(rect.min.y..=rect.max.y),
        );
        if state.is_free(c) && !found.contains(&c) {
            found.push(c);
        }
    }
    found
}

/// Extremal-quality candidate over the cross product; first found wins ties.
/// Stops early once the clock expires, or at quality zero for a minimizer.
pub fn choose_best(
    view: &RoundView,
    role: Role,
    vertices: &[VertexId],
    coords: &[Coord],
    clock: &RaceClock,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for &v in vertices {
        for &c in coords {
            let candidate = Candidate::evaluate(view, v, c);
            if best.map_or(true, |b| role.prefers(candidate.quality, b.quality)) {
                best = Some(candidate);
            }
            if role == Role::Min && candidate.quality == 0 {
                return best;
            }
        }
        if clock.expired() {
            break;
        }
    }
    best
}

/// An unplaced neighbour of `vertex`
pub fn pick_incident_unplaced(view: &RoundView, vertex: VertexId) -> Option<VertexId> {
    view.graph
        .incident_edges(vertex)
        .filter_map(|e| e.other(vertex))
        .find(|other| *other != vertex && !view.state.is_placed(*other))
}

pub fn first_unplaced(view: &RoundView) -> Option<VertexId> {
    view.graph
        .vertices()
        .iter()
        .copied()
        .find(|v| !view.state.is_placed(*v))
}

/// Uniform choice among unplaced vertices
pub fn random_unplaced<R: Rng + ?Sized>(view: &RoundView, rng: &mut R) -> Option<VertexId> {
    let remaining = view.graph.vertex_count().saturating_sub(view.state.placed_count());
    if remaining == 0 {
        return None;
    }
    let skip = rng.random_range(0..remaining);
    view.graph
        .vertices()
        .iter()
        .copied()
        .filter(|v| !view.state.is_placed(*v))
        .nth(skip)
}

/// Uniform choice among free cells. Rejection sampling is bounded by the cell count,
/// after which the k-th free cell is taken directly.
pub fn random_free_coord<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<Coord> {
    let free = state.free_cells();
    if free == 0 || state.width() <= 0 || state.height() <= 0 {
        return None;
    }
    for _ in 0..state.cell_count() {
        let c = Coord::new(
            rng.random_range(0..state.width()),
            rng.random_range(0..state.height()),
        );
        if state.is_free(c) {
            return Some(c);
        }
    }
    let k = rng.random_range(0..free);
    (0..state.height())
        .flat_map(|y| (0..state.width()).map(move |x| Coord::new(x, y)))
        .filter(|c| state.is_free(*c))
        .nth(k)
}

/// Random unplaced vertex on a random free cell
pub fn random_move<R: Rng + ?Sized>(view: &RoundView, rng: &mut R) -> Option<GameMove> {
    let vertex = random_unplaced(view, rng)?;
    let coord = random_free_coord(&view.state, rng)?;
    Some(GameMove::new(vertex, coord))
}

pub fn canvas_center(view: &RoundView) -> Coord {
    Coord::new(view.width() / 2, view.height() / 2)
}

pub fn canvas_corners(width: i32, height: i32) -> [Coord; 4] {
    [
        Coord::new(0, 0),
        Coord::new(width - 1, 0),
        Coord::new(0, height - 1),
        Coord::new(width - 1, height - 1),
    ]
}

/// The canvas corner farthest from `from`; earlier corners win ties
pub fn farthest_corner(width: i32, height: i32, from: Coord) -> Coord {
    let corners = canvas_corners(width, height);
    let mut best = corners[0];
    let mut best_distance = i64::MIN;
    for c in corners {
        let d = from.distance(&c);
        if d > best_distance {
            best = c;
            best_distance = d;
        }
    }
    best
}

/// Closest free cell to `target` by expanding square rings
pub fn nearest_free(state: &GameState, target: Coord) -> Option<Coord> {
    if state.free_cells() == 0 {
        return None;
    }
    let max_radius = state.width().max(state.height());
    for r in 0..=max_radius {
        for dx in -r..=r {
            for dy in [-r, r] {
                let c = Coord::new(target.x + dx, target.y + dy);
                if state.is_free(c) {
                    return Some(c);
                }
            }
        }
        for dy in (-r + 1)..r {
            for dx in [-r, r] {
                let c = Coord::new(target.x + dx, target.y + dy);
                if state.is_free(c) {
                    return Some(c);
                }
            }
        }
    }
    None
}

/// Cells of the `ring`-th concentric canvas outline, clockwise from its top-left corner
pub fn outline_ring(width: i32, height: i32, ring: i32) -> Vec<Coord> {
    let (x0, y0, x1, y1) = (ring, ring, width - 1 - ring, height - 1 - ring);
    if x0 > x1 || y0 > y1 {
        return Vec::new();
    }
    let top = (x0..=x1).map(|x| Coord::new(x, y0));
    let right = (y0 + 1..=y1).map(|y| Coord::new(x1, y));
    let bottom: Vec<Coord> = if y1 > y0 {
        (x0..x1).rev().map(|x| Coord::new(x, y1)).collect()
    } else {
        Vec::new()
    };
    let left: Vec<Coord> = if x1 > x0 {
        (y0 + 1..y1).rev().map(|y| Coord::new(x0, y)).collect()
    } else {
        Vec::new()
    };
    top.chain(right).chain(bottom).chain(left).collect()
}

pub fn outline_ring_count(width: i32, height: i32) -> i32 {
    (width.min(height) + 1) / 2
}

/// First free cell on the outermost ring that still has one
pub fn first_free_on_outline(state: &GameState) -> Option<Coord> {
    (0..outline_ring_count(state.width(), state.height())).find_map(|ring| {
        outline_ring(state.width(), state.height(), ring)
            .into_iter()
            .find(|c| state.is_free(*c))
    })
}

/// Per-round vertex ranking by degree plus the ellipse ring used by layout heuristics
#[derive(Debug, Clone)]
pub struct VertexRanking {
    by_degree: Vec<VertexId>,
    ellipse: Vec<Coord>,
}

impl VertexRanking {
    pub fn new(graph: &Graph, width: i32, height: i32) -> Self {
        let mut by_degree: Vec<VertexId> = graph.vertices().to_vec();
        by_degree.sort_by(|a, b| graph.degree(*b).cmp(&graph.degree(*a)).then(a.cmp(b)));
        VertexRanking {
            by_degree,
            ellipse: ellipse_ring(width, height),
        }
    }

    /// Unplaced vertex with the most incident edges
    pub fn most_valuable_unplaced(&self, state: &GameState) -> Option<VertexId> {
        self.by_degree.iter().copied().find(|v| !state.is_placed(*v))
    }

    pub fn ellipse(&self) -> &[Coord] {
        &self.ellipse
    }

    pub fn next_free_ellipse_cell(&self, state: &GameState) -> Option<Coord> {
        self.ellipse.iter().copied().find(|c| state.is_free(*c))
    }
}

/// Cells of the largest axis-aligned ellipse centred on the canvas, ordered by angle
fn ellipse_ring(width: i32, height: i32) -> Vec<Coord> {
    if width <= 0 || height <= 0 {
        return Vec::new();
    }
    let (xm, ym) = (width / 2, height / 2);
    let a = xm.min(width - 1 - xm) as i64;
    let b = ym.min(height - 1 - ym) as i64;
    // Both semi-axes vanish on canvases up to 2x2; the ring is the centre cell
    if a == 0 && b == 0 {
        return vec![Coord::new(xm, ym)];
    }

    let mut cells = Vec::new();
    let (mut dx, mut dy) = (0i64, b);
    let (a2, b2) = (a * a, b * b);
    let mut err = b2 - (2 * b - 1) * a2;
    loop {
        for (sx, sy) in [(1, 1), (-1, 1), (-1, -1), (1, -1)] {
            cells.push(Coord::new(xm + (sx * dx) as i32, ym + (sy * dy) as i32));
        }
        let e2 = 2 * err;
        if e2 < (2 * dx + 1) * b2 {
            dx += 1;
            err += (2 * dx + 1) * b2;
        }
        if e2 > -(2 * dy - 1) * a2 {
            dy -= 1;
            err -= (2 * dy - 1) * a2;
        }
        if dy < 0 {
            break;
        }
    }
    // Flat ellipses stop early; finish the tips
    while dx < a {
        dx += 1;
        cells.push(Coord::new(xm + dx as i32, ym));
        cells.push(Coord::new(xm - dx as i32, ym));
    }

    cells.retain(|c| c.x >= 0 && c.y >= 0 && c.x < width && c.y < height);
    cells.sort();
    cells.dedup();
    cells.sort_by(|p, q| {
        let ap = ((p.y - ym) as f64).atan2((p.x - xm) as f64);
        let aq = ((q.y - ym) as f64).atan2((q.x - xm) as f64);
        ap.total_cmp(&aq)
    });
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Graph;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn view_with(moves: &[(u32, i32, i32)], graph: Graph, w: i32, h: i32) -> RoundView {
        let mut view = RoundView::new(Arc::new(graph), w, h, 10_000);
        for &(v, x, y) in moves {
            view.apply(&GameMove::new(VertexId(v), Coord::new(x, y))).unwrap();
        }
        view
    }

    #[test]
    fn test_quality_sums_overlaps_of_all_anchored_edges() {
        // Path 0-1, 2-3 drawn as crossing diagonals; vertex 4 joins 0 and 2
        let g = Graph::new(5, &[(0, 1), (2, 3), (4, 0), (4, 2)]);
        let view = view_with(&[(0, 0, 0), (1, 4, 4), (2, 0, 4), (3, 4, 0)], g, 5, 5);
        assert_eq!(view.edges.len(), 2);

        // Both candidate edges (0,0)-(2,2) and (0,4)-(2,2) overlap both drawn boxes
        assert_eq!(compute_move_quality(&view, VertexId(4), Coord::new(2, 2)), 4);
    }

    #[test]
    fn test_quality_is_zero_without_placed_neighbours() {
        let g = Graph::new(4, &[(0, 1), (2, 3)]);
        let view = view_with(&[(0, 0, 0), (1, 3, 3)], g, 4, 4);
        assert_eq!(compute_move_quality(&view, VertexId(2), Coord::new(1, 1)), 0);
    }

    #[test]
    fn test_sampling_stays_in_rect_and_is_distinct() {
        let state = GameState::new(20, 20);
        let mut rng = StdRng::seed_from_u64(1);
        let rect = Rect::around(Coord::new(10, 10), 2, 2, 20, 20);
        let samples = sample_free_in_rect(&state, &mut rng, rect, 8, 4);
        assert!(!samples.is_empty());
        assert!(samples.len() <= 8);
        for (i, c) in samples.iter().enumerate() {
            assert!(rect.contains(*c));
            assert!(!samples[i + 1..].contains(c));
        }
    }

    #[test]
    fn test_sampling_full_region_returns_empty() {
        let g = Graph::new(4, &[]);
        let view = view_with(&[(0, 0, 0), (1, 1, 0), (2, 0, 1), (3, 1, 1)], g, 4, 4);
        let mut rng = StdRng::seed_from_u64(3);
        let rect = Rect::new(Coord::new(0, 0), Coord::new(1, 1));
        assert!(sample_free_in_rect(&view.state, &mut rng, rect, 5, 4).is_empty());
    }

    #[test]
    fn test_random_move_is_legal_on_nearly_full_canvas() {
        let g = Graph::new(5, &[]);
        let view = view_with(&[(0, 0, 0), (1, 1, 0), (2, 0, 1)], g, 2, 2);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mv = random_move(&view, &mut rng).unwrap();
            assert_eq!(mv.coord, Coord::new(1, 1));
            assert!(mv.vertex == VertexId(3) || mv.vertex == VertexId(4));
        }
    }

    #[test]
    fn test_random_move_none_when_all_placed() {
        let g = Graph::new(1, &[]);
        let view = view_with(&[(0, 0, 0)], g, 2, 2);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_move(&view, &mut rng).is_none());
    }

    #[test]
    fn test_choose_best_respects_role_and_ties() {
        let g = Graph::new(5, &[(0, 1), (2, 3), (4, 0)]);
        let view = view_with(&[(0, 0, 0), (1, 4, 4), (2, 0, 4), (3, 4, 0)], g, 6, 6);
        let clock = RaceClock::new(Duration::from_secs(5));
        let coords = [Coord::new(5, 5), Coord::new(5, 0), Coord::new(2, 2)];

        let max = choose_best(&view, Role::Max, &[VertexId(4)], &coords, &clock).unwrap();
        assert_eq!(max.coord, Coord::new(5, 5));
        assert_eq!(max.quality, 2);

        // Every candidate overlaps both drawn boxes, so the first one wins for both roles
        let min = choose_best(&view, Role::Min, &[VertexId(4)], &coords, &clock).unwrap();
        assert_eq!(min.coord, Coord::new(5, 5));
        assert_eq!(min.quality, compute_move_quality(&view, VertexId(4), min.coord));
    }

    #[test]
    fn test_farthest_corner() {
        assert_eq!(farthest_corner(10, 10, Coord::new(1, 1)), Coord::new(9, 9));
        assert_eq!(farthest_corner(10, 10, Coord::new(8, 1)), Coord::new(0, 9));
    }

    #[test]
    fn test_nearest_free_skips_used_cells() {
        let g = Graph::new(2, &[]);
        let view = view_with(&[(0, 2, 2)], g, 5, 5);
        let c = nearest_free(&view.state, Coord::new(2, 2)).unwrap();
        assert_eq!(c.distance(&Coord::new(2, 2)), 1);
    }

    #[test]
    fn test_outline_walk_moves_inward() {
        let mut state = GameState::new(3, 3);
        let g = Graph::new(8, &[]);
        let ring = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)];
        for (i, (x, y)) in ring.iter().enumerate() {
            assert_eq!(first_free_on_outline(&state), Some(Coord::new(*x, *y)));
            state
                .apply_move(&g, &GameMove::new(VertexId(i as u32), Coord::new(*x, *y)))
                .unwrap();
        }
        assert_eq!(first_free_on_outline(&state), Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_outline_ring_has_no_duplicates() {
        assert_eq!(outline_ring(4, 3, 0).len(), 10);
        assert_eq!(outline_ring(4, 3, 1), vec![Coord::new(1, 1), Coord::new(2, 1)]);
        assert_eq!(outline_ring(1, 1, 0), vec![Coord::new(0, 0)]);
        assert!(outline_ring(4, 3, 2).is_empty());
    }

    #[test]
    fn test_ranking_orders_by_degree() {
        let g = Graph::new(4, &[(0, 1), (1, 2), (1, 3), (2, 3)]);
        let ranking = VertexRanking::new(&g, 10, 10);
        let state = GameState::new(10, 10);
        assert_eq!(ranking.most_valuable_unplaced(&state), Some(VertexId(1)));
    }

    #[test]
    fn test_ellipse_ring_is_in_bounds_and_unique() {
        for (w, h) in [(10, 10), (7, 3), (1, 1), (20, 2)] {
            let ring = ellipse_ring(w, h);
            assert!(!ring.is_empty());
            let mut sorted = ring.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), ring.len());
            assert!(ring.iter().all(|c| c.x >= 0 && c.y >= 0 && c.x < w && c.y < h));
        }
    }

    #[test]
    fn test_ellipse_ring_on_tiny_canvases_is_the_centre() {
        for (w, h) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            assert_eq!(ellipse_ring(w, h), vec![Coord::new(w / 2, h / 2)], "{}x{}", w, h);
        }
        // One semi-axis zero: a line through the centre
        let ring = ellipse_ring(1, 5);
        assert_eq!(ring.len(), 5);
        assert!(ring.iter().all(|c| c.x == 0));
    }

    #[test]
    fn test_strategy_name_round_trips_through_str() {
        assert_eq!(
            StrategyName::parse("minimize_ellipse"),
            Some(StrategyName::MinimizeEllipse)
        );
        assert_eq!(StrategyName::parse("nope"), None);
    }

    #[test]
    fn test_strategy_index_matches_all() {
        for (i, name) in StrategyName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn test_race_clock_cancel() {
        let clock = RaceClock::new(Duration::from_secs(60));
        assert!(!clock.expired());
        clock.cancel();
        assert!(clock.expired());
    }
}
