//! Placement heuristics raced by the scheduler
//!
//! Each heuristic only decides *where* to look. Scoring always goes through
//! `Candidate::evaluate` so results from different heuristics stay comparable.

use crate::config::StrategyConfig;
use crate::spatial_index::density_tiling;
use crate::strategy::{
    canvas_center, farthest_corner, first_free_on_outline, first_unplaced, nearest_free,
    outline_ring, outline_ring_count, pick_incident_unplaced, random_move, random_unplaced,
    Candidate, Progress, Strategy, StrategyContext, StrategyName, VertexRanking,
};
use crate::types::{Coord, GameMove, Role, VertexId};

/// Builds the strategies raced for `role` this round, in declaration order.
/// Order matters: on equal quality the earlier strategy wins.
pub fn roster(
    role: Role,
    tuning: &StrategyConfig,
    width: i32,
    height: i32,
    ranking: &VertexRanking,
) -> Vec<Box<dyn Strategy>> {
    let cells = (width.max(0) as u64) * (height.max(0) as u64);
    let bruteforce = BruteforceCrossing {
        canvas_cells: cells,
        max_cells: tuning.bruteforce_max_cells,
        min_percent_placed: tuning.bruteforce_min_percent_placed,
    };

    let all: Vec<Box<dyn Strategy>> = match role {
        Role::Max => vec![
            Box::new(MaximizeOppositeCorner),
            Box::new(MaximizeDenseRegion),
            Box::new(MaximizeHighDegreeAngle {
                early_game_moves: tuning.early_game_moves,
            }),
            Box::new(MaximizeLongestDiagonal),
            Box::new(MaximizeGrid),
            Box::new(bruteforce),
            Box::new(RandomMove),
        ],
        Role::Min => vec![
            Box::new(MinimizeNextToOpponent),
            Box::new(MinimizeBorderWalk {
                early_game_moves: tuning.early_game_moves,
            }),
            Box::new(MinimizeEllipse {
                ring_len: ranking.ellipse().len(),
            }),
            Box::new(bruteforce),
            Box::new(RandomMove),
        ],
    };

    all.into_iter()
        .filter(|s| {
            let disabled = tuning.is_disabled(s.name().as_str());
            if disabled {
                log::debug!("Strategy {} disabled by config", s.name());
            }
            !disabled
        })
        .collect()
}

/// The vertex to place after `last`: one of its unplaced neighbours, else the first unplaced
fn follow_up_vertex(ctx: &StrategyContext<'_>, last: &GameMove) -> Option<VertexId> {
    pick_incident_unplaced(ctx.view, last.vertex).or_else(|| first_unplaced(ctx.view))
}

fn center_opening(ctx: &StrategyContext<'_>) -> Option<Candidate> {
    let vertex = first_unplaced(ctx.view)?;
    let coord = nearest_free(&ctx.view.state, canvas_center(ctx.view))?;
    Some(Candidate::evaluate(ctx.view, vertex, coord))
}

fn corner_opening(ctx: &StrategyContext<'_>, vertex: Option<VertexId>) -> Option<Candidate> {
    let vertex = vertex?;
    let coord = nearest_free(&ctx.view.state, Coord::new(0, 0))?;
    Some(Candidate::evaluate(ctx.view, vertex, coord))
}

/// Random unplaced vertex on a random free cell
pub struct RandomMove;

impl Strategy for RandomMove {
    fn name(&self) -> StrategyName {
        StrategyName::RandomMove
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        let mv = random_move(ctx.view, &mut ctx.rng)?;
        Some(Candidate::evaluate(ctx.view, mv.vertex, mv.coord))
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, _last: GameMove) -> Option<Candidate> {
        let mv = random_move(ctx.view, &mut ctx.rng)?;
        Some(Candidate::evaluate(ctx.view, mv.vertex, mv.coord))
    }
}

/// Stretch a neighbour of the last move towards the farthest canvas corner
pub struct MaximizeOppositeCorner;

impl Strategy for MaximizeOppositeCorner {
    fn name(&self) -> StrategyName {
        StrategyName::MaximizeOppositeCorner
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, last: GameMove) -> Option<Candidate> {
        let vertex = match pick_incident_unplaced(ctx.view, last.vertex) {
            Some(v) => v,
            None => random_unplaced(ctx.view, &mut ctx.rng)?,
        };
        let corner = farthest_corner(ctx.width(), ctx.height(), last.coord);
        let divisor = ctx.tuning.opposite_corner_divisor.max(1);
        let extra = ctx.samples.perimeter as i32;
        let (hw, hh) = (ctx.width() / divisor + extra, ctx.height() / divisor + extra);
        let count = ctx.sample_count();
        let samples = ctx.sample_around(corner, hw, hh, count);
        ctx.choose_best(&[vertex], &samples)
    }
}

/// Aim into the tile with the most drawn edges, or the most placed vertices when no edge exists
pub struct MaximizeDenseRegion;

impl Strategy for MaximizeDenseRegion {
    fn name(&self) -> StrategyName {
        StrategyName::MaximizeDenseRegion
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        center_opening(ctx)
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, last: GameMove) -> Option<Candidate> {
        let vertex = follow_up_vertex(ctx, &last)?;
        let tiling = density_tiling(
            ctx.view.state.placed_count(),
            ctx.index_tuning.vertices_per_tiling_step,
            ctx.index_tuning.max_density_tiling,
            ctx.width(),
            ctx.height(),
        );
        let count = ctx.tuning.dense_region_samples.max(1);

        if let Some(region) = ctx.view.edges.highest_density_region(tiling) {
            let samples = ctx.sample_in(region, count);
            return ctx.choose_best(&[vertex], &samples);
        }

        let region = ctx.view.points.highest_density_region(tiling)?;
        let samples = ctx.sample_in(region, count);
        let coord = samples.first().copied()?;
        Some(Candidate::evaluate(ctx.view, vertex, coord))
    }
}

/// Early game: the most connected unplaced vertex goes near the corner farthest from the last move
pub struct MaximizeHighDegreeAngle {
    early_game_moves: usize,
}

impl Strategy for MaximizeHighDegreeAngle {
    fn name(&self) -> StrategyName {
        StrategyName::MaximizeHighDegreeAngle
    }

    fn is_eligible(&self, progress: &Progress) -> bool {
        progress.moves_made() < self.early_game_moves
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        corner_opening(ctx, ctx.ranking.most_valuable_unplaced(&ctx.view.state))
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, last: GameMove) -> Option<Candidate> {
        let vertex = ctx.ranking.most_valuable_unplaced(&ctx.view.state)?;
        let corner = farthest_corner(ctx.width(), ctx.height(), last.coord);
        let divisor = ctx.tuning.high_degree_corner_divisor.max(1);
        let extra = ctx.samples.perimeter as i32;
        let (hw, hh) = (ctx.width() / divisor + extra, ctx.height() / divisor + extra);
        let count = ctx.sample_count();
        let samples = ctx.sample_around(corner, hw, hh, count);
        ctx.choose_best(&[vertex], &samples)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Diagonal,
    Horizontal,
    Vertical,
}

fn longest_line(width: i32, height: i32) -> LineKind {
    let (short, long) = (width.min(height) as i64, width.max(height) as i64);
    if 2 * short * short > long * long {
        LineKind::Diagonal
    } else if width > height {
        LineKind::Horizontal
    } else {
        LineKind::Vertical
    }
}

/// Draw the longest straight line through the canvas from (0,0), then fill the cells along it
/// from both ends inwards with the most connected vertices
pub struct MaximizeLongestDiagonal;

impl MaximizeLongestDiagonal {
    fn far_end(width: i32, height: i32) -> Coord {
        match longest_line(width, height) {
            LineKind::Diagonal => Coord::new(width - 1, height - 1),
            LineKind::Horizontal => Coord::new(width - 1, 0),
            LineKind::Vertical => Coord::new(0, height - 1),
        }
    }

    fn next_free_on_line(ctx: &StrategyContext<'_>) -> Option<Coord> {
        let (w, h) = (ctx.width(), ctx.height());
        let kind = longest_line(w, h);
        let length = match kind {
            LineKind::Diagonal => w.min(h),
            _ => w.max(h),
        };
        for i in 1..=(length / 2) {
            let (start, end) = match kind {
                LineKind::Diagonal => (Coord::new(i, i), Coord::new(w - i, h - i)),
                LineKind::Horizontal => (Coord::new(i, 0), Coord::new(w - i, 0)),
                LineKind::Vertical => (Coord::new(0, i), Coord::new(0, h - i)),
            };
            if let Some(c) = [start, end].into_iter().find(|c| ctx.view.state.is_free(*c)) {
                return Some(c);
            }
        }
        None
    }
}

impl Strategy for MaximizeLongestDiagonal {
    fn name(&self) -> StrategyName {
        StrategyName::MaximizeLongestDiagonal
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        corner_opening(ctx, first_unplaced(ctx.view))
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, _last: GameMove) -> Option<Candidate> {
        let state = &ctx.view.state;
        if state.placed_count() < 3 {
            // Close the line from whatever sits at the origin
            let origin = Coord::new(0, 0);
            let anchor = ctx
                .view
                .graph
                .vertices()
                .iter()
                .copied()
                .find(|v| state.coordinate_of(*v) == Some(origin))?;
            let vertex = pick_incident_unplaced(ctx.view, anchor)?;
            let end = Self::far_end(ctx.width(), ctx.height());
            let coord = [end, Coord::new((end.x - 1).max(0), (end.y - 1).max(0))]
                .into_iter()
                .find(|c| state.is_free(*c))?;
            return Some(Candidate::evaluate(ctx.view, vertex, coord));
        }

        let vertex = ctx.ranking.most_valuable_unplaced(state)?;
        let coord = Self::next_free_on_line(ctx)?;
        Some(Candidate::evaluate(ctx.view, vertex, coord))
    }
}

/// Span the canvas with long parallel edges: a vertex on the border gets its neighbour placed
/// straight across on the opposite border
pub struct MaximizeGrid;

impl MaximizeGrid {
    fn on_border(c: Coord, width: i32, height: i32) -> bool {
        c.x == 0 || c.y == 0 || c.x == width - 1 || c.y == height - 1
    }

    /// First free cell on the line through `from` that lies in the far half, scanning inwards
    /// from the opposite border
    fn opposite_cell(ctx: &StrategyContext<'_>, from: Coord) -> Option<Coord> {
        let (w, h) = (ctx.width(), ctx.height());
        let state = &ctx.view.state;
        let across: Vec<Coord> = if from.x == 0 {
            ((w / 2 + 1)..w).rev().map(|x| Coord::new(x, from.y)).collect()
        } else if from.x == w - 1 {
            (0..w / 2).map(|x| Coord::new(x, from.y)).collect()
        } else if from.y == 0 {
            ((h / 2 + 1)..h).rev().map(|y| Coord::new(from.x, y)).collect()
        } else {
            (0..h / 2).map(|y| Coord::new(from.x, y)).collect()
        };
        across.into_iter().find(|c| state.is_free(*c))
    }
}

impl Strategy for MaximizeGrid {
    fn name(&self) -> StrategyName {
        StrategyName::MaximizeGrid
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        corner_opening(ctx, first_unplaced(ctx.view))
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, _last: GameMove) -> Option<Candidate> {
        let state = &ctx.view.state;
        let (w, h) = (ctx.width(), ctx.height());

        for &placed in ctx.view.graph.vertices() {
            if ctx.clock.expired() {
                return None;
            }
            let Some(at) = state.coordinate_of(placed) else {
                continue;
            };
            if !Self::on_border(at, w, h) {
                continue;
            }
            let Some(neighbour) = pick_incident_unplaced(ctx.view, placed) else {
                continue;
            };
            if let Some(coord) = Self::opposite_cell(ctx, at) {
                return Some(Candidate::evaluate(ctx.view, neighbour, coord));
            }
        }

        // No border vertex to answer: start a new line from the outermost ring with room
        let vertex = ctx
            .view
            .graph
            .vertices()
            .iter()
            .copied()
            .find(|v| !state.is_placed(*v) && pick_incident_unplaced(ctx.view, *v).is_some())
            .or_else(|| first_unplaced(ctx.view))?;
        let cells = (0..outline_ring_count(w, h))
            .map(|r| {
                outline_ring(w, h, r)
                    .into_iter()
                    .filter(|c| state.is_free(*c))
                    .collect::<Vec<_>>()
            })
            .find(|cells| !cells.is_empty())?;
        ctx.choose_best(&[vertex], &cells)
    }
}

/// Keep new edges short: place a neighbour of the opponent's vertex right next to it
pub struct MinimizeNextToOpponent;

impl Strategy for MinimizeNextToOpponent {
    fn name(&self) -> StrategyName {
        StrategyName::MinimizeNextToOpponent
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, last: Option<GameMove>) -> Option<Candidate> {
        let vertex = first_unplaced(ctx.view)?;
        let target = match last {
            Some(mv) => farthest_corner(ctx.width(), ctx.height(), mv.coord),
            None => Coord::new(0, 0),
        };
        let coord = nearest_free(&ctx.view.state, target)?;
        Some(Candidate::evaluate(ctx.view, vertex, coord))
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, last: GameMove) -> Option<Candidate> {
        if let Some(vertex) = pick_incident_unplaced(ctx.view, last.vertex) {
            let radius = ctx.samples.perimeter as i32;
            let count = ctx.sample_count();
            let samples = ctx.sample_around(last.coord, radius, radius, count);
            if let Some(best) = ctx.choose_best(&[vertex], &samples) {
                return Some(best);
            }
            let coord = first_free_on_outline(&ctx.view.state)?;
            return Some(Candidate::evaluate(ctx.view, vertex, coord));
        }

        let vertex = first_unplaced(ctx.view)?;
        let coord = first_free_on_outline(&ctx.view.state)?;
        Some(Candidate::evaluate(ctx.view, vertex, coord))
    }
}

/// Early game: grow chains along the outermost ring that still has room
pub struct MinimizeBorderWalk {
    early_game_moves: usize,
}

impl MinimizeBorderWalk {
    /// Free ring cell closest to `from` along the ring, alternating both directions
    fn next_along(ring: &[Coord], from: usize, ctx: &StrategyContext<'_>) -> Option<Coord> {
        let len = ring.len();
        (1..len).find_map(|step| {
            [ring[(from + step) % len], ring[(from + len - step) % len]]
                .into_iter()
                .find(|c| ctx.view.state.is_free(*c))
        })
    }
}

impl Strategy for MinimizeBorderWalk {
    fn name(&self) -> StrategyName {
        StrategyName::MinimizeBorderWalk
    }

    fn is_eligible(&self, progress: &Progress) -> bool {
        progress.moves_made() < self.early_game_moves
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, _last: GameMove) -> Option<Candidate> {
        let state = &ctx.view.state;
        let (w, h) = (ctx.width(), ctx.height());
        let ring = (0..outline_ring_count(w, h))
            .map(|r| outline_ring(w, h, r))
            .find(|cells| cells.iter().any(|c| state.is_free(*c)))?;

        let mut best: Option<Candidate> = None;
        for &placed in ctx.view.graph.vertices() {
            let Some(at) = state.coordinate_of(placed) else {
                continue;
            };
            let Some(pos) = ring.iter().position(|c| *c == at) else {
                continue;
            };
            let Some(neighbour) = pick_incident_unplaced(ctx.view, placed) else {
                continue;
            };
            let Some(coord) = Self::next_along(&ring, pos, ctx) else {
                continue;
            };
            let candidate = Candidate::evaluate(ctx.view, neighbour, coord);
            if best.map_or(true, |b| candidate.quality < b.quality) {
                best = Some(candidate);
            }
            if candidate.quality == 0 || ctx.clock.expired() {
                break;
            }
        }
        if best.is_some() {
            return best;
        }

        // Nobody on the ring yet: start a chain with a vertex that still has free neighbours
        let vertex = ctx.view.graph.vertices().iter().copied().find(|v| {
            !state.is_placed(*v) && pick_incident_unplaced(ctx.view, *v).is_some()
        })?;
        let coord = ring.iter().copied().find(|c| state.is_free(*c))?;
        Some(Candidate::evaluate(ctx.view, vertex, coord))
    }
}

/// The most connected vertices go onto a centred ellipse, which keeps their edges apart
pub struct MinimizeEllipse {
    ring_len: usize,
}

impl MinimizeEllipse {
    fn place(ctx: &StrategyContext<'_>) -> Option<Candidate> {
        let vertex = ctx.ranking.most_valuable_unplaced(&ctx.view.state)?;
        let coord = ctx.ranking.next_free_ellipse_cell(&ctx.view.state)?;
        Some(Candidate::evaluate(ctx.view, vertex, coord))
    }
}

impl Strategy for MinimizeEllipse {
    fn name(&self) -> StrategyName {
        StrategyName::MinimizeEllipse
    }

    fn is_eligible(&self, progress: &Progress) -> bool {
        progress.moves_made() < self.ring_len
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        Self::place(ctx)
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, _last: GameMove) -> Option<Candidate> {
        Self::place(ctx)
    }
}

/// Small canvas, late game: try every free cell for one vertex
#[derive(Clone, Copy)]
pub struct BruteforceCrossing {
    canvas_cells: u64,
    max_cells: u64,
    min_percent_placed: f64,
}

impl Strategy for BruteforceCrossing {
    fn name(&self) -> StrategyName {
        StrategyName::BruteforceCrossing
    }

    fn is_eligible(&self, progress: &Progress) -> bool {
        self.canvas_cells < self.max_cells && progress.percent_placed > self.min_percent_placed
    }

    fn opening(&self, ctx: &mut StrategyContext<'_>, _last: Option<GameMove>) -> Option<Candidate> {
        center_opening(ctx)
    }

    fn execute(&self, ctx: &mut StrategyContext<'_>, last: GameMove) -> Option<Candidate> {
        let vertex = follow_up_vertex(ctx, &last)?;
        let state = &ctx.view.state;
        let free: Vec<Coord> = (0..ctx.width())
            .flat_map(|x| (0..ctx.height()).map(move |y| Coord::new(x, y)))
            .filter(|c| state.is_free(*c))
            .collect();
        ctx.choose_best(&[vertex], &free)
    }
}
