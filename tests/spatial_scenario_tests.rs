// Spatial index scenarios played through a round view
//
// Verifies that drawn edges land in the edge index as soon as both endpoints are placed
// and that overlap counts follow the bounding boxes of those edges.

use std::sync::Arc;

use rtree_player::game_state::RoundView;
use rtree_player::spatial_index::Geometry;
use rtree_player::types::{Coord, GameMove, Graph, VertexId};

fn place(view: &mut RoundView, v: u32, x: i32, y: i32) {
    view.apply(&GameMove::new(VertexId(v), Coord::new(x, y)))
        .expect("move should be legal");
}

#[test]
fn test_four_cycle_on_small_canvas() {
    // A-B, B-C, C-D, D-A
    let graph = Arc::new(Graph::cycle(4));
    let mut view = RoundView::new(graph, 4, 4, 10_000);

    // Maximizer opens in the corner, minimizer answers
    place(&mut view, 0, 0, 0);
    place(&mut view, 1, 0, 3);
    assert_eq!(view.edges.len(), 1);

    place(&mut view, 2, 3, 3);
    place(&mut view, 3, 3, 0);
    assert_eq!(view.edges.len(), 4);
    assert_eq!(view.state.placed_count(), 4);

    // Horizontal query through the middle crosses the boxes of A-B and C-D only
    let query = Geometry::Segment(Coord::new(0, 1), Coord::new(3, 1));
    assert_eq!(view.edges.count_overlaps(&query), 2);

    // Shorter query only reaches A-B
    let query = Geometry::Segment(Coord::new(0, 1), Coord::new(2, 1));
    assert_eq!(view.edges.count_overlaps(&query), 1);
}

#[test]
fn test_overlap_counts_never_shrink_during_a_round() {
    let graph = Arc::new(Graph::cycle(6));
    let mut view = RoundView::new(graph, 6, 6, 10_000);
    let query = Geometry::Segment(Coord::new(0, 0), Coord::new(5, 5));

    let cells = [(0, 0), (5, 5), (0, 5), (5, 0), (2, 3), (3, 2)];
    let mut previous = 0;
    for (v, (x, y)) in cells.iter().enumerate() {
        place(&mut view, v as u32, *x, *y);
        let count = view.edges.count_overlaps(&query);
        assert!(count >= previous, "overlap count dropped after placing vertex {}", v);
        previous = count;
    }
    assert_eq!(previous, 6);
}

#[test]
fn test_densest_region_follows_placed_vertices() {
    let graph = Arc::new(Graph::cycle(5));
    let mut view = RoundView::new(graph, 8, 8, 10_000);
    place(&mut view, 0, 6, 6);
    place(&mut view, 1, 7, 7);
    place(&mut view, 2, 6, 7);
    place(&mut view, 3, 0, 0);

    let region = view
        .points
        .highest_density_region(2)
        .expect("points were placed");
    assert!(region.contains(Coord::new(6, 6)));
    assert!(!region.contains(Coord::new(0, 0)));
}
