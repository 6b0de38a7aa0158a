//! Contour tracing: extract closed boundary walks from a binary map.
//!
//! The map is raster-scanned in row-major order. A trace seeds at a
//! foreground cell whose left neighbor is an in-bounds background cell
//! (the boundary entry condition of the scan). Each seed launches two
//! passes over its connected component:
//!
//! 1. A Moore-neighbor boundary walk collecting the closed contour.
//! 2. A 4-connected flood fill erasing the entire component (interior
//!    included) from the map, so the outer scan never re-enters it and
//!    interior holes are consumed rather than reported.
//!
//! A component that hugs column 0 along its whole leftmost extent never
//! satisfies the seed condition and is skipped; in particular, an
//! all-foreground map produces no contours at all.

use std::collections::VecDeque;

use crate::binarize::BinaryMap;
use crate::types::{Contour, Point};

/// The 8-connected neighbor ring in fixed clockwise order:
/// N, NE, E, SE, S, SW, W, NW.
const NEIGHBOR_RING: [(i64, i64); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Offsets of the 4-connected neighborhood used by the flood fill.
const FLOOD_NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Enumerate every traceable foreground component as a closed boundary
/// walk, consuming each discovered component from the map.
///
/// Contours are returned in discovery order (raster-scan order of the
/// first encountered boundary cell) with the seed cell as the first
/// point. The closing point is not duplicated.
#[must_use = "returns the traced contours"]
pub fn trace_contours(map: &mut BinaryMap) -> Vec<Contour> {
    let mut contours = Vec::new();

    for y in 0..i64::from(map.height()) {
        for x in 1..i64::from(map.width()) {
            if map.is_foreground(x, y) && !map.is_foreground(x - 1, y) {
                let contour = trace_boundary(map, (x, y));
                flood_fill(map, (x, y));
                contours.push(contour);
            }
        }
    }

    contours
}

/// Follow the component boundary from `start` using Moore-neighbor
/// tracing.
///
/// At each step the 8-neighbor ring of the current cell is scanned
/// clockwise starting just past the cell the walk came from; the first
/// foreground neighbor becomes the next boundary cell. The walk ends
/// when it returns to `start` (closed loop) or when no foreground
/// neighbor exists (isolated cell), keeping whatever points were
/// collected.
fn trace_boundary(map: &BinaryMap, start: (i64, i64)) -> Contour {
    let mut points = vec![cell_point(start)];
    let mut current = start;
    // The seed condition guarantees the cell left of the start is
    // in-bounds background, making it the initial came-from neighbor.
    let mut came_from = (start.0 - 1, start.1);

    // The stop conditions cover every well-formed walk; the step bound
    // only guards pathological self-crossing patterns.
    let max_steps = map.len().saturating_mul(2);
    let mut steps = 0;

    loop {
        let from_idx = NEIGHBOR_RING
            .iter()
            .position(|&(dx, dy)| (current.0 + dx, current.1 + dy) == came_from)
            .unwrap_or(0);

        let mut next = None;
        for offset in 1..=NEIGHBOR_RING.len() {
            let (dx, dy) = NEIGHBOR_RING[(from_idx + offset) % NEIGHBOR_RING.len()];
            let candidate = (current.0 + dx, current.1 + dy);
            if map.is_foreground(candidate.0, candidate.1) {
                next = Some(candidate);
                break;
            }
        }

        let Some(next) = next else {
            // Isolated cell: no boundary to follow.
            break;
        };
        if next == start {
            break;
        }

        points.push(cell_point(next));
        came_from = current;
        current = next;

        steps += 1;
        if steps >= max_steps {
            break;
        }
    }

    Contour::new(points)
}

/// Erase the 4-connected component containing `start` from the map.
///
/// Breadth-first over the 4-neighborhood, bounded by the map extents.
/// Clearing the whole interior (not just the boundary) is what keeps the
/// raster scan from seeding the same component twice.
fn flood_fill(map: &mut BinaryMap, start: (i64, i64)) {
    if !map.is_foreground(start.0, start.1) {
        return;
    }

    let mut queue = VecDeque::from([start]);
    clear_cell(map, start);

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in FLOOD_NEIGHBORS {
            let neighbor = (x + dx, y + dy);
            if map.is_foreground(neighbor.0, neighbor.1) {
                clear_cell(map, neighbor);
                queue.push_back(neighbor);
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn cell_point((x, y): (i64, i64)) -> Point {
    Point::new(x as f64, y as f64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clear_cell(map: &mut BinaryMap, (x, y): (i64, i64)) {
    map.clear(x as u32, y as u32);
}
