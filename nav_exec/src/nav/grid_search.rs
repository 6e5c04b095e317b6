//! # Grid search
//!
//! Finds the first step of an obstacle-free route to the target using an A* search over a local
//! grid.
//!
//! The grid is rebuilt on every call: cell (0, 0) is centred on the vehicle, and cells are
//! `resolution_m` apart along the field axes. Movement is 4-connected (no diagonals) with every
//! step costing `resolution_m`. A cell is blocked if its centre lies within an obstacle's radius
//! plus half the influence margin.
//!
//! The heuristic is the straight line distance to the goal cell. On a 4-connected grid the true
//! remaining cost is the Manhattan distance, so the heuristic underestimates it for off-axis goals.
//! This is an approximation which keeps the search biased towards the straight line to the target,
//! which is what a steering function wants. Don't swap it for the Manhattan distance, it changes
//! which cells are expanded first.
//!
//! Only the first step of the route is used. The navigator re-plans every cycle, so following the
//! rest of the route would only follow a plan built from stale obstacle data.
//!
//! The search pops at most `max_iters` cells from the open set, which bounds the time taken in one
//! control cycle. If the budget runs out after the goal cell has been discovered but before it is
//! popped, the route to it is still followed. Only if the goal was never discovered does the caller
//! get the potential field direction instead.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::trace;
use nalgebra::Vector2;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::geom::{is_negligible, normalise_or_zero, Obstacle};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Cell offsets of the neighbours of a cell, in the order they are expanded.
static NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A grid search over the cells around the vehicle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridSearch {
    /// Size of a cell.
    resolution_m: f64,

    /// Maximum number of cells popped from the open set.
    max_iters: usize,

    /// Clearance added to each obstacle's radius when deciding if a cell is blocked.
    block_margin_m: f64,
}

/// Integer coordinates of a cell, relative to the cell the vehicle is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridCell {
    pub i: i32,
    pub j: i32,
}

/// The outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchReport {
    /// The cell the target is in.
    pub goal_cell: GridCell,

    /// True if the goal cell was popped from the open set within the budget.
    pub goal_reached: bool,

    /// Number of cells popped from the open set.
    pub num_iters: usize,

    /// The first cell along the route, adjacent to the start cell.
    ///
    /// `None` if the goal was never discovered, or if the goal is the start cell. The route may not
    /// be the shortest one if the budget ran out before the goal was popped.
    pub first_step: Option<GridCell>,
}

/// Score and parent of a cell which has been reached by the search.
#[derive(Debug, Clone, Copy)]
struct CellRecord {
    /// Cost of the best known route from the start
    g_m: f64,

    /// The cell this one was reached from, `None` for the start
    parent: Option<GridCell>,
}

/// An entry in the open set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    cell: GridCell,

    /// Cost from the start when this entry was pushed
    g_m: OrderedFloat<f64>,

    /// g + heuristic
    f_m: OrderedFloat<f64>,

    /// Push order, breaks ties between equal f
    seq: usize,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GridSearch {
    /// Create a new search.
    ///
    /// `influence_m` is the obstacle influence margin, half of it is used as the clearance around
    /// obstacles.
    pub fn new(resolution_m: f64, max_iters: usize, influence_m: f64) -> Self {
        Self {
            resolution_m,
            max_iters,
            block_margin_m: 0.5 * influence_m,
        }
    }

    /// Get the preferred unit direction of travel from `start_m` towards `goal_m`.
    ///
    /// The first step of the route is blended with `repulsion` and renormalised. If the goal can't
    /// be reached the normalised attraction towards the goal is blended with the repulsion instead,
    /// so a usable direction is always returned. The zero vector is returned only if the blend
    /// cancels out, or if the start and goal coincide.
    pub fn compute_direction(
        &self,
        start_m: &Vector2<f64>,
        goal_m: &Vector2<f64>,
        obstacles: &[Obstacle],
        repulsion: &Vector2<f64>,
    ) -> (Vector2<f64>, SearchReport) {
        let report = self.search(start_m, goal_m, obstacles);

        let direction = match report.first_step {
            Some(step) => {
                let step_dir = normalise_or_zero(&self.cell_offset_m(step));
                normalise_or_zero(&(step_dir + repulsion))
            }
            None => {
                let delta = goal_m - start_m;
                if is_negligible(&delta) {
                    Vector2::zeros()
                } else {
                    trace!(
                        "Grid search found no step after {} iterations, using attraction",
                        report.num_iters
                    );
                    normalise_or_zero(&(normalise_or_zero(&delta) + repulsion))
                }
            }
        };

        (direction, report)
    }

    /// Run the A* search from the cell containing `start_m` to the cell containing `goal_m`.
    pub fn search(
        &self,
        start_m: &Vector2<f64>,
        goal_m: &Vector2<f64>,
        obstacles: &[Obstacle],
    ) -> SearchReport {
        let start = GridCell::new(0, 0);
        let goal = self.goal_cell(start_m, goal_m);

        let mut open = BinaryHeap::new();
        let mut records: HashMap<GridCell, CellRecord> = HashMap::new();
        let mut seq = 0;

        records.insert(
            start,
            CellRecord {
                g_m: 0.0,
                parent: None,
            },
        );
        open.push(OpenNode::new(start, 0.0, self.heuristic(start, goal), seq));
        seq += 1;

        let mut num_iters = 0;
        let mut goal_reached = false;

        while num_iters < self.max_iters {
            let node = match open.pop() {
                Some(n) => n,
                None => break,
            };
            num_iters += 1;

            if node.cell == goal {
                goal_reached = true;
                break;
            }

            // Skip entries superseded by a cheaper route found after they were pushed
            let g_m = match records.get(&node.cell) {
                Some(r) if r.g_m < node.g_m.into_inner() => continue,
                Some(r) => r.g_m,
                None => continue,
            };

            for neighbour in node.cell.neighbours() {
                if self.is_blocked(neighbour, start_m, obstacles) {
                    continue;
                }

                let tentative_g_m = g_m + self.resolution_m;
                let improved = match records.get(&neighbour) {
                    Some(r) => tentative_g_m < r.g_m,
                    None => true,
                };

                if improved {
                    records.insert(
                        neighbour,
                        CellRecord {
                            g_m: tentative_g_m,
                            parent: Some(node.cell),
                        },
                    );
                    open.push(OpenNode::new(
                        neighbour,
                        tentative_g_m,
                        tentative_g_m + self.heuristic(neighbour, goal),
                        seq,
                    ));
                    seq += 1;
                }
            }
        }

        // The goal only has a parent once it has been discovered
        let first_step = first_step(&records, start, goal);

        trace!(
            "Grid search to {:?}: reached = {}, iters = {}, first step = {:?}",
            goal,
            goal_reached,
            num_iters,
            first_step
        );

        SearchReport {
            goal_cell: goal,
            goal_reached,
            num_iters,
            first_step,
        }
    }

    /// The cell containing `goal_m`, for a grid anchored at `start_m`.
    ///
    /// Halfway cases round up (towards +inf) on both axes.
    pub fn goal_cell(&self, start_m: &Vector2<f64>, goal_m: &Vector2<f64>) -> GridCell {
        let delta = (goal_m - start_m) / self.resolution_m;

        GridCell::new(round_half_up(delta.x), round_half_up(delta.y))
    }

    /// Field frame position of the centre of a cell, for a grid anchored at `start_m`.
    pub fn cell_centre_m(&self, cell: GridCell, start_m: &Vector2<f64>) -> Vector2<f64> {
        start_m + self.cell_offset_m(cell)
    }

    /// True if the centre of the cell is too close to any obstacle.
    pub fn is_blocked(
        &self,
        cell: GridCell,
        start_m: &Vector2<f64>,
        obstacles: &[Obstacle],
    ) -> bool {
        let centre_m = self.cell_centre_m(cell, start_m);

        obstacles.iter().any(|obs| {
            (centre_m - obs.centre_m()).norm() < obs.radius_m() + self.block_margin_m
        })
    }

    /// Offset of a cell from the start cell
    fn cell_offset_m(&self, cell: GridCell) -> Vector2<f64> {
        Vector2::new(cell.i as f64, cell.j as f64) * self.resolution_m
    }

    /// Straight line distance between two cells
    fn heuristic(&self, a: GridCell, b: GridCell) -> f64 {
        let di = a.i as f64 - b.i as f64;
        let dj = a.j as f64 - b.j as f64;

        di.hypot(dj) * self.resolution_m
    }
}

impl GridCell {
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// The 4-connected neighbours of this cell.
    pub fn neighbours(&self) -> impl Iterator<Item = GridCell> {
        let cell = *self;
        NEIGHBOURS
            .iter()
            .map(move |(di, dj)| GridCell::new(cell.i + di, cell.j + dj))
    }
}

impl OpenNode {
    fn new(cell: GridCell, g_m: f64, f_m: f64, seq: usize) -> Self {
        Self {
            cell,
            g_m: OrderedFloat(g_m),
            f_m: OrderedFloat(f_m),
            seq,
        }
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipped so that the heap pops the lowest f first, and the earliest pushed among equals
        other
            .f_m
            .cmp(&self.f_m)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Walk back from the goal to find the cell after the start along the route.
fn first_step(
    records: &HashMap<GridCell, CellRecord>,
    start: GridCell,
    goal: GridCell,
) -> Option<GridCell> {
    if goal == start {
        return None;
    }

    // Parents always have a strictly lower g, so this terminates
    let mut step = goal;
    while let Some(parent) = records.get(&step).and_then(|r| r.parent) {
        if parent == start {
            return Some(step);
        }
        step = parent;
    }

    None
}

fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
