//! Occupancy grid and zone bands over the buildable envelope.
//!
//! The envelope is rasterized into fixed-size cells (row = y, col = x).
//! Only whole cells that fit inside the envelope are created, so anything
//! placed on the grid is contained in the envelope by construction.

use serde::{Deserialize, Serialize};

use crate::constants::cells_within;
use crate::error::SolveError;
use crate::plot::Envelope;

/// Largest grid a single floor may allocate.
pub const MAX_GRID_CELLS: usize = 4_000_000;

/// Row-major boolean occupancy grid.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    pub cell: f32,
    pub rows: usize,
    pub cols: usize,
    occupied: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(envelope: &Envelope, cell: f32) -> Result<Self, SolveError> {
        let rows = cells_within(envelope.length, cell);
        let cols = cells_within(envelope.width, cell);
        let size = rows
            .checked_mul(cols)
            .filter(|n| *n <= MAX_GRID_CELLS)
            .ok_or(SolveError::GridTooLarge {
                rows,
                cols,
                max: MAX_GRID_CELLS,
            })?;
        Ok(Self {
            cell,
            rows,
            cols,
            occupied: vec![false; size],
        })
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, SolveError> {
        if row >= self.rows || col >= self.cols {
            return Err(SolveError::GridOutOfRange { row, col });
        }
        Ok(row * self.cols + col)
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> Result<bool, SolveError> {
        Ok(self.occupied[self.index(row, col)?])
    }

    /// True if the `w × h` block at (row, col) lies inside the grid and
    /// every cell in it is free.
    pub fn can_fit(&self, row: usize, col: usize, w: usize, h: usize) -> bool {
        if w == 0 || h == 0 || row + h > self.rows || col + w > self.cols {
            return false;
        }
        (row..row + h).all(|r| {
            let start = r * self.cols + col;
            self.occupied[start..start + w].iter().all(|c| !c)
        })
    }

    /// Mark the `w × h` block at (row, col) as occupied.
    pub fn mark(&mut self, row: usize, col: usize, w: usize, h: usize) -> Result<(), SolveError> {
        for r in row..row + h {
            for c in col..col + w {
                let i = self.index(r, c)?;
                self.occupied[i] = true;
            }
        }
        Ok(())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|c| **c).count()
    }
}

/// Depth band of the envelope, measured from the road edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    Front,
    Central,
    Rear,
}

/// A y-range over the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub band: Band,
    pub y_start: f32,
    pub y_end: f32,
}

/// Front (0–30%), central (30–60%) and rear (60–100%) bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    pub front: Zone,
    pub central: Zone,
    pub rear: Zone,
}

impl Zones {
    pub fn partition(envelope: &Envelope) -> Self {
        let len = envelope.length;
        Self {
            front: Zone {
                band: Band::Front,
                y_start: 0.0,
                y_end: len * 0.3,
            },
            central: Zone {
                band: Band::Central,
                y_start: len * 0.3,
                y_end: len * 0.6,
            },
            rear: Zone {
                band: Band::Rear,
                y_start: len * 0.6,
                y_end: len,
            },
        }
    }

    pub fn get(&self, band: Band) -> Zone {
        match band {
            Band::Front => self.front,
            Band::Central => self.central,
            Band::Rear => self.rear,
        }
    }

    /// Candidate y-range for a room biased towards `band`.
    ///
    /// Rear rooms may start anywhere in the rear band, central rooms in the
    /// central band, and front rooms in the front band.
    pub fn search_range(&self, band: Band, total_length: f32) -> (f32, f32) {
        match band {
            Band::Rear => (self.rear.y_start, total_length),
            Band::Central => (self.central.y_start, self.rear.y_start),
            Band::Front => (0.0, self.central.y_start),
        }
    }
}
