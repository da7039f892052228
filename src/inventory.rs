//! Seat occupancy for the three pricing tiers.
//!
//! Every tier is stored the same way: an owned vector of booleans (`false` free, `true` sold) addressed by a linear
//! index, with a [`Shape`] mapping between linear indices and `(section, row, seat)` coordinates. General admission
//! is simply a flat shape with one section of one row. Seats are only ever marked sold, never freed.

pub mod runs;

use crate::config::TierCapacities;
use crate::Error;

use serde::{Deserialize, Serialize};
use std::fmt::Formatter;

/// A pricing tier of the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    General,
    Regular,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::General, Tier::Regular, Tier::Premium];

    /// Position of this tier in [`Tier::ALL`], for per-tier arrays.
    pub const fn index(self) -> usize {
        match self {
            Tier::General => 0,
            Tier::Regular => 1,
            Tier::Premium => 2,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Tier::General => "general admission",
            Tier::Regular => "regular seating",
            Tier::Premium => "premium seating",
        })
    }
}

/// Dimensions of a seating table: sections × rows × seats per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub sections: usize,
    pub rows: usize,
    pub seats: usize,
}

impl Shape {
    /// A single row of `seats` seats, as used for general admission.
    pub const fn flat(seats: usize) -> Self {
        Self {
            sections: 1,
            rows: 1,
            seats,
        }
    }

    /// Total number of seats.
    pub const fn len(&self) -> usize {
        self.sections * self.rows * self.seats
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major linear index of `coord`.
    pub const fn index(&self, coord: SeatCoord) -> usize {
        (coord.section * self.rows + coord.row) * self.seats + coord.seat
    }

    /// Inverse of [`Shape::index()`].
    pub const fn coord(&self, index: usize) -> SeatCoord {
        SeatCoord {
            section: index / (self.rows * self.seats),
            row: (index / self.seats) % self.rows,
            seat: index % self.seats,
        }
    }
}

/// Location of one seat within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCoord {
    pub section: usize,
    pub row: usize,
    pub seat: usize,
}

/// Occupancy of a single tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyTable {
    tier: Tier,
    shape: Shape,
    cells: Vec<bool>,
    sold: usize,
}

impl OccupancyTable {
    /// An entirely unsold table.
    pub fn new(tier: Tier, shape: Shape) -> Self {
        Self {
            tier,
            shape,
            cells: vec![false; shape.len()],
            sold: 0,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// All cells in row-major order, `true` meaning sold.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_sold(&self, index: usize) -> bool {
        self.cells[index]
    }

    /// The seats of one row.
    ///
    /// # Panics
    ///
    /// Panics if `section` or `row` lies outside the table's shape.
    pub fn row(&self, section: usize, row: usize) -> &[bool] {
        assert!(section < self.shape.sections && row < self.shape.rows, "row outside table");
        let start = self.shape.index(SeatCoord { section, row, seat: 0 });
        &self.cells[start..start + self.shape.seats]
    }

    pub fn count_sold(&self) -> usize {
        self.sold
    }

    pub fn count_free(&self) -> usize {
        self.cells.len() - self.sold
    }

    /// Fraction of the table that has been sold. An empty table counts as sold out.
    pub fn sellthrough(&self) -> f64 {
        if self.cells.is_empty() {
            1.0
        } else {
            self.sold as f64 / self.cells.len() as f64
        }
    }

    /// Linear indices of the first `n` free seats in row-major order, ignoring adjacency. `None` if fewer than `n`
    /// seats are free.
    pub fn first_n_free(&self, n: usize) -> Option<Vec<usize>> {
        if self.count_free() < n {
            return None;
        }

        Some(
            self.cells
                .iter()
                .enumerate()
                .filter(|(_, &sold)| !sold)
                .map(|(index, _)| index)
                .take(n)
                .collect(),
        )
    }

    /// Mark every listed seat sold. Either all seats are committed or, on error, none are.
    ///
    /// # Errors
    ///
    /// [`Error::SeatOutOfRange`] if an index lies outside the table, [`Error::SeatAlreadySold`] if a seat is already
    /// sold or listed twice.
    pub fn commit_cells(&mut self, indices: &[usize]) -> crate::Result {
        for (position, &index) in indices.iter().enumerate() {
            match self.cells.get(index) {
                None => return Err(Error::SeatOutOfRange { tier: self.tier, index }),
                Some(true) => return Err(Error::SeatAlreadySold { tier: self.tier, index }),
                Some(false) if indices[..position].contains(&index) => {
                    return Err(Error::SeatAlreadySold { tier: self.tier, index })
                },
                Some(false) => {},
            }
        }

        for &index in indices {
            self.cells[index] = true;
        }
        self.sold += indices.len();
        Ok(())
    }

    /// Mark `n` adjacent seats sold, starting at `start` and running along its row.
    ///
    /// # Errors
    ///
    /// [`Error::SeatOutOfRange`] if the run does not fit within the row, [`Error::SeatAlreadySold`] if any of its
    /// seats is already sold. Nothing is committed on error.
    pub fn commit_run(&mut self, start: SeatCoord, n: usize) -> crate::Result {
        let first = self.shape.index(start);
        if start.section >= self.shape.sections || start.row >= self.shape.rows || start.seat + n > self.shape.seats {
            return Err(Error::SeatOutOfRange {
                tier: self.tier,
                index: first + n.saturating_sub(1),
            });
        }

        let indices: Vec<usize> = (first..first + n).collect();
        self.commit_cells(&indices)
    }
}

/// The venue's complete seat inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TieredInventory {
    pub general: OccupancyTable,
    pub regular: OccupancyTable,
    pub premium: OccupancyTable,
}

impl TieredInventory {
    /// An unsold venue with the given tier sizes.
    pub fn new(capacities: &TierCapacities) -> Self {
        Self {
            general: OccupancyTable::new(Tier::General, Shape::flat(capacities.general)),
            regular: OccupancyTable::new(Tier::Regular, capacities.regular),
            premium: OccupancyTable::new(Tier::Premium, capacities.premium),
        }
    }

    pub fn table(&self, tier: Tier) -> &OccupancyTable {
        match tier {
            Tier::General => &self.general,
            Tier::Regular => &self.regular,
            Tier::Premium => &self.premium,
        }
    }

    /// Exclusive access to one tier. Callers must hold the purchase slot while mutating.
    pub fn table_mut(&mut self, tier: Tier) -> &mut OccupancyTable {
        match tier {
            Tier::General => &mut self.general,
            Tier::Regular => &mut self.regular,
            Tier::Premium => &mut self.premium,
        }
    }

    pub fn count_free(&self, tier: Tier) -> usize {
        self.table(tier).count_free()
    }

    pub fn count_sold(&self, tier: Tier) -> usize {
        self.table(tier).count_sold()
    }

    pub fn sellthrough(&self, tier: Tier) -> f64 {
        self.table(tier).sellthrough()
    }

    pub fn first_n_free(&self, tier: Tier, n: usize) -> Option<Vec<usize>> {
        self.table(tier).first_n_free(n)
    }

    pub fn find_contiguous_run(&self, tier: Tier, n: usize) -> Option<SeatCoord> {
        runs::find_contiguous_run(self.table(tier), n)
    }

    pub fn commit_cells(&mut self, tier: Tier, indices: &[usize]) -> crate::Result {
        self.table_mut(tier).commit_cells(indices)
    }

    pub fn commit_run(&mut self, tier: Tier, start: SeatCoord, n: usize) -> crate::Result {
        self.table_mut(tier).commit_run(start, n)
    }
}
