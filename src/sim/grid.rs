//! The simulation grid: population, satisfaction test, and relocation step

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::{Result, SimError};
use crate::core::types::{CellState, GridLocation};
use crate::sim::SimConfig;

/// Random draws allowed per grid cell before the vacancy search gives up.
const VACANCY_DRAWS_PER_CELL: usize = 100;

/// The grid of agents in the Schelling simulation.
///
/// Owns the cell states, the seeded random source, and the most recently
/// computed satisfaction percentage. All randomness flows through the owned
/// [`ChaCha8Rng`] in a fixed draw order (vacancy before color, row before
/// column), so two runs with the same config and operation sequence produce
/// identical grids at every round.
#[derive(Debug, Clone)]
pub struct SimGrid {
    /// Cell states in row-major order.
    cells: Vec<CellState>,
    rows: usize,
    cols: usize,
    threshold: f64,
    vacancy_odds: u32,
    rng: ChaCha8Rng,
    satisfied_percent: f64,
}

impl SimGrid {
    /// Creates a grid from `config` and fills it with a random population.
    pub fn new(config: &SimConfig) -> Result<Self> {
        let mut grid = Self::empty(config)?;
        grid.populate();
        Ok(grid)
    }

    /// Creates a grid with explicit cell contents instead of a random fill.
    ///
    /// `cells` is row-major and must have exactly rows×cols entries. The
    /// config's seed still drives later relocation draws.
    pub fn from_cells(config: &SimConfig, cells: Vec<CellState>) -> Result<Self> {
        let mut grid = Self::empty(config)?;
        if cells.len() != grid.total_cells() {
            return Err(SimError::CellCountMismatch {
                expected: grid.total_cells(),
                actual: cells.len(),
            });
        }
        grid.cells = cells;
        let unsatisfied = grid.find_unsatisfied().len();
        grid.update_satisfaction(unsatisfied);
        Ok(grid)
    }

    fn empty(config: &SimConfig) -> Result<Self> {
        if config.rows == 0 || config.cols == 0 {
            return Err(SimError::InvalidDimensions {
                rows: config.rows,
                cols: config.cols,
            });
        }
        Ok(Self {
            cells: vec![CellState::Vacant; config.rows * config.cols],
            rows: config.rows,
            cols: config.cols,
            threshold: config.satisfaction_threshold,
            vacancy_odds: config.vacancy_odds.max(1),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            satisfied_percent: 0.0,
        })
    }

    /// Fills the grid with a random set of agents and vacant cells.
    ///
    /// Each cell gets an independent 1-in-`vacancy_odds` draw for vacancy;
    /// occupied cells then get a 50/50 draw for color. The second draw only
    /// happens for occupied cells, and cells fill in row-major order, so
    /// seeded replays depend on this exact sequence.
    fn populate(&mut self) {
        let odds = self.vacancy_odds;
        for cell in self.cells.iter_mut() {
            *cell = if self.rng.gen_range(0..odds) == odds - 1 {
                CellState::Vacant
            } else if self.rng.gen_range(0..2) == 0 {
                CellState::Red
            } else {
                CellState::Blue
            };
        }
        let unsatisfied = self.find_unsatisfied().len();
        self.update_satisfaction(unsatisfied);
    }

    /// Discards the current population and refills the grid with fresh
    /// random draws. The random stream continues; it is not reseeded.
    pub fn reset(&mut self) {
        self.populate();
    }

    /// Whether the agent at `loc` is satisfied with its current position.
    ///
    /// Counts the occupied Moore neighbors sharing the agent's color;
    /// satisfied when that fraction strictly exceeds the threshold. An agent
    /// with no occupied neighbors is never satisfied, whatever its color.
    /// Only meaningful for occupied, in-bounds locations.
    pub fn is_satisfied(&self, loc: GridLocation) -> bool {
        let own = self.cells[self.index(loc)];
        let neighbors = self.occupied_neighbors(loc);
        if neighbors.is_empty() {
            return false;
        }
        let same = neighbors
            .iter()
            .filter(|n| self.cells[self.index(**n)] == own)
            .count();
        same as f64 / neighbors.len() as f64 > self.threshold
    }

    /// The valid, occupied cells among the up-to-8 Moore neighbors of `loc`.
    /// Off-grid positions are clipped, not wrapped.
    pub fn occupied_neighbors(&self, loc: GridLocation) -> Vec<GridLocation> {
        let mut neighbors = Vec::with_capacity(8);
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let row = loc.row as i64 + dr;
                let col = loc.col as i64 + dc;
                if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
                    continue;
                }
                let neighbor = GridLocation::new(row as usize, col as usize);
                if !self.cells[self.index(neighbor)].is_vacant() {
                    neighbors.push(neighbor);
                }
            }
        }
        neighbors
    }

    /// Locations of all currently unsatisfied agents, in row-major order
    /// (top to bottom, left to right). Never includes vacant cells.
    pub fn find_unsatisfied(&self) -> Vec<GridLocation> {
        self.locations()
            .filter(|loc| !self.cells[self.index(*loc)].is_vacant() && !self.is_satisfied(*loc))
            .collect()
    }

    /// Draws random locations (row first, then column) until a vacant cell
    /// turns up. Bounded so a fully occupied grid fails instead of spinning.
    pub fn find_vacant_location(&mut self) -> Result<GridLocation> {
        let attempts = self.total_cells() * VACANCY_DRAWS_PER_CELL;
        for _ in 0..attempts {
            let row = self.rng.gen_range(0..self.rows);
            let col = self.rng.gen_range(0..self.cols);
            let loc = GridLocation::new(row, col);
            if self.cells[self.index(loc)].is_vacant() {
                return Ok(loc);
            }
        }
        Err(SimError::NoVacantLocation { attempts })
    }

    /// Performs one simulation round: snapshots the unsatisfied agents, then
    /// moves each one to a randomly drawn vacant cell.
    ///
    /// Moves are sequential against live grid state, so a cell vacated early
    /// in the round can be chosen as a target later in the same round. The
    /// satisfaction percentage is then recomputed from the snapshot size,
    /// treating every move as having fixed exactly one unsatisfied agent;
    /// this matches the classic model's bookkeeping rather than a rescan
    /// (see [`Self::exact_satisfied_percent`] for the rescan).
    ///
    /// Returns the number of agents that were unsatisfied before the round.
    /// Calling this on a fully settled grid finds zero agents and moves
    /// nothing.
    pub fn step(&mut self) -> Result<usize> {
        let unsatisfied = self.find_unsatisfied();
        for loc in &unsatisfied {
            let source = self.index(*loc);
            let color = self.cells[source];
            let target = self.find_vacant_location()?;
            let target = self.index(target);
            self.cells[target] = color;
            self.cells[source] = CellState::Vacant;
        }
        self.update_satisfaction(unsatisfied.len());

        tracing::debug!(
            moved = unsatisfied.len(),
            satisfied_percent = self.satisfied_percent,
            "simulation step"
        );

        Ok(unsatisfied.len())
    }

    /// Recomputes the stored percentage from an unsatisfied-agent count:
    /// 100 × (occupied − unsatisfied) / total.
    fn update_satisfaction(&mut self, unsatisfied: usize) {
        let occupied = self.occupied_cells();
        self.satisfied_percent =
            (occupied - unsatisfied) as f64 / self.total_cells() as f64 * 100.0;
    }

    /// The most recently computed satisfaction percentage, in [0, 100].
    /// Pure accessor; the value is refreshed by every mutating operation.
    pub fn satisfied_percent(&self) -> f64 {
        self.satisfied_percent
    }

    /// Share of occupied cells currently satisfied, from a full rescan.
    ///
    /// Unlike [`Self::satisfied_percent`] this never uses the per-round
    /// approximation, and it divides by the occupied count rather than the
    /// total cell count. A grid with zero occupied cells reads 100.0.
    pub fn exact_satisfied_percent(&self) -> f64 {
        let occupied: Vec<GridLocation> = self
            .locations()
            .filter(|loc| !self.cells[self.index(*loc)].is_vacant())
            .collect();
        if occupied.is_empty() {
            return 100.0;
        }
        let satisfied = occupied.iter().filter(|loc| self.is_satisfied(**loc)).count();
        satisfied as f64 / occupied.len() as f64 * 100.0
    }

    /// State of the cell at `loc`, or `None` when out of bounds.
    pub fn cell(&self, loc: GridLocation) -> Option<CellState> {
        if loc.row < self.rows && loc.col < self.cols {
            Some(self.cells[self.index(loc)])
        } else {
            None
        }
    }

    /// All cell states in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// All grid locations in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = GridLocation> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| GridLocation::new(row, col)))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn total_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of cells currently holding an agent.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_vacant()).count()
    }

    fn index(&self, loc: GridLocation) -> usize {
        loc.row * self.cols + loc.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rows: usize, cols: usize) -> SimConfig {
        SimConfig {
            rows,
            cols,
            seed: 42,
            ..SimConfig::default()
        }
    }

    fn full_grid(rows: usize, cols: usize, state: CellState) -> SimGrid {
        SimGrid::from_cells(&config(rows, cols), vec![state; rows * cols]).unwrap()
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            SimGrid::new(&config(0, 5)),
            Err(SimError::InvalidDimensions { rows: 0, cols: 5 })
        ));
        assert!(matches!(
            SimGrid::new(&config(5, 0)),
            Err(SimError::InvalidDimensions { rows: 5, cols: 0 })
        ));
    }

    #[test]
    fn test_from_cells_rejects_wrong_length() {
        let result = SimGrid::from_cells(&config(3, 3), vec![CellState::Red; 8]);
        assert!(matches!(
            result,
            Err(SimError::CellCountMismatch { expected: 9, actual: 8 })
        ));
    }

    #[test]
    fn test_neighbor_counts_on_full_grid() {
        let grid = full_grid(3, 3, CellState::Red);
        // Corner, edge, and center of a fully occupied 3x3.
        assert_eq!(grid.occupied_neighbors(GridLocation::new(0, 0)).len(), 3);
        assert_eq!(grid.occupied_neighbors(GridLocation::new(0, 1)).len(), 5);
        assert_eq!(grid.occupied_neighbors(GridLocation::new(1, 1)).len(), 8);
    }

    #[test]
    fn test_neighbors_exclude_vacant_cells() {
        let mut cells = vec![CellState::Red; 9];
        cells[4] = CellState::Vacant; // center of the 3x3
        let grid = SimGrid::from_cells(&config(3, 3), cells).unwrap();

        assert_eq!(grid.occupied_neighbors(GridLocation::new(0, 0)).len(), 2);
        assert_eq!(grid.occupied_neighbors(GridLocation::new(0, 1)).len(), 4);
    }

    #[test]
    fn test_zero_neighbor_agent_is_unsatisfied() {
        let mut cells = vec![CellState::Vacant; 9];
        cells[0] = CellState::Red;
        let grid = SimGrid::from_cells(&config(3, 3), cells).unwrap();

        assert!(!grid.is_satisfied(GridLocation::new(0, 0)));
        assert_eq!(grid.find_unsatisfied(), vec![GridLocation::new(0, 0)]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Middle agent has one same-color and one other-color neighbor:
        // a fraction of exactly 0.5 against a 0.5 threshold.
        let cells = vec![CellState::Red, CellState::Red, CellState::Blue];
        let cfg = SimConfig {
            satisfaction_threshold: 0.5,
            ..config(1, 3)
        };
        let grid = SimGrid::from_cells(&cfg, cells).unwrap();

        assert!(grid.is_satisfied(GridLocation::new(0, 0))); // 1/1 > 0.5
        assert!(!grid.is_satisfied(GridLocation::new(0, 1))); // 1/2 == 0.5
        assert!(!grid.is_satisfied(GridLocation::new(0, 2))); // 0/2
    }

    #[test]
    fn test_fraction_above_threshold_is_satisfied() {
        // 2 of 4 occupied neighbors share the agent's color: 0.5 > 0.3.
        let cells = vec![
            CellState::Red,
            CellState::Blue,
            CellState::Vacant,
            CellState::Red,
            CellState::Red,
            CellState::Blue,
            CellState::Vacant,
            CellState::Vacant,
            CellState::Vacant,
        ];
        let grid = SimGrid::from_cells(&config(3, 3), cells).unwrap();
        assert!(grid.is_satisfied(GridLocation::new(1, 1)));
    }

    #[test]
    fn test_find_unsatisfied_never_reports_vacant() {
        let grid = SimGrid::new(&config(12, 12)).unwrap();
        for loc in grid.find_unsatisfied() {
            assert!(!grid.cell(loc).unwrap().is_vacant());
        }
    }

    #[test]
    fn test_find_unsatisfied_is_row_major() {
        let grid = SimGrid::new(&config(12, 12)).unwrap();
        let unsatisfied = grid.find_unsatisfied();
        let indices: Vec<usize> = unsatisfied
            .iter()
            .map(|loc| loc.row * grid.cols() + loc.col)
            .collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_vacant_search_fails_on_full_grid() {
        let mut grid = full_grid(2, 2, CellState::Red);
        assert!(matches!(
            grid.find_vacant_location(),
            Err(SimError::NoVacantLocation { .. })
        ));
    }

    #[test]
    fn test_vacant_search_finds_the_only_hole() {
        let mut cells = vec![CellState::Blue; 16];
        cells[7] = CellState::Vacant;
        let mut grid = SimGrid::from_cells(&config(4, 4), cells).unwrap();
        assert_eq!(grid.find_vacant_location().unwrap(), GridLocation::new(1, 3));
    }

    #[test]
    fn test_step_on_settled_grid_moves_nothing() {
        let mut grid = full_grid(3, 3, CellState::Red);
        let before = grid.cells().to_vec();
        assert_eq!(grid.step().unwrap(), 0);
        assert_eq!(grid.cells(), before.as_slice());
    }

    #[test]
    fn test_step_preserves_agent_count() {
        let mut grid = SimGrid::new(&config(20, 20)).unwrap();
        let occupied = grid.occupied_cells();
        for _ in 0..5 {
            grid.step().unwrap();
            assert_eq!(grid.occupied_cells(), occupied);
        }
    }

    #[test]
    fn test_out_of_bounds_cell_is_none() {
        let grid = full_grid(3, 3, CellState::Blue);
        assert_eq!(grid.cell(GridLocation::new(3, 0)), None);
        assert_eq!(grid.cell(GridLocation::new(0, 3)), None);
        assert_eq!(grid.cell(GridLocation::new(1, 1)), Some(CellState::Blue));
    }
}
