use anyhow::Context;
use glam::DVec2;
use std::fs::read_to_string;
use std::path::Path;

/// result of a bounds-checked grid lookup
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Open,
    Wall,
    OutOfBounds,
}

impl Cell {
    pub fn is_open(self) -> bool {
        self == Cell::Open
    }
}

/// boolean occupancy grid, `x` indexes rows and `y` indexes columns
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
    spawn: Option<(usize, usize)>,
}

impl Grid {
    /// build a grid from rows of wall flags, all rows must have the same length
    pub fn from_rows(rows: Vec<Vec<bool>>) -> anyhow::Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            anyhow::bail!("grid has no cells");
        }

        let mut walls = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != cols {
                anyhow::bail!(
                    "row {idx} has {} cells, expected {cols} like the first row",
                    row.len()
                );
            }
            walls.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            walls,
            spawn: None,
        })
    }

    /// parse the text map format: `#` is a wall, `*` marks the spawn cell, anything else is floor
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let mut spawn = None;
        let rows: Vec<Vec<bool>> = input
            .trim()
            .lines()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, tile)| {
                        if tile == '*' && spawn.is_none() {
                            spawn = Some((row, col));
                        }
                        tile == '#'
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut grid = Self::from_rows(rows)?;
        grid.spawn = spawn;
        Ok(grid)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("loading map at {}", path.display());
        let file = read_to_string(path)
            .with_context(|| format!("could not read map at {}", path.display()))?;
        let grid =
            Self::parse(&file).with_context(|| format!("invalid map at {}", path.display()))?;
        log::info!("loaded {}x{} map", grid.rows, grid.cols);
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// the world origin is the corner of cell (0, 0)
    pub fn origin(&self) -> DVec2 {
        DVec2::ZERO
    }

    /// continuous extent of the grid along (x, y)
    pub fn bounds(&self) -> DVec2 {
        DVec2::new(self.rows as f64, self.cols as f64)
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= 0. && point.y >= 0. && point.x < self.rows as f64 && point.y < self.cols as f64
    }

    pub fn cell(&self, row: isize, col: isize) -> Cell {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return Cell::OutOfBounds;
        }

        if self.walls[row as usize * self.cols + col as usize] {
            Cell::Wall
        } else {
            Cell::Open
        }
    }

    /// look up the cell that contains a continuous point
    pub fn cell_at(&self, point: DVec2) -> Cell {
        if !self.contains(point) {
            return Cell::OutOfBounds;
        }
        self.cell(point.x.floor() as isize, point.y.floor() as isize)
    }

    pub fn is_wall(&self, row: usize, col: usize) -> bool {
        self.cell(row as isize, col as isize) == Cell::Wall
    }

    /// iterate over every cell as `(row, col, is_wall)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.walls
            .iter()
            .enumerate()
            .map(|(idx, wall)| (idx / self.cols, idx % self.cols, *wall))
    }

    /// centre of the spawn cell, falling back to the first open cell
    pub fn spawn_point(&self) -> Option<DVec2> {
        let (row, col) = self.spawn.or_else(|| {
            self.iter()
                .find(|(_, _, wall)| !wall)
                .map(|(row, col, _)| (row, col))
        })?;
        Some(DVec2::new(row as f64 + 0.5, col as f64 + 0.5))
    }
}
