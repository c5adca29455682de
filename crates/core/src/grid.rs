use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Grid line coordinates must start at 0, found {0}")]
    MissingOrigin(u32),
    #[error("Grid line coordinates must be strictly increasing: {prev} then {next}")]
    NotIncreasing { prev: u32, next: u32 },
}

/// Pixel coordinates of the detected grid lines.
///
/// Both axes begin with the sentinel `0`, so a scan that finds nothing
/// still yields a valid (but empty) set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLineSet {
    xs: Vec<u32>,
    ys: Vec<u32>,
}

impl GridLineSet {
    pub fn new(xs: Vec<u32>, ys: Vec<u32>) -> Result<Self, GridError> {
        validate_axis(&xs)?;
        validate_axis(&ys)?;
        Ok(Self { xs, ys })
    }

    /// Build from scanned line positions, prefixing the `0` sentinel.
    /// Positions that would break strict ordering are dropped.
    pub fn from_scan<X, Y>(xs: X, ys: Y) -> Self
    where
        X: IntoIterator<Item = u32>,
        Y: IntoIterator<Item = u32>,
    {
        Self { xs: with_origin(xs), ys: with_origin(ys) }
    }

    /// Vertical line positions (x coordinates), sentinel included.
    pub fn xs(&self) -> &[u32] {
        &self.xs
    }

    /// Horizontal line positions (y coordinates), sentinel included.
    pub fn ys(&self) -> &[u32] {
        &self.ys
    }

    /// True when either axis has no line beyond the sentinel.
    pub fn is_empty(&self) -> bool {
        self.xs.len() < 2 || self.ys.len() < 2
    }
}

fn with_origin(positions: impl IntoIterator<Item = u32>) -> Vec<u32> {
    let mut coords = vec![0];
    for p in positions {
        if coords.last().is_some_and(|&last| p > last) {
            coords.push(p);
        }
    }
    coords
}

fn validate_axis(coords: &[u32]) -> Result<(), GridError> {
    match coords.first() {
        None | Some(0) => {}
        Some(&first) => return Err(GridError::MissingOrigin(first)),
    }
    for pair in coords.windows(2) {
        if pair[1] <= pair[0] {
            return Err(GridError::NotIncreasing { prev: pair[0], next: pair[1] });
        }
    }
    Ok(())
}

/// A rectangular cell, anchored at its top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Cell {
    /// Adjacent grid lines leave no pixels between them.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Rows of cells, top to bottom, each row left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    rows: Vec<Vec<Cell>>,
}

impl CellGrid {
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Turn grid lines into cells. Each cell sits strictly inside the lines
/// that bound it: one pixel right of its left line, one pixel below its top
/// line, ending one pixel before the next line.
pub fn segment(lines: &GridLineSet) -> CellGrid {
    if lines.is_empty() {
        return CellGrid::default();
    }

    let rows = lines
        .ys
        .windows(2)
        .map(|ys| {
            let height = ys[1].saturating_sub(ys[0]).saturating_sub(1);
            lines
                .xs
                .windows(2)
                .map(|xs| Cell {
                    x: xs[0] + 1,
                    y: ys[0] + 1,
                    width: xs[1].saturating_sub(xs[0]).saturating_sub(1),
                    height,
                })
                .collect()
        })
        .collect();

    CellGrid { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(xs: &[u32], ys: &[u32]) -> GridLineSet {
        GridLineSet::new(xs.to_vec(), ys.to_vec()).unwrap()
    }

    #[test]
    fn rejects_coordinates_without_origin() {
        assert_eq!(
            GridLineSet::new(vec![5, 10], vec![0]),
            Err(GridError::MissingOrigin(5))
        );
    }

    #[test]
    fn rejects_unordered_coordinates() {
        assert_eq!(
            GridLineSet::new(vec![0], vec![0, 10, 10]),
            Err(GridError::NotIncreasing { prev: 10, next: 10 })
        );
    }

    #[test]
    fn from_scan_prefixes_origin_and_drops_disorder() {
        let set = GridLineSet::from_scan([4, 9, 9, 3, 20], Vec::new());
        assert_eq!(set.xs(), &[0, 4, 9, 20]);
        assert_eq!(set.ys(), &[0]);
        assert!(set.is_empty());
    }

    #[test]
    fn sentinel_only_is_empty() {
        assert!(lines(&[0], &[0]).is_empty());
        assert!(lines(&[0, 10], &[0]).is_empty());
        assert!(!lines(&[0, 10], &[0, 10]).is_empty());
    }

    #[test]
    fn dimensions_follow_line_counts() {
        let set = lines(&[0, 10, 25, 40], &[0, 8, 20]);
        let grid = segment(&set);
        assert_eq!(grid.row_count(), set.ys().len() - 1);
        assert_eq!(grid.column_count(), set.xs().len() - 1);
        assert!(grid.rows().iter().all(|row| row.len() == 3));
    }

    #[test]
    fn every_cell_matches_line_geometry() {
        let set = lines(&[0, 10, 25, 40], &[0, 8, 20]);
        let grid = segment(&set);
        for (i, row) in grid.rows().iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                let (xs, ys) = (set.xs(), set.ys());
                assert_eq!(cell.x, xs[j] + 1);
                assert_eq!(cell.y, ys[i] + 1);
                assert_eq!(cell.width, xs[j + 1] - xs[j] - 1);
                assert_eq!(cell.height, ys[i + 1] - ys[i] - 1);
            }
        }
    }

    #[test]
    fn adjacent_lines_produce_degenerate_cells() {
        let grid = segment(&lines(&[0, 10, 11, 30], &[0, 12]));
        let row = &grid.rows()[0];
        assert!(!row[0].is_degenerate());
        assert!(row[1].is_degenerate());
        assert_eq!(row[2], Cell { x: 12, y: 1, width: 18, height: 11 });
    }

    #[test]
    fn too_few_lines_yield_empty_grid() {
        assert!(segment(&lines(&[0], &[0, 10, 20])).is_empty());
        assert!(segment(&lines(&[0, 10, 20], &[0])).is_empty());
        assert_eq!(segment(&lines(&[0], &[0])).column_count(), 0);
    }
}
