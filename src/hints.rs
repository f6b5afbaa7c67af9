use crate::grid::GridState;

/// Run-length hint for one line of cells: the length of every run of
/// consecutive `true` cells, in order. A line with no runs yields `[0]`.
pub fn compute_hints(line: impl IntoIterator<Item = bool>) -> Vec<usize> {
    let mut hints = Vec::new();
    let mut count = 0usize;

    for cell in line {
        if cell {
            count += 1;
        } else if count > 0 {
            hints.push(count);
            count = 0;
        }
    }

    if count > 0 {
        hints.push(count);
    }
    if hints.is_empty() {
        hints.push(0);
    }
    hints
}

/// Hints for every row and column of the active region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridHints {
    pub columns: Vec<Vec<usize>>,
    pub rows: Vec<Vec<usize>>,
}

impl GridHints {
    pub fn compute(grid: &GridState) -> Self {
        let n = grid.active_size().side();
        Self {
            columns: (0..n).map(|col| compute_hints(grid.column(col))).collect(),
            rows: (0..n).map(|row| compute_hints(grid.row(row))).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GridHints, compute_hints};
    use crate::grid::{GridSize, GridState};

    #[test]
    fn hints_count_runs() {
        assert_eq!(compute_hints([true, true, false, true]), vec![2, 1]);
        assert_eq!(compute_hints([true, true, true]), vec![3]);
        assert_eq!(compute_hints([false, true, false, false, true, true]), vec![1, 2]);
    }

    #[test]
    fn empty_or_blank_line_yields_zero() {
        assert_eq!(compute_hints([false, false, false]), vec![0]);
        assert_eq!(compute_hints(Vec::<bool>::new()), vec![0]);
    }

    #[test]
    fn hints_are_position_sensitive() {
        let line = [true, false, true, true, true];
        let reversed: Vec<bool> = line.iter().rev().copied().collect();
        assert_eq!(compute_hints(line), vec![1, 3]);
        assert_eq!(compute_hints(reversed), vec![3, 1]);
        assert_eq!(compute_hints(line), compute_hints(line));
    }

    #[test]
    fn grid_hints_cover_only_active_region() {
        let mut grid = GridState::new(GridSize::Three);
        grid.toggle(0, 0).unwrap();
        grid.toggle(1, 0).unwrap();
        grid.toggle(2, 2).unwrap();
        grid.set(5, 0, true);

        let hints = GridHints::compute(&grid);
        assert_eq!(hints.rows, vec![vec![2], vec![0], vec![1]]);
        assert_eq!(hints.columns, vec![vec![1], vec![1], vec![1]]);
    }
}
