//! Single grid of styled cells.

use termgrid_types::Cell;

use crate::error::DrawError;

/// rows x cols grid of cells, stored row-major in one flat allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A grid with every cell blank.
    pub fn new(rows: u16, cols: u16) -> Self {
        let len = (rows as usize) * (cols as usize);
        Self {
            rows,
            cols,
            cells: vec![Cell::blank(); len],
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn shape(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y`, or `None` past the last row.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.rows {
            return None;
        }
        let start = (y as usize) * (self.cols as usize);
        Some(&self.cells[start..start + self.cols as usize])
    }

    /// Reshape the grid and blank every cell.
    ///
    /// The allocation is reused when it is large enough. Returns false when
    /// the shape is unchanged, in which case the content is left alone.
    pub fn resize(&mut self, rows: u16, cols: u16) -> bool {
        if self.rows == rows && self.cols == cols {
            return false;
        }
        self.rows = rows;
        self.cols = cols;
        let len = (rows as usize) * (cols as usize);
        self.cells.clear();
        self.cells.resize(len, Cell::blank());
        true
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some((y as usize) * (self.cols as usize) + (x as usize))
    }

    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        self.idx(x, y).is_some()
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.idx(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> Result<(), DrawError> {
        match self.idx(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                Ok(())
            }
            None => Err(DrawError::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            }),
        }
    }

    /// Reset every cell to the blank cell.
    pub fn clear(&mut self) {
        self.fill(&Cell::blank());
    }

    pub fn fill(&mut self, cell: &Cell) {
        for c in self.cells.iter_mut() {
            c.clone_from(cell);
        }
    }

    /// Fill the part of the rectangle that lies inside the grid.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, cell: &Cell) {
        let x_end = x.saturating_add(w).min(self.cols);
        let y_end = y.saturating_add(h).min(self.rows);
        for cy in y..y_end {
            for cx in x..x_end {
                if let Some(i) = self.idx(cx, cy) {
                    self.cells[i].clone_from(cell);
                }
            }
        }
    }
}
