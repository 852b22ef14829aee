//! Dense row-major grids shared by the height field and terrain layers.

use serde::Serialize;

/// A `width * height` buffer addressed as `y * width + x`.
///
/// The buffer length is checked once when the grid is built; after that every
/// `(x, y)` inside the declared dimensions is a valid cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self { width, height, cells: vec![value; width * height] }
    }
}

impl<T> Grid<T> {
    pub fn from_fn(width: usize, height: usize, mut cell: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(cell(x, y));
            }
        }
        Self { width, height, cells }
    }

    /// Wraps an existing buffer, rejecting one whose length disagrees with the dimensions.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if self.in_bounds(x, y) { self.cells.get(self.index(x, y)) } else { None }
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub(crate) fn at(&self, x: usize, y: usize) -> &T {
        &self.cells[self.index(x, y)]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, value: T) {
        let index = self.index(x, y);
        self.cells[index] = value;
    }
}
