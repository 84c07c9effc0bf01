//! Row-major 2D grids and masked grids

use crate::error::{Result, ViirsError};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Grid<T> {
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(ViirsError::BadLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn ensure_shape(&self, shape: (usize, usize)) -> Result<()> {
        if self.shape() != shape {
            return Err(ViirsError::ShapeMismatch {
                expected: shape,
                found: self.shape(),
            });
        }
        Ok(())
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn zip_map<U, V>(&self, other: &Grid<U>, f: impl Fn(&T, &U) -> V) -> Result<Grid<V>> {
        other.ensure_shape(self.shape())?;
        Ok(Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(a, b)| f(a, b)).collect(),
        })
    }

    /// Replicate each cell into a `factor` x `factor` block
    ///
    /// Same as a Kronecker product with a block of ones; used to lay 1 km
    /// quality flags over the 500 m grid.
    pub fn upsample(&self, factor: usize) -> Grid<T>
    where
        T: Clone,
    {
        let rows = self.rows * factor;
        let cols = self.cols * factor;
        let mut data = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            let src = &self.data[(row / factor) * self.cols..(row / factor + 1) * self.cols];
            for col in 0..cols {
                data.push(src[col / factor].clone());
            }
        }

        Grid { rows, cols, data }
    }
}

/// Percentile `q` (0..=100) of the finite values, with linear
/// interpolation between closest ranks
pub fn percentile(values: impl IntoIterator<Item = f64>, q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Summary statistics over the valid cells of a grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub valid: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Float grid with a per-cell validity mask
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    values: Grid<f64>,
    valid: Vec<bool>,
}

impl MaskedGrid {
    /// Every cell valid
    pub fn from_grid(values: Grid<f64>) -> Self {
        let valid = vec![true; values.len()];
        Self { values, valid }
    }

    pub fn values(&self) -> &Grid<f64> {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        row < self.values.rows()
            && col < self.values.cols()
            && self.valid[row * self.values.cols() + col]
    }

    /// Value at a cell, `None` when masked
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if self.is_valid(row, col) {
            self.values.get(row, col).copied()
        } else {
            None
        }
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    pub fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .data()
            .iter()
            .zip(&self.valid)
            .filter(|(_, ok)| **ok)
            .map(|(v, _)| *v)
    }

    /// Mask every cell whose flag fails `keep`
    ///
    /// Masks accumulate: a cell masked earlier stays masked.
    pub fn mask_where<T: Copy>(&mut self, flags: &Grid<T>, keep: impl Fn(T) -> bool) -> Result<()> {
        flags.ensure_shape(self.shape())?;
        for (ok, flag) in self.valid.iter_mut().zip(flags.data()) {
            if !keep(*flag) {
                *ok = false;
            }
        }
        Ok(())
    }

    /// Mask cells whose own value fails `keep`
    pub fn mask_values(&mut self, keep: impl Fn(f64) -> bool) {
        for (ok, value) in self.valid.iter_mut().zip(self.values.data()) {
            if !keep(*value) {
                *ok = false;
            }
        }
    }

    /// Cell-wise combination of same-shaped grids
    ///
    /// A cell is valid only if it is valid in every input.
    pub fn combine(inputs: &[&MaskedGrid], f: impl Fn(&[f64]) -> f64) -> Result<MaskedGrid> {
        let Some(first) = inputs.first() else {
            return Err(ViirsError::EmptyData);
        };
        let shape = first.shape();
        for input in inputs {
            input.values.ensure_shape(shape)?;
        }

        let len = first.values.len();
        let mut data = Vec::with_capacity(len);
        let mut valid = Vec::with_capacity(len);
        let mut cell = vec![0.0; inputs.len()];

        for i in 0..len {
            for (slot, input) in cell.iter_mut().zip(inputs) {
                *slot = input.values.data()[i];
            }
            data.push(f(&cell));
            valid.push(inputs.iter().all(|input| input.valid[i]));
        }

        Ok(MaskedGrid {
            values: Grid::new(shape.0, shape.1, data)?,
            valid,
        })
    }

    pub fn stats(&self) -> Stats {
        let mut valid = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in self.valid_values().filter(|v| v.is_finite()) {
            valid += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        Stats {
            count: self.values.len(),
            valid,
            min: (valid > 0).then_some(min),
            max: (valid > 0).then_some(max),
            mean: (valid > 0).then(|| sum / valid as f64),
        }
    }
}
