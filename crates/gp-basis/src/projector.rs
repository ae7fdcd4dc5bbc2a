//! Filtering and projection of PDF blocks between flavor and evolution basis.

use nalgebra::DMatrix;

use gp_core::{Error, Grid, Result};

use crate::selection::FlavorSelection;
use crate::table::BasisTable;

/// Applies basis filters to blocks. Input blocks are never modified.
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    table: &'a BasisTable,
}

impl<'a> Projector<'a> {
    /// Projector over `table`.
    pub fn new(table: &'a BasisTable) -> Self {
        Self { table }
    }

    /// The basis table in use.
    pub fn table(&self) -> &'a BasisTable {
        self.table
    }

    /// Zero every column whose pid is not in `pids`. Pid order is kept.
    pub fn filter_by_pids(&self, blocks: &[Grid], pids: &[i32]) -> Vec<Grid> {
        blocks.iter().map(|b| b.with_only_pids(pids)).collect()
    }

    /// Keep only the requested evolution components.
    ///
    /// Each block is widened to the full canonical flavor basis (missing
    /// flavors are zero), rotated, filtered and rotated back. The returned
    /// blocks always declare the canonical pid list.
    pub fn filter_by_evolution<S: AsRef<str>>(
        &self,
        blocks: &[Grid],
        labels: &[S],
    ) -> Result<Vec<Grid>> {
        let mut keep = vec![false; self.table.dim()];
        for label in labels {
            let pos = self.table.label_position(label.as_ref()).ok_or_else(|| {
                Error::Labels(format!("'{}' is not an evolution label", label.as_ref()))
            })?;
            keep[pos] = true;
        }

        let canonical = self.table.pids().to_vec();
        blocks
            .iter()
            .map(|block| {
                if block.is_empty() {
                    return Grid::empty(
                        block.xgrid().to_vec(),
                        block.q2grid().to_vec(),
                        canonical.clone(),
                    );
                }
                let flavor = self.flavor_table(block)?;
                let mut evolution = self.table.to_evolution(&flavor);
                for (col, &k) in keep.iter().enumerate() {
                    if !k {
                        evolution.column_mut(col).fill(0.0);
                    }
                }
                block.with_data(canonical.clone(), self.table.to_flavor(&evolution))
            })
            .collect()
    }

    /// Project onto the span of `vectors` (weights over the canonical basis).
    ///
    /// Builds `P = Σ v vᵀ / (v·v)` and applies the sub-matrix on the block's
    /// own pids, so the block keeps its columns.
    pub fn filter_by_combinations(&self, blocks: &[Grid], vectors: &[Vec<f64>]) -> Result<Vec<Grid>> {
        let n = self.table.dim();
        let mut projector = DMatrix::<f64>::zeros(n, n);
        for v in vectors {
            if v.len() != n {
                return Err(Error::Labels(format!(
                    "combination has {} weights, basis has {n} flavors",
                    v.len()
                )));
            }
            let v = nalgebra::DVector::from_column_slice(v);
            let norm2 = v.dot(&v);
            if norm2 == 0.0 {
                return Err(Error::Labels("cannot project onto the zero vector".into()));
            }
            projector += &v * v.transpose() / norm2;
        }

        blocks
            .iter()
            .map(|block| {
                if block.is_empty() {
                    return Ok(block.clone());
                }
                let active = self.positions(block)?;
                let sub = projector.select_rows(&active).select_columns(&active);
                block.with_data(block.pids().to_vec(), block.data() * sub.transpose())
            })
            .collect()
    }

    /// Dispatch on the selection kind.
    pub fn project(&self, blocks: &[Grid], selection: &FlavorSelection) -> Result<Vec<Grid>> {
        log::debug!("projecting {} block(s) onto {:?}", blocks.len(), selection);
        match selection {
            FlavorSelection::Pids(pids) => Ok(self.filter_by_pids(blocks, pids)),
            FlavorSelection::Evolution(labels) => self.filter_by_evolution(blocks, labels),
            FlavorSelection::Combinations(vectors) => self.filter_by_combinations(blocks, vectors),
        }
    }

    /// `points × dim` table in canonical flavor order, zero for absent pids.
    pub fn flavor_table(&self, block: &Grid) -> Result<DMatrix<f64>> {
        let positions = self.positions(block)?;
        let mut table = DMatrix::zeros(block.data().nrows(), self.table.dim());
        for (col, pos) in positions.into_iter().enumerate() {
            table.set_column(pos, &block.data().column(col));
        }
        Ok(table)
    }

    fn positions(&self, block: &Grid) -> Result<Vec<usize>> {
        let positions = block
            .pids()
            .iter()
            .map(|&pid| {
                self.table.pid_position(pid).ok_or_else(|| {
                    Error::Validation(format!("pid {pid} is not part of the flavor basis"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        for (i, p) in positions.iter().enumerate() {
            if positions[..i].contains(p) {
                return Err(Error::Validation(format!(
                    "block maps two columns onto flavor {}",
                    self.table.pids()[*p]
                )));
            }
        }
        Ok(positions)
    }
}
