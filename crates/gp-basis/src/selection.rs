//! Classification of user-supplied flavor labels.

use gp_core::{Error, Result};

use crate::table::{BasisTable, CUSTOM_DIRECTION};

/// Reserved label selecting [`CUSTOM_DIRECTION`].
pub const CUSTOM_LABEL: &str = "custom";

/// What a projection should keep.
#[derive(Debug, Clone, PartialEq)]
pub enum FlavorSelection {
    /// Flavor-basis pids.
    Pids(Vec<i32>),
    /// Evolution-basis labels.
    Evolution(Vec<String>),
    /// Directions in the canonical flavor basis, one weight per basis pid.
    Combinations(Vec<Vec<f64>>),
}

impl FlavorSelection {
    /// Classify raw labels against `table`.
    ///
    /// The label list must be entirely flavor-basis pids or entirely
    /// evolution-basis labels; the single label `custom` selects the built-in
    /// custom direction. Flavor names (`u`, `dbar`, ...) stand for their
    /// pids, except in a list made only of evolution labels: `g` and `ph`
    /// alone stay in the evolution basis. Anything else is rejected before
    /// numeric work.
    pub fn classify<S: AsRef<str>>(table: &BasisTable, labels: &[S]) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::Labels("no labels given".into()));
        }

        if labels.iter().any(|l| l.as_ref() == CUSTOM_LABEL) {
            if labels.len() != 1 {
                return Err(Error::Labels(format!(
                    "'{CUSTOM_LABEL}' cannot be combined with other labels"
                )));
            }
            if table.dim() != CUSTOM_DIRECTION.len() {
                return Err(Error::Labels(format!(
                    "'{CUSTOM_LABEL}' needs a {}-flavor basis, table has {}",
                    CUSTOM_DIRECTION.len(),
                    table.dim()
                )));
            }
            return Ok(FlavorSelection::Combinations(vec![CUSTOM_DIRECTION.to_vec()]));
        }

        let evolution = table.is_evolution_labels(labels);
        let pids = table.is_pid_labels(labels);
        match (evolution, pids) {
            (true, false) => Ok(FlavorSelection::Evolution(
                labels.iter().map(|l| l.as_ref().to_string()).collect(),
            )),
            (false, true) => {
                let pids = labels
                    .iter()
                    .map(|l| {
                        l.as_ref().trim().parse::<i32>().map_err(|e| {
                            Error::Labels(format!("'{}' is not a pid: {e}", l.as_ref()))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(FlavorSelection::Pids(pids))
            }
            (true, true) => Err(Error::Labels(format!(
                "labels {:?} are valid in both bases",
                labels.iter().map(|l| l.as_ref()).collect::<Vec<_>>()
            ))),
            (false, false) => labels
                .iter()
                .map(|l| table.flavor_pid(l.as_ref()))
                .collect::<Option<Vec<_>>>()
                .map(FlavorSelection::Pids)
                .ok_or_else(|| Error::Labels(describe_invalid(table, labels))),
        }
    }

    /// Selection from explicit flavor-basis directions.
    pub fn combinations(table: &BasisTable, vectors: Vec<Vec<f64>>) -> Result<Self> {
        if vectors.is_empty() {
            return Err(Error::Labels("no flavor combinations given".into()));
        }
        for (i, v) in vectors.iter().enumerate() {
            if v.len() != table.dim() {
                return Err(Error::Labels(format!(
                    "combination {i} has {} weights, basis has {} flavors",
                    v.len(),
                    table.dim()
                )));
            }
            if v.iter().all(|&w| w == 0.0) {
                return Err(Error::Labels(format!("combination {i} is the zero vector")));
            }
        }
        Ok(FlavorSelection::Combinations(vectors))
    }

    /// True for selections that mix flavors (evolution labels, combinations).
    pub fn mixes_flavors(&self) -> bool {
        !matches!(self, FlavorSelection::Pids(_))
    }
}

fn describe_invalid<S: AsRef<str>>(table: &BasisTable, labels: &[S]) -> String {
    let unknown: Vec<&str> = labels
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !table.is_evolution_labels(&[*l]) && table.flavor_pid(l).is_none())
        .collect();
    if unknown.is_empty() {
        "all labels should belong to the same basis (flavor or evolution)".to_string()
    } else {
        format!("unknown labels {unknown:?}")
    }
}
