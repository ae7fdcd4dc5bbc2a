//! `lhagrid1` member files.
//!
//! Layout:
//!
//! ```text
//! PdfType: central          <- header, up to the first separator
//! Format: lhagrid1
//! ---
//! x_0 x_1 ...               <- block: x nodes
//! Q2_0 Q2_1 ...             <-        Q2 nodes
//! pid_0 pid_1 ...           <-        flavors
//! v v v ...                 <-        n_x * n_Q2 rows, x-major
//! ---                       <-        terminator
//! ```
//!
//! A member may contain several blocks. A block may declare no data rows.

use std::io::Write;
use std::path::Path;

use nalgebra::DMatrix;

use gp_core::{Error, Grid, Member, Result};

use crate::number::{format_sci, format_sci_spaced};

/// Block separator line.
pub const SEPARATOR: &str = "---";
/// Format tag written after the header.
pub const FORMAT: &str = "lhagrid1";
/// Header of member 0.
pub const CENTRAL_HEADER: &str = "PdfType: central";
/// Header of every other member unless overridden.
pub const REPLICA_HEADER: &str = "PdfType: replica";

/// Significant decimals of the x and Q² rows.
const GRID_PRECISION: usize = 6;
/// Significant decimals of the value rows.
const DATA_PRECISION: usize = 8;

/// A parsed member file.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberFile {
    /// Preamble lines before the first separator, `Format:` included.
    pub header: Vec<String>,
    /// Subgrid blocks, in file order.
    pub blocks: Member,
}

impl MemberFile {
    /// Header without the `Format:` line, suitable as a header override.
    pub fn type_header(&self) -> String {
        self.header
            .iter()
            .filter(|l| !l.trim_start().starts_with("Format:"))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Value of the `PdfType:` header line.
    pub fn pdf_type(&self) -> Option<&str> {
        self.header.iter().find_map(|l| l.trim().strip_prefix("PdfType:").map(str::trim))
    }
}

/// Default header for `member`.
pub fn default_header(member: usize) -> &'static str {
    if member == 0 { CENTRAL_HEADER } else { REPLICA_HEADER }
}

/// Parse a member file. `path` is only used in error messages.
pub fn parse_member(text: &str, path: &Path) -> Result<MemberFile> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim_end()));

    // header
    let mut header = Vec::new();
    loop {
        match lines.next() {
            Some((_, l)) if l.trim() == SEPARATOR => break,
            Some((_, l)) => header.push(l.to_string()),
            None => {
                return Err(Error::format(path, 0, format!("no '{SEPARATOR}' after the header")));
            }
        }
    }

    let mut blocks = Vec::new();
    loop {
        // x nodes, or end of file
        let Some((start, x_line)) = lines.by_ref().find(|(_, l)| !l.trim().is_empty()) else {
            break;
        };
        if x_line.trim() == SEPARATOR {
            return Err(Error::format(path, start, "empty block: expected x-grid"));
        }
        let xgrid = parse_floats(x_line, path, start)?;

        let (n, q2_line) = next_line(&mut lines, path, "Q2-grid")?;
        let q2grid = parse_floats(q2_line, path, n)?;

        let (n, pid_line) = next_line(&mut lines, path, "pid list")?;
        let pids = parse_pids(pid_line, path, n)?;

        // data rows up to the terminator; the declared sizes are not trusted
        // for allocation, the buffer grows with the rows actually present
        let mut values = Vec::new();
        let mut n_rows = 0;
        let mut terminated = false;
        for (n, line) in lines.by_ref() {
            let trimmed = line.trim();
            if trimmed == SEPARATOR {
                terminated = true;
                break;
            }
            if trimmed.is_empty() {
                continue;
            }
            let row = parse_floats(line, path, n)?;
            if row.len() != pids.len() {
                return Err(Error::format(
                    path,
                    n,
                    format!("expected {} values, found {}", pids.len(), row.len()),
                ));
            }
            values.extend(row);
            n_rows += 1;
        }
        if !terminated {
            return Err(Error::format(
                path,
                start,
                format!("block is missing its terminating '{SEPARATOR}'"),
            ));
        }

        let expected = xgrid.len() * q2grid.len();
        if n_rows != 0 && n_rows != expected {
            return Err(Error::format(
                path,
                start,
                format!(
                    "block has {n_rows} data rows, expected {expected} ({} x {})",
                    xgrid.len(),
                    q2grid.len()
                ),
            ));
        }

        let data = DMatrix::from_row_slice(n_rows, pids.len(), &values);
        let block = Grid::new(xgrid, q2grid, pids, data)
            .map_err(|e| Error::format(path, start, e.to_string()))?;
        blocks.push(block);
    }

    Ok(MemberFile { header, blocks })
}

/// Write a member file.
///
/// `header` holds the type lines (e.g. `PdfType: central`); the `Format:`
/// line and the first separator are always appended here.
pub fn write_member<W: Write>(out: &mut W, header: &str, blocks: &[Grid]) -> Result<()> {
    for line in header.lines().filter(|l| !l.trim_start().starts_with("Format:")) {
        writeln!(out, "{}", line.trim_end())?;
    }
    writeln!(out, "Format: {FORMAT}")?;
    writeln!(out, "{SEPARATOR}")?;

    for block in blocks {
        writeln!(out, "{}", join_sci(block.xgrid()))?;
        writeln!(out, "{}", join_sci(block.q2grid()))?;
        let pids: Vec<String> = block.pids().iter().map(|p| p.to_string()).collect();
        writeln!(out, "{}", pids.join(" "))?;

        let data = block.data();
        let mut line = String::with_capacity(16 * data.ncols());
        for r in 0..data.nrows() {
            line.clear();
            for c in 0..data.ncols() {
                if c == 0 {
                    line.push_str(&format_sci_spaced(data[(r, c)], DATA_PRECISION));
                } else {
                    line.push(' ');
                    line.push_str(&format_sci(data[(r, c)], DATA_PRECISION));
                }
            }
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{SEPARATOR}")?;
    }
    Ok(())
}

fn join_sci(values: &[f64]) -> String {
    values.iter().map(|&v| format_sci(v, GRID_PRECISION)).collect::<Vec<_>>().join(" ")
}

fn next_line<'a, I>(lines: &mut I, path: &Path, what: &str) -> Result<(usize, &'a str)>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    match lines.next() {
        Some((n, l)) if l.trim() == SEPARATOR => {
            Err(Error::format(path, n, format!("unexpected '{SEPARATOR}', expected {what}")))
        }
        Some(line) => Ok(line),
        None => Err(Error::format(path, 0, format!("unexpected end of file, expected {what}"))),
    }
}

fn parse_floats(line: &str, path: &Path, n: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| Error::format(path, n, format!("'{tok}' is not a number")))
        })
        .collect()
}

fn parse_pids(line: &str, path: &Path, n: usize) -> Result<Vec<i32>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<i32>()
                .map_err(|_| Error::format(path, n, format!("'{tok}' is not a pid")))
        })
        .collect()
}
