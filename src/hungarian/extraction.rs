//! Reading a one-to-one assignment off a fully reduced matrix.
//!
//! # Algorithm
//! Works on the set of available zeros (admissible zeros whose row and
//! column are both still free):
//! 1. Row scan: a row with exactly one available zero is assigned; the
//!    other zeros of that column are crossed out.
//! 2. Column scan: a column with exactly one available zero is assigned;
//!    the other zeros of that row are crossed out.
//! 3. Remainder: remaining zeros in sorted order, while row and column
//!    are free.
//!
//! Scans 1 and 2 stop one pair short of the full size, leaving the last
//! pairing to the remainder pass.
//!
//! If pairs are still missing, the gap is reported, an augmenting-path
//! repair over the zeros completes what it can, and any row still free
//! is paired with the cheapest free column.

use std::collections::BTreeSet;

use tracing::warn;

use super::cover::{Matching, ZeroGraph};
use crate::models::{CostMatrix, RestrictionMask, SolveWarning};

/// Pairs read from the matrix, plus any recoverable irregularity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Extraction {
    pub pairs: Vec<(usize, usize)>,
    pub warnings: Vec<SolveWarning>,
}

/// Extracts `min(rows, cols)` pairs from `matrix`.
pub(crate) fn extract(
    matrix: &CostMatrix,
    restrictions: Option<&RestrictionMask>,
    epsilon: f64,
) -> Extraction {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    let required = rows.min(cols);
    let scan_limit = required.saturating_sub(1);

    let graph = ZeroGraph::from_matrix(matrix, restrictions, epsilon);
    let mut available: BTreeSet<(usize, usize)> = (0..rows)
        .flat_map(|r| graph.zeros_in_row(r).iter().map(move |&c| (r, c)))
        .collect();
    let mut pairs = Vec::with_capacity(required);

    // Row scan
    for r in 0..rows {
        let in_row: Vec<_> = available.iter().filter(|z| z.0 == r).copied().collect();
        if let &[(_, c)] = in_row.as_slice() {
            if pairs.len() < scan_limit {
                pairs.push((r, c));
                available.retain(|z| z.0 != r && z.1 != c);
            }
        }
    }

    // Column scan
    for c in 0..cols {
        let in_col: Vec<_> = available.iter().filter(|z| z.1 == c).copied().collect();
        if let &[(r, _)] = in_col.as_slice() {
            if pairs.len() < scan_limit {
                pairs.push((r, c));
                available.retain(|z| z.0 != r && z.1 != c);
            }
        }
    }

    // Remainder
    for (r, c) in available {
        if pairs.len() >= required {
            break;
        }
        if pairs.iter().all(|p| p.0 != r && p.1 != c) {
            pairs.push((r, c));
        }
    }

    let mut warnings = Vec::new();
    if pairs.len() < required {
        warn!(
            assigned = pairs.len(),
            required, "zero scan left rows unassigned, repairing"
        );
        warnings.push(SolveWarning::IncompleteExtraction {
            assigned: pairs.len(),
            required,
        });
        pairs = repair(&graph, &pairs, rows, cols);
    }

    if pairs.len() < required {
        fallback(matrix, restrictions, &mut pairs, &mut warnings);
    }

    pairs.sort_unstable();
    Extraction { pairs, warnings }
}

/// Completes the partial pairing with augmenting paths over the zeros.
fn repair(
    graph: &ZeroGraph,
    pairs: &[(usize, usize)],
    rows: usize,
    cols: usize,
) -> Vec<(usize, usize)> {
    let mut matching = Matching {
        row_to_col: vec![None; rows],
        col_to_row: vec![None; cols],
    };
    for &(r, c) in pairs {
        matching.row_to_col[r] = Some(c);
        matching.col_to_row[c] = Some(r);
    }
    graph.extend_matching(&mut matching);

    matching
        .row_to_col
        .iter()
        .enumerate()
        .filter_map(|(r, c)| c.map(|c| (r, c)))
        .collect()
}

/// Pairs every still-free row with a free column, preferring
/// non-restricted cells, then the smallest reduced value.
fn fallback(
    matrix: &CostMatrix,
    restrictions: Option<&RestrictionMask>,
    pairs: &mut Vec<(usize, usize)>,
    warnings: &mut Vec<SolveWarning>,
) {
    let required = matrix.rows().min(matrix.cols());
    let restricted = |r: usize, c: usize| restrictions.is_some_and(|m| m.is_restricted(r, c));

    for r in 0..matrix.rows() {
        if pairs.len() >= required {
            break;
        }
        if pairs.iter().any(|p| p.0 == r) {
            continue;
        }
        let best = (0..matrix.cols())
            .filter(|&c| pairs.iter().all(|p| p.1 != c))
            .min_by(|&a, &b| {
                restricted(r, a)
                    .cmp(&restricted(r, b))
                    .then(matrix.get(r, a).total_cmp(&matrix.get(r, b)))
            });
        if let Some(c) = best {
            let is_restricted = restricted(r, c);
            warn!(row = r, col = c, restricted = is_restricted, "fallback pairing");
            warnings.push(SolveWarning::FallbackPair {
                row: r,
                col: c,
                restricted: is_restricted,
            });
            pairs.push((r, c));
        }
    }
}
