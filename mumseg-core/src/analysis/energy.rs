//! Terms of the discrete Mumford–Shah functional. Diagnostic only: the
//! descent never differentiates these directly.

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::grid::{cells, pad_edge, Field};
use super::frontier::Frontier;

/// Breakdown of the Mumford–Shah energy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Tsify, Serialize, Deserialize)]
pub struct Energy {
    /// Frontier cardinality
    pub perimeter: f64,
    /// Squared forward differences of `w` over non-frontier cells
    pub h1: f64,
    /// `‖w − u‖²`
    pub data: f64,
}

impl Energy {
    pub fn new(w: &Field, u: &Field, frontier: &Frontier) -> Energy {
        Energy {
            perimeter: perimeter(frontier),
            h1: h1(w, frontier),
            data: data_term(w, u),
        }
    }

    pub fn total(&self) -> f64 {
        self.perimeter + self.h1 + self.data
    }
}

pub fn perimeter(frontier: &Frontier) -> f64 {
    frontier.len() as f64
}

/// Sum of `(∂x w)² + (∂y w)²` over cells off the frontier, using forward
/// differences of the edge-padded field.
///
/// As with [`boundary_weight`](crate::gradient::boundary_weight), the
/// differences for cell `(i, j)` are read at `(i, j)` of the padded grid, i.e.
/// between the cells one up and one to the left of it.
pub fn h1(w: &Field, frontier: &Frontier) -> f64 {
    let padded = pad_edge(w, 1);
    cells(w.shape())
        .filter(|p| !frontier.contains(*p))
        .map(|p| {
            let (i, j) = p.idx();
            let dx = padded[(i + 1, j)] - padded[(i, j)];
            let dy = padded[(i, j + 1)] - padded[(i, j)];
            dx * dx + dy * dy
        })
        .sum()
}

pub fn data_term(w: &Field, u: &Field) -> f64 {
    (w - u).norm_squared()
}

pub fn mumford_shah(w: &Field, u: &Field, frontier: &Frontier) -> f64 {
    Energy::new(w, u, frontier).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{from_rows, Pixel};
    use nalgebra::DMatrix;
    use test_log::test;

    #[test]
    fn constant_field() {
        let u = DMatrix::from_element(4, 4, 1.);
        let frontier = Frontier::of(&u);
        let energy = Energy::new(&u, &u, &frontier);
        assert_eq!(energy, Energy { perimeter: 12., h1: 0., data: 0. });
        assert_eq!(mumford_shah(&u, &u, &frontier), 12.);
    }

    #[test]
    fn data_term_is_squared_distance() {
        let u = from_rows(&[vec![1., 2.], vec![3., 4.]]).unwrap();
        let w = from_rows(&[vec![2., 2.], vec![3., 1.]]).unwrap();
        assert_relative_eq!(data_term(&w, &u), 1. + 9.);
        assert_relative_eq!(data_term(&u, &u), 0.);
    }

    #[test]
    fn h1_skips_frontier() {
        // Ramp along columns; negative phi everywhere leaves the frontier empty
        let w = DMatrix::from_fn(3, 4, |_, j| j as f64);
        let phi = DMatrix::from_element(3, 4, -1.);
        let empty = Frontier::of(&phi);
        assert!(empty.is_empty());
        // Unit steps except at the replicated first column
        assert_relative_eq!(h1(&w, &empty), 3. * 3.);

        // Positive phi puts every edge cell on the frontier; only (1, 1) and (1, 2) remain
        let phi = DMatrix::from_element(3, 4, 1.);
        let frontier = Frontier::of(&phi);
        assert!(!frontier.contains(Pixel::new(1, 1)));
        assert!(!frontier.contains(Pixel::new(1, 2)));
        assert_relative_eq!(h1(&w, &frontier), 2.);
    }

    #[test]
    fn h1_both_axes() {
        let w = from_rows(&[vec![0., 1.], vec![2., 5.]]).unwrap();
        let phi = DMatrix::from_element(2, 2, -1.);
        let frontier = Frontier::of(&phi);
        assert!(frontier.is_empty());
        // Read one cell up-left in the padded grid:
        // (0,0): 0; (0,1): dy 1; (1,0): dx 2; (1,1): dx 2, dy 1
        assert_relative_eq!(h1(&w, &frontier), 1. + 4. + (4. + 1.));
        assert_relative_eq!(h1(&w, &frontier), 10.);
    }

    #[test]
    fn h1_ignores_last_row_and_column() {
        // The bottom-right corner is never the minuend of any difference
        let mut w = DMatrix::zeros(3, 3);
        w[(2, 2)] = 7.;
        let empty = Frontier::of(&DMatrix::from_element(3, 3, -1.));
        assert_relative_eq!(h1(&w, &empty), 0.);
        w[(1, 1)] = 1.;
        // (1,2) and (2,1) each see one unit step, (2,2) sees two
        assert_relative_eq!(h1(&w, &empty), 1. + 1. + 1. + 1.);
    }
}
