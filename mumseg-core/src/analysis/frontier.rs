//! Foreground set (`omega`) and its discrete boundary (the frontier).

use nalgebra::DMatrix;

use crate::grid::{cells, touches_edge, Direction, Field, Pixel};

/// Cells where `phi ≥ 0`, in row-major order.
#[derive(Clone, Debug, Default, PartialEq, derive_more::Deref)]
pub struct Foreground(pub Vec<Pixel>);

impl Foreground {
    pub fn from_phi(phi: &Field) -> Foreground {
        Foreground(cells(phi.shape()).filter(|p| is_foreground(phi[p.idx()])).collect())
    }
}

#[inline]
pub fn is_foreground(v: f64) -> bool {
    v >= 0.
}

/// Foreground cells that touch the grid edge or have a background 4-neighbour.
///
/// Cells keep the order they had in the [`Foreground`] they were extracted
/// from; membership tests go through a same-shape mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Frontier {
    cells: Vec<Pixel>,
    mask: DMatrix<bool>,
}

impl Frontier {
    pub fn extract(omega: &Foreground, phi: &Field) -> Frontier {
        let shape = phi.shape();
        let mut mask = DMatrix::from_element(shape.0, shape.1, false);
        let mut frontier = Vec::new();
        for &pixel in omega.iter() {
            let on_frontier = touches_edge(pixel, shape)
                || Direction::ALL
                    .iter()
                    .filter_map(|dir| pixel.step(*dir, shape))
                    .any(|nb| !is_foreground(phi[nb.idx()]));
            if on_frontier {
                mask[pixel.idx()] = true;
                frontier.push(pixel);
            }
        }
        Frontier { cells: frontier, mask }
    }

    /// Frontier of the foreground currently encoded by `phi`.
    pub fn of(phi: &Field) -> Frontier {
        Frontier::extract(&Foreground::from_phi(phi), phi)
    }

    #[inline]
    pub fn contains(&self, pixel: Pixel) -> bool {
        self.mask[pixel.idx()]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pixel> {
        self.cells.iter()
    }

    pub fn cells(&self) -> &[Pixel] {
        &self.cells
    }

    /// Shape of the grid the frontier was extracted from.
    pub fn shape(&self) -> (usize, usize) {
        self.mask.shape()
    }

    pub fn mask(&self) -> &DMatrix<bool> {
        &self.mask
    }
}
