#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SegmentError {
    #[error("Image must have at least one row and one column, got {rows}x{cols}")]
    InvalidShape { rows: usize, cols: usize },

    #[error("Image rows must all have the same length: row {row} has {found} samples, expected {expected}")]
    RaggedRows { row: usize, expected: usize, found: usize },

    #[error("Field shapes differ: expected {expected:?}, found {found:?}")]
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    #[error("Unsupported descent mode {0:?} (supported: \"standard\")")]
    UnsupportedMode(String),

    #[error("Non-finite trace value at iteration {iteration}: |grad w| {norm_grad_w}, |grad phi| {norm_grad_phi}, functional {functional}")]
    NumericDivergence {
        iteration: usize,
        norm_grad_w: f64,
        norm_grad_phi: f64,
        functional: f64,
    },
}
