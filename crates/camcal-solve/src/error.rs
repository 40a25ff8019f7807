/// Errors raised by the estimators.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("degenerate image dimensions (width={width}, height={height})")]
    DegenerateImage { width: u32, height: u32 },
    #[error("no point sets to estimate from")]
    NoPointSets,
    #[error("numerical failure: {0}")]
    Numerical(String),
}
