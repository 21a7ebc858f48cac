use silabs_registers::LayoutError;
use thiserror::Error;

/// Errors constructing a CMU.
#[derive(Debug, Error)]
pub enum CmuError {
    #[error("register layout: {0}")]
    Layout(#[from] LayoutError),
}
