use thiserror::Error;

pub type AllocResult<T> = Result<T, AllocError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  #[error("invalid allocation request: size must be greater than zero")]
  InvalidRequest,

  #[error("allocation denied: the arena could not supply {requested} bytes")]
  AllocationDenied { requested: usize },
}
