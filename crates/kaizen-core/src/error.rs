//! Error types for `kaizen-core`.

use thiserror::Error;

use crate::event::EventKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown priority tier: {0}")]
  UnknownPriorityTier(i64),

  #[error("unknown issue status: {0:?}")]
  UnknownStatus(String),

  #[error("{event:?} event cannot be scored with the {table:?} weight table")]
  EventKindMismatch { event: EventKind, table: EventKind },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
