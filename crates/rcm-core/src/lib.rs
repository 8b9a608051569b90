//! Failure-mode knowledge base, RPN risk engine and reliability metrics for
//! RCM3 / FMEA work.
//!
//! No HTTP or database code lives here. Persistence goes through the
//! [`store::KeyValueStore`] trait, implemented by `rcm-store-sqlite` and by
//! the in-memory [`store::MemoryStore`].

pub mod defaults;
pub mod error;
pub mod failure_mode;
pub mod origin;
pub mod reliability;
pub mod repository;
pub mod risk;
pub mod scale;
pub mod store;
pub mod work_order;

pub use error::{Error, Result};
pub use repository::FailureModeRepository;
