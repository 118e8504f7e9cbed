pub mod error;
pub mod ids;
pub mod storage;
pub mod uploads;

pub use error::{Result, StoreError};
