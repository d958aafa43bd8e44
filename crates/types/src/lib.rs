pub mod address;
pub mod hash;
pub mod receipt;
pub mod transaction;

pub use address::*;
pub use hash::*;
pub use receipt::*;
pub use transaction::*;

/// Record time-to-live in seconds.
pub type Ttl = u64;
