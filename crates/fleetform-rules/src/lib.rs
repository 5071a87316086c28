//! Fleetform Rule Predicates
//!
//! Pure validation functions behind the rule catalog. Every predicate takes
//! a raw value (already stringified by the caller) and answers a yes/no
//! question; field names, messages and data bags live in `fleetform`.

pub mod date;
pub mod email;
pub mod numeric;
pub mod password;
pub mod payment;
pub mod phone;
pub mod string;

// Re-export all predicates
pub use date::*;
pub use email::*;
pub use numeric::*;
pub use password::*;
pub use payment::*;
pub use phone::*;
pub use string::*;
