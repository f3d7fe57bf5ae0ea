//! Dashboard bridge: the boundary between a front end and the batch catalog.
//!
//! A front end sends JSON text. The bridge parses it into exactly one of the
//! `DashboardOperation` variants, validates the parameters, runs it against
//! a prepared `Dataset` and returns a structured response the front end
//! renders as metrics, charts, tables or a verification card.

pub mod error;
pub mod ops;
pub mod protocol;

pub use error::{BridgeError, BridgeResult};
pub use ops::DashboardOperation;
pub use protocol::{Bridge, BridgeRequest, BridgeResponse, OperationResult};
