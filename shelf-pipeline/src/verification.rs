use crate::types::RawBatch;
use crate::util;

/// Decides the "blockchain verified" display flag for a batch.
///
/// The flag is not backed by any ledger or signature. Rules must be
/// deterministic: the same row always yields the same answer.
pub trait VerificationRule: Send + Sync {
    fn is_verified(&self, batch: &RawBatch) -> bool;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// A batch is verified while it still has stock on hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct StockOnHandRule;

impl VerificationRule for StockOnHandRule {
    fn is_verified(&self, batch: &RawBatch) -> bool {
        batch.current_stock > 0
    }
}
