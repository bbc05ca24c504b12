//! Pure accounting core: event fold, deposit basis, ROI derivation.

use crate::datasource::SourceError;
use thiserror::Error;

pub mod accounting;
pub mod deposit;
pub mod pool_state;
pub mod roi;

pub use accounting::AccountingEngine;
pub use deposit::DepositTracker;
pub use pool_state::{DepositBasis, PoolState};
pub use roi::{DisplayMetrics, RoiCalculator};

#[derive(Debug, Error)]
pub enum EngineError {
    /// A deposit's transaction value could not be obtained. The whole fold
    /// aborts: a silently missing valuation would corrupt the basis.
    #[error("transaction valuation failed for {tx_hash}: {source}")]
    Valuation {
        tx_hash: String,
        #[source]
        source: SourceError,
    },
}
