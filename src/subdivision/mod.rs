pub mod engine;
pub mod events;
pub mod march;
pub mod node;
pub mod pinch;
pub mod scale;

pub use engine::{
    NodeRecord, StopReason, SubdivisionConfig, SubdivisionEngine, SubdivisionOutcome,
};
pub use events::{SilentObserver, SubdivisionObserver};
pub use march::{MarchMode, MarchOutcome, MarchingInset};
pub use node::{RegionKey, RegionNode, RegionStore};
pub use pinch::ResolvePinch;
pub use scale::EstimateScale;
