pub mod batch;
pub mod matcher;
pub mod normalize;
pub mod reconciler;
