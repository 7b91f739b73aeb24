mod boundary_intersect;
mod min_rect;
mod nearest_pair;

pub use boundary_intersect::BoundaryIntersections;
pub use min_rect::{MinAreaRect, MinAreaRectResult};
pub use nearest_pair::{NearestPair, NearestPairResult};
