pub(crate) mod bitmap;
pub(crate) mod bounds;
pub(crate) mod convert;

pub use bitmap::BitMap;
pub use bounds::Bounds;
pub use convert::Channel;
