mod decoder;
mod double_conv;
mod encoder;
mod skip;

pub use decoder::*;
pub use double_conv::*;
pub use encoder::*;
pub use skip::*;
