pub mod forecast;
pub mod region;
pub mod soil;

pub use forecast::*;
pub use region::*;
pub use soil::*;
