pub mod audio;
pub mod error;
pub mod ft;
pub mod math;
pub mod params;
pub mod plot;
pub mod shape;
pub mod wave;
pub mod window;

pub use error::{Error, Result};
