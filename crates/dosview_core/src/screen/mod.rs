pub mod cell;
pub mod compositor;
pub mod layer;
pub mod palette;
pub mod raster;
