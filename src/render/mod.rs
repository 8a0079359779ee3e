/// File output. The interactive counterpart lives in `ui`.
pub mod raster;
