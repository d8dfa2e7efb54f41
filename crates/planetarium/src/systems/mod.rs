pub mod build;
pub mod framing;
pub mod selection;
