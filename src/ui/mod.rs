pub mod panels;
pub mod splom;
