pub mod focus;
pub mod geometry;
pub mod nearest;
pub mod scale;
pub mod series;
pub mod value_formatter;
