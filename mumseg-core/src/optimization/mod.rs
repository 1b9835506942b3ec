pub mod descent;
pub mod gradient;
pub mod observer;
pub mod params;
pub mod segmenter;
pub mod trace;
