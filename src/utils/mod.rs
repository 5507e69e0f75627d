//! Utility modules shared by the renderers.

pub mod date;
pub mod xml;
