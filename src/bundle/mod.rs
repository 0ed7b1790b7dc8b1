//! Content aggregation: concatenated scripts and media-collated stylesheets for a context.

mod scripts;
mod styles;

pub use styles::merge_style_maps;
