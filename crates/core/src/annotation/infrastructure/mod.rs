pub mod font_resolver;
pub mod imageproc_label_painter;
