pub mod label_painter;
