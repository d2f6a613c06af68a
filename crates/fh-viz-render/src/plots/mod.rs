pub mod axes_draw;
pub mod heatmap;
pub mod panel;
