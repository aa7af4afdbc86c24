//! Charts module - Dashboard layout and rendering

mod layout;
mod palette;
mod renderer;

pub use layout::{CellRect, GridLayout, Panel, GRID_COLS, GRID_ROWS};
pub use renderer::{
    attrition_axis_range, nice_step, percent_label, pie_slices, DashboardCanvas,
    DashboardRenderer, PieSlice, RenderError, RenderOptions,
};
