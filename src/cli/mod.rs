//! Terminal front-end: one module per subcommand plus shared styling helpers.

pub mod export;
pub mod heatmap;
pub mod history;
pub mod info;
pub mod lists;
pub mod setup;
pub mod ui;
