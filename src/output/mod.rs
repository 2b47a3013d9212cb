pub mod formatter;

pub use formatter::{
    format_activity_line, format_individual_results, format_mvp, format_raw, format_standings,
    should_use_colors,
};
