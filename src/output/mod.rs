pub mod formatter;
pub mod writer;

pub use formatter::{
    format_elapsed, format_rejections, format_run_summary, format_score_breakdown,
    should_use_colors,
};
pub use writer::{ensure_output_dir, write_document, write_outputs, INDEX_FILE, LEADERBOARD_FILE};
