pub mod environment;
pub mod paths;
pub mod terminal;
pub mod text;

pub use environment::{get_claude_dir, get_projects_dir, projects_dir_in};
pub use paths::{format_path_with_tilde, session_id_from_path};
pub use text::{make_preview, truncate_chars};
