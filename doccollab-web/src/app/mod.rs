pub mod config;
pub mod dialogs;
pub mod file_tree;
pub mod format;
pub mod notifications;
pub mod responsive;
pub mod title;

pub use config::{WebConfig, config, config_or_page, set_config};
pub use file_tree::{ActionOutcome, FileTreeManager, TreeEvent};
pub use notifications::Severity;
