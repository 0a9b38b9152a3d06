//! The `.env` file store.
//!
//! `.env` files are edited in place: comments, blank lines, and key order
//! survive every read/modify/write cycle. Writes always leave the file at
//! mode 0600.
//!
//! - [`EnvEntry`] - One line
//! - [`EnvFile`] - The ordered file
//! - [`categorize`] - Editor grouping

pub mod category;
pub mod entry;
pub mod store;

pub use category::{categorize, group_entries, Category, CATEGORIES};
pub use entry::EnvEntry;
pub use store::EnvFile;

/// File name of the environment file at the project root.
pub const ENV_FILE_NAME: &str = ".env";

/// Backup written by `config rotate`.
pub const ENV_BACKUP_NAME: &str = ".env.backup";
