pub mod delete;
pub mod remix;
pub mod workbench;

pub use delete::{delete, DeleteArgs};
pub use remix::{remix, RemixArgs};
