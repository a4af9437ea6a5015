//! Noto fonts post-processing CLI library.

pub mod cli;
pub mod info;
pub mod instance;
pub mod watermark;

pub use info::describe;
pub use instance::set_default_instance;
pub use watermark::watermark;
