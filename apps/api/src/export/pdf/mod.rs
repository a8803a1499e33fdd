// Paginated PDF export.
// Layout and encoding are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod encode;
pub mod layout;
pub mod page;
pub mod wrap;

pub use encode::encode_pdf;
pub use layout::layout_resume;
pub use page::PageConfig;
