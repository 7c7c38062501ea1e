pub mod block;
pub mod metrics;
pub mod writer;

pub use block::{Block, ParagraphStyle, Table, TableStyle};
pub use writer::{DocumentWriter, PageSize};
