//! Sorted, immutable table files: the bulk-load writer and its reader.
//!
//! File layout:
//! ```text
//! [data block 0][trailer] ... [data block N][trailer]
//! [range deletion block][trailer]
//! [properties block][trailer]
//! [index block][trailer]
//! [footer]
//! ```

pub mod block;
pub mod builder;
pub mod footer;
pub mod properties;
pub mod reader;
pub mod writer;

pub use properties::TableProperties;
pub use reader::{SstFileReader, TableIterator};
pub use writer::{SstFileWriter, TableInfo};
