pub mod entry;
pub mod error;
pub mod normalize;
pub mod path;
pub mod visitor;
pub mod walk;

#[cfg(test)]
mod testutil;

pub use entry::{ContentSource, DirVisit, FileVisit, StopHandle, VisitEntry};
pub use error::Error;
pub use normalize::NormalizingVisitor;
pub use path::RelativePath;
pub use visitor::{RunContext, TreeVisitor, VisitSpec};
pub use walk::{LocalSource, TreeWalk};
