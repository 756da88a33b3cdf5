use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::entry::{ContentSource, DirVisit, FileVisit, StopHandle};
use crate::error::Error;
use crate::path::RelativePath;
use crate::visitor::{RunContext, TreeVisitor, VisitSpec};

/// Walks local directory trees and drives a [`TreeVisitor`] with the raw
/// visit stream: a `spec_change` per root followed by that root's entries,
/// parents before children, with paths relative to the root. The root
/// directory itself is never emitted.
///
/// The raw stream makes no exactly-once promise when roots overlap; wrap
/// the downstream visitor in a
/// [`NormalizingVisitor`](crate::NormalizingVisitor) for the ordering and
/// deduplication guarantees.
pub struct TreeWalk {
    roots: Vec<PathBuf>,
    follow_links: bool,
}

impl TreeWalk {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            roots: vec![root.as_ref().to_path_buf()],
            follow_links: false,
        }
    }

    pub fn add_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.roots.push(root.as_ref().to_path_buf());
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn run<V: TreeVisitor>(&self, visitor: &mut V) -> Result<(), Error> {
        let context = RunContext::new(self.roots.clone());
        let stop = StopHandle::new();

        visitor.start_run(&context);

        'roots: for root in &self.roots {
            visitor.spec_change(&VisitSpec::new(root.clone()));
            log::debug!("walking {}", root.display());

            for entry in WalkDir::new(root)
                .min_depth(1)
                .follow_links(self.follow_links)
            {
                if stop.is_requested() {
                    log::debug!("stop requested, abandoning walk");
                    break 'roots;
                }

                let entry = entry.map_err(io::Error::from)?;
                let is_dir = entry.file_type().is_dir();
                let relative = entry.path().strip_prefix(root).map_err(io::Error::other)?;
                let path = RelativePath::from_path(relative, !is_dir);
                let source = Box::new(LocalSource::new(entry.into_path()));

                if is_dir {
                    visitor.visit_dir(DirVisit::supplied(path, source, stop.clone()));
                } else {
                    // Symlinks (when not followed) and special files are
                    // reported as file visits; content operations on them
                    // fail through the source
                    visitor.visit_file(FileVisit::new(path, source, stop.clone()));
                }
            }
        }

        visitor.end_run();
        Ok(())
    }
}

/// [`ContentSource`] backed by the host filesystem.
pub struct LocalSource {
    path: PathBuf,
}

impl LocalSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for LocalSource {
    fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    fn last_modified(&self) -> Result<SystemTime, Error> {
        Ok(fs::metadata(&self.path)?.modified()?)
    }

    fn size(&self) -> Result<u64, Error> {
        Ok(fs::metadata(&self.path)?.len())
    }

    fn open(&self) -> Result<Box<dyn Read + Send>, Error> {
        Ok(Box::new(fs::File::open(&self.path)?))
    }
}
