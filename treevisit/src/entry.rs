use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use crate::error::Error;
use crate::path::RelativePath;

/// Capability surface carried by producer-supplied visit entries.
/// Implementations belong to the producer; the normalization layer only
/// forwards them.
pub trait ContentSource {
    fn display_name(&self) -> String;
    fn last_modified(&self) -> Result<SystemTime, Error>;
    fn size(&self) -> Result<u64, Error>;
    fn open(&self) -> Result<Box<dyn Read + Send>, Error>;
}

/// Cooperative stop flag shared between a producer and the entries it
/// emits. Requesting a stop asks the producer to abandon the remaining
/// traversal; it does not interrupt the event currently in flight.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// A producer-supplied file visit.
pub struct FileVisit {
    path: RelativePath,
    source: Box<dyn ContentSource>,
    stop: StopHandle,
}

impl FileVisit {
    pub fn new(path: RelativePath, source: Box<dyn ContentSource>, stop: StopHandle) -> Self {
        debug_assert!(path.is_file());
        Self { path, source, stop }
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }

    pub fn display_name(&self) -> String {
        self.source.display_name()
    }

    pub fn last_modified(&self) -> Result<SystemTime, Error> {
        self.source.last_modified()
    }

    pub fn size(&self) -> Result<u64, Error> {
        self.source.size()
    }

    pub fn open(&self) -> Result<Box<dyn Read + Send>, Error> {
        self.source.open()
    }

    pub fn stop_visiting(&self) {
        self.stop.request();
    }
}

impl fmt::Debug for FileVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileVisit").field(&self.path).finish()
    }
}

/// A directory visit: either supplied by the producer with its full
/// capability surface, or synthesized to fill a gap in an ancestor chain.
/// Synthesized entries carry no content capability; `size`, `open`,
/// `is_file`, and `stop_visiting` fail with
/// [`Error::UnsupportedOperation`].
pub enum DirVisit {
    Supplied {
        path: RelativePath,
        source: Box<dyn ContentSource>,
        stop: StopHandle,
    },
    Synthesized {
        path: RelativePath,
        modified: SystemTime,
    },
}

impl DirVisit {
    pub fn supplied(path: RelativePath, source: Box<dyn ContentSource>, stop: StopHandle) -> Self {
        debug_assert!(!path.is_file());
        DirVisit::Supplied { path, source, stop }
    }

    /// Fabricate an entry for a directory the producer never supplied.
    /// Its modification time is the wall-clock time at synthesis.
    pub fn synthesized(path: RelativePath) -> Self {
        debug_assert!(!path.is_file());
        DirVisit::Synthesized {
            path,
            modified: SystemTime::now(),
        }
    }

    pub fn path(&self) -> &RelativePath {
        match self {
            DirVisit::Supplied { path, .. } => path,
            DirVisit::Synthesized { path, .. } => path,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, DirVisit::Synthesized { .. })
    }

    pub fn display_name(&self) -> String {
        match self {
            DirVisit::Supplied { source, .. } => source.display_name(),
            DirVisit::Synthesized { path, .. } => path.to_string(),
        }
    }

    pub fn last_modified(&self) -> Result<SystemTime, Error> {
        match self {
            DirVisit::Supplied { source, .. } => source.last_modified(),
            DirVisit::Synthesized { modified, .. } => Ok(*modified),
        }
    }

    pub fn size(&self) -> Result<u64, Error> {
        match self {
            DirVisit::Supplied { source, .. } => source.size(),
            DirVisit::Synthesized { .. } => Err(Error::UnsupportedOperation),
        }
    }

    pub fn open(&self) -> Result<Box<dyn Read + Send>, Error> {
        match self {
            DirVisit::Supplied { source, .. } => source.open(),
            DirVisit::Synthesized { .. } => Err(Error::UnsupportedOperation),
        }
    }

    pub fn is_file(&self) -> Result<bool, Error> {
        match self {
            DirVisit::Supplied { .. } => Ok(false),
            DirVisit::Synthesized { .. } => Err(Error::UnsupportedOperation),
        }
    }

    pub fn stop_visiting(&self) -> Result<(), Error> {
        match self {
            DirVisit::Supplied { stop, .. } => {
                stop.request();
                Ok(())
            }
            DirVisit::Synthesized { .. } => Err(Error::UnsupportedOperation),
        }
    }
}

impl fmt::Debug for DirVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirVisit::Supplied { path, .. } => f.debug_tuple("DirVisit::Supplied").field(path).finish(),
            DirVisit::Synthesized { path, .. } => {
                f.debug_tuple("DirVisit::Synthesized").field(path).finish()
            }
        }
    }
}

/// A single visit event payload, file or directory.
#[derive(Debug)]
pub enum VisitEntry {
    File(FileVisit),
    Dir(DirVisit),
}

impl VisitEntry {
    pub fn path(&self) -> &RelativePath {
        match self {
            VisitEntry::File(file) => file.path(),
            VisitEntry::Dir(dir) => dir.path(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            VisitEntry::File(file) => file.display_name(),
            VisitEntry::Dir(dir) => dir.display_name(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, VisitEntry::Dir(_))
    }
}

impl From<FileVisit> for VisitEntry {
    fn from(file: FileVisit) -> Self {
        VisitEntry::File(file)
    }
}

impl From<DirVisit> for VisitEntry {
    fn from(dir: DirVisit) -> Self {
        VisitEntry::Dir(dir)
    }
}
