// Shared helpers for the unit tests in this crate.

use std::io::{self, Read};
use std::path::PathBuf;
use std::time::SystemTime;

use crate::entry::{ContentSource, DirVisit, FileVisit, StopHandle, VisitEntry};
use crate::error::Error;
use crate::path::RelativePath;
use crate::visitor::{RunContext, TreeVisitor, VisitSpec};

/// One downstream-observed event, reduced to a comparable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Spec(PathBuf),
    Dir { path: String, synthesized: bool },
    File(String),
    End,
}

/// Downstream consumer that records the stream it receives. The reduced
/// [`Event`] list supports ordering assertions; the retained entries keep
/// their capability surface for content and metadata assertions.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub entries: Vec<VisitEntry>,
}

impl Recorder {
    pub fn files(&self) -> impl Iterator<Item = &FileVisit> {
        self.entries.iter().filter_map(|entry| match entry {
            VisitEntry::File(file) => Some(file),
            VisitEntry::Dir(_) => None,
        })
    }

    pub fn dirs(&self) -> impl Iterator<Item = &DirVisit> {
        self.entries.iter().filter_map(|entry| match entry {
            VisitEntry::Dir(dir) => Some(dir),
            VisitEntry::File(_) => None,
        })
    }
}

impl TreeVisitor for Recorder {
    fn start_run(&mut self, _context: &RunContext) {
        self.events.push(Event::Start);
    }

    fn visit_file(&mut self, file: FileVisit) {
        self.events.push(Event::File(file.path().to_string()));
        self.entries.push(file.into());
    }

    fn visit_dir(&mut self, dir: DirVisit) {
        self.events.push(Event::Dir {
            path: dir.path().to_string(),
            synthesized: dir.is_synthesized(),
        });
        self.entries.push(dir.into());
    }

    fn spec_change(&mut self, spec: &VisitSpec) {
        self.events.push(Event::Spec(spec.root().to_path_buf()));
    }

    fn end_run(&mut self) {
        self.events.push(Event::End);
    }

    fn did_work(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Content source with fixed, inert answers.
pub struct NullSource;

impl ContentSource for NullSource {
    fn display_name(&self) -> String {
        String::from("null")
    }

    fn last_modified(&self) -> Result<SystemTime, Error> {
        Ok(SystemTime::UNIX_EPOCH)
    }

    fn size(&self) -> Result<u64, Error> {
        Ok(0)
    }

    fn open(&self) -> Result<Box<dyn Read + Send>, Error> {
        Ok(Box::new(io::empty()))
    }
}

pub fn file(path: &str) -> FileVisit {
    file_at(RelativePath::parse(path, true))
}

pub fn file_at(path: RelativePath) -> FileVisit {
    FileVisit::new(path, Box::new(NullSource), StopHandle::new())
}

pub fn dir(path: &str) -> DirVisit {
    DirVisit::supplied(
        RelativePath::parse(path, false),
        Box::new(NullSource),
        StopHandle::new(),
    )
}
