use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Style, Styles};
use treevisit::{
    DirVisit, FileVisit, NormalizingVisitor, RunContext, TreeVisitor, TreeWalk, VisitSpec,
};

/// Prints one line per normalized visit event. Directories arrive exactly
/// once and before their contents; synthesized ones are marked with `*`.
struct PrintVisitor {
    long: bool,
    entries: usize,
}

impl PrintVisitor {
    fn new(long: bool) -> Self {
        Self { long, entries: 0 }
    }

    fn format_time(time: SystemTime) -> String {
        let local: DateTime<Local> = time.into();
        local.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl TreeVisitor for PrintVisitor {
    fn start_run(&mut self, context: &RunContext) {
        log::debug!("start_run with {} roots", context.roots().len());
    }

    fn visit_file(&mut self, file: FileVisit) {
        self.entries += 1;
        if self.long {
            let size = file
                .size()
                .map(|size| size.to_string())
                .unwrap_or_else(|_| String::from("?"));
            let modified = file
                .last_modified()
                .map(Self::format_time)
                .unwrap_or_else(|_| String::from("?"));
            println!("f  {size:>10} {modified} {}", file.path());
        } else {
            println!("f  {}", file.path());
        }
    }

    fn visit_dir(&mut self, dir: DirVisit) {
        self.entries += 1;
        let marker = if dir.is_synthesized() { "d*" } else { "d " };
        if self.long {
            let modified = dir
                .last_modified()
                .map(Self::format_time)
                .unwrap_or_else(|_| String::from("?"));
            println!("{marker} {:>10} {modified} {}", "-", dir.path());
        } else {
            println!("{marker} {}", dir.path());
        }
    }

    fn spec_change(&mut self, spec: &VisitSpec) {
        println!("# {}", spec.root().display());
    }

    fn end_run(&mut self) {
        log::debug!("end_run after {} entries", self.entries);
    }

    fn did_work(&self) -> bool {
        self.entries > 0
    }
}

const HEADER: Style = AnsiColor::Green.on_default().effects(Effects::BOLD);
const USAGE: Style = AnsiColor::Green.on_default().effects(Effects::BOLD);
const LITERAL: Style = AnsiColor::Cyan.on_default().effects(Effects::BOLD);
const PLACEHOLDER: Style = AnsiColor::Cyan.on_default();

const STYLING: Styles = Styles::styled()
    .header(HEADER)
    .usage(USAGE)
    .literal(LITERAL)
    .placeholder(PLACEHOLDER);

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[clap(styles = STYLING)]
struct Cli {
    /// Source tree roots to walk
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// Show size and modification time for each entry
    #[arg(short, long)]
    long: bool,

    /// Follow symbolic links while walking
    #[arg(long)]
    follow_links: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut walk = TreeWalk::new(&cli.roots[0]);
    for root in &cli.roots[1..] {
        walk = walk.add_root(root);
    }
    walk = walk.follow_links(cli.follow_links);

    let mut visitor = NormalizingVisitor::new(PrintVisitor::new(cli.long));
    walk.run(&mut visitor).expect("walk failed");

    if !visitor.did_work() {
        println!("(no entries)");
    }
}
