//! Course index service
//!
//! Owns an [`OrderedTree`] of courses and connects it to the line codec and
//! the filesystem: load, save, keyed and substring search, deletion, balancing.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, info, instrument, warn};

use crate::application::codec::{CourseCodec, RecordCodec};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Course, DeleteStrategy, Insertion, Node, Order, OrderedTree};
use crate::infrastructure::traits::FileSystem;

/// Outcome of loading a course file.
///
/// Nothing in here is an error: a missing file aborts the load, bad lines
/// and duplicate codes are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The file did not exist; nothing was read
    pub missing: bool,
    /// Courses added to the index
    pub inserted: usize,
    /// Lines whose course code was already present
    pub duplicates: usize,
    /// Lines that could not be decoded
    pub malformed: usize,
}

/// Service holding the in-memory course index.
pub struct CourseIndex {
    fs: Arc<dyn FileSystem>,
    codec: CourseCodec,
    tree: OrderedTree<Course>,
}

impl CourseIndex {
    /// Create an empty index.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            codec: CourseCodec,
            tree: OrderedTree::new(),
        }
    }

    pub fn tree(&self) -> &OrderedTree<Course> {
        &self.tree
    }

    pub fn count(&self) -> usize {
        self.tree.len()
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Read courses from `path` and insert them.
    ///
    /// A missing file is reported in the returned [`LoadReport`] and leaves
    /// the index untouched. Malformed lines and duplicate codes are skipped
    /// with a warning. Only a failing read of an existing file is an error.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self, path: &Path) -> ApplicationResult<LoadReport> {
        if !self.fs.exists(path) {
            warn!("load: file doesn't exist: {}", path.display());
            return Ok(LoadReport {
                missing: true,
                ..LoadReport::default()
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read course file", path)?;

        let mut report = LoadReport::default();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.codec.decode(line) {
                Ok(course) => {
                    let code = course.code.clone();
                    match self.tree.insert(course) {
                        Insertion::Inserted => report.inserted += 1,
                        Insertion::Duplicate => {
                            warn!("load: line {}: course {} is already in the index", idx + 1, code);
                            report.duplicates += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("load: skipping line {}: {}", idx + 1, e);
                    report.malformed += 1;
                }
            }
        }

        debug!(
            "load: {} inserted, {} duplicates, {} malformed",
            report.inserted, report.duplicates, report.malformed
        );
        Ok(report)
    }

    /// Write every course to `path`, one line each, in post-order.
    ///
    /// Returns the number of lines written. I/O failures are returned, never
    /// swallowed.
    #[instrument(level = "debug", skip(self))]
    pub fn save(&self, path: &Path) -> ApplicationResult<usize> {
        let mut content = String::new();
        let mut count = 0;
        for course in self.tree.post_order() {
            content.push_str(&self.codec.encode(course));
            content.push('\n');
            count += 1;
        }

        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write course file", path)?;

        info!("save: wrote {} courses to {}", count, path.display());
        Ok(count)
    }

    pub fn add(&mut self, course: Course) -> Insertion {
        let code = course.code.clone();
        let outcome = self.tree.insert(course);
        match outcome {
            Insertion::Inserted => info!("add: course {} added", code),
            Insertion::Duplicate => warn!("add: course {} is already in the index", code),
        }
        outcome
    }

    pub fn search_by_code(&self, code: &str) -> Option<&Course> {
        let found = self.tree.get(code).map(Node::value);
        if found.is_none() {
            debug!("search_by_code: {} not found", code);
        }
        found
    }

    /// New tree with every course whose subject name contains `fragment`.
    ///
    /// The index is scanned breadth-first; the result owns copies of the
    /// matching courses.
    pub fn search_by_name(&self, fragment: &str) -> OrderedTree<Course> {
        let matches: OrderedTree<Course> = self
            .tree
            .breadth_first()
            .filter(|course| course.subject_name.contains(fragment))
            .cloned()
            .collect();
        debug!("search_by_name: {:?} matched {} courses", fragment, matches.len());
        matches
    }

    /// Remove the course with `code`; `None` if no such course exists.
    pub fn delete(&mut self, code: &str, strategy: DeleteStrategy) -> Option<Course> {
        let removed = self.tree.delete(code, strategy);
        match &removed {
            Some(course) => info!("delete: removed {} by {}", course.code, strategy),
            None => warn!("delete: course {} not found", code),
        }
        removed
    }

    pub fn balance(&mut self) {
        let before = self.tree.height();
        self.tree.balance();
        info!("balance: height {} -> {}", before, self.tree.height());
    }

    /// Write one course per line to `sink` in the given traversal order.
    pub fn write_listing<W: Write>(&self, order: Order, sink: &mut W) -> ApplicationResult<usize> {
        let mut count = 0;
        for course in self.tree.traverse(order) {
            writeln!(sink, "{course}").map_err(|e| ApplicationError::io("write listing", e))?;
            count += 1;
        }
        Ok(count)
    }

    /// Course codes in pre-order, space separated.
    pub fn pre_order_codes(&self) -> String {
        self.tree.pre_order().map(|course| course.code.as_str()).join(" ")
    }

    /// Shape of the index as a printable tree of course codes.
    ///
    /// Left children come first. A missing child is shown as `-` when its
    /// sibling exists, so left and right stay distinguishable.
    pub fn render_tree(&self) -> Tree<String> {
        fn build(node: &Node<Course>) -> Tree<String> {
            let mut tree = Tree::new(node.value().code.clone());
            if node.is_leaf() {
                return tree;
            }
            for child in [node.left(), node.right()] {
                match child {
                    Some(child) => tree.push(build(child)),
                    None => tree.push(Tree::new("-".to_string())),
                };
            }
            tree
        }

        match self.tree.root() {
            Some(root) => build(root),
            None => Tree::new("(empty)".to_string()),
        }
    }
}
