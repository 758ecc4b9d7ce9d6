//! physexport Export Pipeline
//!
//! Turns a scene graph into the physics document read by engine loaders:
//! - Transform resolution (world, parent-relative and constraint offsets)
//! - Collision collection bitmasks
//! - Per-kind constraint parameter selection
//! - Document assembly and atomic JSON output

pub mod assembler;
pub mod constraint;
pub mod document;
pub mod error;
pub mod issues;
pub mod json;
pub mod logging;
pub mod mask;
pub mod options;
pub mod transform;

use std::path::Path;

use physexport_scene::SceneGraph;

pub use assembler::Assembler;
pub use constraint::{select_params, ConstraintParams};
pub use document::{BoneConstraintRecord, ConstraintRecord, Document, RigidBodyRecord, ROOT_PARENT};
pub use error::{ExportError, ExportResult};
pub use issues::{ErrorSink, ExportIssue, IssueKind, TracingSink};
pub use json::{DocumentWriter, JsonWriteOptions};
pub use mask::encode_mask;
pub use options::{ExportOptions, Layout, LinearDampingSource, StaticPolicy};
pub use transform::{decompose, offset_a_to_b};

/// Counts for one finished export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub rigid_bodies: usize,
    pub constraints: usize,
    pub bone_constraints: usize,
    pub issues: usize,
}

impl ExportSummary {
    fn new(document: &Document, issues: usize) -> Self {
        Self {
            rigid_bodies: document.rigid_bodys.len(),
            constraints: document.constraints.len(),
            bone_constraints: document.bone_constraints.len(),
            issues,
        }
    }
}

/// Counts issues on their way to another sink
struct Counting<'a> {
    inner: &'a mut dyn ErrorSink,
    count: usize,
}

impl ErrorSink for Counting<'_> {
    fn report(&mut self, issue: ExportIssue) {
        self.count += 1;
        self.inner.report(issue);
    }
}

/// Assembles a scene and writes the document in one step
#[derive(Debug, Clone, Default)]
pub struct PhysicsExporter {
    assembler: Assembler,
    writer: DocumentWriter,
}

impl PhysicsExporter {
    pub fn new(options: ExportOptions, write_options: JsonWriteOptions) -> Self {
        Self {
            assembler: Assembler::new(options),
            writer: DocumentWriter::with_options(write_options),
        }
    }

    /// Export `scene` to `path`, atomically
    pub fn export_to_path<S>(
        &self,
        scene: &S,
        path: impl AsRef<Path>,
        sink: &mut dyn ErrorSink,
    ) -> ExportResult<ExportSummary>
    where
        S: SceneGraph + Sync + ?Sized,
    {
        let path = path.as_ref();
        logging::instrument("export_to_path", || {
            let mut counting = Counting { inner: sink, count: 0 };
            let document = self.assembler.assemble(scene, &mut counting);
            self.writer.write_to_path(&document, path)?;
            Ok(ExportSummary::new(&document, counting.count))
        })
    }

    /// Export `scene` into any byte sink
    pub fn export_to_writer<S>(
        &self,
        scene: &S,
        writer: impl std::io::Write,
        sink: &mut dyn ErrorSink,
    ) -> ExportResult<ExportSummary>
    where
        S: SceneGraph + Sync + ?Sized,
    {
        let mut counting = Counting { inner: sink, count: 0 };
        let document = self.assembler.assemble(scene, &mut counting);
        self.writer.write(&document, writer)?;
        Ok(ExportSummary::new(&document, counting.count))
    }
}
