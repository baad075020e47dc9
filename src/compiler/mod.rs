//! # nanoscript Compiler - nanoscript to generator-based JavaScript
//!
//! Compiles single source units and whole programs (global scripts plus
//! modes) into one host script that runs inside a generator.
//!
//! ## Architecture
//!
//! ```text
//! Source → Protect → Compact → Block Tree → Plan Suspension → Lower → Unprotect
//! Manifest → Globals + Mode Sections → Mode Wrappers → Dispatch
//! ```
//!
//! Every stage keeps the unit's line count, so the emitted code for source
//! line `n` sits on host line `n` of the unit.
//!
//! ## Usage
//!
//! ```ignore
//! use nanoscript::compiler::{CompileOptions, Compiler, Suspension};
//!
//! let mut compiler = Compiler::new(CompileOptions::default());
//! let js = compiler.compile_source("for i < 3:\n    print(i)", Suspension::Allowed)?;
//! ```

pub mod desugar;
pub mod gensym;
pub mod lower;
pub mod manifest;
pub mod program;
pub mod sections;

pub use desugar::{lower_for, lower_header, lower_with, suspension_point, Lowered};
pub use gensym::Gensym;
pub use lower::{plan_suspension, Lowerer, Suspension};
pub use manifest::{
    find_start_mode, DirectorySource, GameManifest, ModeDescriptor, ModeEntry, SourceProvider,
    MANIFEST_ID, MODE_EXTENSION,
};
pub use program::{CompiledSection, FrameSignal, ProgramWriter, SECTION_SEPARATOR, SEPARATOR};
pub use sections::{split_sections, Section, SectionName, SectionTable};

use crate::error::Result;
use crate::parser::parse_unit;
use crate::source::{protect_strings, strip_comments, unprotect_strings, SourceBuffer};

/// Compilation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Emit the y-axis flip in the prelude (also enabled by the manifest)
    pub flip_y: bool,
    /// Loop passes between injected suspension points, rounded up to a
    /// power of two
    pub yield_interval: u32,
    /// Emit `/*@"file":offset*/` comments before each compiled unit
    pub origin_markers: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            flip_y: false,
            yield_interval: 8192,
            origin_markers: true,
        }
    }
}

impl CompileOptions {
    /// Mask tested against the suspension counter
    pub fn yield_mask(&self) -> u32 {
        self.yield_interval
            .max(2)
            .checked_next_power_of_two()
            .map_or(u32::MAX, |interval| interval - 1)
    }
}

/// nanoscript to JavaScript compiler
///
/// One compiler owns one [`Gensym`]; everything compiled with it can be
/// concatenated into a single program without identifier collisions.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
    gensym: Gensym,
}

impl Compiler {
    /// Create a new compiler with options
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            gensym: Gensym::new(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile one unit, keeping its line count
    ///
    /// Errors are [`crate::Error::SyntaxError`]s with unit-local lines.
    pub fn compile_source(&mut self, source: &str, suspension: Suspension) -> Result<String> {
        let text = source.replace('\r', "");

        // Phase 1: Shield literals and drop comments
        let (protected, literals) = protect_strings(&text)?;
        let stripped = strip_comments(&protected);

        // Phase 2: One logical line per statement
        let mut buffer = SourceBuffer::from_text(&stripped);
        buffer.compact()?;
        tracing::debug!(lines = buffer.len(), literals = literals.len(), "unit prepared");

        // Phase 3: Block tree
        let mut nodes = parse_unit(buffer.lines())?;
        plan_suspension(&mut nodes, suspension);

        // Phase 4: Lower
        let lines = Lowerer::new(
            &mut self.gensym,
            suspension,
            self.options.yield_mask(),
            buffer.len(),
        )
        .lower(&nodes)?;
        tracing::debug!(gensyms = self.gensym.count(), "unit lowered");

        Ok(unprotect_strings(&lines.join("\n"), &literals))
    }

    /// Compile a whole program described by a manifest
    ///
    /// Fails on the first unit that fails, with a
    /// [`crate::Error::SourceError`] naming the file and its file line.
    pub fn compile_program(
        &mut self,
        manifest: &GameManifest,
        sources: &dyn SourceProvider,
    ) -> Result<String> {
        let modes = manifest.mode_descriptors()?;
        let start = find_start_mode(&modes)?;

        let mut writer = ProgramWriter::new(self.options.origin_markers);
        writer.prelude(self.options.flip_y || manifest.flip_y);

        for id in &manifest.scripts {
            tracing::debug!(source = %id, "compiling global script");
            let text = sources.fetch(id)?;
            let code = self
                .compile_source(&text, Suspension::Forbidden)
                .map_err(|e| e.in_source(id, 0))?;
            writer.global(id, &code);
        }

        for mode in &modes {
            tracing::debug!(mode = %mode.name, source = %mode.source, "compiling mode");
            let sections = self.compile_mode(&mode.source, sources)?;
            writer.mode(&mode.name, &mode.source, &sections);
        }

        writer.dispatch(&start.name);
        Ok(writer.finish())
    }

    fn compile_mode(
        &mut self,
        source_id: &str,
        sources: &dyn SourceProvider,
    ) -> Result<Vec<CompiledSection>> {
        let text = sources.fetch(source_id)?;
        let table = split_sections(&text).map_err(|e| e.in_source(source_id, 0))?;

        let mut compiled = Vec::new();
        for (name, section) in table.iter() {
            if section.is_blank() {
                continue;
            }
            let suspension = match name {
                SectionName::Frame => Suspension::Allowed,
                _ => Suspension::Forbidden,
            };
            let code = self
                .compile_source(&section.source, suspension)
                .map_err(|e| e.in_source(source_id, section.offset))?;
            compiled.push(CompiledSection {
                name,
                offset: section.offset,
                code,
            });
        }
        Ok(compiled)
    }
}
