//! Program assembly: prelude, global scripts, mode wrappers and dispatch
//!
//! ```text
//! 'use strict';              prelude
//! ///////////////////////    one block per global script
//! const Title = (function () { … })();    one wrapper per mode
//! let _activeMode = …        dispatch loop
//! ```

use super::sections::SectionName;

/// Separates the blocks of the emitted program
pub const SEPARATOR: &str = "\n\n////////////////////////////////////////////////////////////////////////////////////\n\n";

/// Separates the sections inside one mode wrapper
pub const SECTION_SEPARATOR: &str =
    "//--------------------------------------------------------------------------------";

/// Host identifiers that scripts must never reach
const SHADOWED_GLOBALS: &str = "const _Object = {}.constructor; let navigator, parent, Object, Array, String, Number, location, document, window, print, Math, RegExp, Date;";

const FLIP_Y_TRANSFORM: &str = "setTransform(xy(0, screenSize.y), xy(1, -1), 0, 1);";

/// Value a mode's frame sequence yields after every frame
///
/// The host signals a mode switch by throwing an object with a `nextMode`
/// field; the frame sequence turns that into `SwitchMode` instead of
/// letting it unwind through the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSignal {
    Continue,
    /// Carries a host expression that evaluates to the next mode
    SwitchMode(String),
}

impl FrameSignal {
    pub fn tag(&self) -> &'static str {
        match self {
            FrameSignal::Continue => "Continue",
            FrameSignal::SwitchMode(_) => "SwitchMode",
        }
    }

    /// Host object literal for this signal
    pub fn literal(&self) -> String {
        match self {
            FrameSignal::Continue => format!("{{kind: '{}'}}", self.tag()),
            FrameSignal::SwitchMode(mode) => {
                format!("{{kind: '{}', mode: {}}}", self.tag(), mode)
            }
        }
    }
}

/// One compiled section of a mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSection {
    pub name: SectionName,
    /// File lines before the section, for the origin marker
    pub offset: usize,
    pub code: String,
}

/// Accumulates the blocks of one program
#[derive(Debug, Clone, Default)]
pub struct ProgramWriter {
    blocks: Vec<String>,
    origin_markers: bool,
}

impl ProgramWriter {
    pub fn new(origin_markers: bool) -> Self {
        ProgramWriter {
            blocks: Vec::new(),
            origin_markers,
        }
    }

    pub fn prelude(&mut self, flip_y: bool) {
        let mut prelude = format!("'use strict';\n{}", SHADOWED_GLOBALS);
        if flip_y {
            prelude.push('\n');
            prelude.push_str(FLIP_Y_TRANSFORM);
        }
        self.blocks.push(prelude);
    }

    pub fn global(&mut self, source_id: &str, code: &str) {
        let mut block = String::new();
        if self.origin_markers {
            block.push_str(&format!("/*@\"{}\"*/\n", source_id));
        }
        block.push_str(code);
        self.blocks.push(block);
    }

    fn marked(&self, source_id: &str, section: &CompiledSection) -> String {
        if self.origin_markers {
            format!("/*@\"{}\":{}*/\n{}", source_id, section.offset, section.code)
        } else {
            section.code.clone()
        }
    }

    /// Wraps the compiled sections of a mode into one frozen mode object
    ///
    /// `init` runs once when the wrapper is evaluated; `enter` and `leave`
    /// become plain functions; `frame` runs inside an endless generator that
    /// yields a [`FrameSignal`] after every frame.
    pub fn mode(&mut self, name: &str, source_id: &str, sections: &[CompiledSection]) {
        let code = |wanted: SectionName| {
            sections
                .iter()
                .find(|s| s.name == wanted)
                .map(|s| self.marked(source_id, s))
                .unwrap_or_default()
        };

        let switch = FrameSignal::SwitchMode("ex.nextMode".to_string());
        let mut out = String::new();
        out.push_str(&format!("const {} = (function () {{\n", name));
        out.push_str(&code(SectionName::Init));
        out.push('\n');
        out.push_str(SECTION_SEPARATOR);
        out.push_str("\nfunction _enter() {\n");
        out.push_str(&code(SectionName::Enter));
        out.push_str("\n}\n");
        out.push_str(SECTION_SEPARATOR);
        out.push_str("\nfunction _leave() {\n");
        out.push_str(&code(SectionName::Leave));
        out.push_str("\n}\n");
        out.push_str(SECTION_SEPARATOR);
        out.push_str(&format!(
            "\nconst _frame = (function* () {{ let __yieldCounter = 0; while (true) {{ let _signal = {}; try {{ _processFrameHooks();\n",
            FrameSignal::Continue.literal()
        ));
        out.push_str(&code(SectionName::Frame));
        out.push_str(&format!(
            "\n_show(); }} catch (ex) {{ if (! ex.nextMode) {{ throw ex; }} _updateInput(); _signal = {}; }} yield _signal; }} }})();\n",
            switch.literal()
        ));
        out.push_str(SECTION_SEPARATOR);
        out.push_str(&format!(
            "\nreturn _Object.freeze({{_enter: _enter, _frame: _frame, _leave: _leave, name: '{}'}});\n}})();",
            name
        ));
        self.blocks.push(out);
    }

    /// Starts `start_mode` and resumes the active mode's frame sequence
    /// once per host frame
    pub fn dispatch(&mut self, start_mode: &str) {
        let switch = FrameSignal::SwitchMode(String::new());
        self.blocks.push(format!(
            "let _activeMode = {start};\n\
             try {{ setMode({start}, \"Game start\"); }} catch (ex) {{ if (! ex.nextMode) {{ throw ex; }} _activeMode = ex.nextMode; }}\n\
             while (true) {{\n\
             const _signal = _activeMode._frame.next().value;\n\
             if (_signal && _signal.kind === '{tag}') {{ _activeMode = _signal.mode; }}\n\
             yield;\n\
             }}",
            start = start_mode,
            tag = switch.tag()
        ));
    }

    pub fn finish(self) -> String {
        self.blocks.join(SEPARATOR)
    }
}
