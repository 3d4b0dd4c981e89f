//! Target method builder.

use std::collections::HashMap;
use std::rc::Rc;

use neojc_class::{ClassNode, Insn, MethodNode};
use neojc_isa::OpCode;

use crate::error::{CompileError, Result};
use crate::instruction::{Label, NeoInstruction};
use crate::module::{MethodId, MethodKey};

pub const MAX_PARAMS: usize = 255;
pub const MAX_LOCALS: usize = 255;

const EXCEPTION: &str = "java/lang/Exception";

/// Name of a method in the compiled module. The static initializer becomes
/// `_initialize`.
pub fn target_name(source_name: &str) -> String {
    match source_name {
        "<clinit>" => "_initialize".to_string(),
        other => other.to_string(),
    }
}

/// A method of a loaded class, with navigation over its instruction stream.
#[derive(Debug, Clone)]
pub struct SourceMethod {
    pub class: Rc<ClassNode>,
    pub index: usize,
}

impl SourceMethod {
    pub fn new(class: Rc<ClassNode>, index: usize) -> Self {
        Self { class, index }
    }

    pub fn node(&self) -> &MethodNode {
        &self.class.methods[self.index]
    }

    pub fn insns(&self) -> &[Insn] {
        &self.node().insns
    }

    pub fn insn(&self, index: usize) -> Option<&Insn> {
        self.insns().get(index)
    }

    pub fn key(&self) -> MethodKey {
        let node = self.node();
        MethodKey::new(&self.class.name, &node.name, &node.desc)
    }

    /// `Class.method`, for diagnostics.
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.class.simple_name(), self.node().name)
    }

    /// Index of the first real instruction after `index`.
    pub fn next_real(&self, index: usize) -> Option<usize> {
        (index + 1..self.insns().len()).find(|&i| !self.insns()[i].is_pseudo())
    }

    /// Index of the last real instruction before `index`.
    pub fn prev_real(&self, index: usize) -> Option<usize> {
        (0..index).rev().find(|&i| !self.insns()[i].is_pseudo())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TryRegion {
    start: neojc_class::Label,
    catch: Option<Label>,
    finally: Option<Label>,
}

/// The target form of one source method, built instruction by instruction.
#[derive(Debug)]
pub struct NeoMethod {
    id: MethodId,
    source: SourceMethod,
    name: String,
    instructions: Vec<NeoInstruction>,
    /// Label to index of the instruction it marks.
    labels: HashMap<Label, usize>,
    pending_labels: Vec<Label>,
    pending_line: Option<u32>,
    next_synthetic: u32,
    /// JVM slot to argument index.
    params: HashMap<u16, u8>,
    /// JVM slot to local index.
    locals: HashMap<u16, u8>,
    param_count: usize,
    local_count: usize,
    try_regions: Vec<TryRegion>,
}

impl NeoMethod {
    /// Create the method and map its variable slots. Emits INITSLOT when the
    /// method has parameters or locals.
    pub fn new(id: MethodId, source: SourceMethod) -> Result<Self> {
        let name = target_name(&source.node().name);
        let mut method = Self {
            id,
            source,
            name,
            instructions: Vec::new(),
            labels: HashMap::new(),
            pending_labels: Vec::new(),
            pending_line: None,
            next_synthetic: 0,
            params: HashMap::new(),
            locals: HashMap::new(),
            param_count: 0,
            local_count: 0,
            try_regions: Vec::new(),
        };
        method.map_slots()?;
        method.collect_try_regions()?;
        if method.param_count > 0 || method.local_count > 0 {
            method.add(NeoInstruction::with_operand(
                OpCode::Initslot,
                vec![method.local_count as u8, method.param_count as u8],
            ));
        }
        Ok(method)
    }

    fn map_slots(&mut self) -> Result<()> {
        let node = self.source.node();
        let desc = node.descriptor()?;
        let mut slot: u16 = 0;
        let mut params = Vec::new();
        if !node.is_static() {
            params.push(slot);
            slot += 1;
        }
        for ty in &desc.params {
            params.push(slot);
            slot += ty.slot_size();
        }
        if params.len() > MAX_PARAMS {
            return Err(self.limit("parameters", params.len(), MAX_PARAMS));
        }
        let locals: Vec<u16> = (slot..node.max_locals.max(slot)).collect();
        if locals.len() > MAX_LOCALS {
            return Err(self.limit("local variables", locals.len(), MAX_LOCALS));
        }
        self.param_count = params.len();
        self.local_count = locals.len();
        self.params = params.into_iter().zip(0u8..).collect();
        self.locals = locals.into_iter().zip(0u8..).collect();
        Ok(())
    }

    fn limit(&self, what: &'static str, count: usize, limit: usize) -> CompileError {
        CompileError::LimitExceeded {
            what,
            count,
            limit,
            method: self.display_name(),
        }
    }

    // Pairs each typed handler with its catch-all twin (the finally block),
    // then picks up try/finally regions without a catch.
    fn collect_try_regions(&mut self) -> Result<()> {
        let blocks = &self.source.node().try_catch_blocks;
        if let Some(ty) = blocks.iter().filter_map(|b| b.ty.as_deref()).find(|ty| *ty != EXCEPTION) {
            return Err(CompileError::UnsupportedException {
                ty: ty.to_string(),
                method: self.display_name(),
            });
        }
        let mut used = vec![false; blocks.len()];
        let mut regions = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            if block.ty.is_none() {
                continue;
            }
            used[i] = true;
            if let Some(j) = blocks
                .iter()
                .position(|b| b.ty.is_none() && b.start == block.handler)
            {
                used[j] = true;
            }
            let finally = blocks
                .iter()
                .position(|b| b.ty.is_none() && b.start == block.start && b.end == block.end);
            if let Some(j) = finally {
                used[j] = true;
            }
            regions.push(TryRegion {
                start: block.start,
                catch: Some(Label::Source(block.handler)),
                finally: finally.map(|j| Label::Source(blocks[j].handler)),
            });
        }
        for (i, block) in blocks.iter().enumerate() {
            if !used[i] && block.ty.is_none() && block.start != block.handler {
                regions.push(TryRegion {
                    start: block.start,
                    catch: None,
                    finally: Some(Label::Source(block.handler)),
                });
            }
        }
        self.try_regions = regions;
        Ok(())
    }

    /// Insert a TRY_L in front of the first instruction of every try region.
    pub(crate) fn insert_try_instructions(&mut self) -> Result<()> {
        for region in std::mem::take(&mut self.try_regions) {
            let start = Label::Source(region.start);
            let index = *self.labels.get(&start).ok_or_else(|| CompileError::MalformedInput {
                method: self.display_name(),
                detail: format!("try block starts at unbound label {start}"),
            })?;
            self.insert(index, NeoInstruction::try_block(region.catch, region.finally));
        }
        Ok(())
    }

    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn source(&self) -> &SourceMethod {
        &self.source
    }

    pub fn owner(&self) -> &Rc<ClassNode> {
        &self.source.class
    }

    /// Name used in the compiled module.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> String {
        self.source.display_name()
    }

    pub fn instructions(&self) -> &[NeoInstruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    pub fn local_count(&self) -> usize {
        self.local_count
    }

    /// Instruction index marked by `label`.
    pub fn label_index(&self, label: Label) -> Option<usize> {
        self.labels.get(&label).copied()
    }

    /// Append an instruction. Pending labels and the pending line number
    /// attach to it.
    pub fn add(&mut self, mut insn: NeoInstruction) {
        let index = self.instructions.len();
        for label in self.pending_labels.drain(..) {
            self.labels.insert(label, index);
        }
        if let Some(line) = self.pending_line.take() {
            insn.line = Some(line);
        }
        self.instructions.push(insn);
    }

    pub fn add_op(&mut self, opcode: OpCode) {
        self.add(NeoInstruction::new(opcode));
    }

    pub fn add_jump(&mut self, opcode: OpCode, label: Label) {
        self.add(NeoInstruction::jump(opcode, label));
    }

    /// The next appended instruction becomes the target of `label`.
    pub fn set_current_label(&mut self, label: Label) {
        self.pending_labels.push(label);
    }

    /// Whether a label waits for the next instruction. The last instruction
    /// then does not dominate what follows, another path may join here.
    pub fn has_pending_labels(&self) -> bool {
        !self.pending_labels.is_empty()
    }

    pub fn set_line(&mut self, line: u32) {
        self.pending_line = Some(line);
    }

    pub fn new_label(&mut self) -> Label {
        let label = Label::Synthetic(self.next_synthetic);
        self.next_synthetic += 1;
        label
    }

    pub fn last(&self) -> Option<&NeoInstruction> {
        self.instructions.last()
    }

    /// Remove the last instruction. Labels that marked it move on to the
    /// next appended instruction.
    pub fn remove_last(&mut self) -> Option<NeoInstruction> {
        let insn = self.instructions.pop()?;
        let index = self.instructions.len();
        let mut moved: Vec<Label> = self
            .labels
            .iter()
            .filter(|(_, i)| **i == index)
            .map(|(l, _)| *l)
            .collect();
        moved.sort();
        for label in &moved {
            self.labels.remove(label);
        }
        moved.append(&mut self.pending_labels);
        self.pending_labels = moved;
        if self.pending_line.is_none() {
            self.pending_line = insn.line;
        }
        Some(insn)
    }

    /// Replace the last instruction, keeping its labels and line number.
    pub fn replace_last(&mut self, mut insn: NeoInstruction) -> Result<()> {
        let last = self.instructions.last_mut().ok_or_else(|| CompileError::MalformedInput {
            method: self.source.display_name(),
            detail: "no instruction to replace".to_string(),
        })?;
        insn.line = last.line;
        *last = insn;
        Ok(())
    }

    /// Insert an instruction before `index`. Labels marking `index` keep
    /// pointing at the inserted instruction.
    fn insert(&mut self, index: usize, insn: NeoInstruction) {
        for i in self.labels.values_mut() {
            if *i > index {
                *i += 1;
            }
        }
        self.instructions.insert(index, insn);
    }

    pub(crate) fn param_index(&self, slot: u16) -> Option<u8> {
        self.params.get(&slot).copied()
    }

    pub(crate) fn local_index(&self, slot: u16) -> Option<u8> {
        self.locals.get(&slot).copied()
    }
}
