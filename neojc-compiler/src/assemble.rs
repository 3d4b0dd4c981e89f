//! Address resolution: lays out the converted methods, turns labels and
//! call references into relative offsets and narrows long jumps.

use neojc_isa::{OpCode, OperandSize};

use crate::error::{CompileError, Result};
use crate::instruction::{Label, NeoInstruction, Target};
use crate::method::NeoMethod;
use crate::module::NeoModule;
use crate::unit::CompileOptions;

/// An assembled script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub bytes: Vec<u8>,
    /// Module name and start offset of every method, in layout order.
    pub methods: Vec<(String, usize)>,
}

impl Script {
    /// Start offset of the method named `name`.
    pub fn method_offset(&self, name: &str) -> Option<usize> {
        self.methods.iter().find(|(n, _)| n == name).map(|(_, o)| *o)
    }
}

/// Current opcode and offset of every instruction, per method.
struct Layout {
    opcodes: Vec<Vec<OpCode>>,
    offsets: Vec<Vec<usize>>,
    starts: Vec<usize>,
}

impl Layout {
    fn new(methods: &[&NeoMethod]) -> Self {
        let opcodes = methods
            .iter()
            .map(|m| m.instructions().iter().map(|i| i.opcode).collect())
            .collect();
        let mut layout = Layout {
            opcodes,
            offsets: Vec::new(),
            starts: Vec::new(),
        };
        layout.compute_offsets(methods);
        layout
    }

    fn compute_offsets(&mut self, methods: &[&NeoMethod]) {
        self.offsets.clear();
        self.starts.clear();
        let mut address = 0;
        for (m, method) in methods.iter().enumerate() {
            self.starts.push(address);
            let mut offsets = Vec::with_capacity(method.len());
            for (insn, op) in method.instructions().iter().zip(&self.opcodes[m]) {
                offsets.push(address);
                address += encoded_size(*op, insn);
            }
            self.offsets.push(offsets);
        }
    }
}

fn encoded_size(opcode: OpCode, insn: &NeoInstruction) -> usize {
    match (&insn.target, opcode.operand_size()) {
        (Target::None, _) => insn.size(),
        (_, OperandSize::Fixed(n)) => 1 + n,
        (_, OperandSize::Prefixed(_)) => insn.size(),
    }
}

impl NeoModule {
    /// Assemble all methods into one script, in registration order.
    pub fn assemble(&self, options: &CompileOptions) -> Result<Script> {
        if let Some(key) = self.pending().next() {
            return Err(CompileError::MalformedInput {
                method: key.to_string(),
                detail: "method was registered but never converted".to_string(),
            });
        }
        let methods: Vec<&NeoMethod> = self.methods().collect();
        let mut layout = Layout::new(&methods);

        // Narrowing only shrinks code, so an offset that fits once keeps fitting.
        let mut rounds = 0;
        while options.optimize {
            let mut changed = false;
            for (m, method) in methods.iter().enumerate() {
                for (i, insn) in method.instructions().iter().enumerate() {
                    let Some(short) = layout.opcodes[m][i].short_form() else {
                        continue;
                    };
                    let deltas = relative_targets(&methods, &layout, m, i)?;
                    if !deltas.is_empty() && deltas.iter().all(|d| i8::try_from(*d).is_ok()) {
                        log::trace!("narrowed {} in {}", insn.opcode, method.name());
                        layout.opcodes[m][i] = short;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
            layout.compute_offsets(&methods);
            rounds += 1;
        }
        log::debug!("assembled {} methods after {rounds} narrowing rounds", methods.len());

        let mut bytes = Vec::new();
        for (m, method) in methods.iter().enumerate() {
            for (i, insn) in method.instructions().iter().enumerate() {
                let opcode = layout.opcodes[m][i];
                bytes.push(opcode.byte());
                if matches!(insn.target, Target::None) {
                    bytes.extend_from_slice(&insn.operand);
                    continue;
                }
                let deltas = relative_targets(&methods, &layout, m, i)?;
                let OperandSize::Fixed(size) = opcode.operand_size() else {
                    return Err(malformed(method, format!("{opcode} cannot carry a target")));
                };
                let width = size / deltas.len().max(1);
                for delta in deltas {
                    encode_offset(&mut bytes, delta, width, method)?;
                }
            }
        }
        let names = methods
            .iter()
            .zip(&layout.starts)
            .map(|(m, start)| (m.name().to_string(), *start))
            .collect();
        Ok(Script { bytes, methods: names })
    }
}

/// Offsets of the targets of instruction `i` of method `m`, relative to the
/// instruction itself. A try without catch or finally has offset 0 for it.
fn relative_targets(methods: &[&NeoMethod], layout: &Layout, m: usize, i: usize) -> Result<Vec<i64>> {
    let method = methods[m];
    let here = layout.offsets[m][i] as i64;
    let label_offset = |label: Label| -> Result<i64> {
        method
            .label_index(label)
            .and_then(|index| layout.offsets[m].get(index))
            .map(|offset| *offset as i64 - here)
            .ok_or_else(|| malformed(method, format!("jump to unbound label {label}")))
    };
    match &method.instructions()[i].target {
        Target::None => Ok(Vec::new()),
        Target::Jump(label) => Ok(vec![label_offset(*label)?]),
        Target::Call(callee) => {
            let start = layout
                .starts
                .get(callee.index())
                .ok_or_else(|| malformed(method, format!("call to unknown method #{}", callee.index())))?;
            Ok(vec![*start as i64 - here])
        }
        Target::Try { catch, finally } => {
            let catch = catch.map(label_offset).transpose()?.unwrap_or(0);
            let finally = finally.map(label_offset).transpose()?.unwrap_or(0);
            Ok(vec![catch, finally])
        }
    }
}

fn encode_offset(bytes: &mut Vec<u8>, delta: i64, width: usize, method: &NeoMethod) -> Result<()> {
    match width {
        1 => {
            let d = i8::try_from(delta).map_err(|_| malformed(method, format!("offset {delta} exceeds one byte")))?;
            bytes.push(d as u8);
        }
        4 => {
            let d = i32::try_from(delta).map_err(|_| malformed(method, format!("offset {delta} exceeds four bytes")))?;
            bytes.extend_from_slice(&d.to_le_bytes());
        }
        _ => return Err(malformed(method, format!("unsupported offset width {width}"))),
    }
    Ok(())
}

fn malformed(method: &NeoMethod, detail: String) -> CompileError {
    CompileError::MalformedInput {
        method: method.display_name(),
        detail,
    }
}
