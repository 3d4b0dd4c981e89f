//! Emission helpers shared by the converters.

use neojc_isa::{OpCode, interop_hash, push_data, push_integer, pushed_data, pushed_integer};
use num_bigint::BigInt;

use crate::error::{CompileError, Result};
use crate::instruction::NeoInstruction;
use crate::method::NeoMethod;

/// Inline forms for indices 0..=6 of a slot family, then the generic opcode.
struct SlotOps {
    inline: [OpCode; 7],
    generic: OpCode,
}

const LDARG: SlotOps = SlotOps {
    inline: [
        OpCode::Ldarg0,
        OpCode::Ldarg1,
        OpCode::Ldarg2,
        OpCode::Ldarg3,
        OpCode::Ldarg4,
        OpCode::Ldarg5,
        OpCode::Ldarg6,
    ],
    generic: OpCode::Ldarg,
};

const STARG: SlotOps = SlotOps {
    inline: [
        OpCode::Starg0,
        OpCode::Starg1,
        OpCode::Starg2,
        OpCode::Starg3,
        OpCode::Starg4,
        OpCode::Starg5,
        OpCode::Starg6,
    ],
    generic: OpCode::Starg,
};

const LDLOC: SlotOps = SlotOps {
    inline: [
        OpCode::Ldloc0,
        OpCode::Ldloc1,
        OpCode::Ldloc2,
        OpCode::Ldloc3,
        OpCode::Ldloc4,
        OpCode::Ldloc5,
        OpCode::Ldloc6,
    ],
    generic: OpCode::Ldloc,
};

const STLOC: SlotOps = SlotOps {
    inline: [
        OpCode::Stloc0,
        OpCode::Stloc1,
        OpCode::Stloc2,
        OpCode::Stloc3,
        OpCode::Stloc4,
        OpCode::Stloc5,
        OpCode::Stloc6,
    ],
    generic: OpCode::Stloc,
};

const LDSFLD: SlotOps = SlotOps {
    inline: [
        OpCode::Ldsfld0,
        OpCode::Ldsfld1,
        OpCode::Ldsfld2,
        OpCode::Ldsfld3,
        OpCode::Ldsfld4,
        OpCode::Ldsfld5,
        OpCode::Ldsfld6,
    ],
    generic: OpCode::Ldsfld,
};

const STSFLD: SlotOps = SlotOps {
    inline: [
        OpCode::Stsfld0,
        OpCode::Stsfld1,
        OpCode::Stsfld2,
        OpCode::Stsfld3,
        OpCode::Stsfld4,
        OpCode::Stsfld5,
        OpCode::Stsfld6,
    ],
    generic: OpCode::Stsfld,
};

fn slot_insn(ops: &SlotOps, index: u8) -> NeoInstruction {
    match ops.inline.get(index as usize) {
        Some(op) => NeoInstruction::new(*op),
        None => NeoInstruction::with_operand(ops.generic, vec![index]),
    }
}

impl NeoMethod {
    pub fn push_int(&mut self, value: i64) -> Result<()> {
        self.push_bigint(&BigInt::from(value))
    }

    pub fn push_bigint(&mut self, value: &BigInt) -> Result<()> {
        self.add(push_integer(value)?.into());
        Ok(())
    }

    pub fn push_data(&mut self, data: &[u8]) -> Result<()> {
        self.add(push_data(data)?.into());
        Ok(())
    }

    pub fn push_string(&mut self, value: &str) -> Result<()> {
        self.push_data(value.as_bytes())
    }

    /// Load the JVM local variable `slot`, from the argument or local slots.
    pub fn load_local(&mut self, slot: u16) -> Result<()> {
        let insn = self.variable_insn(slot, &LDARG, &LDLOC)?;
        self.add(insn);
        Ok(())
    }

    pub fn store_local(&mut self, slot: u16) -> Result<()> {
        let insn = self.variable_insn(slot, &STARG, &STLOC)?;
        self.add(insn);
        Ok(())
    }

    fn variable_insn(&self, slot: u16, args: &SlotOps, locals: &SlotOps) -> Result<NeoInstruction> {
        if let Some(index) = self.param_index(slot) {
            return Ok(slot_insn(args, index));
        }
        if let Some(index) = self.local_index(slot) {
            return Ok(slot_insn(locals, index));
        }
        Err(CompileError::MalformedInput {
            method: self.display_name(),
            detail: format!("local variable slot {slot} is outside max_locals"),
        })
    }

    pub fn load_static(&mut self, index: u8) {
        self.add(slot_insn(&LDSFLD, index));
    }

    pub fn store_static(&mut self, index: u8) {
        self.add(slot_insn(&STSFLD, index));
    }

    pub fn add_syscall(&mut self, name: &str) {
        let hash = interop_hash(name);
        self.add(NeoInstruction::with_operand(OpCode::Syscall, hash.to_le_bytes().to_vec()));
    }

    /// The integer pushed by the last instruction, if it is an integer push
    /// and no jump lands after it.
    pub fn last_pushed_integer(&self) -> Option<BigInt> {
        if self.has_pending_labels() {
            return None;
        }
        let last = self.last()?;
        pushed_integer(last.opcode, &last.operand)
    }

    /// The bytes pushed by the last instruction, if it is a PUSHDATA and no
    /// jump lands after it.
    pub fn last_pushed_data(&self) -> Option<Vec<u8>> {
        if self.has_pending_labels() {
            return None;
        }
        let last = self.last()?;
        pushed_data(last.opcode, &last.operand).map(<[u8]>::to_vec)
    }
}

/// Emit the argument reordering for a call with `count` arguments: the JVM
/// pushes the first argument first, NeoVM expects it on top.
pub fn reverse_args(method: &mut NeoMethod, count: usize) -> Result<()> {
    match count {
        0 | 1 => {}
        2 => method.add_op(OpCode::Swap),
        3 => method.add_op(OpCode::Reverse3),
        4 => method.add_op(OpCode::Reverse4),
        n => {
            method.push_int(n as i64)?;
            method.add_op(OpCode::Reversen);
        }
    }
    Ok(())
}
