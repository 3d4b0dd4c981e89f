use serde::{Deserialize, Serialize};

use crate::JvmOpcode;

/// A position marker in a method's instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub u32);

/// Constant pool value loaded by `ldc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Constant {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// A class literal, by internal name.
    Type(String),
}

/// A reference to a field or method: owner internal name, member name and descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub owner: String,
    pub name: String,
    pub desc: String,
}

impl MemberRef {
    pub fn new(owner: &str, name: &str, desc: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            desc: desc.to_string(),
        }
    }
}

/// A decoded instruction, including the label and line-number pseudo-instructions
/// that a class reader interleaves with real opcodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insn {
    Label {
        label: Label,
    },
    Line {
        line: u32,
    },
    /// Operand-less instruction (also the short `xLOAD_n`/`xSTORE_n` forms).
    Op {
        opcode: JvmOpcode,
    },
    /// `BIPUSH`, `SIPUSH` and `NEWARRAY` (array type code).
    Int {
        opcode: JvmOpcode,
        operand: i32,
    },
    Var {
        opcode: JvmOpcode,
        var: u16,
    },
    Iinc {
        var: u16,
        incr: i32,
    },
    Jump {
        opcode: JvmOpcode,
        label: Label,
    },
    Ldc {
        value: Constant,
    },
    /// `NEW`, `ANEWARRAY`, `CHECKCAST` and `INSTANCEOF`.
    Type {
        opcode: JvmOpcode,
        desc: String,
    },
    Field {
        opcode: JvmOpcode,
        field: MemberRef,
    },
    Method {
        opcode: JvmOpcode,
        method: MemberRef,
        #[serde(default)]
        itf: bool,
    },
    InvokeDynamic {
        name: String,
        desc: String,
    },
    TableSwitch {
        min: i32,
        max: i32,
        default: Label,
        labels: Vec<Label>,
    },
    LookupSwitch {
        default: Label,
        keys: Vec<i32>,
        labels: Vec<Label>,
    },
    MultiANewArray {
        desc: String,
        dims: u8,
    },
}

impl Insn {
    /// The opcode of a real instruction; `None` for labels and line numbers.
    pub fn opcode(&self) -> Option<JvmOpcode> {
        Some(match self {
            Insn::Label { .. } | Insn::Line { .. } => return None,
            Insn::Op { opcode }
            | Insn::Int { opcode, .. }
            | Insn::Var { opcode, .. }
            | Insn::Jump { opcode, .. }
            | Insn::Type { opcode, .. }
            | Insn::Field { opcode, .. }
            | Insn::Method { opcode, .. } => *opcode,
            Insn::Iinc { .. } => JvmOpcode::Iinc,
            Insn::Ldc { .. } => JvmOpcode::Ldc,
            Insn::InvokeDynamic { .. } => JvmOpcode::Invokedynamic,
            Insn::TableSwitch { .. } => JvmOpcode::Tableswitch,
            Insn::LookupSwitch { .. } => JvmOpcode::Lookupswitch,
            Insn::MultiANewArray { .. } => JvmOpcode::Multianewarray,
        })
    }

    pub fn is_pseudo(&self) -> bool {
        self.opcode().is_none()
    }

    pub fn int_operand(&self) -> Option<i32> {
        match self {
            Insn::Int { operand, .. } => Some(*operand),
            _ => None,
        }
    }

    pub fn method_ref(&self) -> Option<&MemberRef> {
        match self {
            Insn::Method { method, .. } => Some(method),
            _ => None,
        }
    }

    pub fn field_ref(&self) -> Option<&MemberRef> {
        match self {
            Insn::Field { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn jump_label(&self) -> Option<Label> {
        match self {
            Insn::Jump { label, .. } => Some(*label),
            _ => None,
        }
    }

    pub fn type_desc(&self) -> Option<&str> {
        match self {
            Insn::Type { desc, .. } => Some(desc),
            _ => None,
        }
    }
}
