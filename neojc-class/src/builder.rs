//! Programmatic construction of classes and method bodies.

use crate::JvmOpcode;
use crate::class::{AccessFlags, Annotation, ClassNode, FieldNode, MethodNode, TryCatchBlock};
use crate::descriptor::MethodDescriptor;
use crate::insn::{Constant, Insn, Label, MemberRef};
use crate::pool::OBJECT;

/// Builder for a [`ClassNode`].
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    class: ClassNode,
}

impl ClassBuilder {
    /// A public class extending `java/lang/Object`.
    pub fn new(name: &str) -> Self {
        Self {
            class: ClassNode {
                name: name.to_string(),
                super_name: Some(OBJECT.to_string()),
                interfaces: Vec::new(),
                access: AccessFlags::PUBLIC.bits(),
                fields: Vec::new(),
                methods: Vec::new(),
                annotations: Vec::new(),
            },
        }
    }

    pub fn extends(mut self, super_name: &str) -> Self {
        self.class.super_name = Some(super_name.to_string());
        self
    }

    pub fn field(mut self, name: &str, desc: &str) -> Self {
        self.class.fields.push(FieldNode {
            name: name.to_string(),
            desc: desc.to_string(),
            access: AccessFlags::PUBLIC.bits(),
            annotations: Vec::new(),
        });
        self
    }

    pub fn static_field(mut self, name: &str, desc: &str) -> Self {
        self.class.fields.push(FieldNode {
            name: name.to_string(),
            desc: desc.to_string(),
            access: (AccessFlags::PUBLIC | AccessFlags::STATIC).bits(),
            annotations: Vec::new(),
        });
        self
    }

    /// Annotate the field added last.
    pub fn field_annotation(mut self, annotation: Annotation) -> Self {
        if let Some(field) = self.class.fields.last_mut() {
            field.annotations.push(annotation);
        }
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.class.interfaces.push(interface.to_string());
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.class.annotations.push(annotation);
        self
    }

    pub fn method(mut self, method: MethodNode) -> Self {
        self.class.methods.push(method);
        self
    }

    pub fn build(self) -> ClassNode {
        self.class
    }
}

/// Builder for a [`MethodNode`] and its instruction stream.
///
/// `max_locals` is derived from the descriptor and the variable instructions
/// unless set explicitly.
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    method: MethodNode,
    next_label: u32,
    explicit_max_locals: bool,
}

impl MethodBuilder {
    /// A public static method.
    pub fn new(name: &str, desc: &str) -> Self {
        Self {
            method: MethodNode {
                name: name.to_string(),
                desc: desc.to_string(),
                access: (AccessFlags::PUBLIC | AccessFlags::STATIC).bits(),
                max_locals: 0,
                insns: Vec::new(),
                try_catch_blocks: Vec::new(),
                annotations: Vec::new(),
            },
            next_label: 0,
            explicit_max_locals: false,
        }
    }

    /// A public instance method.
    pub fn instance(name: &str, desc: &str) -> Self {
        let mut builder = Self::new(name, desc);
        builder.method.access = AccessFlags::PUBLIC.bits();
        builder
    }

    pub fn access(&mut self, flags: AccessFlags) -> &mut Self {
        self.method.access = flags.bits();
        self
    }

    pub fn max_locals(&mut self, max_locals: u16) -> &mut Self {
        self.method.max_locals = max_locals;
        self.explicit_max_locals = true;
        self
    }

    pub fn annotation(&mut self, annotation: Annotation) -> &mut Self {
        self.method.annotations.push(annotation);
        self
    }

    pub fn try_catch(&mut self, start: Label, end: Label, handler: Label, ty: Option<&str>) -> &mut Self {
        self.method.try_catch_blocks.push(TryCatchBlock {
            start,
            end,
            handler,
            ty: ty.map(str::to_string),
        });
        self
    }

    /// Allocate a fresh label; it is placed in the stream with [`place`](Self::place).
    pub fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn place(&mut self, label: Label) -> &mut Self {
        self.insn(Insn::Label { label })
    }

    pub fn line(&mut self, line: u32) -> &mut Self {
        self.insn(Insn::Line { line })
    }

    pub fn insn(&mut self, insn: Insn) -> &mut Self {
        self.method.insns.push(insn);
        self
    }

    pub fn op(&mut self, opcode: JvmOpcode) -> &mut Self {
        self.insn(Insn::Op { opcode })
    }

    pub fn int(&mut self, opcode: JvmOpcode, operand: i32) -> &mut Self {
        self.insn(Insn::Int { opcode, operand })
    }

    pub fn var(&mut self, opcode: JvmOpcode, var: u16) -> &mut Self {
        self.insn(Insn::Var { opcode, var })
    }

    pub fn iinc(&mut self, var: u16, incr: i32) -> &mut Self {
        self.insn(Insn::Iinc { var, incr })
    }

    pub fn jump(&mut self, opcode: JvmOpcode, label: Label) -> &mut Self {
        self.insn(Insn::Jump { opcode, label })
    }

    pub fn ldc(&mut self, value: Constant) -> &mut Self {
        self.insn(Insn::Ldc { value })
    }

    pub fn ldc_str(&mut self, value: &str) -> &mut Self {
        self.ldc(Constant::String(value.to_string()))
    }

    pub fn type_insn(&mut self, opcode: JvmOpcode, desc: &str) -> &mut Self {
        self.insn(Insn::Type {
            opcode,
            desc: desc.to_string(),
        })
    }

    pub fn field(&mut self, opcode: JvmOpcode, owner: &str, name: &str, desc: &str) -> &mut Self {
        self.insn(Insn::Field {
            opcode,
            field: MemberRef::new(owner, name, desc),
        })
    }

    pub fn invoke(&mut self, opcode: JvmOpcode, owner: &str, name: &str, desc: &str) -> &mut Self {
        self.insn(Insn::Method {
            opcode,
            method: MemberRef::new(owner, name, desc),
            itf: opcode == JvmOpcode::Invokeinterface,
        })
    }

    pub fn table_switch(&mut self, min: i32, default: Label, labels: &[Label]) -> &mut Self {
        self.insn(Insn::TableSwitch {
            min,
            max: min + labels.len() as i32 - 1,
            default,
            labels: labels.to_vec(),
        })
    }

    pub fn lookup_switch(&mut self, default: Label, keys: &[i32], labels: &[Label]) -> &mut Self {
        self.insn(Insn::LookupSwitch {
            default,
            keys: keys.to_vec(),
            labels: labels.to_vec(),
        })
    }

    pub fn build(&self) -> MethodNode {
        let mut method = self.method.clone();
        if !self.explicit_max_locals {
            method.max_locals = self.derived_max_locals();
        }
        method
    }

    fn derived_max_locals(&self) -> u16 {
        let this = u16::from(!self.method.flags().contains(AccessFlags::STATIC));
        let params = MethodDescriptor::parse(&self.method.desc)
            .map(|d| d.param_slots())
            .unwrap_or(0);
        let used = self
            .method
            .insns
            .iter()
            .filter_map(|insn| match insn {
                Insn::Var { opcode, var } => {
                    let wide = matches!(
                        opcode,
                        JvmOpcode::Lload | JvmOpcode::Lstore | JvmOpcode::Dload | JvmOpcode::Dstore
                    );
                    Some(var + if wide { 2 } else { 1 })
                }
                Insn::Iinc { var, .. } => Some(var + 1),
                // ILOAD_0 .. ASTORE_3
                Insn::Op { opcode } => {
                    let (kind, index) = opcode.mnemonic().split_once('_')?;
                    if !(kind.ends_with("LOAD") || kind.ends_with("STORE")) {
                        return None;
                    }
                    let var: u16 = index.parse().ok()?;
                    let wide = kind.starts_with('L') || kind.starts_with('D');
                    Some(var + if wide { 2 } else { 1 })
                }
                _ => None,
            })
            .max()
            .unwrap_or(0);
        used.max(this + params)
    }
}
