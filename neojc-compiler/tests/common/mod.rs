#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use neojc_class::{ClassNode, ClassPool};
use neojc_compiler::*;
use neojc_isa::{Instruction, OpCode, StackItemType, decode, interop_hash, pushed_integer};
use num_traits::ToPrimitive;

pub const CONTRACT: &str = "com/example/Contract";

pub fn pool(classes: impl IntoIterator<Item = ClassNode>) -> ClassPool {
    let mut pool = ClassPool::new();
    for class in classes {
        pool.insert(class).unwrap();
    }
    pool
}

/// Compile `owner.name desc` and everything it calls.
pub fn compile(classes: impl IntoIterator<Item = ClassNode>, owner: &str, name: &str, desc: &str) -> Result<NeoModule> {
    compile_entry(Box::new(pool(classes)), owner, name, desc, CompileOptions::default())
}

pub fn unit(classes: impl IntoIterator<Item = ClassNode>) -> CompilationUnit {
    CompilationUnit::new(Box::new(pool(classes)), CompileOptions::default())
}

pub fn method<'a>(module: &'a NeoModule, name: &str) -> &'a NeoMethod {
    module
        .methods()
        .find(|m| m.name() == name)
        .unwrap_or_else(|| panic!("no method {name} in module"))
}

pub fn opcodes(method: &NeoMethod) -> Vec<OpCode> {
    method.instructions().iter().map(|i| i.opcode).collect()
}

/// Opcodes of a method without its INITSLOT.
pub fn body(method: &NeoMethod) -> Vec<OpCode> {
    opcodes(method).into_iter().filter(|op| *op != OpCode::Initslot).collect()
}

pub fn assemble(module: &NeoModule) -> Script {
    module.assemble(&CompileOptions::default()).unwrap()
}

/// Compile and run a static method with the given arguments.
pub fn run(
    classes: impl IntoIterator<Item = ClassNode>,
    owner: &str,
    name: &str,
    desc: &str,
    args: Vec<Value>,
) -> std::result::Result<Vec<Value>, String> {
    let module = compile(classes, owner, name, desc).map_err(|e| e.to_string())?;
    let script = assemble(&module);
    Vm::new(&script)?.call(name, args)
}

pub fn int(v: i64) -> Value {
    Value::Int(v)
}

pub fn bytes(s: &str) -> Value {
    Value::Bytes(s.as_bytes().to_vec())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Bytes(Vec<u8>),
    Array(Rc<RefCell<Vec<Value>>>),
}

impl Value {
    fn as_int(&self) -> std::result::Result<i64, String> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Bytes(b) if b.len() <= 8 => Ok(num_bigint::BigInt::from_signed_bytes_le(b)
                .to_i64()
                .unwrap_or_default()),
            other => Err(format!("not an integer: {other:?}")),
        }
    }

    fn as_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Bytes(b) => b.iter().any(|x| *x != 0),
            Value::Array(_) => true,
        }
    }

    fn new_array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }
}

#[derive(Default)]
struct Frame {
    return_to: Option<usize>,
    args: Vec<Value>,
    locals: Vec<Value>,
}

/// A NeoVM subset: enough to execute what the converters emit, without
/// exception handling. The only interop service is `System.Runtime.Notify`.
pub struct Vm<'a> {
    script: &'a Script,
    insns: Vec<(Instruction, usize)>,
    by_offset: HashMap<usize, usize>,
    pub stack: Vec<Value>,
    /// Events notified so far, as (name, state).
    pub notifications: Vec<(String, Value)>,
    statics: Vec<Value>,
    frames: Vec<Frame>,
}

const STEP_LIMIT: usize = 100_000;

impl<'a> Vm<'a> {
    pub fn new(script: &'a Script) -> std::result::Result<Self, String> {
        let insns = decode(&script.bytes).map_err(|e| e.to_string())?;
        let by_offset = insns.iter().enumerate().map(|(i, (_, o))| (*o, i)).collect();
        Ok(Self {
            script,
            insns,
            by_offset,
            stack: Vec::new(),
            notifications: Vec::new(),
            statics: Vec::new(),
            frames: Vec::new(),
        })
    }

    /// Call the method `name`; the first argument ends up on top of the stack.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> std::result::Result<Vec<Value>, String> {
        let start = self
            .script
            .method_offset(name)
            .ok_or_else(|| format!("no method {name}"))?;
        for arg in args.into_iter().rev() {
            self.stack.push(arg);
        }
        self.frames.push(Frame::default());
        let mut ip = self.index_at(start)?;
        for _ in 0..STEP_LIMIT {
            match self.step(ip)? {
                Some(next) => ip = next,
                None => return Ok(std::mem::take(&mut self.stack)),
            }
        }
        Err("step limit exceeded".to_string())
    }

    fn index_at(&self, offset: usize) -> std::result::Result<usize, String> {
        self.by_offset
            .get(&offset)
            .copied()
            .ok_or_else(|| format!("no instruction at offset {offset}"))
    }

    fn pop(&mut self) -> std::result::Result<Value, String> {
        self.stack.pop().ok_or_else(|| "stack underflow".to_string())
    }

    fn pop_int(&mut self) -> std::result::Result<i64, String> {
        self.pop()?.as_int()
    }

    fn peek(&self, n: usize) -> std::result::Result<Value, String> {
        self.stack
            .len()
            .checked_sub(n + 1)
            .map(|i| self.stack[i].clone())
            .ok_or_else(|| "stack underflow".to_string())
    }

    fn frame(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("no frame")
    }

    fn step(&mut self, ip: usize) -> std::result::Result<Option<usize>, String> {
        let (insn, offset) = self.insns[ip].clone();
        let next = ip + 1;
        let op = insn.opcode;
        let byte = op.byte();
        let jump = |vm: &Self| -> std::result::Result<usize, String> {
            let delta = insn.jump_offset().ok_or("jump without offset")?;
            vm.index_at((offset as i64 + i64::from(delta)) as usize)
        };

        if let Some(value) = pushed_integer(op, &insn.operand) {
            self.stack.push(Value::Int(value.to_i64().ok_or("integer too large")?));
            return Ok(Some(next));
        }
        match byte {
            // LDSFLD0..LDARG
            0x58..=0x5F | 0x68..=0x6F | 0x78..=0x7F => {
                let index = if matches!(op, OpCode::Ldsfld | OpCode::Ldloc | OpCode::Ldarg) {
                    insn.operand[0] as usize
                } else {
                    (byte & 0x07) as usize
                };
                let value = match byte {
                    0x58..=0x5F => self.statics.get(index).cloned().unwrap_or(Value::Null),
                    0x68..=0x6F => self.frame().locals.get(index).cloned().ok_or("bad local")?,
                    _ => self.frame().args.get(index).cloned().ok_or("bad argument")?,
                };
                self.stack.push(value);
                return Ok(Some(next));
            }
            0x60..=0x67 | 0x70..=0x77 | 0x80..=0x87 => {
                let index = if matches!(op, OpCode::Stsfld | OpCode::Stloc | OpCode::Starg) {
                    insn.operand[0] as usize
                } else {
                    (byte & 0x07) as usize
                };
                let value = self.pop()?;
                let slots = match byte {
                    0x60..=0x67 => &mut self.statics,
                    0x70..=0x77 => &mut self.frame().locals,
                    _ => &mut self.frame().args,
                };
                if slots.len() <= index {
                    slots.resize(index + 1, Value::Null);
                }
                slots[index] = value;
                return Ok(Some(next));
            }
            _ => {}
        }

        match op {
            OpCode::Pushnull => self.stack.push(Value::Null),
            OpCode::Pusht => self.stack.push(Value::Bool(true)),
            OpCode::Pushf => self.stack.push(Value::Bool(false)),
            OpCode::Pushdata1 | OpCode::Pushdata2 | OpCode::Pushdata4 => self.stack.push(Value::Bytes(insn.operand.clone())),
            OpCode::Nop | OpCode::Try | OpCode::TryL => {}
            OpCode::Initslot => {
                let (locals, params) = (insn.operand[0] as usize, insn.operand[1] as usize);
                let mut args = Vec::with_capacity(params);
                for _ in 0..params {
                    args.push(self.pop()?);
                }
                let frame = self.frame();
                frame.args = args;
                frame.locals = vec![Value::Null; locals];
            }
            OpCode::Jmp | OpCode::JmpL => return jump(self).map(Some),
            OpCode::Jmpif | OpCode::JmpifL | OpCode::Jmpifnot | OpCode::JmpifnotL => {
                let taken = self.pop()?.as_bool() == matches!(op, OpCode::Jmpif | OpCode::JmpifL);
                return if taken { jump(self).map(Some) } else { Ok(Some(next)) };
            }
            OpCode::Jmpeq
            | OpCode::JmpeqL
            | OpCode::Jmpne
            | OpCode::JmpneL
            | OpCode::Jmpgt
            | OpCode::JmpgtL
            | OpCode::Jmpge
            | OpCode::JmpgeL
            | OpCode::Jmplt
            | OpCode::JmpltL
            | OpCode::Jmple
            | OpCode::JmpleL => {
                let x2 = self.pop_int()?;
                let x1 = self.pop_int()?;
                let taken = match op.short_form().unwrap_or(op) {
                    OpCode::Jmpeq => x1 == x2,
                    OpCode::Jmpne => x1 != x2,
                    OpCode::Jmpgt => x1 > x2,
                    OpCode::Jmpge => x1 >= x2,
                    OpCode::Jmplt => x1 < x2,
                    _ => x1 <= x2,
                };
                return if taken { jump(self).map(Some) } else { Ok(Some(next)) };
            }
            OpCode::Call | OpCode::CallL => {
                let target = jump(self)?;
                self.frames.push(Frame {
                    return_to: Some(next),
                    ..Frame::default()
                });
                return Ok(Some(target));
            }
            OpCode::Ret => {
                let frame = self.frames.pop().ok_or("return without frame")?;
                return Ok(frame.return_to);
            }
            OpCode::Throw => return Err(format!("thrown: {:?}", self.pop()?)),
            OpCode::Drop => {
                self.pop()?;
            }
            OpCode::Nip => {
                let top = self.pop()?;
                self.pop()?;
                self.stack.push(top);
            }
            OpCode::Dup => self.stack.push(self.peek(0)?),
            OpCode::Over => self.stack.push(self.peek(1)?),
            OpCode::Pick => {
                let n = self.pop_int()? as usize;
                self.stack.push(self.peek(n)?);
            }
            OpCode::Tuck => {
                let top = self.peek(0)?;
                let at = self.stack.len() - 2;
                self.stack.insert(at, top);
            }
            OpCode::Swap => {
                let len = self.stack.len();
                self.stack.swap(len - 1, len - 2);
            }
            OpCode::Rot => {
                let item = self.stack.remove(self.stack.len() - 3);
                self.stack.push(item);
            }
            OpCode::Roll => {
                let n = self.pop_int()? as usize;
                let item = self.stack.remove(self.stack.len() - 1 - n);
                self.stack.push(item);
            }
            OpCode::Reverse3 | OpCode::Reverse4 | OpCode::Reversen => {
                let n = match op {
                    OpCode::Reverse3 => 3,
                    OpCode::Reverse4 => 4,
                    _ => self.pop_int()? as usize,
                };
                let len = self.stack.len();
                self.stack[len - n..].reverse();
            }
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Mod | OpCode::Shl | OpCode::Shr | OpCode::And | OpCode::Or | OpCode::Xor => {
                let b = self.pop_int()?;
                let a = self.pop_int()?;
                let v = match op {
                    OpCode::Add => a + b,
                    OpCode::Sub => a - b,
                    OpCode::Mul => a * b,
                    OpCode::Div => a.checked_div(b).ok_or("division by zero")?,
                    OpCode::Mod => a.checked_rem(b).ok_or("division by zero")?,
                    OpCode::Shl => a << b,
                    OpCode::Shr => a >> b,
                    OpCode::And => a & b,
                    OpCode::Or => a | b,
                    _ => a ^ b,
                };
                self.stack.push(Value::Int(v));
            }
            OpCode::Negate => {
                let a = self.pop_int()?;
                self.stack.push(Value::Int(-a));
            }
            OpCode::Inc | OpCode::Dec => {
                let a = self.pop_int()?;
                self.stack.push(Value::Int(if op == OpCode::Inc { a + 1 } else { a - 1 }));
            }
            OpCode::Not => {
                let a = self.pop()?.as_bool();
                self.stack.push(Value::Bool(!a));
            }
            OpCode::Equal | OpCode::Notequal => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.stack.push(Value::Bool((a == b) == (op == OpCode::Equal)));
            }
            OpCode::Isnull => {
                let a = self.pop()?;
                self.stack.push(Value::Bool(a == Value::Null));
            }
            OpCode::Size => {
                let size = match self.pop()? {
                    Value::Bytes(b) => b.len(),
                    Value::Array(a) => a.borrow().len(),
                    other => return Err(format!("SIZE of {other:?}")),
                };
                self.stack.push(Value::Int(size as i64));
            }
            OpCode::Cat => {
                let b = self.pop()?;
                let a = self.pop()?;
                let (Value::Bytes(mut a), Value::Bytes(b)) = (a, b) else {
                    return Err("CAT of non-byte values".to_string());
                };
                a.extend(b);
                self.stack.push(Value::Bytes(a));
            }
            OpCode::Convert => {
                let ty = StackItemType::from_byte(insn.operand[0]).ok_or("bad CONVERT type")?;
                let value = self.pop()?;
                let converted = match (ty, value) {
                    (StackItemType::Integer, v) => Value::Int(v.as_int()?),
                    (_, v) => v,
                };
                self.stack.push(converted);
            }
            OpCode::Newarray0 => self.stack.push(Value::new_array(Vec::new())),
            OpCode::Newarray | OpCode::NewarrayT => {
                let n = self.pop_int()? as usize;
                let item = match insn.operand.first().and_then(|b| StackItemType::from_byte(*b)) {
                    Some(StackItemType::Boolean) => Value::Bool(false),
                    Some(StackItemType::Integer) => Value::Int(0),
                    Some(StackItemType::ByteString) => Value::Bytes(Vec::new()),
                    _ => Value::Null,
                };
                self.stack.push(Value::new_array(vec![item; n]));
            }
            OpCode::Newbuffer => {
                let n = self.pop_int()? as usize;
                self.stack.push(Value::Bytes(vec![0; n]));
            }
            OpCode::Pack => {
                let n = self.pop_int()? as usize;
                let mut items = Vec::with_capacity(n);
                for _ in 0..n {
                    items.push(self.pop()?);
                }
                self.stack.push(Value::new_array(items));
            }
            OpCode::Syscall => {
                if insn.operand != interop_hash("System.Runtime.Notify").to_le_bytes() {
                    return Err(format!("SYSCALL {:02x?} is not simulated", insn.operand));
                }
                let Value::Bytes(name) = self.pop()? else {
                    return Err("event name is not a byte string".to_string());
                };
                let state = self.pop()?;
                self.notifications.push((String::from_utf8_lossy(&name).into_owned(), state));
            }
            OpCode::Pickitem => {
                let key = self.pop_int()? as usize;
                let item = match self.pop()? {
                    Value::Array(a) => a.borrow().get(key).cloned().ok_or("index out of range")?,
                    Value::Bytes(b) => Value::Int(i64::from(*b.get(key).ok_or("index out of range")?)),
                    other => return Err(format!("PICKITEM on {other:?}")),
                };
                self.stack.push(item);
            }
            OpCode::Setitem => {
                let value = self.pop()?;
                let key = self.pop_int()? as usize;
                let Value::Array(a) = self.pop()? else {
                    return Err("SETITEM on a non-array".to_string());
                };
                let mut items = a.borrow_mut();
                *items.get_mut(key).ok_or("index out of range")? = value;
            }
            other => return Err(format!("{other} is not simulated")),
        }
        Ok(Some(next))
    }
}
