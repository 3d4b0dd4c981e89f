use std::fmt;
use std::str::FromStr;

/// Operand layout of a NeoVM instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSize {
    /// A fixed number of operand bytes (zero for operand-less opcodes).
    Fixed(usize),
    /// Variable-length data preceded by a little-endian length prefix of the given width.
    Prefixed(usize),
}

const NONE: OperandSize = OperandSize::Fixed(0);
const B1: OperandSize = OperandSize::Fixed(1);
const B2: OperandSize = OperandSize::Fixed(2);
const B4: OperandSize = OperandSize::Fixed(4);
const B8: OperandSize = OperandSize::Fixed(8);
const B16: OperandSize = OperandSize::Fixed(16);
const B32: OperandSize = OperandSize::Fixed(32);
const P1: OperandSize = OperandSize::Prefixed(1);
const P2: OperandSize = OperandSize::Prefixed(2);
const P4: OperandSize = OperandSize::Prefixed(4);

macro_rules! opcodes {
    ($($name:ident = $byte:literal, $mnemonic:literal, $operand:ident;)*) => {
        /// NeoVM opcodes with their byte values.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum OpCode {
            $($name = $byte,)*
        }

        impl OpCode {
            /// Every opcode, in byte order.
            pub const ALL: &'static [OpCode] = &[$(OpCode::$name,)*];

            pub fn from_byte(byte: u8) -> Option<OpCode> {
                match byte {
                    $($byte => Some(OpCode::$name),)*
                    _ => None,
                }
            }

            /// The assembler mnemonic, e.g. `JMP_L`.
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(OpCode::$name => $mnemonic,)*
                }
            }

            pub fn from_mnemonic(mnemonic: &str) -> Option<OpCode> {
                match mnemonic {
                    $($mnemonic => Some(OpCode::$name),)*
                    _ => None,
                }
            }

            pub fn operand_size(self) -> OperandSize {
                match self {
                    $(OpCode::$name => $operand,)*
                }
            }
        }
    };
}

opcodes! {
    Pushint8 = 0x00, "PUSHINT8", B1;
    Pushint16 = 0x01, "PUSHINT16", B2;
    Pushint32 = 0x02, "PUSHINT32", B4;
    Pushint64 = 0x03, "PUSHINT64", B8;
    Pushint128 = 0x04, "PUSHINT128", B16;
    Pushint256 = 0x05, "PUSHINT256", B32;
    Pusht = 0x08, "PUSHT", NONE;
    Pushf = 0x09, "PUSHF", NONE;
    Pusha = 0x0A, "PUSHA", B4;
    Pushnull = 0x0B, "PUSHNULL", NONE;
    Pushdata1 = 0x0C, "PUSHDATA1", P1;
    Pushdata2 = 0x0D, "PUSHDATA2", P2;
    Pushdata4 = 0x0E, "PUSHDATA4", P4;
    Pushm1 = 0x0F, "PUSHM1", NONE;
    Push0 = 0x10, "PUSH0", NONE;
    Push1 = 0x11, "PUSH1", NONE;
    Push2 = 0x12, "PUSH2", NONE;
    Push3 = 0x13, "PUSH3", NONE;
    Push4 = 0x14, "PUSH4", NONE;
    Push5 = 0x15, "PUSH5", NONE;
    Push6 = 0x16, "PUSH6", NONE;
    Push7 = 0x17, "PUSH7", NONE;
    Push8 = 0x18, "PUSH8", NONE;
    Push9 = 0x19, "PUSH9", NONE;
    Push10 = 0x1A, "PUSH10", NONE;
    Push11 = 0x1B, "PUSH11", NONE;
    Push12 = 0x1C, "PUSH12", NONE;
    Push13 = 0x1D, "PUSH13", NONE;
    Push14 = 0x1E, "PUSH14", NONE;
    Push15 = 0x1F, "PUSH15", NONE;
    Push16 = 0x20, "PUSH16", NONE;

    Nop = 0x21, "NOP", NONE;
    Jmp = 0x22, "JMP", B1;
    JmpL = 0x23, "JMP_L", B4;
    Jmpif = 0x24, "JMPIF", B1;
    JmpifL = 0x25, "JMPIF_L", B4;
    Jmpifnot = 0x26, "JMPIFNOT", B1;
    JmpifnotL = 0x27, "JMPIFNOT_L", B4;
    Jmpeq = 0x28, "JMPEQ", B1;
    JmpeqL = 0x29, "JMPEQ_L", B4;
    Jmpne = 0x2A, "JMPNE", B1;
    JmpneL = 0x2B, "JMPNE_L", B4;
    Jmpgt = 0x2C, "JMPGT", B1;
    JmpgtL = 0x2D, "JMPGT_L", B4;
    Jmpge = 0x2E, "JMPGE", B1;
    JmpgeL = 0x2F, "JMPGE_L", B4;
    Jmplt = 0x30, "JMPLT", B1;
    JmpltL = 0x31, "JMPLT_L", B4;
    Jmple = 0x32, "JMPLE", B1;
    JmpleL = 0x33, "JMPLE_L", B4;
    Call = 0x34, "CALL", B1;
    CallL = 0x35, "CALL_L", B4;
    Calla = 0x36, "CALLA", NONE;
    Callt = 0x37, "CALLT", B2;
    Abort = 0x38, "ABORT", NONE;
    Assert = 0x39, "ASSERT", NONE;
    Throw = 0x3A, "THROW", NONE;
    Try = 0x3B, "TRY", B2;
    TryL = 0x3C, "TRY_L", B8;
    Endtry = 0x3D, "ENDTRY", B1;
    EndtryL = 0x3E, "ENDTRY_L", B4;
    Endfinally = 0x3F, "ENDFINALLY", NONE;
    Ret = 0x40, "RET", NONE;
    Syscall = 0x41, "SYSCALL", B4;

    Depth = 0x43, "DEPTH", NONE;
    Drop = 0x45, "DROP", NONE;
    Nip = 0x46, "NIP", NONE;
    Xdrop = 0x48, "XDROP", NONE;
    Clear = 0x49, "CLEAR", NONE;
    Dup = 0x4A, "DUP", NONE;
    Over = 0x4B, "OVER", NONE;
    Pick = 0x4D, "PICK", NONE;
    Tuck = 0x4E, "TUCK", NONE;
    Swap = 0x50, "SWAP", NONE;
    Rot = 0x51, "ROT", NONE;
    Roll = 0x52, "ROLL", NONE;
    Reverse3 = 0x53, "REVERSE3", NONE;
    Reverse4 = 0x54, "REVERSE4", NONE;
    Reversen = 0x55, "REVERSEN", NONE;

    Initsslot = 0x56, "INITSSLOT", B1;
    Initslot = 0x57, "INITSLOT", B2;
    Ldsfld0 = 0x58, "LDSFLD0", NONE;
    Ldsfld1 = 0x59, "LDSFLD1", NONE;
    Ldsfld2 = 0x5A, "LDSFLD2", NONE;
    Ldsfld3 = 0x5B, "LDSFLD3", NONE;
    Ldsfld4 = 0x5C, "LDSFLD4", NONE;
    Ldsfld5 = 0x5D, "LDSFLD5", NONE;
    Ldsfld6 = 0x5E, "LDSFLD6", NONE;
    Ldsfld = 0x5F, "LDSFLD", B1;
    Stsfld0 = 0x60, "STSFLD0", NONE;
    Stsfld1 = 0x61, "STSFLD1", NONE;
    Stsfld2 = 0x62, "STSFLD2", NONE;
    Stsfld3 = 0x63, "STSFLD3", NONE;
    Stsfld4 = 0x64, "STSFLD4", NONE;
    Stsfld5 = 0x65, "STSFLD5", NONE;
    Stsfld6 = 0x66, "STSFLD6", NONE;
    Stsfld = 0x67, "STSFLD", B1;
    Ldloc0 = 0x68, "LDLOC0", NONE;
    Ldloc1 = 0x69, "LDLOC1", NONE;
    Ldloc2 = 0x6A, "LDLOC2", NONE;
    Ldloc3 = 0x6B, "LDLOC3", NONE;
    Ldloc4 = 0x6C, "LDLOC4", NONE;
    Ldloc5 = 0x6D, "LDLOC5", NONE;
    Ldloc6 = 0x6E, "LDLOC6", NONE;
    Ldloc = 0x6F, "LDLOC", B1;
    Stloc0 = 0x70, "STLOC0", NONE;
    Stloc1 = 0x71, "STLOC1", NONE;
    Stloc2 = 0x72, "STLOC2", NONE;
    Stloc3 = 0x73, "STLOC3", NONE;
    Stloc4 = 0x74, "STLOC4", NONE;
    Stloc5 = 0x75, "STLOC5", NONE;
    Stloc6 = 0x76, "STLOC6", NONE;
    Stloc = 0x77, "STLOC", B1;
    Ldarg0 = 0x78, "LDARG0", NONE;
    Ldarg1 = 0x79, "LDARG1", NONE;
    Ldarg2 = 0x7A, "LDARG2", NONE;
    Ldarg3 = 0x7B, "LDARG3", NONE;
    Ldarg4 = 0x7C, "LDARG4", NONE;
    Ldarg5 = 0x7D, "LDARG5", NONE;
    Ldarg6 = 0x7E, "LDARG6", NONE;
    Ldarg = 0x7F, "LDARG", B1;
    Starg0 = 0x80, "STARG0", NONE;
    Starg1 = 0x81, "STARG1", NONE;
    Starg2 = 0x82, "STARG2", NONE;
    Starg3 = 0x83, "STARG3", NONE;
    Starg4 = 0x84, "STARG4", NONE;
    Starg5 = 0x85, "STARG5", NONE;
    Starg6 = 0x86, "STARG6", NONE;
    Starg = 0x87, "STARG", B1;

    Newbuffer = 0x88, "NEWBUFFER", NONE;
    Memcpy = 0x89, "MEMCPY", NONE;
    Cat = 0x8B, "CAT", NONE;
    Substr = 0x8C, "SUBSTR", NONE;
    Left = 0x8D, "LEFT", NONE;
    Right = 0x8E, "RIGHT", NONE;

    Invert = 0x90, "INVERT", NONE;
    And = 0x91, "AND", NONE;
    Or = 0x92, "OR", NONE;
    Xor = 0x93, "XOR", NONE;
    Equal = 0x97, "EQUAL", NONE;
    Notequal = 0x98, "NOTEQUAL", NONE;

    Sign = 0x99, "SIGN", NONE;
    Abs = 0x9A, "ABS", NONE;
    Negate = 0x9B, "NEGATE", NONE;
    Inc = 0x9C, "INC", NONE;
    Dec = 0x9D, "DEC", NONE;
    Add = 0x9E, "ADD", NONE;
    Sub = 0x9F, "SUB", NONE;
    Mul = 0xA0, "MUL", NONE;
    Div = 0xA1, "DIV", NONE;
    Mod = 0xA2, "MOD", NONE;
    Pow = 0xA3, "POW", NONE;
    Sqrt = 0xA4, "SQRT", NONE;
    Modmul = 0xA5, "MODMUL", NONE;
    Modpow = 0xA6, "MODPOW", NONE;
    Shl = 0xA8, "SHL", NONE;
    Shr = 0xA9, "SHR", NONE;
    Not = 0xAA, "NOT", NONE;
    Booland = 0xAB, "BOOLAND", NONE;
    Boolor = 0xAC, "BOOLOR", NONE;
    Nz = 0xB1, "NZ", NONE;
    Numequal = 0xB3, "NUMEQUAL", NONE;
    Numnotequal = 0xB4, "NUMNOTEQUAL", NONE;
    Lt = 0xB5, "LT", NONE;
    Le = 0xB6, "LE", NONE;
    Gt = 0xB7, "GT", NONE;
    Ge = 0xB8, "GE", NONE;
    Min = 0xB9, "MIN", NONE;
    Max = 0xBA, "MAX", NONE;
    Within = 0xBB, "WITHIN", NONE;

    Packmap = 0xBE, "PACKMAP", NONE;
    Packstruct = 0xBF, "PACKSTRUCT", NONE;
    Pack = 0xC0, "PACK", NONE;
    Unpack = 0xC1, "UNPACK", NONE;
    Newarray0 = 0xC2, "NEWARRAY0", NONE;
    Newarray = 0xC3, "NEWARRAY", NONE;
    NewarrayT = 0xC4, "NEWARRAY_T", B1;
    Newstruct0 = 0xC5, "NEWSTRUCT0", NONE;
    Newstruct = 0xC6, "NEWSTRUCT", NONE;
    Newmap = 0xC8, "NEWMAP", NONE;
    Size = 0xCA, "SIZE", NONE;
    Haskey = 0xCB, "HASKEY", NONE;
    Keys = 0xCC, "KEYS", NONE;
    Values = 0xCD, "VALUES", NONE;
    Pickitem = 0xCE, "PICKITEM", NONE;
    Append = 0xCF, "APPEND", NONE;
    Setitem = 0xD0, "SETITEM", NONE;
    Reverseitems = 0xD1, "REVERSEITEMS", NONE;
    Remove = 0xD2, "REMOVE", NONE;
    Clearitems = 0xD3, "CLEARITEMS", NONE;
    Popitem = 0xD4, "POPITEM", NONE;

    Isnull = 0xD8, "ISNULL", NONE;
    Istype = 0xD9, "ISTYPE", B1;
    Convert = 0xDB, "CONVERT", B1;
}

impl OpCode {
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Opcode pushing a small integer in `-1..=16` without an operand.
    pub fn push_small(value: i64) -> Option<OpCode> {
        match value {
            -1 => Some(OpCode::Pushm1),
            0..=16 => OpCode::from_byte(OpCode::Push0.byte() + value as u8),
            _ => None,
        }
    }

    /// The value pushed by PUSHM1 and PUSH0..PUSH16.
    pub fn small_value(self) -> Option<i64> {
        match self {
            OpCode::Pushm1 => Some(-1),
            op if (OpCode::Push0.byte()..=OpCode::Push16.byte()).contains(&op.byte()) => {
                Some((op.byte() - OpCode::Push0.byte()) as i64)
            }
            _ => None,
        }
    }

    /// Branch instructions whose operand is an offset relative to their own address.
    pub fn is_jump(self) -> bool {
        matches!(self.byte(), 0x22..=0x33) || matches!(self, OpCode::Endtry | OpCode::EndtryL)
    }

    pub fn is_call(self) -> bool {
        matches!(self, OpCode::Call | OpCode::CallL)
    }

    pub fn is_try(self) -> bool {
        matches!(self, OpCode::Try | OpCode::TryL)
    }

    /// The 1-byte-offset form of a 4-byte-offset instruction.
    pub fn short_form(self) -> Option<OpCode> {
        match self {
            OpCode::CallL => Some(OpCode::Call),
            OpCode::TryL => Some(OpCode::Try),
            OpCode::EndtryL => Some(OpCode::Endtry),
            op if (0x23..=0x33).contains(&op.byte()) && op.byte() % 2 == 1 => {
                OpCode::from_byte(op.byte() - 1)
            }
            _ => None,
        }
    }

    /// The 4-byte-offset form of a 1-byte-offset instruction.
    pub fn long_form(self) -> Option<OpCode> {
        match self {
            OpCode::Call => Some(OpCode::CallL),
            OpCode::Try => Some(OpCode::TryL),
            OpCode::Endtry => Some(OpCode::EndtryL),
            op if (0x22..=0x32).contains(&op.byte()) && op.byte() % 2 == 0 => {
                OpCode::from_byte(op.byte() + 1)
            }
            _ => None,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Error returned when parsing an unknown mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown NeoVM mnemonic '{0}'")]
pub struct UnknownMnemonic(pub String);

impl FromStr for OpCode {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpCode::from_mnemonic(s).ok_or_else(|| UnknownMnemonic(s.to_string()))
    }
}
