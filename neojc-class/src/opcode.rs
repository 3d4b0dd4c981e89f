use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! jvm_opcodes {
    ($($name:ident = $byte:literal, $mnemonic:literal;)*) => {
        /// JVM bytecode opcodes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        #[repr(u8)]
        pub enum JvmOpcode {
            $($name = $byte,)*
        }

        impl JvmOpcode {
            pub const ALL: &'static [JvmOpcode] = &[$(JvmOpcode::$name,)*];

            pub fn from_byte(byte: u8) -> Option<JvmOpcode> {
                match byte {
                    $($byte => Some(JvmOpcode::$name),)*
                    _ => None,
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(JvmOpcode::$name => $mnemonic,)*
                }
            }

            pub fn from_mnemonic(mnemonic: &str) -> Option<JvmOpcode> {
                match mnemonic {
                    $($mnemonic => Some(JvmOpcode::$name),)*
                    _ => None,
                }
            }
        }
    };
}

jvm_opcodes! {
    Nop = 0, "NOP";
    AconstNull = 1, "ACONST_NULL";
    IconstM1 = 2, "ICONST_M1";
    Iconst0 = 3, "ICONST_0";
    Iconst1 = 4, "ICONST_1";
    Iconst2 = 5, "ICONST_2";
    Iconst3 = 6, "ICONST_3";
    Iconst4 = 7, "ICONST_4";
    Iconst5 = 8, "ICONST_5";
    Lconst0 = 9, "LCONST_0";
    Lconst1 = 10, "LCONST_1";
    Fconst0 = 11, "FCONST_0";
    Fconst1 = 12, "FCONST_1";
    Fconst2 = 13, "FCONST_2";
    Dconst0 = 14, "DCONST_0";
    Dconst1 = 15, "DCONST_1";
    Bipush = 16, "BIPUSH";
    Sipush = 17, "SIPUSH";
    Ldc = 18, "LDC";
    LdcW = 19, "LDC_W";
    Ldc2W = 20, "LDC2_W";
    Iload = 21, "ILOAD";
    Lload = 22, "LLOAD";
    Fload = 23, "FLOAD";
    Dload = 24, "DLOAD";
    Aload = 25, "ALOAD";
    Iload0 = 26, "ILOAD_0";
    Iload1 = 27, "ILOAD_1";
    Iload2 = 28, "ILOAD_2";
    Iload3 = 29, "ILOAD_3";
    Lload0 = 30, "LLOAD_0";
    Lload1 = 31, "LLOAD_1";
    Lload2 = 32, "LLOAD_2";
    Lload3 = 33, "LLOAD_3";
    Fload0 = 34, "FLOAD_0";
    Fload1 = 35, "FLOAD_1";
    Fload2 = 36, "FLOAD_2";
    Fload3 = 37, "FLOAD_3";
    Dload0 = 38, "DLOAD_0";
    Dload1 = 39, "DLOAD_1";
    Dload2 = 40, "DLOAD_2";
    Dload3 = 41, "DLOAD_3";
    Aload0 = 42, "ALOAD_0";
    Aload1 = 43, "ALOAD_1";
    Aload2 = 44, "ALOAD_2";
    Aload3 = 45, "ALOAD_3";
    Iaload = 46, "IALOAD";
    Laload = 47, "LALOAD";
    Faload = 48, "FALOAD";
    Daload = 49, "DALOAD";
    Aaload = 50, "AALOAD";
    Baload = 51, "BALOAD";
    Caload = 52, "CALOAD";
    Saload = 53, "SALOAD";
    Istore = 54, "ISTORE";
    Lstore = 55, "LSTORE";
    Fstore = 56, "FSTORE";
    Dstore = 57, "DSTORE";
    Astore = 58, "ASTORE";
    Istore0 = 59, "ISTORE_0";
    Istore1 = 60, "ISTORE_1";
    Istore2 = 61, "ISTORE_2";
    Istore3 = 62, "ISTORE_3";
    Lstore0 = 63, "LSTORE_0";
    Lstore1 = 64, "LSTORE_1";
    Lstore2 = 65, "LSTORE_2";
    Lstore3 = 66, "LSTORE_3";
    Fstore0 = 67, "FSTORE_0";
    Fstore1 = 68, "FSTORE_1";
    Fstore2 = 69, "FSTORE_2";
    Fstore3 = 70, "FSTORE_3";
    Dstore0 = 71, "DSTORE_0";
    Dstore1 = 72, "DSTORE_1";
    Dstore2 = 73, "DSTORE_2";
    Dstore3 = 74, "DSTORE_3";
    Astore0 = 75, "ASTORE_0";
    Astore1 = 76, "ASTORE_1";
    Astore2 = 77, "ASTORE_2";
    Astore3 = 78, "ASTORE_3";
    Iastore = 79, "IASTORE";
    Lastore = 80, "LASTORE";
    Fastore = 81, "FASTORE";
    Dastore = 82, "DASTORE";
    Aastore = 83, "AASTORE";
    Bastore = 84, "BASTORE";
    Castore = 85, "CASTORE";
    Sastore = 86, "SASTORE";
    Pop = 87, "POP";
    Pop2 = 88, "POP2";
    Dup = 89, "DUP";
    DupX1 = 90, "DUP_X1";
    DupX2 = 91, "DUP_X2";
    Dup2 = 92, "DUP2";
    Dup2X1 = 93, "DUP2_X1";
    Dup2X2 = 94, "DUP2_X2";
    Swap = 95, "SWAP";
    Iadd = 96, "IADD";
    Ladd = 97, "LADD";
    Fadd = 98, "FADD";
    Dadd = 99, "DADD";
    Isub = 100, "ISUB";
    Lsub = 101, "LSUB";
    Fsub = 102, "FSUB";
    Dsub = 103, "DSUB";
    Imul = 104, "IMUL";
    Lmul = 105, "LMUL";
    Fmul = 106, "FMUL";
    Dmul = 107, "DMUL";
    Idiv = 108, "IDIV";
    Ldiv = 109, "LDIV";
    Fdiv = 110, "FDIV";
    Ddiv = 111, "DDIV";
    Irem = 112, "IREM";
    Lrem = 113, "LREM";
    Frem = 114, "FREM";
    Drem = 115, "DREM";
    Ineg = 116, "INEG";
    Lneg = 117, "LNEG";
    Fneg = 118, "FNEG";
    Dneg = 119, "DNEG";
    Ishl = 120, "ISHL";
    Lshl = 121, "LSHL";
    Ishr = 122, "ISHR";
    Lshr = 123, "LSHR";
    Iushr = 124, "IUSHR";
    Lushr = 125, "LUSHR";
    Iand = 126, "IAND";
    Land = 127, "LAND";
    Ior = 128, "IOR";
    Lor = 129, "LOR";
    Ixor = 130, "IXOR";
    Lxor = 131, "LXOR";
    Iinc = 132, "IINC";
    I2l = 133, "I2L";
    I2f = 134, "I2F";
    I2d = 135, "I2D";
    L2i = 136, "L2I";
    L2f = 137, "L2F";
    L2d = 138, "L2D";
    F2i = 139, "F2I";
    F2l = 140, "F2L";
    F2d = 141, "F2D";
    D2i = 142, "D2I";
    D2l = 143, "D2L";
    D2f = 144, "D2F";
    I2b = 145, "I2B";
    I2c = 146, "I2C";
    I2s = 147, "I2S";
    Lcmp = 148, "LCMP";
    Fcmpl = 149, "FCMPL";
    Fcmpg = 150, "FCMPG";
    Dcmpl = 151, "DCMPL";
    Dcmpg = 152, "DCMPG";
    Ifeq = 153, "IFEQ";
    Ifne = 154, "IFNE";
    Iflt = 155, "IFLT";
    Ifge = 156, "IFGE";
    Ifgt = 157, "IFGT";
    Ifle = 158, "IFLE";
    IfIcmpeq = 159, "IF_ICMPEQ";
    IfIcmpne = 160, "IF_ICMPNE";
    IfIcmplt = 161, "IF_ICMPLT";
    IfIcmpge = 162, "IF_ICMPGE";
    IfIcmpgt = 163, "IF_ICMPGT";
    IfIcmple = 164, "IF_ICMPLE";
    IfAcmpeq = 165, "IF_ACMPEQ";
    IfAcmpne = 166, "IF_ACMPNE";
    Goto = 167, "GOTO";
    Jsr = 168, "JSR";
    Ret = 169, "RET";
    Tableswitch = 170, "TABLESWITCH";
    Lookupswitch = 171, "LOOKUPSWITCH";
    Ireturn = 172, "IRETURN";
    Lreturn = 173, "LRETURN";
    Freturn = 174, "FRETURN";
    Dreturn = 175, "DRETURN";
    Areturn = 176, "ARETURN";
    Return = 177, "RETURN";
    Getstatic = 178, "GETSTATIC";
    Putstatic = 179, "PUTSTATIC";
    Getfield = 180, "GETFIELD";
    Putfield = 181, "PUTFIELD";
    Invokevirtual = 182, "INVOKEVIRTUAL";
    Invokespecial = 183, "INVOKESPECIAL";
    Invokestatic = 184, "INVOKESTATIC";
    Invokeinterface = 185, "INVOKEINTERFACE";
    Invokedynamic = 186, "INVOKEDYNAMIC";
    New = 187, "NEW";
    Newarray = 188, "NEWARRAY";
    Anewarray = 189, "ANEWARRAY";
    Arraylength = 190, "ARRAYLENGTH";
    Athrow = 191, "ATHROW";
    Checkcast = 192, "CHECKCAST";
    Instanceof = 193, "INSTANCEOF";
    Monitorenter = 194, "MONITORENTER";
    Monitorexit = 195, "MONITOREXIT";
    Wide = 196, "WIDE";
    Multianewarray = 197, "MULTIANEWARRAY";
    Ifnull = 198, "IFNULL";
    Ifnonnull = 199, "IFNONNULL";
    GotoW = 200, "GOTO_W";
    JsrW = 201, "JSR_W";
}

impl JvmOpcode {
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Conditional and unconditional branches carrying a single label.
    pub fn is_jump(self) -> bool {
        matches!(self.byte(), 153..=168)
            || matches!(
                self,
                JvmOpcode::Ifnull | JvmOpcode::Ifnonnull | JvmOpcode::GotoW | JvmOpcode::JsrW
            )
    }

    pub fn is_return(self) -> bool {
        matches!(self.byte(), 172..=177)
    }

    pub fn is_invoke(self) -> bool {
        matches!(self.byte(), 182..=186)
    }
}

impl fmt::Display for JvmOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl TryFrom<String> for JvmOpcode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        JvmOpcode::from_mnemonic(&value.to_ascii_uppercase())
            .ok_or_else(|| format!("unknown JVM opcode '{value}'"))
    }
}

impl From<JvmOpcode> for &'static str {
    fn from(op: JvmOpcode) -> Self {
        op.mnemonic()
    }
}
