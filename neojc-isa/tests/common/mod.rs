use neojc_isa::*;

/// Decode `bytes` and compare opcodes in order.
pub fn assert_opcodes(bytes: &[u8], expected: &[OpCode]) {
    let decoded = decode(bytes).unwrap();
    let opcodes: Vec<OpCode> = decoded.iter().map(|(insn, _)| insn.opcode).collect();
    assert_eq!(opcodes, expected, "opcode mismatch for script {bytes:02x?}");
}

/// Flatten a push into its wire bytes.
pub fn push_bytes(push: &Push) -> Vec<u8> {
    let mut out = vec![push.opcode.byte()];
    out.extend_from_slice(&push.operand);
    out
}
