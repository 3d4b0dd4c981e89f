mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use neojc_class::{ClassBuilder, ClassNode, Constant, JvmOpcode, JvmOpcode::*, MethodBuilder, OBJECT};
use neojc_compiler::*;
use neojc_isa::OpCode;

const POINT: &str = "com/example/Point";
const EXCEPTION: &str = "java/lang/Exception";
const BUILDER: &str = "java/lang/StringBuilder";

fn point() -> ClassNode {
    ClassBuilder::new(POINT)
        .field("x", "I")
        .field("y", "I")
        .method(
            MethodBuilder::instance("<init>", "(II)V")
                .op(Aload0)
                .invoke(Invokespecial, OBJECT, "<init>", "()V")
                .op(Aload0)
                .op(Iload1)
                .field(Putfield, POINT, "x", "I")
                .op(Aload0)
                .op(Iload2)
                .field(Putfield, POINT, "y", "I")
                .op(Return)
                .build(),
        )
        .build()
}

#[test]
fn objects_are_arrays_of_fields() {
    let contract = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("diff", "(II)I")
                .type_insn(New, POINT)
                .op(Dup)
                .op(Iload0)
                .op(Iload1)
                .invoke(Invokespecial, POINT, "<init>", "(II)V")
                .op(Astore2)
                .op(Aload2)
                .field(Getfield, POINT, "x", "I")
                .op(Aload2)
                .field(Getfield, POINT, "y", "I")
                .op(Isub)
                .op(Ireturn)
                .build(),
        )
        .build();

    let module = compile([contract.clone(), point()], CONTRACT, "diff", "(II)I").unwrap();
    assert_eq!(
        body(method(&module, "diff"))[..7],
        [
            OpCode::Push2,
            OpCode::Newarray,
            OpCode::Dup,
            OpCode::Ldarg0,
            OpCode::Ldarg1,
            OpCode::Reverse3,
            OpCode::CallL,
        ]
    );
    assert_eq!(
        body(method(&module, "<init>")),
        vec![
            OpCode::Ldarg0,
            OpCode::Drop,
            OpCode::Ldarg0,
            OpCode::Ldarg1,
            OpCode::Push0,
            OpCode::Swap,
            OpCode::Setitem,
            OpCode::Ldarg0,
            OpCode::Ldarg2,
            OpCode::Push1,
            OpCode::Swap,
            OpCode::Setitem,
            OpCode::Ret,
        ]
    );

    let result = run([contract, point()], CONTRACT, "diff", "(II)I", vec![int(10), int(3)]).unwrap();
    assert_eq!(result, vec![int(7)]);
}

#[test]
fn inherited_fields_come_first() {
    let base = ClassBuilder::new("com/example/Base")
        .field("a", "I")
        .method(
            MethodBuilder::instance("<init>", "(I)V")
                .op(Aload0)
                .invoke(Invokespecial, OBJECT, "<init>", "()V")
                .op(Aload0)
                .op(Iload1)
                .field(Putfield, "com/example/Base", "a", "I")
                .op(Return)
                .build(),
        )
        .method(
            MethodBuilder::instance("get", "()I")
                .op(Aload0)
                .field(Getfield, "com/example/Base", "a", "I")
                .op(Ireturn)
                .build(),
        )
        .build();
    let derived = ClassBuilder::new("com/example/Derived")
        .extends("com/example/Base")
        .field("b", "I")
        .method(
            MethodBuilder::instance("<init>", "(II)V")
                .op(Aload0)
                .op(Iload1)
                .invoke(Invokespecial, "com/example/Base", "<init>", "(I)V")
                .op(Aload0)
                .op(Iload2)
                .field(Putfield, "com/example/Derived", "b", "I")
                .op(Return)
                .build(),
        )
        .build();
    let contract = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("test", "()I")
                .type_insn(New, "com/example/Derived")
                .op(Dup)
                .op(Iconst3)
                .op(Iconst1)
                .invoke(Invokespecial, "com/example/Derived", "<init>", "(II)V")
                .op(Astore0)
                .op(Aload0)
                .invoke(Invokevirtual, "com/example/Derived", "get", "()I")
                .op(Aload0)
                .field(Getfield, "com/example/Derived", "b", "I")
                .op(Iadd)
                .op(Ireturn)
                .build(),
        )
        .build();

    let classes = [contract, base, derived];
    let module = compile(classes.clone(), CONTRACT, "test", "()I").unwrap();
    assert_eq!(body(method(&module, "test"))[0], OpCode::Push2, "two fields in total");
    assert_eq!(module.method_count(), 4);
    assert_eq!(run(classes, CONTRACT, "test", "()I", vec![]).unwrap(), vec![int(4)]);
}

#[test]
fn shadowed_fields_get_their_own_slot() {
    let base = ClassBuilder::new("com/example/Base").field("x", "I").field("y", "I").build();
    let derived = ClassBuilder::new("com/example/Derived")
        .extends("com/example/Base")
        .field("z", "I")
        .field("x", "I")
        .build();
    let contract = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("diff", "(Lcom/example/Derived;)I")
                .op(Aload0)
                .field(Getfield, "com/example/Derived", "x", "I")
                .op(Aload0)
                .field(Getfield, "com/example/Base", "x", "I")
                .op(Isub)
                .op(Ireturn)
                .build(),
        )
        .build();
    let classes = [contract, base, derived];

    let unit = unit(classes.clone());
    assert_eq!(unit.instance_field_index("com/example/Derived", "x").unwrap(), 3);
    assert_eq!(unit.instance_field_index("com/example/Derived", "y").unwrap(), 1);
    assert_eq!(unit.instance_field_index("com/example/Derived", "z").unwrap(), 2);
    assert_eq!(unit.instance_field_index("com/example/Base", "x").unwrap(), 0);
    assert_eq!(unit.instance_field_count("com/example/Derived").unwrap(), 4);

    let object = Value::Array(Rc::new(RefCell::new(vec![int(1), int(2), int(3), int(40)])));
    let result = run(classes, CONTRACT, "diff", "(Lcom/example/Derived;)I", vec![object]).unwrap();
    assert_eq!(result, vec![int(39)]);
}

#[test]
fn unknown_instance_field() {
    let contract = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("z", "(Lcom/example/Point;)I")
                .op(Aload0)
                .field(Getfield, POINT, "z", "I")
                .op(Ireturn)
                .build(),
        )
        .build();
    let err = compile([contract, point()], CONTRACT, "z", "(Lcom/example/Point;)I").unwrap_err();
    assert!(
        matches!(&err, CompileError::ResolutionFailure(Unresolved::Field { name, .. }) if name == "z"),
        "{err}"
    );
}

#[test]
fn new_without_dup() {
    let contract = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("f", "()V")
                .type_insn(New, POINT)
                .op(Pop)
                .op(Return)
                .build(),
        )
        .build();
    let err = compile([contract, point()], CONTRACT, "f", "()V").unwrap_err();
    assert!(matches!(err, CompileError::MalformedInput { .. }), "{err}");
}

#[test]
fn static_fields() {
    let contract = ClassBuilder::new(CONTRACT)
        .static_field("counter", "I")
        .method(
            MethodBuilder::new("set", "(I)I")
                .op(Iload0)
                .field(Putstatic, CONTRACT, "counter", "I")
                .field(Getstatic, CONTRACT, "counter", "I")
                .op(Iconst1)
                .op(Iadd)
                .op(Ireturn)
                .build(),
        )
        .build();
    let module = compile([contract.clone()], CONTRACT, "set", "(I)I").unwrap();
    assert_eq!(
        body(method(&module, "set")),
        vec![
            OpCode::Ldarg0,
            OpCode::Stsfld0,
            OpCode::Ldsfld0,
            OpCode::Push1,
            OpCode::Add,
            OpCode::Ret
        ]
    );
    assert_eq!(module.static_slot_count(), 1);
    assert_eq!(run([contract], CONTRACT, "set", "(I)I", vec![int(5)]).unwrap(), vec![int(6)]);
}

#[test]
fn static_slots_are_allocated_per_class() {
    let other = ClassBuilder::new("com/example/Other")
        .static_field("x", "I")
        .field("ignored", "I")
        .static_field("y", "I")
        .build();
    let contract = ClassBuilder::new(CONTRACT)
        .static_field("counter", "I")
        .method(
            MethodBuilder::new("sum", "()I")
                .field(Getstatic, "com/example/Other", "y", "I")
                .field(Getstatic, CONTRACT, "counter", "I")
                .op(Iadd)
                .field(Getstatic, "com/example/Other", "x", "I")
                .op(Iadd)
                .op(Ireturn)
                .build(),
        )
        .build();
    let module = compile([contract, other], CONTRACT, "sum", "()I").unwrap();
    assert_eq!(
        body(method(&module, "sum")),
        vec![
            OpCode::Ldsfld1,
            OpCode::Ldsfld2,
            OpCode::Add,
            OpCode::Ldsfld0,
            OpCode::Add,
            OpCode::Ret
        ]
    );
    assert_eq!(module.static_slot_count(), 3);
}

#[test]
fn unknown_static_field() {
    let contract = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("f", "()I")
                .field(Getstatic, CONTRACT, "missing", "I")
                .op(Ireturn)
                .build(),
        )
        .build();
    let err = compile([contract], CONTRACT, "f", "()I").unwrap_err();
    assert!(
        matches!(err, CompileError::ResolutionFailure(Unresolved::Field { .. })),
        "{err}"
    );
}

fn greeting(with_initial: bool) -> ClassNode {
    let mut m = MethodBuilder::new("greet", "(Ljava/lang/String;)Ljava/lang/String;");
    m.type_insn(New, BUILDER).op(Dup);
    if with_initial {
        m.ldc_str("hello ")
            .invoke(Invokespecial, BUILDER, "<init>", "(Ljava/lang/String;)V");
    } else {
        m.invoke(Invokespecial, BUILDER, "<init>", "()V")
            .ldc_str("hello ")
            .invoke(Invokevirtual, BUILDER, "append", "(Ljava/lang/String;)Ljava/lang/StringBuilder;");
    }
    m.op(Aload0)
        .invoke(Invokevirtual, BUILDER, "append", "(Ljava/lang/String;)Ljava/lang/StringBuilder;")
        .invoke(Invokevirtual, BUILDER, "toString", "()Ljava/lang/String;")
        .op(Areturn);
    ClassBuilder::new(CONTRACT).method(m.build()).build()
}

#[test]
fn string_concatenation() {
    let sig = "(Ljava/lang/String;)Ljava/lang/String;";
    for with_initial in [false, true] {
        let module = compile([greeting(with_initial)], CONTRACT, "greet", sig).unwrap();
        assert_eq!(
            body(method(&module, "greet")),
            vec![
                OpCode::Pushdata1,
                OpCode::Ldarg0,
                OpCode::Cat,
                OpCode::Convert,
                OpCode::Ret
            ]
        );
        let result = run([greeting(with_initial)], CONTRACT, "greet", sig, vec![bytes("neo")]).unwrap();
        assert_eq!(result, vec![bytes("hello neo")]);
    }
}

#[test]
fn string_builder_beyond_concatenation() {
    let class = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("len", "()I")
                .type_insn(New, BUILDER)
                .op(Dup)
                .invoke(Invokespecial, BUILDER, "<init>", "()V")
                .invoke(Invokevirtual, BUILDER, "length", "()I")
                .op(Ireturn)
                .build(),
        )
        .build();
    let err = compile([class], CONTRACT, "len", "()I").unwrap_err();
    assert!(
        matches!(err, CompileError::MalformedIdiom { idiom: "string concatenation", .. }),
        "{err}"
    );

    let class = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("open", "()V")
                .type_insn(New, BUILDER)
                .op(Dup)
                .invoke(Invokespecial, BUILDER, "<init>", "()V")
                .op(Pop)
                .op(Return)
                .build(),
        )
        .build();
    let err = compile([class], CONTRACT, "open", "()V").unwrap_err();
    assert!(
        matches!(err, CompileError::MalformedIdiom { idiom: "string concatenation", .. }),
        "{err}"
    );
}

fn thrower(class: &str, message: Option<&str>) -> ClassNode {
    let mut m = MethodBuilder::new("fail", "()V");
    m.type_insn(New, class).op(Dup);
    match message {
        Some(message) => m
            .ldc_str(message)
            .invoke(Invokespecial, class, "<init>", "(Ljava/lang/String;)V"),
        None => m.invoke(Invokespecial, class, "<init>", "()V"),
    };
    m.op(Athrow);
    ClassBuilder::new(CONTRACT).method(m.build()).build()
}

#[test]
fn exceptions_become_their_message() {
    let module = compile([thrower(EXCEPTION, Some("boom"))], CONTRACT, "fail", "()V").unwrap();
    let fail = method(&module, "fail");
    assert_eq!(body(fail), vec![OpCode::Pushdata1, OpCode::Throw]);
    assert_eq!(fail.instructions()[0].operand, b"\x04boom".to_vec());

    let err = run([thrower(EXCEPTION, Some("boom"))], CONTRACT, "fail", "()V", vec![]).unwrap_err();
    assert!(err.contains("thrown"), "{err}");
    assert!(err.contains("98, 111, 111, 109"), "{err}");

    let module = compile([thrower(EXCEPTION, None)], CONTRACT, "fail", "()V").unwrap();
    let fail = method(&module, "fail");
    assert_eq!(body(fail), vec![OpCode::Pushdata1, OpCode::Throw]);
    assert_eq!(fail.instructions()[0].operand, b"\x05error".to_vec());
}

#[test]
fn only_the_base_exception_is_supported() {
    let err = compile(
        [thrower("java/lang/IllegalArgumentException", Some("bad"))],
        CONTRACT,
        "fail",
        "()V",
    )
    .unwrap_err();
    assert!(
        matches!(&err, CompileError::UnsupportedException { ty, .. } if ty == "java/lang/IllegalArgumentException"),
        "{err}"
    );

    let custom = ClassBuilder::new("com/example/Custom").extends(EXCEPTION).build();
    let err = compile([thrower("com/example/Custom", None), custom], CONTRACT, "fail", "()V").unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedException { .. }), "{err}");
}

fn guarded(catch: &str) -> [ClassNode; 1] {
    let mut m = MethodBuilder::new("safe", "()I");
    let [start, end, handler] = [(); 3].map(|_| m.new_label());
    m.try_catch(start, end, handler, Some(catch))
        .place(start)
        .invoke(Invokestatic, CONTRACT, "risky", "()V")
        .place(end)
        .op(Iconst1)
        .op(Ireturn)
        .place(handler)
        .op(Astore0)
        .op(Iconst0)
        .op(Ireturn);
    let risky = MethodBuilder::new("risky", "()V").op(Return).build();
    [ClassBuilder::new(CONTRACT).method(m.build()).method(risky).build()]
}

#[test]
fn try_catch_inserts_try() {
    let module = compile(guarded(EXCEPTION), CONTRACT, "safe", "()I").unwrap();
    let safe = method(&module, "safe");
    assert_eq!(
        opcodes(safe),
        vec![
            OpCode::Initslot,
            OpCode::TryL,
            OpCode::CallL,
            OpCode::Push1,
            OpCode::Ret,
            OpCode::Stloc0,
            OpCode::Push0,
            OpCode::Ret,
        ]
    );
    assert!(matches!(
        safe.instructions()[1].target,
        Target::Try {
            catch: Some(_),
            finally: None
        }
    ));
    assert_eq!(run(guarded(EXCEPTION), CONTRACT, "safe", "()I", vec![]).unwrap(), vec![int(1)]);
}

#[test]
fn typed_catch_is_unsupported() {
    let err = compile(guarded("java/lang/RuntimeException"), CONTRACT, "safe", "()I").unwrap_err();
    assert!(
        matches!(&err, CompileError::UnsupportedException { ty, .. } if ty == "java/lang/RuntimeException"),
        "{err}"
    );
}

#[test]
fn constant_byte_arrays_are_folded() {
    let class = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("data", "()[B")
                .op(Iconst3)
                .int(Newarray, 8)
                .op(Dup)
                .op(Iconst0)
                .int(Bipush, 10)
                .op(Bastore)
                .op(Dup)
                .op(Iconst1)
                .int(Bipush, 20)
                .op(Bastore)
                .op(Dup)
                .op(Iconst2)
                .op(IconstM1)
                .op(Bastore)
                .op(Areturn)
                .build(),
        )
        .build();
    let module = compile([class.clone()], CONTRACT, "data", "()[B").unwrap();
    let data = method(&module, "data");
    assert_eq!(body(data), vec![OpCode::Pushdata1, OpCode::Convert, OpCode::Ret]);
    assert_eq!(data.instructions()[0].operand, vec![3, 10, 20, 0xff]);
    assert_eq!(data.instructions()[1].operand, vec![0x30]);
    assert_eq!(
        run([class], CONTRACT, "data", "()[B", vec![]).unwrap(),
        vec![Value::Bytes(vec![10, 20, 0xff])]
    );
}

#[test]
fn byte_array_with_computed_elements() {
    let class = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("data", "(I)[B")
                .op(Iconst2)
                .int(Newarray, 8)
                .op(Dup)
                .op(Iconst0)
                .op(Iload0)
                .op(Bastore)
                .op(Areturn)
                .build(),
        )
        .build();
    let module = compile([class], CONTRACT, "data", "(I)[B").unwrap();
    let data = method(&module, "data");
    assert_eq!(
        body(data),
        vec![
            OpCode::Pushdata1,
            OpCode::Convert,
            OpCode::Dup,
            OpCode::Push0,
            OpCode::Ldarg0,
            OpCode::Setitem,
            OpCode::Ret
        ]
    );
    assert_eq!(data.instructions()[1].operand, vec![2, 0, 0]);
}

#[test]
fn byte_array_of_computed_size() {
    let class = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("buf", "(I)[B")
                .op(Iload0)
                .int(Newarray, 8)
                .op(Areturn)
                .build(),
        )
        .build();
    let module = compile([class.clone()], CONTRACT, "buf", "(I)[B").unwrap();
    assert_eq!(
        body(method(&module, "buf")),
        vec![OpCode::Ldarg0, OpCode::Newbuffer, OpCode::Ret]
    );
    assert_eq!(
        run([class], CONTRACT, "buf", "(I)[B", vec![int(4)]).unwrap(),
        vec![Value::Bytes(vec![0; 4])]
    );
}

// flag ? a : b as the size of a new array of `element` type.
fn sized_by_branch(a: JvmOpcode, b: JvmOpcode, element: i32, tail: &[JvmOpcode]) -> ClassNode {
    let mut m = MethodBuilder::new("make", "(Z)Ljava/lang/Object;");
    let [other, join] = [(); 2].map(|_| m.new_label());
    m.op(Iload0)
        .jump(Ifeq, other)
        .op(a)
        .jump(Goto, join)
        .place(other)
        .op(b)
        .place(join)
        .int(Newarray, element);
    for op in tail {
        m.op(*op);
    }
    ClassBuilder::new(CONTRACT).method(m.build()).build()
}

#[test]
fn byte_array_size_from_a_branch_is_not_folded() {
    let class = sized_by_branch(Iconst3, Iconst4, 8, &[Areturn]);
    let module = compile([class.clone()], CONTRACT, "make", "(Z)Ljava/lang/Object;").unwrap();
    assert_eq!(
        body(method(&module, "make")),
        vec![
            OpCode::Ldarg0,
            OpCode::JmpifnotL,
            OpCode::Push3,
            OpCode::JmpL,
            OpCode::Push4,
            OpCode::Newbuffer,
            OpCode::Ret
        ]
    );
    for (flag, size) in [(1, 3), (0, 4)] {
        let result = run([class.clone()], CONTRACT, "make", "(Z)Ljava/lang/Object;", vec![int(flag)]).unwrap();
        assert_eq!(result, vec![Value::Bytes(vec![0; size])], "flag {flag}");
    }
}

#[test]
fn empty_array_from_a_branch_keeps_the_size() {
    let class = sized_by_branch(Iconst2, Iconst0, 10, &[Arraylength, Ireturn]);
    let module = compile([class.clone()], CONTRACT, "make", "(Z)Ljava/lang/Object;").unwrap();
    let body = body(method(&module, "make"));
    assert!(body.contains(&OpCode::NewarrayT), "{body:?}");
    assert!(!body.contains(&OpCode::Newarray0), "{body:?}");
    for (flag, size) in [(1, 2), (0, 0)] {
        let result = run([class.clone()], CONTRACT, "make", "(Z)Ljava/lang/Object;", vec![int(flag)]).unwrap();
        assert_eq!(result, vec![int(size)], "flag {flag}");
    }
}

#[test]
fn large_byte_arrays_are_allocated_at_run_time() {
    let sized = |size: i32| {
        let class = ClassBuilder::new(CONTRACT)
            .method(
                MethodBuilder::new("buf", "()[B")
                    .ldc(Constant::Int(size))
                    .int(Newarray, 8)
                    .op(Areturn)
                    .build(),
            )
            .build();
        compile([class], CONTRACT, "buf", "()[B").unwrap()
    };

    let module = sized(65_535);
    let buf = method(&module, "buf");
    assert_eq!(body(buf), vec![OpCode::Pushdata2, OpCode::Convert, OpCode::Ret]);
    assert_eq!(buf.instructions()[0].operand.len(), 2 + 65_535);

    for size in [65_536, 200_000_000] {
        let module = sized(size);
        assert_eq!(
            body(method(&module, "buf")),
            vec![OpCode::Pushint32, OpCode::Newbuffer, OpCode::Ret],
            "{size}"
        );
        assert!(assemble(&module).bytes.len() < 16);
    }
}

#[test]
fn empty_array_keeps_its_label() {
    let mut m = MethodBuilder::new("empty", "()[I");
    let start = m.new_label();
    m.place(start).op(Iconst0).int(Newarray, 10).op(Areturn);
    let class = ClassBuilder::new(CONTRACT).method(m.build()).build();
    let module = compile([class], CONTRACT, "empty", "()[I").unwrap();
    let empty = method(&module, "empty");
    assert_eq!(body(empty), vec![OpCode::Newarray0, OpCode::Ret]);
    assert_eq!(empty.label_index(Label::Source(start)), Some(0));
}

#[test]
fn float_arrays_are_unsupported() {
    let class = ClassBuilder::new(CONTRACT)
        .method(
            MethodBuilder::new("f", "()[F")
                .op(Iconst2)
                .int(Newarray, 6)
                .op(Areturn)
                .build(),
        )
        .build();
    let err = compile([class], CONTRACT, "f", "()[F").unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedInstruction { opcode: Newarray, .. }), "{err}");
}

#[test]
fn int_arrays() {
    let sum = {
        let mut m = MethodBuilder::new("sum", "([I)I");
        let [head, end] = [(); 2].map(|_| m.new_label());
        m.op(Iconst0)
            .op(Istore1)
            .op(Iconst0)
            .op(Istore2)
            .place(head)
            .op(Iload2)
            .op(Aload0)
            .op(Arraylength)
            .jump(IfIcmpge, end)
            .op(Iload1)
            .op(Aload0)
            .op(Iload2)
            .op(Iaload)
            .op(Iadd)
            .op(Istore1)
            .iinc(2, 1)
            .jump(Goto, head)
            .place(end)
            .op(Iload1)
            .op(Ireturn);
        m.build()
    };
    let main = MethodBuilder::new("main", "()I")
        .op(Iconst2)
        .int(Newarray, 10)
        .op(Dup)
        .op(Iconst0)
        .op(Iconst4)
        .op(Iastore)
        .op(Dup)
        .op(Iconst1)
        .int(Bipush, 9)
        .op(Iastore)
        .invoke(Invokestatic, CONTRACT, "sum", "([I)I")
        .op(Ireturn)
        .build();
    let class = ClassBuilder::new(CONTRACT).method(sum).method(main).build();

    let module = compile([class.clone()], CONTRACT, "main", "()I").unwrap();
    assert_eq!(body(method(&module, "main"))[..2], [OpCode::Push2, OpCode::NewarrayT]);
    assert_eq!(run([class.clone()], CONTRACT, "main", "()I", vec![]).unwrap(), vec![int(13)]);

    let array = Value::Array(Rc::new(RefCell::new(vec![int(1), int(2), int(3)])));
    assert_eq!(run([class], CONTRACT, "sum", "([I)I", vec![array]).unwrap(), vec![int(6)]);
}
