use neojc_class::*;

const POOL: &str = r#"
classes:
  - name: com/example/Base
    fields:
      - { name: owner, desc: "Ljava/lang/String;" }
  - name: com/example/Counter
    super_name: com/example/Base
    fields:
      - { name: count, desc: I }
      - { name: total, desc: J, access: 8 }
    methods:
      - name: inc
        desc: (I)I
        access: 9
        max_locals: 1
        insns:
          - { kind: label, label: 0 }
          - { kind: var, opcode: ILOAD, var: 0 }
          - { kind: op, opcode: ICONST_1 }
          - { kind: op, opcode: IADD }
          - { kind: op, opcode: IRETURN }
      - name: hello
        desc: ()Ljava/lang/String;
        access: 9
        annotations:
          - { kind: syscall, name: System.Runtime.GetTrigger }
        insns:
          - { kind: ldc, value: { type: string, value: hi } }
          - { kind: method, opcode: invokestatic, method: { owner: com/example/Counter, name: inc, desc: (I)I } }
          - { kind: lookup_switch, default: 3, keys: [1, 5], labels: [1, 2] }
"#;

#[test]
fn load_yaml_pool() {
    let pool = ClassPool::from_yaml(POOL).unwrap();
    assert_eq!(pool.len(), 2);

    let counter = pool.load("com/example/Counter").unwrap();
    assert_eq!(counter.simple_name(), "Counter");
    assert_eq!(counter.instance_fields().count(), 1);
    assert_eq!(counter.static_fields().count(), 1);

    let inc = counter.find_method("inc", "(I)I").unwrap();
    assert!(inc.is_static());
    assert_eq!(inc.insns.len(), 5);
    assert_eq!(inc.insns[2].opcode(), Some(JvmOpcode::Iconst1));
    assert!(inc.insns[0].is_pseudo());
    assert_eq!(inc.label_index(Label(0)), Some(0));

    let hello = counter.find_method("hello", "()Ljava/lang/String;").unwrap();
    assert_eq!(hello.syscalls().collect::<Vec<_>>(), vec!["System.Runtime.GetTrigger"]);
    assert_eq!(
        hello.insns[0],
        Insn::Ldc {
            value: Constant::String("hi".into())
        }
    );
    assert_eq!(hello.insns[1].opcode(), Some(JvmOpcode::Invokestatic));
    assert_eq!(hello.insns[1].method_ref().unwrap().name, "inc");
    assert_eq!(hello.insns[2].opcode(), Some(JvmOpcode::Lookupswitch));
}

#[test]
fn hierarchy_walk() {
    let pool = ClassPool::from_yaml(POOL).unwrap();
    let chain: Vec<String> = pool
        .hierarchy("com/example/Counter")
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(chain, vec!["com/example/Counter", "com/example/Base"]);
    assert!(pool.is_subclass_of("com/example/Counter", "com/example/Base"));
    assert!(pool.is_subclass_of("com/example/Counter", OBJECT));
    assert!(!pool.is_subclass_of("com/example/Base", "com/example/Counter"));
}

#[test]
fn duplicate_class_rejected() {
    let mut pool = ClassPool::new();
    pool.insert(ClassBuilder::new("a/A").build()).unwrap();
    let err = pool.insert(ClassBuilder::new("a/A").build()).unwrap_err();
    assert!(matches!(err, Error::DuplicateClass(ref n) if n == "a/A"), "{err}");
}

#[test]
fn unknown_opcode_is_an_error() {
    let text = r#"
classes:
  - name: a/A
    methods:
      - name: f
        desc: ()V
        insns:
          - { kind: op, opcode: FROB }
"#;
    assert!(matches!(ClassPool::from_yaml(text), Err(Error::Yaml(_))));
}

#[test]
fn yaml_roundtrip_through_builder() {
    let mut m = MethodBuilder::new("run", "(JI)V");
    let end = m.new_label();
    m.var(JvmOpcode::Lload, 0)
        .op(JvmOpcode::L2i)
        .var(JvmOpcode::Istore, 3)
        .iinc(3, 1)
        .place(end)
        .op(JvmOpcode::Return);
    let method = m.build();
    assert_eq!(method.max_locals, 4);

    let mut pool = ClassPool::new();
    pool.insert(ClassBuilder::new("a/Run").method(method.clone()).build())
        .unwrap();
    let reloaded = ClassPool::from_yaml(&pool.to_yaml().unwrap()).unwrap();
    let again = reloaded.load("a/Run").unwrap();
    assert_eq!(again.methods[0], method);
}

#[test]
fn event_fields_and_interfaces() {
    let text = r#"
classes:
  - name: io/neow3j/devpack/events/Event2Args
    interfaces: [io/neow3j/devpack/events/EventInterface]
  - name: a/Token
    fields:
      - name: onTransfer
        desc: Lio/neow3j/devpack/events/Event2Args;
        access: 8
        annotations:
          - { kind: display_name, name: Transfer }
      - { name: onMint, desc: Lio/neow3j/devpack/events/Event2Args;, access: 8 }
"#;
    let pool = ClassPool::from_yaml(text).unwrap();
    let event = pool.load("io/neow3j/devpack/events/Event2Args").unwrap();
    assert!(event.implements("io/neow3j/devpack/events/EventInterface"));
    assert!(!event.implements("java/lang/Runnable"));

    let token = pool.load("a/Token").unwrap();
    let names: Vec<_> = token.static_fields().map(|f| f.display_name()).collect();
    assert_eq!(names, vec!["Transfer", "onMint"]);
}
