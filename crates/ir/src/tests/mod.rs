use super::*;
use serde_json::{json, Value as JsonValue};
// Tests for the node model, casting and the resolver.

fn clazz(name: &str, namespaces: &[&str]) -> Clazz {
    let mut c = Clazz::default();
    c.base.name = name.into();
    c.base.namespaces = namespaces.iter().map(|s| s.to_string()).collect();
    c
}

fn pointer_to(name: &str) -> SimpleType {
    let mut t = SimpleType::default();
    t.kind = SimpleTypeKind::Pointer;
    t.base.name = name.into();
    t.base.source = format!("{}*", trim_namespace(name));
    t
}

fn result_with(nodes: Vec<Node>) -> ParseResult {
    let mut file = CxxFile::new("/tmp/a.h");
    file.nodes = nodes;
    ParseResult::new(vec![file])
}

#[test]
fn trim_namespace_is_idempotent() {
    for s in ["", "a", "a::b", "a::b::c", "::x", "a::"] {
        let once = trim_namespace(s);
        assert_eq!(trim_namespace(once), once);
    }
    assert_eq!(trim_namespace(""), "");
    assert_eq!(trim_namespace("foo::bar"), "bar");
}

#[test]
fn get_namespace_strips_last_segment() {
    assert_eq!(get_namespace(""), "");
    assert_eq!(get_namespace("int"), "");
    assert_eq!(get_namespace("std::vector::size_type"), "std::vector");
}

#[test]
fn separator_runs_split_left_to_right() {
    assert_eq!(trim_namespace("a:::b"), ":b");
    assert_eq!(get_namespace("a:::b"), "a");
    assert_eq!(trim_namespace("a::::b"), "b");
    assert_eq!(get_namespace("a::::b"), "a::");
}

#[test]
fn cast_covers_every_tag() {
    let tags = [
        "CXXFile",
        "IncludeDirective",
        "TypeAlias",
        "Clazz",
        "Struct",
        "Constructor",
        "MemberFunction",
        "Variable",
        "SimpleType",
        "MemberVariable",
        "EnumConstant",
        "Enumz",
    ];
    for tag in tags {
        let node = cast(json!({"__TYPE": tag, "name": "n", "namespaces": ["a"]})).unwrap();
        assert_eq!(node.kind().as_str(), tag);
        assert_eq!(node.node_ref().base().name, "n");
        assert_eq!(node.node_ref().base().namespaces, vec!["a".to_string()]);
        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["__TYPE"], tag);
    }
}

#[test]
fn cast_only_accepts_canonical_tags() {
    for tag in ["Class", "Method", "File", "Enum"] {
        let err = cast(json!({"__TYPE": tag, "name": "A"})).unwrap_err();
        assert!(matches!(err, CastError::UnsupportedNodeType { .. }), "{tag}");
    }
}

#[test]
fn cast_rejects_unknown_tag_with_payload() {
    let payload = json!({"__TYPE": "Lambda", "name": "x"});
    let err = cast(payload.clone()).unwrap_err();
    match &err {
        CastError::UnsupportedNodeType { tag, payload: p } => {
            assert_eq!(tag, "Lambda");
            assert_eq!(p, &payload);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("Lambda"));
}

#[test]
fn cast_rejects_unknown_nested_tag() {
    let payload = json!({
        "__TYPE": "Clazz",
        "name": "A",
        "methods": [{"__TYPE": "Coroutine", "name": "f"}]
    });
    let err = cast(payload).unwrap_err();
    assert!(matches!(err, CastError::UnsupportedNodeType { ref tag, .. } if tag == "Coroutine"));
}

#[test]
fn cast_requires_discriminator_at_top_level() {
    let err = cast(json!({"name": "x"})).unwrap_err();
    assert!(matches!(err, CastError::MissingDiscriminator { .. }));
}

#[test]
fn cast_keeps_untagged_nested_objects() {
    let node = cast(json!({
        "__TYPE": "Constructor",
        "name": "A",
        "initializerList": [
            {"kind": "Value", "name": "a_", "type": "int", "values": ["0"]}
        ]
    }))
    .unwrap();
    let Node::Constructor(ctor) = node else {
        panic!("expected constructor");
    };
    assert_eq!(
        ctor.initializer_list,
        vec![ConstructorInitializer {
            kind: ConstructorInitializerKind::Value,
            name: "a_".into(),
            ty: "int".into(),
            values: vec!["0".into()],
        }]
    );
}

#[test]
fn simple_type_kind_uses_numeric_encoding() {
    let node = cast(json!({"__TYPE": "SimpleType", "name": "int", "kind": 103, "source": "int[10]"}))
        .unwrap();
    let Node::SimpleType(ty) = node else {
        panic!("expected simple type");
    };
    assert_eq!(ty.kind, SimpleTypeKind::Array);
    assert_eq!(ty.len_of_array_type(), "10");
    let v: JsonValue = serde_json::to_value(&ty).unwrap();
    assert_eq!(v["kind"], 103);
    assert!(cast(json!({"__TYPE": "SimpleType", "kind": 7})).is_err());
}

#[test]
fn serialization_skips_graph_bookkeeping() {
    let mut c = clazz("A", &["ns"]);
    c.methods.push(MemberFunction::default());
    let mut result = result_with(vec![Node::Clazz(c)]);
    for file in &mut result.files {
        file.link_children();
    }
    let v = serde_json::to_value(&result.files).unwrap();
    let method = &v[0]["nodes"][0]["methods"][0];
    assert!(method.get("parent").is_none());
    assert!(method.get("id").is_none());
    assert_eq!(method["return_type"]["__TYPE"], "SimpleType");
}

#[test]
fn resolves_class_by_pointer_type() {
    let result = result_with(vec![Node::Clazz(clazz("MyClass", &["A", "B"]))]);
    let ty = pointer_to("A::B::MyClass");
    let node = result.resolve_node_by_type(&ty);
    assert_eq!(node.kind(), NodeKind::Clazz);
    assert_eq!(node.base().namespaces, vec!["A", "B"]);
}

#[test]
fn resolves_duplicate_names_by_namespace() {
    for order in [[0, 1], [1, 0]] {
        let classes = [clazz("MyClass", &["A", "B"]), clazz("MyClass", &["A", "B", "C"])];
        let nodes = order
            .iter()
            .map(|&i| Node::Clazz(classes[i].clone()))
            .collect();
        let result = result_with(nodes);

        let outer = pointer_to("A::B::MyClass");
        assert_eq!(result.resolve_node_by_type(&outer).base().namespace(), "A::B");

        let inner = pointer_to("A::B::C::MyClass");
        assert_eq!(result.resolve_node_by_type(&inner).base().namespace(), "A::B::C");
    }
}

#[test]
fn builtin_types_resolve_to_themselves() {
    let result = result_with(vec![Node::Clazz(clazz("int", &[]))]);
    let mut ty = SimpleType::default();
    ty.base.name = "int".into();
    ty.is_builtin_type = true;
    let node = result.resolve_node_by_type(&ty);
    assert!(node.ptr_eq(&NodeRef::SimpleType(&ty)));
}

#[test]
fn unresolved_types_come_back_unchanged() {
    let result = result_with(vec![Node::Clazz(clazz("Other", &["x"]))]);
    let ty = pointer_to("x::Missing");
    let node = result.resolve_node_by_type(&ty);
    assert!(node.ptr_eq(&NodeRef::SimpleType(&ty)));
}

#[test]
fn templates_resolve_first_argument() {
    let result = result_with(vec![Node::Clazz(clazz("Item", &["a"]))]);
    let mut ty = SimpleType::default();
    ty.kind = SimpleTypeKind::Template;
    ty.base.name = "std::vector".into();
    ty.template_arguments = vec!["a::Item".into(), "a::Alloc".into()];
    let node = result.resolve_node_by_type(&ty);
    assert_eq!(node.name(), "Item");
}

#[test]
fn resolve_by_name_uses_parent_name_spelling() {
    let mut e = Enumz::default();
    e.base.name = "Kind".into();
    e.base.namespaces = vec!["ns".into()];
    e.base.parent_name = "Outer".into();
    let result = result_with(vec![Node::Enumz(e)]);
    let found = result.resolve_node_by_name("ns::Outer::Kind").unwrap();
    assert_eq!(found.kind(), NodeKind::Enumz);
    assert!(result.resolve_node_by_name("ns::Other::Kind").is_none());
}

#[test]
fn full_name_of_members_follows_parent_chain() {
    let mut c = clazz("Engine", &["agora"]);
    let mut m = MemberFunction::default();
    m.base.name = "start".into();
    let mut p = Variable::default();
    p.base.name = "cfg".into();
    m.parameters.push(p);
    c.methods.push(m);
    let mut result = result_with(vec![Node::Clazz(c)]);
    for file in &mut result.files {
        file.link_children();
    }

    let Node::Clazz(c) = &result.files[0].nodes[0] else {
        unreachable!()
    };
    let m = &c.methods[0];
    assert_eq!(result.full_name(NodeRef::Clazz(c)), "agora::Engine");
    assert_eq!(result.full_name(NodeRef::MemberFunction(m)), "agora::Engine.start");
    assert_eq!(
        result.full_name(NodeRef::SimpleType(&m.return_type)),
        "agora::Engine.start@return_type"
    );
    assert_eq!(
        result.full_name(NodeRef::SimpleType(&m.parameters[0].ty)),
        "agora::Engine.start.cfg@type"
    );
}

#[test]
fn get_walks_index_paths() {
    let mut e = Enumz::default();
    e.base.name = "E".into();
    let mut k = EnumConstant::default();
    k.base.name = "K".into();
    e.enum_constants.push(k);
    let result = result_with(vec![Node::Enumz(e)]);
    let Node::Enumz(e) = &result.files[0].nodes[0] else {
        unreachable!()
    };
    let id = e.enum_constants[0].base.id;
    assert!(!id.is_unset());
    assert_eq!(result.get(id).unwrap().name(), "K");
    assert_eq!(result.len(), 3);
}

#[test]
fn find_helpers_match_namespaces() {
    let mut e = Enumz::default();
    e.base.name = "Mode".into();
    e.base.namespaces = vec!["a".into(), "b".into()];
    let mut s = Clazz::new_struct();
    s.base.name = "Conf".into();
    let result = result_with(vec![
        Node::Clazz(clazz("Base", &["a"])),
        Node::Enumz(e),
        Node::Clazz(s),
    ]);
    assert!(result.find_clazz("a::Base").is_some());
    assert!(result.find_clazz("Base").is_some());
    assert!(result.find_clazz("Conf").is_none());
    assert!(result.find_enumz("b::Mode").is_some());
    assert!(result.find_enumz("c::Mode").is_none());
    assert!(result.find_enumz("").is_none());
}

#[test]
fn base_classes_are_collected_transitively() {
    let root = clazz("Root", &[]);
    let mut mid = clazz("Mid", &[]);
    mid.base_clazzs = vec!["Root".into()];
    let mut leaf = clazz("Leaf", &[]);
    leaf.base_clazzs = vec!["Mid".into()];
    let result = result_with(vec![
        Node::Clazz(root),
        Node::Clazz(mid),
        Node::Clazz(leaf.clone()),
    ]);
    let names: Vec<&str> = result
        .find_base_clazzs(&leaf)
        .iter()
        .map(|c| c.base.name.as_str())
        .collect();
    assert_eq!(names, vec!["Mid", "Root"]);
}

#[test]
fn files_from_json_casts_nested_nodes() {
    let dump = json!([{
        "__TYPE": "CXXFile",
        "file_path": "/tmp/a.h",
        "nodes": [{
            "__TYPE": "Struct",
            "name": "S",
            "constructors": [{"__TYPE": "Constructor", "name": "S", "parameters": []}],
            "member_variables": [{
                "__TYPE": "MemberVariable",
                "name": "x",
                "type": {"__TYPE": "SimpleType", "name": "int", "kind": 100, "is_builtin_type": true}
            }]
        }]
    }]);
    let files = files_from_json(&dump.to_string()).unwrap();
    let Node::Clazz(s) = &files[0].nodes[0] else {
        panic!("expected record");
    };
    assert!(s.is_struct());
    assert_eq!(s.constructors.len(), 1);
    assert!(s.member_variables[0].ty.is_builtin_type);
    assert_eq!(files[0].base.file_name(), "a.h");
}

fn deep_enum_unit(depth: usize) -> String {
    let open = r#"{"kind": "BinaryOperator", "opcode": "|", "inner": ["#;
    let close = r#", {"kind": "IntegerLiteral", "value": "1"}]}"#;
    let leaf = r#"{"kind": "IntegerLiteral", "value": "0"}"#;
    format!(
        r#"{{"kind": "TranslationUnitDecl", "inner": [{{"kind": "EnumDecl", "name": "Flags", "inner": [{{"kind": "EnumConstantDecl", "name": "ALL", "inner": [{}{leaf}{}]}}]}}]}}"#,
        open.repeat(depth),
        close.repeat(depth)
    )
}

#[test]
fn parses_native_ast_beyond_json_nesting_limit() {
    let root = parse_clang_ast(&deep_enum_unit(80)).unwrap();
    let mut node = &root.inner()[0].inner()[0];
    let mut depth = 0;
    while let Some(first) = node.inner().first() {
        depth += 1;
        node = first;
    }
    assert_eq!(depth, 81);
    assert_eq!(node.value_text().as_deref(), Some("0"));
}

#[test]
fn very_deep_native_ast_parses_and_drops() {
    let root = parse_clang_ast(&deep_enum_unit(20_000)).unwrap();
    assert_eq!(root.inner().len(), 1);
    drop(root);
}

#[test]
fn child_matches_collected_children() {
    let mut c = clazz("Engine", &["agora"]);
    c.constructors.push(Constructor::default());
    let mut m = MemberFunction::default();
    m.parameters.push(Variable::default());
    c.methods.push(m);
    c.member_variables.push(MemberVariable::default());
    let result = result_with(vec![Node::Clazz(c), Node::TypeAlias(TypeAlias::default())]);

    let mut pending = vec![NodeRef::File(&result.files[0])];
    let mut seen = 0;
    while let Some(node) = pending.pop() {
        let children = node.children();
        for (i, expected) in children.iter().enumerate() {
            assert!(node.child(i).is_some_and(|found| found.ptr_eq(expected)));
        }
        assert!(node.child(children.len()).is_none());
        seen += 1;
        pending.extend(children);
    }
    assert_eq!(seen, result.len());
}

#[test]
fn indexed_name_resolution_agrees_with_scan() {
    let mut kind = Enumz::default();
    kind.base.name = "Kind".into();
    kind.base.namespaces = vec!["ns".into()];
    kind.base.parent_name = "Outer".into();
    let result = result_with(vec![
        Node::Clazz(clazz("MyClass", &["A", "B"])),
        Node::Clazz(clazz("MyClass", &["A", "B", "C"])),
        Node::Clazz(clazz("Outer", &["ns"])),
        Node::Enumz(kind),
    ]);
    let index = result.name_index();
    for query in [
        "A::B::MyClass",
        "A::B::C::MyClass",
        "B::C::MyClass",
        "MyClass",
        "ns::Outer::Kind",
        "Outer::Kind",
        "ns::Other::Kind",
        "Missing",
        "",
    ] {
        let scanned = result.resolve_node_by_name(query).map(|n| n.id());
        let indexed = result
            .resolve_node_by_name_indexed(&index, query, None)
            .map(|n| n.id());
        assert_eq!(indexed, scanned, "{query}");
    }

    assert_eq!(index.candidates("MyClass").len(), 2);
    let first = result.files[0].nodes[0].node_ref().id();
    let second = result.files[0].nodes[1].node_ref().id();
    let found = result.resolve_node_by_name_indexed(&index, "MyClass", Some(first));
    assert_eq!(found.map(|n| n.id()), Some(second));
}
