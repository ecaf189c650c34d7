//! Synthetic dumps for the pipeline benchmarks.

use serde_json::{json, Value};

pub const HEADER: &str = "/bench/include/api.h";

fn simple_type(name: &str) -> Value {
    json!({"__TYPE": "SimpleType", "name": name, "source": name, "kind": 100, "is_builtin_type": name == "int"})
}

/// Base dump with `records` structs in `ns`, each with a constructor, two
/// methods and a member referring to the previous struct.
pub fn synthetic_dump(records: usize) -> String {
    let nodes: Vec<Value> = (0..records)
        .map(|i| {
            let prev = if i == 0 { "int".to_string() } else { format!("S{}", i - 1) };
            json!({
                "__TYPE": "Struct",
                "name": format!("S{i}"),
                "namespaces": ["bench"],
                "file_path": HEADER,
                "constructors": [{
                    "__TYPE": "Constructor",
                    "name": format!("S{i}"),
                    "parameters": [{"__TYPE": "Variable", "name": "v", "type": simple_type("int")}]
                }],
                "methods": [
                    {
                        "__TYPE": "MemberFunction",
                        "name": "get",
                        "mangled_name": format!("_ZN5bench2S{i}3getEv"),
                        "return_type": simple_type("int"),
                        "parameters": []
                    },
                    {
                        "__TYPE": "MemberFunction",
                        "name": "set",
                        "mangled_name": format!("_ZN5bench2S{i}3setEi"),
                        "return_type": simple_type("void"),
                        "parameters": [{"__TYPE": "Variable", "name": "v", "type": simple_type("int")}]
                    }
                ],
                "member_variables": [
                    {"__TYPE": "MemberVariable", "name": "v_", "type": simple_type("int")},
                    {"__TYPE": "MemberVariable", "name": "prev_", "type": simple_type(&prev)}
                ]
            })
        })
        .collect();
    json!([{"__TYPE": "CXXFile", "file_path": HEADER, "nodes": nodes}]).to_string()
}

/// Native AST matching [`synthetic_dump`].
pub fn synthetic_native(records: usize) -> String {
    let decls: Vec<Value> = (0..records)
        .map(|i| {
            json!({
                "kind": "CXXRecordDecl",
                "name": format!("S{i}"),
                "tagUsed": "struct",
                "completeDefinition": true,
                "loc": {"offset": i * 100, "line": i + 2},
                "inner": [
                    {
                        "kind": "CXXConstructorDecl",
                        "name": format!("S{i}"),
                        "type": {"qualType": "void (int)"},
                        "inner": [
                            {"kind": "ParmVarDecl", "name": "v", "type": {"qualType": "int"}},
                            {
                                "kind": "CXXCtorInitializer",
                                "anyInit": {"name": "v_", "type": {"qualType": "int"}},
                                "inner": [{"kind": "ImplicitCastExpr", "inner": [{
                                    "kind": "DeclRefExpr",
                                    "referencedDecl": {"kind": "ParmVarDecl", "name": "v", "type": {"qualType": "int"}}
                                }]}]
                            }
                        ]
                    },
                    {
                        "kind": "CXXMethodDecl",
                        "name": "get",
                        "mangledName": format!("_ZN5bench2S{i}3getEv"),
                        "type": {"qualType": "int ()"}
                    },
                    {
                        "kind": "CXXMethodDecl",
                        "name": "set",
                        "mangledName": format!("_ZN5bench2S{i}3setEi"),
                        "type": {"qualType": "void (int)"},
                        "inner": [{"kind": "ParmVarDecl", "name": "v", "type": {"qualType": "int"}}]
                    }
                ]
            })
        })
        .collect();
    json!({
        "kind": "TranslationUnitDecl",
        "inner": [{
            "kind": "NamespaceDecl",
            "name": "bench",
            "loc": {"offset": 0, "file": HEADER, "line": 1},
            "inner": decls
        }]
    })
    .to_string()
}
