#![cfg(feature = "serde")]

use pretty_assertions::assert_eq;
use wadis::types::{FunctionType, TypeTuple, ValueType};
use wadis::{Module, print_module};

#[test]
fn deserialized_signatures_are_canonical() {
    let module: Module = serde_json::from_str(
        r#"{
            "types": [
                { "params": ["i32", "i32"], "results": ["i32"] },
                { "params": ["i32", "i32"], "results": ["i32"] }
            ]
        }"#,
    )
    .unwrap();

    let expected = FunctionType::new([ValueType::I32], [ValueType::I32, ValueType::I32]);
    assert_eq!(module.types, [expected, expected]);
    assert_eq!(expected.params(), TypeTuple::new(&[ValueType::I32, ValueType::I32]));
}

#[test]
fn json_module_renders() {
    let module: Module = serde_json::from_str(
        r#"{
            "types": [{ "results": ["i32"] }],
            "functions": {
                "defs": [{
                    "type": 0,
                    "code": [
                        { "i32_const": 7 },
                        { "block": { "value": "i32" } },
                        { "br": 0 },
                        "end",
                        "end"
                    ]
                }]
            },
            "exports": [{ "name": "seven", "kind": "function", "index": 0 }]
        }"#,
    )
    .unwrap();

    assert_eq!(
        print_module(&module).unwrap(),
        r#"(module
  (type $type0 (func (result i32)))
  (export "seven" (func $func0))
  (func $func0 (type $type0)
    (result i32)
    i32.const 7
    block $block (result i32)
      br $block
    end ;; $block)
)
"#
    );
}
