use pretty_assertions::assert_eq;
use wadis::core::indices::TypeIdx;
use wadis::core::operators::Operator;
use wadis::core::{FunctionDef, IndexSpace};
use wadis::types::{FunctionType, TypeTuple};
use wadis::{CustomSection, Module, print_module};

/// A module with one empty function followed by the given custom sections.
fn module_with_sections(sections: Vec<(&str, Vec<u8>)>) -> Module {
    Module {
        types: vec![FunctionType::new(TypeTuple::empty(), TypeTuple::empty())],
        functions: IndexSpace {
            imports: vec![],
            defs: vec![FunctionDef {
                r#type: TypeIdx(0),
                non_parameter_local_types: vec![],
                code: vec![Operator::End],
            }],
        },
        custom_sections: sections
            .into_iter()
            .map(|(name, contents)| CustomSection {
                name: name.into(),
                contents,
            })
            .collect(),
        ..Default::default()
    }
}

/// Version 2 followed by the given `(tag, payload)` subsections. Every length used here fits in
/// a single LEB128 byte.
fn linking(subsections: &[(u8, &[u8])]) -> Vec<u8> {
    let mut bytes = vec![2];
    for (tag, payload) in subsections {
        bytes.push(*tag);
        bytes.push(payload.len() as u8);
        bytes.extend_from_slice(payload);
    }
    bytes
}

fn render_linking(contents: Vec<u8>) -> String {
    print_module(&module_with_sections(vec![("linking", contents)])).unwrap()
}

const PREFIX: &str = "(module
  (type $type0 (func))
  (func $func0 (type $type0))
  (; linking section:
    Version: 2";

#[test]
fn segments_and_init_funcs() {
    let text = render_linking(linking(&[
        (5, &[1, 1, b'S', 2, 0]),
        (6, &[2, 0, 7]),
    ]));

    assert_eq!(
        text,
        format!(
            "{PREFIX}
    Segments:
      S alignment=4 flags=0
    Init funcs:
      $func0
      <invalid function index 7>
  ;)
)
"
        )
    );
}

#[test]
fn comdat_members_are_resolved() {
    let text = render_linking(linking(&[(7, &[1, 3, b'g', b'r', b'p', 0, 2, 1, 0, 0, 3])]));

    assert_eq!(
        text,
        format!(
            "{PREFIX}
    Comdats:
      grp
        Symbol: function $func0
        Symbol: data segment 3
  ;)
)
"
        )
    );
}

#[test]
fn symbols_render_flags_by_name() {
    #[rustfmt::skip]
    let payload: &[u8] = &[
        3,
        0, 5, 0, 1, b'f',
        1, 66, 1, b'd', 0, 4, 8,
        3, 0, 5,
    ];
    let text = render_linking(linking(&[(8, payload)]));

    assert_eq!(
        text,
        format!(
            "{PREFIX}
    Symbols:
      function f $func0 *WEAK* *HIDDEN*
      data d index=0 offset=4 size=8 *LOCAL* OtherFlags=64
      section *invalid index* index=5
  ;)
)
"
        )
    );
}

#[test]
fn out_of_range_comdat_function_stops_the_section_only() {
    let contents = linking(&[(7, &[1, 3, b'g', b'r', b'p', 0, 1, 1, 9])]);
    let text = print_module(&module_with_sections(vec![
        ("linking", contents),
        ("extra", b"ab".to_vec()),
    ]))
    .unwrap();

    assert_eq!(
        text,
        format!(
            "{PREFIX}
    Comdats:
      grp
        <decode error: invalid COMDAT function index 9>
  ;)
  (; custom section \"extra\":
    \"ab\"
  ;)
)
"
        )
    );
}

#[test]
fn unknown_subsection_leaves_a_failure_marker() {
    let text = render_linking(vec![1, 9, 0]);

    assert!(
        text.contains("\n    <decode error: unknown linking subsection type 9;"),
        "{text}"
    );
    assert!(text.ends_with("\n  ;)\n)\n"), "{text}");
}

#[test]
fn unknown_symbol_kind_leaves_a_failure_marker() {
    let text = render_linking(linking(&[(8, &[1, 4, 0])]));

    assert!(
        text.contains("    Symbols:\n      <decode error: unknown symbol kind 4;"),
        "{text}"
    );
}

#[test]
fn truncated_subsection_is_reported() {
    let text = render_linking(vec![2, 5, 9, 1]);

    assert!(
        text.contains("<decode error: subsection declares 9 bytes; only 1 remain>"),
        "{text}"
    );
}

#[test]
fn leftover_payload_is_reported() {
    let text = render_linking(linking(&[(6, &[0, 0xFF])]));

    assert!(
        text.contains("    Init funcs:\n    <decode error: 1 unread bytes at the end of a InitFuncs"),
        "{text}"
    );
}
