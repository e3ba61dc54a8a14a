//! End-to-end tests: raw source text in, styled outline runs out.

mod helpers;

use helpers::{fixture, lines, outline, run};
use umlgen_core::render::{OutputSink, StyledDocument};
use umlgen_core::types::{LineKind, UmlConfig};
use umlgen_core::UmlGenerator;

// ---------------------------------------------------------------------------
// Reference outlines
// ---------------------------------------------------------------------------

#[test]
fn test_single_line_animal_class() {
    let src = "public class Animal { private String name; \
               public String getName(){ return name; } }";
    let doc = outline(src);
    assert_eq!(
        lines(&doc),
        vec!["Animal", "- name: String", "+ getName: String"]
    );
    assert!(!run(&doc, "Animal").italic);
    assert!(run(&doc, "+ getName: String").style().is_plain());
}

#[test]
fn test_multi_line_animal_class() {
    let src = "public class Animal {\n    private String name;\n    \
               public String getName(){ return name; }\n}\n";
    let doc = outline(src);
    assert_eq!(
        lines(&doc),
        vec!["Animal", "- name: String", "+ getName: String"]
    );
}

#[test]
fn test_accessor_stereotype_example() {
    let doc = outline("private string Age { get; set; }\nprivate int age;\n");
    assert_eq!(doc.text(), "- age: int  «get, set» \n");
}

#[test]
fn test_abstract_method_example() {
    let doc = outline("public abstract void Run();");
    assert_eq!(lines(&doc), vec!["+ Run"]);
    let r = run(&doc, "+ Run");
    assert!(r.italic);
    assert!(!r.underline);
}

#[test]
fn test_java_fixture() {
    let doc = outline(&fixture("Animal.java"));
    assert_eq!(
        lines(&doc),
        vec![
            "Animal",
            "- name: String",
            "# legs: int",
            "+ count: int",
            "+ Animal",
            "+ getName: String",
            "+ setName",
            "+ getCount: int",
        ]
    );
    assert!(run(&doc, "+ count: int").underline);
    assert!(run(&doc, "+ getCount: int").underline);
    assert!(!run(&doc, "+ getName: String").underline);
}

#[test]
fn test_unity_fixture() {
    let doc = outline(&fixture("Player.cs"));
    assert_eq!(
        lines(&doc),
        vec![
            "Player",
            "- health: int  «get, set» ",
            "- nickname: string  «get» ",
            "+ Items: List<string>",
            "+ State: enum",
            "- Update",
            "# Jump",
            "+ ToString: string",
        ]
    );
    let text = doc.text();
    assert!(
        !text.contains("slots"),
        "nested class member leaked:\n{text}"
    );
    assert!(!text.contains("Idle"), "enum body leaked:\n{text}");
    assert!(
        !text.contains("jumpForce"),
        "serialized field should be skipped:\n{text}"
    );
}

#[test]
fn test_abstract_class_fixture() {
    let doc = outline(&fixture("Shape.cs"));
    assert_eq!(
        lines(&doc),
        vec![
            "Shape",
            "# created: int",
            "- label: string  «get, set» ",
            "+ Area: double",
            "+ Draw",
            "+ Unit: Shape",
        ]
    );
    assert!(run(&doc, "Shape").italic);
    assert!(run(&doc, "+ Area: double").italic);
    assert!(run(&doc, "+ Draw").italic);
    assert!(run(&doc, "+ Unit: Shape").underline);
    assert!(run(&doc, "# created: int").underline);
}

#[test]
fn test_kr_abstract_class_fixture() {
    let doc = outline(&fixture("Shape.java"));
    assert_eq!(
        lines(&doc),
        vec![
            "Shape",
            "- sides: int",
            "+ area: double",
            "+ describe: String",
            "# scale",
        ]
    );
    assert!(run(&doc, "Shape").italic);
    assert!(run(&doc, "+ area: double").italic);
    assert!(!run(&doc, "+ describe: String").italic);
}

#[test]
fn test_generic_class_constraint_keeps_method() {
    let src = "public class Repo\n{\n    private int count;\n    \
               public T Find<T>(int id) where T : class\n    {\n        return null;\n    }\n}";
    let doc = outline(src);
    assert_eq!(lines(&doc), vec!["Repo", "- count: int", "+ Find<T>: T"]);
}

#[test]
fn test_show_parameters() {
    let config = UmlConfig {
        show_parameters: true,
        ..UmlConfig::default()
    };
    let doc = UmlGenerator::new(config).outline(&fixture("Shape.cs"));
    let got = lines(&doc);
    assert!(
        got.contains(&"+ Draw(Canvas, Color)".to_string()),
        "got:\n{}",
        doc.text()
    );
    assert!(
        got.contains(&"+ Area(): double".to_string()),
        "got:\n{}",
        doc.text()
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_no_class_keyword_still_extracts_members() {
    let doc = outline("private int x;\npublic void F()\n{\n    int hidden;\n}\n");
    assert_eq!(lines(&doc), vec!["- x: int", "+ F"]);
}

#[test]
fn test_translate_is_idempotent() {
    let generator = UmlGenerator::default();
    let src = fixture("Player.cs");
    let mut doc = StyledDocument::new();
    generator.translate(&src, &mut doc);
    let first = doc.clone();
    generator.translate(&src, &mut doc);
    assert_eq!(doc, first);
    assert_eq!(doc.len(), first.text().chars().count());
}

#[test]
fn test_every_run_ends_with_newline() {
    for name in ["Animal.java", "Player.cs", "Shape.cs", "Shape.java"] {
        let doc = outline(&fixture(name));
        assert!(
            doc.runs().iter().all(|r| r.text.ends_with('\n')),
            "{name}: {:?}",
            doc.runs()
        );
    }
}

#[test]
fn test_fields_and_methods_never_overlap() {
    for name in ["Animal.java", "Player.cs", "Shape.cs", "Shape.java"] {
        let c = UmlGenerator::default().classify(&fixture(name));
        for field in &c.fields {
            assert!(
                !c.methods.contains(field),
                "{name}: '{field}' in both buckets"
            );
        }
        let tagged_members = c
            .lines
            .iter()
            .filter(|l| matches!(l.kind, LineKind::Field | LineKind::Method | LineKind::Enum))
            .count();
        assert_eq!(tagged_members, c.fields.len() + c.methods.len(), "{name}");
    }
}

#[test]
fn test_static_iff_underlined() {
    let src = "class A\n{\n    static int a;\n    int b;\n    static void F() { }\n    void G() { }\
        \n}";
    let doc = outline(src);
    for r in doc.runs().iter().skip(1) {
        let is_static = r.text.contains("a:") || r.text.contains("F");
        assert_eq!(r.underline, is_static, "run {:?}", r.text);
    }
}

#[test]
fn test_garbage_input_yields_empty_outline() {
    let doc = outline("}}}} {{ ;;; ((\n\n\t");
    assert!(doc.is_empty(), "got {:?}", doc.runs());
}

#[test]
fn test_bodiless_declarations_never_swallow_neighbours() {
    let src = "interface Greeter {\n    String greet(String who);\n    \
               default String hello() {\n        return greet(\"world\");\n    }\n    \
               int size();\n}";
    let c = UmlGenerator::default().classify(src);
    assert_eq!(
        c.methods,
        vec!["String greet(String)", "default String hello()", "int size()"]
    );
}

#[test]
fn test_braces_after_body_are_not_stripped() {
    let src = "class A\n{\n    void F()\n    {\n        {\n            {\n            }\n        }\
        \n    }\n    int after;\n}";
    let doc = outline(src);
    assert_eq!(lines(&doc), vec!["A", "- after: int", "- F"]);
}

#[test]
fn test_brace_on_header_line_strips_only_the_body() {
    let src = "class A\n{\n    void F() {\n        int hidden;\n    }\n    int after;\
        \n    void G() { int inner; } int kept;\n}";
    let doc = outline(src);
    assert_eq!(
        lines(&doc),
        vec!["A", "- after: int", "- kept: int", "- F", "- G"]
    );
}
