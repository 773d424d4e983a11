//! End-to-end runs over real directory trees.

#![allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use ptuc::{run, Config, RunError};

const SHAPE_DECLS: &str = concat!(
    "KCPP_POLYMORPHIC_TAGGED_UNION(struct Shape);\n",
    "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape* shape, float scale);\n",
);

const CIRCLE: &str = concat!(
    "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};\n",
    "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
    "void circleDraw(Shape* shape, float scale) {}\n",
);

const SQUARE: &str = "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct square {};\n";

fn write_shape_tree(root: &Path) {
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("shape.h"), SHAPE_DECLS).unwrap();
    fs::write(root.join("circle.cpp"), CIRCLE).unwrap();
    fs::write(root.join("nested/square.cpp"), SQUARE).unwrap();
}

fn config(inputs: &[&Path], output: &Path) -> Config {
    Config {
        input_dirs: inputs.iter().map(|p| p.to_path_buf()).collect(),
        output_dir: output.to_path_buf(),
        verbose: false,
    }
}

#[test]
fn end_to_end_generates_expected_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("gen");
    write_shape_tree(&src);

    let report = run(&config(&[&src], &out)).unwrap();
    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.bases_generated, 1);
    assert!(report.io_failures.is_empty());

    let union_decl = fs::read_to_string(out.join("gen_Shape.h")).unwrap();
    assert_eq!(
        union_decl,
        concat!(
            "enum class Type : u16\n",
            "\t{ CIRCLE\n",
            "\t, SQUARE\n",
            "\t, ENUM_COUNT } type;\n",
            "union\n",
            "{\n",
            "\tcircle circle;\n",
            "\tsquare square;\n",
            "};\n",
        )
    );

    let includes = fs::read_to_string(out.join("gen_Shape_includes.h")).unwrap();
    assert_eq!(
        includes,
        "#pragma once\n#include \"circle.h\"\n#include \"square.h\"\n"
    );

    let dispatch = fs::read_to_string(out.join("gen_Shape_dispatch.cpp")).unwrap();
    assert_eq!(
        dispatch,
        concat!(
            " void draw(\n",
            "\t\tShape* shape, float scale)\n",
            "{\n",
            "\tswitch(shape->type)\n",
            "\t{\n",
            "\tcase Shape::Type::CIRCLE:\n",
            "\t\tcircleDraw(shape, scale);\n",
            "\tbreak;\n",
            "\tcase Shape::Type::SQUARE:\n",
            "\tbreak;\n",
            "\t}\n",
            "}\n",
        )
    );
}

#[test]
fn rerun_over_unchanged_input_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("gen");
    write_shape_tree(&src);

    run(&config(&[&src], &out)).unwrap();
    let names = ["gen_Shape.h", "gen_Shape_includes.h", "gen_Shape_dispatch.cpp"];
    let first: Vec<Vec<u8>> = names
        .iter()
        .map(|name| fs::read(out.join(name)).unwrap())
        .collect();

    fs::remove_dir_all(&out).unwrap();
    run(&config(&[&src], &out)).unwrap();
    let second: Vec<Vec<u8>> = names
        .iter()
        .map(|name| fs::read(out.join(name)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn split_input_directories_share_one_registry() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let out = dir.path().join("gen");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("shape.h"), SHAPE_DECLS).unwrap();
    fs::write(b.join("circle.cpp"), CIRCLE).unwrap();
    fs::write(b.join("square.cpp"), SQUARE).unwrap();

    let report = run(&config(&[&a, &b], &out)).unwrap();
    assert_eq!(report.bases_generated, 1);
    let includes = fs::read_to_string(out.join("gen_Shape_includes.h")).unwrap();
    assert!(includes.contains("circle.h"));
    assert!(includes.contains("square.h"));
}

#[test]
fn missing_input_directory_is_nonfatal() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let missing = dir.path().join("nope");
    let out = dir.path().join("gen");
    write_shape_tree(&src);

    let report = run(&config(&[&src, &missing], &out)).unwrap();
    assert_eq!(report.io_failures.len(), 1);
    assert_eq!(report.io_failures[0].path, missing);
    // Artifacts from the readable tree are still produced.
    assert!(out.join("gen_Shape.h").exists());
}

#[test]
fn parse_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("gen");
    fs::create_dir_all(&src).unwrap();
    let method =
        "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL void draw(Shape* shape);\n";
    fs::write(src.join("a.h"), method).unwrap();
    fs::write(src.join("b.h"), method).unwrap();

    let err = run(&config(&[&src], &out)).unwrap_err();
    assert!(matches!(err, RunError::Parse { .. }));
    assert!(!out.exists());
}

#[test]
fn duplicate_dispatch_target_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("gen");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("circle.cpp"),
        concat!(
            "KCPP_POLYMORPHIC_TAGGED_UNION_EXTENDS(Shape) struct circle {};\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void circleDraw(Shape* shape) {}\n",
            "KCPP_POLYMORPHIC_TAGGED_UNION_PURE_VIRTUAL_OVERRIDE(draw)\n",
            "void circleDrawFancy(Shape* shape) {}\n",
        ),
    )
    .unwrap();

    let err = run(&config(&[&src], &out)).unwrap_err();
    assert!(matches!(err, RunError::Validate(_)));
    assert!(!out.exists());
}
