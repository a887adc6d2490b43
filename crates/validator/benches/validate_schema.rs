// Schema validation benchmarks.
//
// Measures a full pass over the blog's form schemas, both for records that
// pass every rule and for records that fail late in the schema.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use quill_validator::definition::SchemaDefinition;
use quill_validator::forms;
use quill_validator::prelude::*;

const POST_SCHEMA: &str = r#"{
    "title": { "type": "string", "required": true, "minLen": 3, "maxLen": 120 },
    "status": { "isIn": ["draft", "published"] },
    "slug": { "match": { "regex": "^[a-zA-Z0-9_-]*$" }, "notIn": ["admin", "api"] },
    "tags": { "type": "array", "contains": [["rust", "go"], ["news"]], "notContains": [["spam"]] }
}"#;

fn password_form(c: &mut Criterion) {
    let schema = forms::password_change_schema("n3wPassword");
    let valid = record! {
        "password" => "0ldPassword",
        "newPassword" => "n3wPassword",
        "newPasswordRep" => "n3wPassword",
    };
    let late_failure = valid.clone().with("newPasswordRep", "typo");

    c.bench_function("password_form_valid", |b| {
        b.iter(|| black_box(&schema).validate(black_box(&valid)));
    });
    c.bench_function("password_form_late_failure", |b| {
        b.iter(|| black_box(&schema).validate(black_box(&late_failure)));
    });
}

fn post_definition(c: &mut Criterion) {
    let schema = Schema::from_json_str(POST_SCHEMA).expect("benchmark schema compiles");
    let post = record! {
        "title" => "Hello, world",
        "status" => "published",
        "slug" => "hello-world",
        "tags" => Value::from_iter(["rust", "news", "release"].map(Value::from)),
    };

    c.bench_function("post_definition_valid", |b| {
        b.iter(|| black_box(&schema).validate(black_box(&post)));
    });
    c.bench_function("post_definition_compile", |b| {
        b.iter(|| {
            SchemaDefinition::from_json_str(black_box(POST_SCHEMA)).and_then(|definition| definition.compile())
        });
    });
}

criterion_group!(benches, password_form, post_definition);
criterion_main!(benches);
