//! Benchmarks for payload validation and document emission

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use open_schemas::emit::{Emitter, JsonSchemaEmitter, OpenApiEmitter};
use open_schemas::schemas::anthropic::CreateMessageRequest;
use open_schemas::{parse, Provider};
use serde_json::{json, Value};

/// A request with `turns` alternating messages.
fn conversation(turns: usize) -> Value {
    let messages: Vec<Value> = (0..turns)
        .map(|i| {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            json!({"role": role, "content": [{"type": "text", "text": format!("turn {i}")}]})
        })
        .collect();
    json!({
        "model": "claude-3-opus-20240229",
        "max_tokens": 1024,
        "messages": messages
    })
}

fn benchmark_validate(c: &mut Criterion) {
    let catalog = Provider::Anthropic.catalog();
    let small = conversation(2);
    let large = conversation(200);

    c.bench_function("validate_request_2_turns", |b| {
        b.iter(|| catalog.validate("CreateMessageRequest", black_box(&small)))
    });
    c.bench_function("validate_request_200_turns", |b| {
        b.iter(|| catalog.validate("CreateMessageRequest", black_box(&large)))
    });

    let invalid = json!({"model": "claude-3", "max_tokens": 0, "temperature": 3, "messages": []});
    c.bench_function("validate_invalid_request", |b| {
        b.iter(|| catalog.validate("CreateMessageRequest", black_box(&invalid)))
    });
}

fn benchmark_parse(c: &mut Criterion) {
    let payload = conversation(20);
    c.bench_function("parse_typed_request_20_turns", |b| {
        b.iter(|| parse::<CreateMessageRequest>(black_box(payload.clone())))
    });
}

fn benchmark_apply_defaults(c: &mut Criterion) {
    let catalog = Provider::OpenAi.catalog();
    let payload = json!({});
    c.bench_function("apply_defaults_pagination", |b| {
        b.iter(|| catalog.apply_defaults("Pagination", black_box(payload.clone())))
    });
}

fn benchmark_emit(c: &mut Criterion) {
    let catalog = Provider::OpenAi.catalog();
    c.bench_function("emit_openai_json_schema", |b| {
        b.iter(|| JsonSchemaEmitter::new().emit(black_box(catalog)))
    });
    c.bench_function("emit_openai_openapi", |b| {
        b.iter(|| OpenApiEmitter::new().emit(black_box(catalog)))
    });
}

criterion_group!(
    benches,
    benchmark_validate,
    benchmark_parse,
    benchmark_apply_defaults,
    benchmark_emit
);
criterion_main!(benches);
