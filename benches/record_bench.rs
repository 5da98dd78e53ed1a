use criterion::{Criterion, criterion_group, criterion_main};
use dto_record::{DtoRecord, FieldMap, JsonSerializer, PhpSerializer, RecordInput, dto_map};
use std::hint::black_box;
use std::rc::Rc;

// ─── Test Data ──────────────────────────────────────────────────────────────

/// Structure:
/// {
///   "id": "user:abc123",
///   "name": "Alice",
///   "age": 28,
///   "score": 99.5,
///   "active": true,
///   "tags": ["developer", "rust", "database"],
///   "profile": {
///     "bio": "Software engineer",
///     "settings": { "theme": "dark", "privacy": { "public": false, "level": 3 } }
///   }
/// }
const BENCH_JSON: &str = r#"{"id":"user:abc123","name":"Alice","age":28,"score":99.5,"active":true,"tags":["developer","rust","database"],"profile":{"bio":"Software engineer","settings":{"theme":"dark","privacy":{"public":false,"level":3}}},"unknown":"dropped"}"#;

fn make_defaults() -> FieldMap {
    dto_map!({
        "id" => "",
        "name" => "anonymous",
        "age" => 0,
        "score" => 0.0,
        "active" => false,
        "tags" => (Vec::<String>::new()),
        "profile" => { "bio" => "", "settings" => { "theme" => "light" } },
        "country" => "DE",
    })
}

fn make_record() -> DtoRecord {
    DtoRecord::new(make_defaults(), BENCH_JSON).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Construction
// ═══════════════════════════════════════════════════════════════════════════

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let defaults = make_defaults();
    let parsed: serde_json::Value = serde_json::from_str(BENCH_JSON).unwrap();

    group.bench_function("from_json_text", |b| {
        b.iter(|| black_box(DtoRecord::new(defaults.clone(), black_box(BENCH_JSON))))
    });

    group.bench_function("from_object", |b| {
        b.iter(|| black_box(DtoRecord::new(defaults.clone(), black_box(parsed.clone()))))
    });

    group.bench_function("all_defaults", |b| {
        b.iter(|| black_box(DtoRecord::new(defaults.clone(), RecordInput::empty())))
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Lookup
// ═══════════════════════════════════════════════════════════════════════════

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    let mut record = make_record();
    record.unset("country");

    group.bench_function("get (scalar)", |b| {
        b.iter(|| black_box(record.get(black_box("name"))))
    });

    group.bench_function("get (default fallback)", |b| {
        b.iter(|| black_box(record.get(black_box("country"))))
    });

    group.bench_function("get (dotted, 4 segments)", |b| {
        b.iter(|| black_box(record.get(black_box("profile.settings.privacy.level"))))
    });

    group.bench_function("get (dotted, array index)", |b| {
        b.iter(|| black_box(record.get(black_box("tags.2"))))
    });

    group.bench_function("get_i64", |b| {
        b.iter(|| black_box(record.get_i64(black_box("age"))))
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Serialization
// ═══════════════════════════════════════════════════════════════════════════

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    let mut record = make_record();

    group.bench_function("json", |b| b.iter(|| black_box(record.serialize())));

    group.bench_function("to_map", |b| b.iter(|| black_box(record.to_map())));

    record.set_serializer(Rc::new(PhpSerializer));
    group.bench_function("php", |b| b.iter(|| black_box(record.serialize())));

    record.set_serializer(Rc::new(JsonSerializer::new()));
    group.bench_function("to_map (after swap back)", |b| {
        b.iter(|| black_box(record.to_map()))
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_get, bench_serialize);
criterion_main!(benches);
