use std::hint::black_box;
use bencher::{ChunkPlan, TestCase};
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_content_limit::{ContentLengthGuard, ContentLimitConfig, LimitFilter};

static DECLARED_SMALL: &[(&str, &str)] = &[("host", "127.0.0.1:8080"), ("content-type", "application/json"), ("content-length", "512")];
static DECLARED_LARGE: &[(&str, &str)] = &[("host", "127.0.0.1:8080"), ("content-type", "application/json"), ("content-length", "10485760")];
static INVALID: &[(&str, &str)] = &[("host", "127.0.0.1:8080"), ("content-length", "invalid-content-length")];
static CHUNKED: &[(&str, &str)] = &[("host", "127.0.0.1:8080"), ("transfer-encoding", "chunked")];
static MISSING: &[(&str, &str)] = &[("host", "127.0.0.1:8080"), ("accept", "*/*")];

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::accepted("declared_under_limit", DECLARED_SMALL, 1024),
        TestCase::accepted("chunked", CHUNKED, 1024),
        TestCase::rejected("declared_over_limit", DECLARED_LARGE, 1024),
        TestCase::rejected("invalid_length", INVALID, 1024),
        TestCase::rejected("length_required", MISSING, 1024),
    ]
}

fn create_chunk_plans() -> Vec<ChunkPlan> {
    vec![ChunkPlan::new("small_chunks", 64, 256), ChunkPlan::new("large_chunks", 16 * 1024, 64)]
}

fn benchmark_evaluate_headers(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("evaluate_headers");

    for case in create_test_cases() {
        let guard = ContentLengthGuard::new(ContentLimitConfig::new(case.limit()));
        let headers = case.header_map();
        group.bench_with_input(BenchmarkId::new(format!("{:?}", case.group()), case.name()), &headers, |b, headers| {
            b.iter(|| black_box(guard.evaluate_headers(headers)));
        });
    }

    group.finish();
}

fn benchmark_limit_filter(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("limit_filter");

    for plan in create_chunk_plans() {
        let chunk = Bytes::from(vec![b'x'; plan.chunk_size()]);
        let limit = plan.total_size() as u64;

        group.throughput(Throughput::Bytes(limit));
        group.bench_with_input(BenchmarkId::from_parameter(plan.name()), &plan, |b, plan| {
            b.iter_batched_ref(
                || LimitFilter::new(limit),
                |filter| {
                    for _ in 0..plan.chunks() {
                        black_box(filter.on_chunk(chunk.clone()));
                    }
                    black_box(filter.on_end());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(guard, benchmark_evaluate_headers, benchmark_limit_filter);
criterion_main!(guard);
