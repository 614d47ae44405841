//! 수집 핸들러 벤치마크
//!
//! 디코딩/검증, 분류, 핸들러 전체 흐름의 처리량을 측정합니다.

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use logvault_core::error::StorageError;
use logvault_ingest::record::LogSubmission;
use logvault_ingest::{IngestConfig, IngestHandler, LogNotifier, ObjectStore, classify};

/// 짧은 정보성 로그
const SHORT_INFO: &[u8] = br#"{"log_type":"info","message":"request processed"}"#;

/// 긴 보안 로그 (추가 필드 포함)
const LONG_SECURITY: &[u8] = br#"{"log_type":"security","message":"Authentication failure for user admin@example.com from IP address 203.0.113.45 using password authentication method after 3 previous attempts within 60 seconds exceeding rate limit threshold","host":"production-web-server-01","request_id":"550e8400-e29b-41d4-a716-446655440000","timestamp":"2024-01-15T12:00:00Z"}"#;

/// 기록을 버리는 저장소 (I/O 제외 측정용)
struct DiscardStore;

impl ObjectStore for DiscardStore {
    fn name(&self) -> &str {
        "discard"
    }

    async fn put(&self, _key: &str, body: Bytes, _content_type: &str) -> Result<(), StorageError> {
        black_box(body);
        Ok(())
    }
}

fn bench_decode_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_validate");

    group.throughput(Throughput::Elements(1));
    group.bench_function("short", |b| {
        b.iter(|| {
            LogSubmission::decode(black_box(SHORT_INFO))
                .and_then(LogSubmission::validate)
                .unwrap()
        })
    });

    group.bench_function("long_with_extra_fields", |b| {
        b.iter(|| {
            LogSubmission::decode(black_box(LONG_SECURITY))
                .and_then(LogSubmission::validate)
                .unwrap()
        })
    });

    group.bench_function("missing_fields", |b| {
        b.iter(|| {
            LogSubmission::decode(black_box(br#"{"message":"no type"}"#))
                .and_then(LogSubmission::validate)
                .unwrap_err()
        })
    });

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for log_type in ["security", "CRITICAL", "info", "authentication-service"] {
        group.bench_with_input(BenchmarkId::from_parameter(log_type), log_type, |b, t| {
            b.iter(|| classify(black_box(t)))
        });
    }

    group.finish();
}

fn bench_handle(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let handler = IngestHandler::new(
        DiscardStore,
        LogNotifier::new("security-alerts"),
        IngestConfig::default(),
    );

    let mut group = c.benchmark_group("handle");

    group.throughput(Throughput::Elements(1));
    group.bench_function("informational", |b| {
        b.iter(|| rt.block_on(handler.handle(black_box(SHORT_INFO))))
    });

    group.bench_function("alerting", |b| {
        b.iter(|| rt.block_on(handler.handle(black_box(LONG_SECURITY))))
    });

    // 1000건 반복 처리량
    group.throughput(Throughput::Elements(1000));
    group.bench_function("throughput_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                for _ in 0..1000 {
                    handler.handle(black_box(SHORT_INFO)).await;
                }
            })
        })
    });

    group.finish();
}

criterion_group!(benches, bench_decode_validate, bench_classify, bench_handle);
criterion_main!(benches);
