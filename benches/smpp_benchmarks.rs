// ABOUTME: Benchmarks for PDU encoding, decoding and request body construction
// ABOUTME: Covers header-only PDUs, bind bodies and submit_sm bodies of varying size

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use smpp_session::codec::Pdu;
use smpp_session::datatypes::*;
use std::time::Duration;

fn sample_submit_sm() -> ShortMessage {
    ShortMessage::new("12345", "67890", "Hello World")
}

fn sample_credentials() -> BindCredentials {
    BindCredentials::new("test_system", "password").with_system_type("bench")
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdu_encode");
    group.measurement_time(Duration::from_secs(10));

    let enquire_link = Pdu::request(CommandId::EnquireLink, 1, None);
    group.bench_function("enquire_link", |b| {
        b.iter(|| black_box(&enquire_link).encode())
    });

    let submit_sm = sample_submit_sm().to_pdu(2).expect("valid message");
    group.bench_function("submit_sm", |b| b.iter(|| black_box(&submit_sm).encode()));

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdu_decode");
    group.measurement_time(Duration::from_secs(10));

    let enquire_link = Pdu::request(CommandId::EnquireLink, 1, None).encode();
    group.bench_function("enquire_link", |b| {
        b.iter(|| Pdu::decode(black_box(enquire_link.clone())).expect("decodes"))
    });

    let submit_sm = sample_submit_sm().to_pdu(2).expect("valid message").encode();
    group.bench_function("submit_sm", |b| {
        b.iter(|| {
            let pdu = Pdu::decode(black_box(submit_sm.clone())).expect("decodes");
            ShortMessage::from_pdu(&pdu).expect("body decodes")
        })
    });

    group.finish();
}

fn bench_request_bodies(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_body");
    group.measurement_time(Duration::from_secs(10));

    let credentials = sample_credentials();
    for bind_type in [BindType::Receiver, BindType::Transmitter, BindType::Transceiver] {
        group.bench_function(bind_type.command_id().name(), |b| {
            b.iter(|| black_box(&credentials).to_pdu(bind_type, 1).expect("valid credentials"))
        });
    }

    for size in [1usize, 16, 160, MAX_SHORT_MESSAGE_LEN] {
        let sms = ShortMessage::new("12345", "67890", vec![b'a'; size]);
        group.bench_with_input(BenchmarkId::new("submit_sm", size), &sms, |b, sms| {
            b.iter(|| black_box(sms).encode_body().expect("within limit"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_request_bodies);
criterion_main!(benches);
