use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

// a representative structured event document
const EVENT: &str = r#"{"@t":"2017-06-06T13:39:56.000Z","@l":"Information","@m":"host \"bramble\" restarted in 1.75s","@i":"4c3f2a19","elapsed":1.75,"pid":4242,"tags":["boot","health","壁"],"context":{"machine":"bramble-01","user":null,"interactive":false,"session":9007199254740992},"counters":[0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15]}"#;

fn parse_event(c: &mut Criterion) {
    let input = EVENT.as_bytes();

    let mut group = c.benchmark_group("parse_event");
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("tape_json", |b| {
        let mut buf = input.to_vec();

        b.iter(|| {
            buf.copy_from_slice(input);

            let document = tape_json::parse(black_box(&mut buf)).unwrap();
            black_box(document.root().len())
        })
    });

    group.bench_function("tape_json_navigate", |b| {
        let mut buf = input.to_vec();

        b.iter(|| {
            buf.copy_from_slice(input);

            let document = tape_json::parse(black_box(&mut buf)).unwrap();
            let root = document.root();

            black_box(root.value_of_key("elapsed").unwrap().double_value())
        })
    });

    group.bench_function("serde_json", |b| {
        b.iter(|| {
            let value: serde_json::Value = serde_json::from_slice(black_box(input)).unwrap();
            black_box(value)
        })
    });

    group.finish();
}

criterion_group!(benches, parse_event);
criterion_main!(benches);
