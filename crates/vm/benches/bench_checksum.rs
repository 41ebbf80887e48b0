//! Benchmark for folding program ranges with `checksum_push`.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use warden_vm::core::{
    opcodes::{CHECKSUM_PUSH, POP, PUSH_JUNK, RET},
    types::Word,
    vm::VM,
};

fn program(body_words: usize) -> Vec<Word> {
    // a junk-padded body followed by a tight loop of checksums over it
    let mut words = Vec::with_capacity(body_words + 64);
    for i in 0..body_words / 2 {
        words.extend([PUSH_JUNK, i as Word]);
    }
    let len = words.len() as Word;
    for _ in 0..16 {
        words.extend([CHECKSUM_PUSH, 0, len, POP]);
    }
    words.push(RET);
    words
}

fn test_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("warden_vm");

    for size in [256, 4096] {
        let words = program(size);
        group.bench_function(BenchmarkId::new("checksum", size), |b| {
            b.iter(|| {
                let mut vm = VM::new();
                vm.load(&words);
                let result = vm.run();
                assert!(result.halt.is_normal());
                result.steps
            });
        });
    }

    group.finish();
}

criterion_group!(benches, test_checksum);
criterion_main!(benches);
