// Codec and envelope-signing benchmarks for the Stacks P2P wire format.
//
// Covers transaction decode/encode, vector decoding at a few sizes, and the
// measure-then-sign path of a message envelope.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use stacks_p2p::codec::Encodeable;
use stacks_p2p::config::{NETWORK_ID_MAINNET, PEER_VERSION_MAINNET};
use stacks_p2p::crypto::StacksPrivateKey;
use stacks_p2p::message::{PingData, StacksMessageEnvelope, StacksMessageType};
use stacks_p2p::transaction::{
    SpendingCondition, StacksTransaction, TokenTransferPayload, TransactionAuth,
    TransactionBuilder, TransactionPayload, TransactionVec,
};
use stacks_p2p::types::{
    BurnchainHeaderHash, Hash160, PrincipalData, StacksAddress, TokenTransferMemo,
};

fn sample_transaction(nonce: u64) -> StacksTransaction {
    let auth = TransactionAuth::Standard(SpendingCondition::new_singlesig_p2pkh(
        Hash160([0x11; 20]),
        nonce,
        180,
    ));
    TransactionBuilder::new(
        auth,
        TransactionPayload::TokenTransfer(TokenTransferPayload {
            recipient: PrincipalData::Standard(StacksAddress::new(22, Hash160([0x22; 20]))),
            amount: 1_000_000,
            memo: TokenTransferMemo([0; 34]),
        }),
    )
    .build()
}

fn bench_transaction_encode(c: &mut Criterion) {
    let tx = sample_transaction(42);
    c.bench_function("transaction/encode", |b| {
        b.iter(|| tx.to_bytes());
    });
}

fn bench_transaction_decode(c: &mut Criterion) {
    let bytes = sample_transaction(42).to_bytes();
    c.bench_function("transaction/decode", |b| {
        b.iter(|| StacksTransaction::from_bytes(&bytes));
    });
}

fn bench_transaction_vec_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction_vec/decode");

    for size in [10u64, 100, 1000] {
        let txs: TransactionVec = (0..size).map(sample_transaction).collect();
        let bytes = txs.to_bytes();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| TransactionVec::from_bytes(bytes));
        });
    }

    group.finish();
}

fn bench_envelope_sign(c: &mut Criterion) {
    let key = StacksPrivateKey::generate();
    let msg = StacksMessageEnvelope::new(
        PEER_VERSION_MAINNET,
        NETWORK_ID_MAINNET,
        1,
        812_000,
        BurnchainHeaderHash([0x81; 32]),
        811_993,
        BurnchainHeaderHash([0x79; 32]),
        StacksMessageType::Transaction(sample_transaction(7)),
    );

    c.bench_function("envelope/sign", |b| {
        b.iter(|| {
            let mut m = msg.clone();
            m.sign(&key)
        });
    });
}

fn bench_envelope_verify(c: &mut Criterion) {
    let key = StacksPrivateKey::generate();
    let public_key = key.public_key();
    let mut msg = StacksMessageEnvelope::new(
        PEER_VERSION_MAINNET,
        NETWORK_ID_MAINNET,
        1,
        812_000,
        BurnchainHeaderHash([0x81; 32]),
        811_993,
        BurnchainHeaderHash([0x79; 32]),
        StacksMessageType::Ping(PingData { nonce: 1 }),
    );
    if msg.sign(&key).is_err() {
        return;
    }

    c.bench_function("envelope/verify", |b| {
        b.iter(|| msg.verify(&public_key));
    });
}

criterion_group!(
    benches,
    bench_transaction_encode,
    bench_transaction_decode,
    bench_transaction_vec_decode,
    bench_envelope_sign,
    bench_envelope_verify,
);
criterion_main!(benches);
