use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use adjudicator::board::{GameMap, Order};
use adjudicator::protocol::parse_orders;
use adjudicator::resolve::{adjudicate_batch, Adjudicator};

const STANDARD_JSON: &str = include_str!("../maps/standard.json");

const OPENING_HOLDS: &str = "\
austria A vie H ; austria A bud H ; austria F tri H
england F lon H ; england F edi H ; england A lvp H
france F bre H ; france A par H ; france A mar H
germany F kie H ; germany A ber H ; germany A mun H
italy F nap H ; italy A rom H ; italy A ven H
russia F stp H ; russia A mos H ; russia A war H ; russia F sev H
turkey F ank H ; turkey A con H ; turkey A smy H
";

const OPENING_MOVES: &str = "\
austria A vie - gal ; austria A bud - ser ; austria F tri - alb
england F lon - nth ; england F edi - nrg ; england A lvp - yor
france F bre - mao ; france A par - bur ; france A mar - spa
germany F kie - den ; germany A ber - kie ; germany A mun - ruh
italy F nap - ion ; italy A rom - apu ; italy A ven H
russia F stp - bot ; russia A mos - ukr ; russia A war - gal ; russia F sev - bla
turkey F ank - bla ; turkey A con - bul ; turkey A smy H
";

const CONVOY_FIGHT: &str = "\
france A tun - nap ; france F tys C A tun - nap ; france F ion C A tun - nap
france A apu S A tun - nap
italy F rom - tys ; italy F nap S F rom - tys
austria A boh - mun ; austria A tyr S A boh - mun
germany A mun - sil ; germany A ber S A mun - sil
russia A war - sil ; russia A pru S A war - sil
";

fn orders(text: &str) -> Vec<Order> {
    parse_orders(text).unwrap()
}

fn bench_resolve_holds(c: &mut Criterion) {
    let orders = orders(OPENING_HOLDS);
    c.bench_function("resolve_22_holds", |b| {
        let mut adj = Adjudicator::new(GameMap::standard());
        b.iter(|| adj.adjudicate(black_box(orders.clone())))
    });
}

fn bench_resolve_opening_moves(c: &mut Criterion) {
    let orders = orders(OPENING_MOVES);
    c.bench_function("resolve_22_spring_moves", |b| {
        let mut adj = Adjudicator::new(GameMap::standard());
        b.iter(|| adj.adjudicate(black_box(orders.clone())))
    });
}

fn bench_resolve_convoy_fight(c: &mut Criterion) {
    let orders = orders(CONVOY_FIGHT);
    c.bench_function("resolve_convoys_and_dislodgements", |b| {
        let mut adj = Adjudicator::new(GameMap::standard());
        b.iter(|| adj.adjudicate(black_box(orders.clone())))
    });
}

fn bench_batch(c: &mut Criterion) {
    let turn = orders(OPENING_MOVES);
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("resolve_256_turns_parallel", |b| {
        b.iter(|| {
            let batches = vec![turn.clone(); 256];
            adjudicate_batch(GameMap::standard(), black_box(batches))
        })
    });
    group.finish();
}

fn bench_parse_orders(c: &mut Criterion) {
    c.bench_function("parse_22_orders", |b| {
        b.iter(|| parse_orders(black_box(OPENING_MOVES)))
    });
}

fn bench_load_map(c: &mut Criterion) {
    c.bench_function("load_standard_map", |b| {
        b.iter(|| GameMap::from_json(black_box(STANDARD_JSON)))
    });
}

criterion_group!(
    benches,
    bench_resolve_holds,
    bench_resolve_opening_moves,
    bench_resolve_convoy_fight,
    bench_batch,
    bench_parse_orders,
    bench_load_map,
);
criterion_main!(benches);
