use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rule_engine::{ObservationSet, RuleEngine};

fn full_panel() -> ObservationSet {
    ObservationSet {
        hb_1st: Some(10.2),
        hb_2nd: Some(10.1),
        hb_3rd: Some(10.8),
        tsat: Some(25.0),
        sbp: Some(146.0),
        dbp: Some(94.0),
        proteinuria: Some(320.0),
        ogtt_f: Some(94.0),
        ogtt_1h: Some(170.0),
        ogtt_2h: Some(150.0),
        tsh_1: Some(2.9),
        tsh_2: Some(3.3),
        ft4: Some(0.9),
        tpo_ab: Some(true),
        gestational_age_weeks: Some(28.0),
        bmi: Some(31.5),
        pre_pregnancy_weight: Some(82.0),
        current_weight: Some(89.0),
        bile_acids: Some(48.0),
        ast: Some(85.0),
        ..Default::default()
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let engine = RuleEngine::default();
    let empty = ObservationSet::default();
    let panel = full_panel();

    c.bench_function("evaluate_empty", |b| b.iter(|| engine.evaluate(black_box(&empty))));
    c.bench_function("evaluate_full_panel", |b| b.iter(|| engine.evaluate(black_box(&panel))));
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
