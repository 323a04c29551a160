use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rental_core::{
    lease::PaymentRecord,
    schedule::{track, ScheduleGenerator},
};

fn bench_generate(c: &mut Criterion) {
    let generator = ScheduleGenerator::default();
    let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let end = NaiveDate::from_ymd_opt(2034, 1, 31).unwrap();

    c.bench_function("generate_ten_year_schedule", |b| {
        b.iter(|| {
            generator
                .generate(black_box(start), black_box(Some(end)), 1250.0, 150_000.0)
                .unwrap()
        })
    });
}

fn bench_track(c: &mut Criterion) {
    let generator = ScheduleGenerator::default();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let schedule = generator.generate(start, None, 1250.0, 150_000.0).unwrap();
    let payments: Vec<PaymentRecord> = schedule
        .iter()
        .take(90)
        .map(|inst| PaymentRecord::rent(inst.due_date(), inst.amount()))
        .collect();
    let reference = NaiveDate::from_ymd_opt(2031, 6, 15).unwrap();

    c.bench_function("track_ten_year_schedule", |b| {
        b.iter(|| track(black_box(&schedule), black_box(&payments), reference))
    });
}

criterion_group!(benches, bench_generate, bench_track);
criterion_main!(benches);
