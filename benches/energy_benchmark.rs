use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use metersum::algorithms::EnergyComputer;
use metersum::config::SummaryConfig;
use metersum::core::domain::{
    ChannelKind, ChannelPartition, ColumnValues, LoadChannel, MeterColumn, MeterTable,
};
use metersum::preprocessing::IntervalEstimator;

fn month_of_half_hours() -> MeterTable {
    let base = NaiveDate::from_ymd_opt(2023, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let timestamps: Vec<NaiveDateTime> = (0..48 * 30)
        .map(|i| base + Duration::minutes(30 * i as i64))
        .collect();
    let values: Vec<Option<f64>> = (0..timestamps.len())
        .map(|i| Some(1.0 + (i % 48) as f64 * 0.1))
        .collect();
    MeterTable::new(
        timestamps,
        vec![MeterColumn {
            name: "mains_kw".to_string(),
            values: ColumnValues::Numeric(values),
        }],
    )
}

fn bench_interval_estimation(c: &mut Criterion) {
    let table = month_of_half_hours();
    let config = SummaryConfig::default();

    c.bench_function("estimate_month_of_half_hours", |b| {
        b.iter(|| IntervalEstimator::estimate(black_box(&table.timestamps), black_box(&config)));
    });
}

fn bench_energy_integration(c: &mut Criterion) {
    let table = month_of_half_hours();
    let config = SummaryConfig::default();
    let profile = IntervalEstimator::estimate(&table.timestamps, &config).unwrap();
    let partition = ChannelPartition {
        loads: vec![LoadChannel {
            name: "mains_kw".to_string(),
            kind: ChannelKind::Power,
            column: 0,
        }],
        metadata: vec![],
        ambiguous: vec![],
    };

    c.bench_function("integrate_month_of_half_hours", |b| {
        b.iter(|| {
            EnergyComputer::compute(
                black_box(&table),
                black_box(&partition),
                black_box(&profile),
            )
        });
    });
}

criterion_group!(benches, bench_interval_estimation, bench_energy_integration);
criterion_main!(benches);
