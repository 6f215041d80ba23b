//! FILENAME: table-core/benches/pipeline.rs
//! Benchmark: full row-model pipeline over generated records.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use table_core::{
    expanded_row_model, filtered_row_model, grouped_row_model, pagination_row_model,
    sorted_row_model, CellValue, ColumnDef, ColumnFilter, ColumnSort, Table, TableOptions, Updater,
};

const STATUSES: [&str; 3] = ["single", "complicated", "relationship"];

fn records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "first_name": format!("first{}", i % 997),
                "last_name": format!("last{}", i % 113),
                "age": (i * 7) % 80,
                "visits": (i * 13) % 1000,
                "status": STATUSES[i % STATUSES.len()],
            })
        })
        .collect()
}

fn options(count: usize) -> TableOptions<Value> {
    TableOptions::new(
        records(count),
        vec![
            ColumnDef::accessor("first_name"),
            ColumnDef::accessor("last_name"),
            ColumnDef::accessor("age"),
            ColumnDef::accessor("visits"),
            ColumnDef::accessor("status"),
        ],
    )
    .with_filtered_row_model(filtered_row_model())
    .with_grouped_row_model(grouped_row_model())
    .with_sorted_row_model(sorted_row_model())
    .with_expanded_row_model(expanded_row_model())
    .with_pagination_row_model(pagination_row_model())
}

fn bench_cold_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_pipeline");
    for count in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_with_setup(
                || {
                    let table = Table::new(options(count)).unwrap();
                    table.set_sorting(vec![ColumnSort::desc("visits"), ColumnSort::asc("last_name")]);
                    table.set_column_filters(vec![ColumnFilter::new("status", "single")]);
                    table
                },
                |table| black_box(table.get_row_model().rows.len()),
            );
        });
    }
    group.finish();
}

fn bench_page_turn(c: &mut Criterion) {
    let table = Table::new(options(10_000)).unwrap();
    table.set_sorting(vec![ColumnSort::asc("age")]);
    table.get_row_model();

    c.bench_function("page_turn_10000", |b| {
        b.iter(|| {
            table.set_page_index(Updater::from_fn(|old: &usize| (old + 1) % 100));
            black_box(table.get_row_model().rows.len())
        });
    });
}

fn bench_grouping(c: &mut Criterion) {
    c.bench_function("group_by_status_10000", |b| {
        b.iter_with_setup(
            || {
                let table = Table::new(options(10_000)).unwrap();
                table.set_grouping(vec!["status".to_string()]);
                table
            },
            |table| {
                let rows = table.get_grouped_row_model();
                black_box(rows.rows[0].get_value(&table, "visits"))
            },
        );
    });
}

fn bench_global_filter(c: &mut Criterion) {
    let table = Table::new(options(10_000)).unwrap();
    let mut needle = 0usize;

    c.bench_function("global_filter_10000", |b| {
        b.iter(|| {
            needle = (needle + 1) % 997;
            table.set_global_filter(Some(CellValue::text(format!("first{}", needle))));
            black_box(table.get_filtered_row_model().flat_rows.len())
        });
    });
}

criterion_group!(
    benches,
    bench_cold_pipeline,
    bench_page_turn,
    bench_grouping,
    bench_global_filter
);
criterion_main!(benches);
