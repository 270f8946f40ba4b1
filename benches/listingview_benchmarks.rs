use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use listingview::controllers::geo_map::{choropleth, geo_summary, GeoMapState, PriceRange};
use listingview::controllers::state_comparison::compare_states;
use listingview::*;

const STATES: [&str; 8] = [
    "Alabama", "Colorado", "Georgia", "Maine", "Nevada", "Ohio", "Texas", "Vermont",
];

/// Deterministic listings; every seventh row misses house_size.
fn listings_csv(rows: usize) -> String {
    let mut csv = String::from("status,price,bed,bath,acre_lot,city,state,house_size\n");
    for i in 0..rows {
        let state = STATES[i % STATES.len()];
        let status = if i % 3 == 0 { "sold" } else { "for_sale" };
        let size = if i % 7 == 0 {
            String::new()
        } else {
            (800 + (i * 37) % 3000).to_string()
        };
        csv.push_str(&format!(
            "{},{},{},{},{:.2},City{},{},{}\n",
            status,
            50_000 + (i * 7919) % 900_000,
            1 + i % 5,
            1 + i % 3,
            0.05 + (i % 40) as f64 / 20.0,
            i % 50,
            state,
            size
        ));
    }
    csv
}

fn geometry(vertices_per_state: usize) -> Geometry {
    let vertices = STATES
        .iter()
        .enumerate()
        .flat_map(|(g, state)| {
            (0..vertices_per_state).map(move |order| PolygonVertex {
                long: -100.0 + order as f64 * 0.01,
                lat: 40.0,
                group: g as i64,
                order: order as i64,
                region: state.to_lowercase(),
                subregion: None,
            })
        })
        .collect();
    Geometry::new(vertices)
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_csv");

    for size in [1_000, 10_000, 100_000].iter() {
        let csv = listings_csv(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &csv, |b, csv| {
            b.iter(|| ListingTable::from_csv_reader("listings", black_box(csv.as_bytes())).unwrap());
        });
    }
    group.finish();
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");

    for size in [1_000, 10_000, 100_000].iter() {
        let raw = ListingTable::from_csv_reader("listings", listings_csv(*size).as_bytes()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| clean(black_box(raw)));
        });
    }
    group.finish();
}

fn bench_state_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_summary");

    for size in [1_000, 10_000, 100_000].iter() {
        let raw = ListingTable::from_csv_reader("listings", listings_csv(*size).as_bytes()).unwrap();
        let cleaned = clean(&raw);
        group.bench_with_input(BenchmarkId::from_parameter(size), &cleaned, |b, cleaned| {
            b.iter(|| state_summary(black_box(cleaned)).unwrap());
        });
    }
    group.finish();
}

fn bench_group_by_filter_view(c: &mut Criterion) {
    let raw = ListingTable::from_csv_reader("listings", listings_csv(100_000).as_bytes()).unwrap();
    let table = raw.table();
    let status_col = raw.column(ListingField::Status);

    c.bench_function("group_by_over_filter_view_100000", |b| {
        b.iter(|| {
            let sold = FilterView::new("sold", table, |t, row| t.get_str(row, status_col) == Some("sold"));
            group_by(&sold, "state", "price", Reducer::Median).unwrap()
        });
    });
}

fn bench_compare_states(c: &mut Criterion) {
    let raw = ListingTable::from_csv_reader("listings", listings_csv(100_000).as_bytes()).unwrap();
    let selected: Vec<String> = STATES[..5].iter().map(|s| s.to_string()).collect();

    c.bench_function("compare_states_100000", |b| {
        b.iter(|| compare_states(black_box(&raw), black_box(&selected)).unwrap());
    });
}

fn bench_choropleth(c: &mut Criterion) {
    let mut group = c.benchmark_group("choropleth");
    let raw = ListingTable::from_csv_reader("listings", listings_csv(10_000).as_bytes()).unwrap();
    let summary = geo_summary(&clean(&raw)).unwrap();
    let state = GeoMapState {
        price_range: PriceRange::new(0.0, 1e7),
        show_na: true,
    };

    for vertices in [100, 1_000, 10_000].iter() {
        let geometry = geometry(*vertices);
        group.bench_with_input(BenchmarkId::from_parameter(vertices), &geometry, |b, geometry| {
            b.iter(|| choropleth(black_box(&summary), geometry, &state, "grey50"));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_load,
    bench_clean,
    bench_state_summary,
    bench_group_by_filter_view,
    bench_compare_states,
    bench_choropleth,
);
criterion_main!(benches);
