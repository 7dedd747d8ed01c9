use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bullion_catalog::{CatalogRepository, InMemoryCatalog, Sku};
use bullion_pricing::{
    order_total, tier_schedule_for_display, FallbackSpotPrice, PricingService, SpotPrice,
};

fn bench_order_total(c: &mut Criterion) {
    let catalog = InMemoryCatalog::builtin().expect("builtin catalog");
    let spot = SpotPrice::new(catalog.spot_price_fallback()).expect("positive spot");
    let product = catalog
        .get(&Sku::parse("MORGAN-BU").expect("sku"))
        .expect("morgan in catalog")
        .clone();

    let mut group = c.benchmark_group("order_total");
    for quantity in [1u32, 5, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(quantity), &quantity, |b, &q| {
            b.iter(|| order_total(black_box(spot), black_box(&product), black_box(q)))
        });
    }
    group.finish();

    c.bench_function("tier_schedule_for_display", |b| {
        b.iter(|| tier_schedule_for_display(black_box(&product), black_box(spot)))
    });
}

fn bench_service_quote(c: &mut Criterion) {
    let catalog = InMemoryCatalog::builtin().expect("builtin catalog");
    let spot = FallbackSpotPrice::from_catalog(&catalog).expect("fallback spot");
    let svc = PricingService::new(catalog, spot);
    let sku = Sku::parse("MORGAN-BU").expect("sku");

    c.bench_function("service_quote", |b| {
        b.iter(|| svc.quote(black_box(&sku), black_box(12)))
    });
}

criterion_group!(benches, bench_order_total, bench_service_quote);
criterion_main!(benches);
