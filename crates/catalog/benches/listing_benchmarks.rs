use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use storefront_catalog::listing::{self, CategoryFilter, SortOrder};
use storefront_catalog::{CategoryRef, Product};
use storefront_core::{CategoryId, ProductId};

fn catalog(n: u64) -> Vec<Product> {
    (0..n)
        .map(|i| {
            // Spread prices and categories deterministically; a few prices are
            // left unparseable to exercise the fallback ordering.
            let price = if i % 97 == 0 {
                String::new()
            } else {
                format!("{}.{:02}", (i * 7919) % 20_000, i % 100)
            };
            let mut p = Product::new(ProductId::new(i), format!("p-{i}"), format!("Product {i}"), price);
            p.category = Some(CategoryRef {
                id: CategoryId::new(i % 8),
                name: format!("Category {}", i % 8),
            });
            p
        })
        .collect()
}

fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing_apply");

    let filter: CategoryFilter = [CategoryId::new(1), CategoryId::new(3), CategoryId::new(5)]
        .into_iter()
        .collect();

    for size in [50u64, 500, 5_000] {
        let products = catalog(size);
        group.throughput(Throughput::Elements(size));

        group.bench_with_input(BenchmarkId::new("filter_only", size), &products, |b, products| {
            b.iter(|| listing::apply(black_box(products), &filter, SortOrder::None));
        });

        group.bench_with_input(BenchmarkId::new("price_low", size), &products, |b, products| {
            b.iter(|| listing::apply(black_box(products), &CategoryFilter::all(), SortOrder::PriceLowToHigh));
        });

        group.bench_with_input(BenchmarkId::new("filter_price_high", size), &products, |b, products| {
            b.iter(|| listing::apply(black_box(products), &filter, SortOrder::PriceHighToLow));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_listing);
criterion_main!(benches);
