use cache::{decode, encode};
use common::{Money, Product, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};

fn make_products(count: i64) -> Vec<Product> {
    (1..=count)
        .map(|id| Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: "Benchmark fixture".to_string(),
            price: Money::from_cents(id * 100),
            stock: 10,
        })
        .collect()
}

fn legacy_payload(count: i64) -> String {
    let items: Vec<serde_json::Value> = (1..=count)
        .map(|id| {
            serde_json::json!({
                "@class": "com.shop.ProductCacheDTO",
                "id": id,
                "name": format!("Product {id}"),
                "description": "Benchmark fixture",
                "price": id as f64,
                "stock": "10"
            })
        })
        .collect();
    serde_json::json!(["java.util.ArrayList", items]).to_string()
}

fn bench_decode_typed_product(c: &mut Criterion) {
    let raw = encode(&make_products(1)[0]).unwrap();

    c.bench_function("cache/decode_typed_product", |b| {
        b.iter(|| decode::<Product>(&raw).unwrap());
    });
}

fn bench_decode_typed_list_100(c: &mut Criterion) {
    let raw = encode(&make_products(100)).unwrap();

    c.bench_function("cache/decode_typed_list_100", |b| {
        b.iter(|| decode::<Vec<Product>>(&raw).unwrap());
    });
}

fn bench_decode_legacy_list_100(c: &mut Criterion) {
    let raw = legacy_payload(100);

    c.bench_function("cache/decode_legacy_list_100", |b| {
        b.iter(|| decode::<Vec<Product>>(&raw).unwrap());
    });
}

criterion_group!(
    benches,
    bench_decode_typed_product,
    bench_decode_typed_list_100,
    bench_decode_legacy_list_100,
);
criterion_main!(benches);
