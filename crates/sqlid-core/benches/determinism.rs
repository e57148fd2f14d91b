use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlid_core::{canonicalize, encode, sql_id, NormalizationOptions};

const REPORT_QUERY: &str = "WITH recent AS (
    SELECT o.id, o.customer_id, o.total /* gross */
      FROM orders o
     WHERE o.created_at > '2024-01-01' AND o.status = 'it''s open'
), top_customers AS (
    SELECT customer_id, SUM(total) AS spent FROM recent GROUP BY customer_id
)
SELECT /*+ INDEX(c customers_pk) */ c.name, t.spent
  FROM customers c JOIN top_customers t ON t.customer_id = c.id
 WHERE t.spent > 1000
 ORDER BY t.spent DESC;";

fn bench_canonicalize(c: &mut Criterion) {
    let opts = NormalizationOptions::default();
    c.bench_function("canonicalize_report_query", |b| {
        b.iter(|| canonicalize(black_box(REPORT_QUERY), &opts))
    });
}

fn bench_encode(c: &mut Criterion) {
    let normal_form = canonicalize(REPORT_QUERY, &NormalizationOptions::default());
    c.bench_function("encode_normal_form", |b| {
        b.iter(|| encode(black_box(&normal_form)))
    });
}

fn bench_sql_id(c: &mut Criterion) {
    let opts = NormalizationOptions::default();
    c.bench_function("sql_id_report_query", |b| {
        b.iter(|| sql_id(black_box(REPORT_QUERY), &opts))
    });
}

criterion_group!(benches, bench_canonicalize, bench_encode, bench_sql_id);
criterion_main!(benches);
