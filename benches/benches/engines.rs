//! Benchmark template compilation and rendering time, and the three
//! ember invocation strategies.

use criterion::{criterion_group, criterion_main, Criterion};

use benches::context;
use benches::{Ember, Engine, Handlebars, Minijinja, Tera, TinyTemplate};

criterion_main! { benches }
criterion_group! { benches, bench_compile, bench_render, bench_strategies }

/// Benchmarks the time taken to compile a template.
fn bench_compile(c: &mut Criterion) {
    let mut g = c.benchmark_group("compile");

    macro_rules! bench {
        ($E:ty, $source:literal) => {{
            g.bench_function(<$E as Engine>::name(), |b| {
                let source = repeat(include_str!($source).trim_end(), 50);
                b.iter(|| {
                    let mut engine = <$E as Engine>::new();
                    engine.add_template("bench", &source);
                });
            });
        }};
    }

    bench!(Ember, "../benchdata/bench.erb");
    bench!(Handlebars, "../benchdata/bench.hbs");
    bench!(Minijinja, "../benchdata/bench.j2");
    bench!(Tera, "../benchdata/bench.tera");
    bench!(TinyTemplate, "../benchdata/bench.tt");
}

/// Benchmarks the time taken to render an already compiled template.
fn bench_render(c: &mut Criterion) {
    let mut g = c.benchmark_group("render");

    let ctx = context::to_value(&context::random(150));

    macro_rules! bench {
        ($E:ty, $source:literal) => {{
            g.bench_function(<$E as Engine>::name(), |b| {
                let source = repeat(include_str!($source).trim_end(), 20);
                let mut engine = <$E as Engine>::new();
                engine.add_template("bench", &source);
                b.iter(|| <$E as Engine>::render(&engine, "bench", &ctx));
            });
        }};
    }

    bench!(Ember, "../benchdata/bench.erb");
    bench!(Handlebars, "../benchdata/bench.hbs");
    bench!(Minijinja, "../benchdata/bench.j2");
    bench!(Tera, "../benchdata/bench.tera");
    bench!(TinyTemplate, "../benchdata/bench.tt");
}

/// Benchmarks the ember execution strategies against each other.
///
/// This is the compile-every-call vs load-from-cache vs bind-once
/// comparison over the same template and context.
fn bench_strategies(c: &mut Criterion) {
    let mut g = c.benchmark_group("strategies");

    let source = repeat(include_str!("../benchdata/bench.erb").trim_end(), 20);
    let ctx = context::to_value(&context::random(150));

    let engine = ember::Engine::new();
    let dir = tempfile::tempdir().unwrap();
    let cache = ember::Cache::new(dir.path()).unwrap();

    let ephemeral = ember::Ephemeral::new(&engine, &source);
    g.bench_function("basic", |b| b.iter(|| ephemeral.render(&ctx).unwrap()));

    let key = ember::CacheKey::new("ember", "bench");
    let cached = ember::Cached::new(&engine, &cache, key, &source);
    g.bench_function("cache", |b| b.iter(|| cached.render(&ctx).unwrap()));

    let bound = ember::Bound::bind(&engine, &source).unwrap();
    g.bench_function("func", |b| b.iter(|| bound.render(&ctx).unwrap()));
}

fn repeat(source: &str, n: usize) -> String {
    let mut s = String::new();
    for _ in 0..n {
        s.push_str(source);
    }
    s
}
