use ember::{value, Bound, Cache, CacheKey, Cached, Engine, Ephemeral, ErrorKind};

const SOURCE: &str = "Hello <%= name %>!\n<% if show %>shown<% end %>";

fn cache() -> (tempfile::TempDir, Cache) {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::new(dir.path().join("units")).unwrap();
    (dir, cache)
}

#[test]
fn strategies_render_identical_output() {
    let (_dir, cache) = cache();
    let engine = Engine::new();

    let ephemeral = Ephemeral::new(&engine, SOURCE);
    let cached = Cached::new(&engine, &cache, CacheKey::new("ember", "hello"), SOURCE);
    let bound = Bound::bind(&engine, SOURCE).unwrap();

    for ctx in [
        value! { name: "World", show: true },
        value! { name: "World", show: false },
    ] {
        let a = ephemeral.render(&ctx).unwrap();
        let b = cached.render(&ctx).unwrap();
        let c = bound.render(&ctx).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    let ctx = value! { name: "World", show: true };
    assert_eq!(ephemeral.render(&ctx).unwrap(), "Hello World!\nshown");
}

#[test]
fn strategies_stable_over_repeated_invocations() {
    let (_dir, cache) = cache();
    let engine = Engine::new();
    let ctx = value! { name: "World", show: true };
    let expected = "Hello World!\nshown";

    let ephemeral = Ephemeral::new(&engine, SOURCE);
    let cached = Cached::new(&engine, &cache, CacheKey::new("ember", "hello"), SOURCE);
    let bound = Bound::bind(&engine, SOURCE).unwrap();

    for n in [1usize, 2, 1000] {
        for _ in 0..n {
            assert_eq!(bound.render(&ctx).unwrap(), expected);
        }
    }
    for _ in 0..1000 {
        assert_eq!(ephemeral.render(&ctx).unwrap(), expected);
    }
    for _ in 0..1000 {
        assert_eq!(cached.render(&ctx).unwrap(), expected);
    }
}

#[test]
fn cached_strategy_populates_lazily() {
    let (_dir, cache) = cache();
    let engine = Engine::new();
    let key = CacheKey::new("ember", "hello");
    let cached = Cached::new(&engine, &cache, key.clone(), SOURCE);

    assert_eq!(cache.load(&key).unwrap_err().kind(), ErrorKind::CacheMiss);

    let ctx = value! { name: "World", show: true };
    cached.render(&ctx).unwrap();

    // populated on first use, loadable ever after
    let unit = cache.load(&key).unwrap();
    assert_eq!(unit.render(&ctx).unwrap(), "Hello World!\nshown");
}

#[test]
fn cached_strategy_prefers_stored_unit() {
    let (_dir, cache) = cache();
    let engine = Engine::new();
    let key = CacheKey::new("ember", "hello");

    // An entry stored under the same key wins over the strategy's source:
    // population only ever happens on a miss.
    let other = engine.compile("cached <%= name %>").unwrap();
    cache.store(&key, &other).unwrap();

    let cached = Cached::new(&engine, &cache, key, SOURCE);
    let ctx = value! { name: "World", show: true };
    assert_eq!(cached.render(&ctx).unwrap(), "cached World");
}

#[test]
fn ephemeral_compile_error_surfaces_on_invoke() {
    let engine = Engine::new();
    let ephemeral = Ephemeral::new(&engine, "broken <%= oops");
    let err = ephemeral.render(&value! {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
}

#[test]
fn bound_compile_error_surfaces_on_bind() {
    let engine = Engine::new();
    let err = Bound::bind(&engine, "broken <%= oops").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
}

#[test]
fn bound_unit_exposes_source() {
    let engine = Engine::new();
    let bound = Bound::bind(&engine, SOURCE).unwrap();
    assert_eq!(bound.unit().source(), SOURCE);
}
