use crate::context;
use crate::{Ember, Engine, Handlebars, Minijinja, Tera, TinyTemplate};

const EXPECTED: &str = "<h1>My awesome webpage!</h1>\
    <p>Nancy Wheeler (17)</p>\
    <p>Steve Harrington (18)</p>\
    <p>Billy Hargrove (19) [disabled]</p>";

macro_rules! t {
    ($E:ty, $source:literal) => {{
        let result = render::<$E>(include_str!($source));
        assert_eq!(result, EXPECTED);
    }};
}

#[test]
fn ember() {
    t!(Ember, "../benchdata/bench.erb");
}

#[test]
fn handlebars() {
    t!(Handlebars, "../benchdata/bench.hbs");
}

#[test]
fn minijinja() {
    t!(Minijinja, "../benchdata/bench.j2");
}

#[test]
fn tera() {
    t!(Tera, "../benchdata/bench.tera");
}

#[test]
fn tinytemplate() {
    t!(TinyTemplate, "../benchdata/bench.tt");
}

fn render<'a, E: Engine<'a>>(source: &'a str) -> String {
    let ctx = context::to_value(&context::sample());
    let mut engine = E::new();
    engine.add_template("bench", source.trim_end());
    engine.render("bench", &ctx)
}
