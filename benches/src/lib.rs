pub mod context;
pub mod subjects;
#[cfg(test)]
mod tests;

use ember::Value;

/// Abstraction for a template engine under benchmark.
pub trait Engine<'a> {
    fn name() -> &'static str;
    fn new() -> Self;
    fn add_template(&mut self, name: &'static str, source: &'a str);
    fn render(&self, name: &'static str, ctx: &Value) -> String;
}

////////////////////////////////////////////////////////////////////////////////
/// ember
////////////////////////////////////////////////////////////////////////////////

pub struct Ember<'a> {
    engine: ember::Engine,
    templates: std::collections::BTreeMap<&'static str, ember::Template<'a>>,
}

impl<'a> Engine<'a> for Ember<'a> {
    #[inline]
    fn name() -> &'static str {
        "ember"
    }

    #[inline]
    fn new() -> Self {
        Self {
            engine: ember::Engine::new(),
            templates: std::collections::BTreeMap::new(),
        }
    }

    #[inline]
    fn add_template(&mut self, name: &'static str, source: &'a str) {
        let template = self.engine.compile(source).unwrap();
        self.templates.insert(name, template);
    }

    #[inline]
    fn render(&self, name: &'static str, ctx: &Value) -> String {
        self.templates.get(name).unwrap().render(ctx).unwrap()
    }
}

////////////////////////////////////////////////////////////////////////////////
/// handlebars
////////////////////////////////////////////////////////////////////////////////

pub type Handlebars<'engine> = handlebars::Handlebars<'engine>;

impl<'engine> Engine<'engine> for Handlebars<'engine> {
    #[inline]
    fn name() -> &'static str {
        "handlebars"
    }

    #[inline]
    fn new() -> Self {
        let mut hbs = handlebars::Handlebars::new();
        // handlebars escapes HTML by default, so lets add a default formatter
        // to make the benchmark a bit fairer.
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    #[inline]
    fn add_template(&mut self, name: &'static str, source: &'engine str) {
        self.register_template_string(name, source).unwrap();
    }

    #[inline]
    fn render(&self, name: &'static str, ctx: &Value) -> String {
        self.render(name, ctx).unwrap()
    }
}

////////////////////////////////////////////////////////////////////////////////
/// minijinja
////////////////////////////////////////////////////////////////////////////////

pub type Minijinja<'engine> = minijinja::Environment<'engine>;

impl<'engine> Engine<'engine> for Minijinja<'engine> {
    #[inline]
    fn name() -> &'static str {
        "minijinja"
    }

    #[inline]
    fn new() -> Self {
        minijinja::Environment::new()
    }

    #[inline]
    fn add_template(&mut self, name: &'static str, source: &'engine str) {
        self.add_template(name, source).unwrap();
    }

    #[inline]
    fn render(&self, name: &'static str, ctx: &Value) -> String {
        self.get_template(name).unwrap().render(ctx).unwrap()
    }
}

////////////////////////////////////////////////////////////////////////////////
/// tera
////////////////////////////////////////////////////////////////////////////////

pub type Tera = tera::Tera;

impl<'engine> Engine<'engine> for Tera {
    #[inline]
    fn name() -> &'static str {
        "tera"
    }

    #[inline]
    fn new() -> Self {
        tera::Tera::default()
    }

    #[inline]
    fn add_template(&mut self, name: &'static str, source: &'engine str) {
        self.add_raw_template(name, source).unwrap();
    }

    #[inline]
    fn render(&self, name: &'static str, ctx: &Value) -> String {
        let ctx = tera::Context::from_serialize(ctx).unwrap();
        self.render(name, &ctx).unwrap()
    }
}

////////////////////////////////////////////////////////////////////////////////
/// tinytemplate
////////////////////////////////////////////////////////////////////////////////

pub type TinyTemplate<'engine> = tinytemplate::TinyTemplate<'engine>;

impl<'engine> Engine<'engine> for TinyTemplate<'engine> {
    #[inline]
    fn name() -> &'static str {
        "tinytemplate"
    }

    #[inline]
    fn new() -> Self {
        let mut tt = tinytemplate::TinyTemplate::new();
        // tinytemplate escapes HTML by default, so lets add a default formatter
        // to make the benchmark a bit fairer.
        tt.set_default_formatter(&tinytemplate::format_unescaped);
        tt
    }

    #[inline]
    fn add_template(&mut self, name: &'static str, source: &'engine str) {
        self.add_template(name, source).unwrap();
    }

    #[inline]
    fn render(&self, name: &'static str, ctx: &Value) -> String {
        self.render(name, ctx).unwrap()
    }
}
