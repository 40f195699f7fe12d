use ember::{value, Engine, ErrorKind};

#[test]
fn compile_empty() {
    Engine::new().compile("").unwrap();
}

#[test]
fn compile_literal_only() {
    Engine::new().compile("lorem ipsum dolor sit amet").unwrap();
}

#[test]
fn compile_idempotent() {
    let engine = Engine::new();
    let source = "<% for u in list %><%= u.name %>, <% end %>";
    let ctx = value! { list: [{ name: "a" }, { name: "b" }] };
    let first = engine.compile(source).unwrap().render(&ctx).unwrap();
    let second = engine.compile(source).unwrap().render(&ctx).unwrap();
    assert_eq!(first, second);
}

#[test]
fn compile_unterminated_expr() {
    let err = Engine::new().compile("Hello <%= name").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(err.span(), Some(14..14));
    assert_eq!(
        err.to_string(),
        "expected end expression, found EOF between bytes 14 and 14"
    );
}

#[test]
fn compile_unterminated_expr_pretty() {
    let err = Engine::new().compile("Hello <%= name").unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | Hello <%= name
   |               ^ expected end expression, found EOF
"
    );
}

#[test]
fn compile_unterminated_block() {
    let err = Engine::new().compile("<% if show").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(
        err.to_string(),
        "expected end block, found EOF between bytes 10 and 10"
    );
}

#[test]
fn compile_unterminated_comment() {
    let err = Engine::new().compile("lorem <%# ipsum").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(
        err.to_string(),
        "expected end comment, found EOF between bytes 15 and 15"
    );
}

#[test]
fn compile_unmatched_end_tag_in_raw() {
    let err = Engine::new().compile("lorem %> ipsum").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(err.span(), Some(6..8));
}

#[test]
fn compile_unclosed_if() {
    let err = Engine::new().compile("<% if cond %>text").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(
        err.to_string(),
        "unclosed `if` block between bytes 0 and 13"
    );
}

#[test]
fn compile_unclosed_for() {
    let err = Engine::new()
        .compile("lorem <% for x in list %>text")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unclosed `for` block between bytes 6 and 25"
    );
}

#[test]
fn compile_unexpected_end() {
    let err = Engine::new().compile("lorem <% end %>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected `end` block between bytes 6 and 15"
    );
}

#[test]
fn compile_unexpected_else() {
    let err = Engine::new().compile("<% else %>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected `else` block between bytes 0 and 10"
    );
}

#[test]
fn compile_unexpected_elsif() {
    let err = Engine::new().compile("<% elsif cond %>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected `elsif` block between bytes 0 and 16"
    );
}

#[test]
fn compile_else_after_else() {
    let err = Engine::new()
        .compile("<% if a %>x<% else %>y<% else %>z<% end %>")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected `else` block between bytes 22 and 32"
    );
}

#[test]
fn compile_unexpected_keyword() {
    let err = Engine::new().compile("<% in %>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(err.to_string(), "unexpected keyword `in` between bytes 3 and 5");
}

#[test]
fn compile_unexpected_token_after_expr() {
    let err = Engine::new().compile("<%= a b %>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected end expression, found identifier between bytes 6 and 7"
    );
}

#[test]
fn compile_unexpected_character() {
    let err = Engine::new().compile("<%= $ %>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(err.to_string(), "unexpected character between bytes 4 and 5");
}

#[test]
fn compile_undelimited_string() {
    let err = Engine::new().compile("<%= \"abc %>").unwrap_err();
    assert_eq!(
        err.to_string(),
        "undelimited string between bytes 4 and 11"
    );
}

#[test]
fn compile_unknown_escape_character() {
    let err = Engine::new().compile(r#"<%= "a\xb" %>"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert!(err.to_string().starts_with("unknown escape character"));
}

#[test]
fn compile_invalid_digit() {
    let err = Engine::new().compile("<%= if 12g %>").unwrap_err();
    // `12g` only shows up in expression position
    let err2 = Engine::new().compile("<% if 12g %>x<% end %>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert!(err2
        .to_string()
        .starts_with("invalid digit for base 10 literal"));
}

#[test]
fn compile_integer_out_of_range() {
    let err = Engine::new()
        .compile("<% if 0x1ffffffffffffffff %>x<% end %>")
        .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("base 16 literal out of range for 64-bit integer"));
}

#[test]
fn compile_custom_syntax() {
    let syntax = ember::Syntax::builder()
        .expr("{{", "}}")
        .block("{%", "%}")
        .build();
    let engine = Engine::with_syntax(syntax);
    let result = engine
        .compile("{% if show %}Hello {{ name }}{% end %}")
        .unwrap()
        .render(&value! { name: "World", show: true })
        .unwrap();
    assert_eq!(result, "Hello World");
}
