use rand::Rng;

#[derive(serde::Serialize)]
pub struct Context {
    pub title: String,
    pub list: Vec<Item>,
}

#[derive(serde::Serialize)]
pub struct Item {
    pub name: String,
    pub age: u32,
    pub is_disabled: bool,
}

pub fn random(n: usize) -> Context {
    let mut rng = rand::thread_rng();
    let title = (0..20).map(|_| rng.gen_range('a'..='z')).collect();
    let list = (0..n)
        .map(|_| Item {
            name: (0..20).map(|_| rng.gen_range('a'..='z')).collect(),
            age: rng.gen_range(21..100),
            is_disabled: rng.gen_ratio(1, 4),
        })
        .collect();
    Context { title, list }
}

pub fn sample() -> Context {
    Context {
        title: "My awesome webpage!".to_owned(),
        list: vec![
            Item {
                name: "Nancy Wheeler".to_owned(),
                age: 17,
                is_disabled: false,
            },
            Item {
                name: "Steve Harrington".to_owned(),
                age: 18,
                is_disabled: false,
            },
            Item {
                name: "Billy Hargrove".to_owned(),
                age: 19,
                is_disabled: true,
            },
        ],
    }
}

/// The context as an [`ember::Value`], which every engine accepts.
pub fn to_value(ctx: &Context) -> ember::Value {
    serde_json::from_value(serde_json::to_value(ctx).unwrap()).unwrap()
}
