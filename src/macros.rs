/// Construct a [`Value::Map`][crate::Value] context from key-value pairs.
///
/// Values can be anything with a `From` impl for [`Value`][crate::Value] as
/// well as nested maps `{ ... }`, lists `[ ... ]`, and `None`.
///
/// # Examples
///
/// ```
/// let ctx = ember::value! {
///     name: "World",
///     show: true,
///     user: { age: 23, tags: ["a", "b"] },
/// };
/// ```
#[macro_export]
macro_rules! value {
    () => {
        $crate::Value::Map(::std::collections::BTreeMap::new())
    };
    ($($tt:tt)+) => {{
        let mut map = ::std::collections::BTreeMap::new();
        $crate::_value_map!(@map map ($($tt)+));
        $crate::Value::Map(map)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value_map {
    (@map $map:ident ()) => {};

    // Next value is a nested map.
    (@map $map:ident ($key:ident : { $($m:tt)* } $(, $($rest:tt)*)?)) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::value!($($m)*));
        $($crate::_value_map!(@map $map ($($rest)*));)?
    };

    // Next value is a list.
    (@map $map:ident ($key:ident : [ $($l:tt)* ] $(, $($rest:tt)*)?)) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::_value_list!($($l)*));
        $($crate::_value_map!(@map $map ($($rest)*));)?
    };

    // Next value is `None`.
    (@map $map:ident ($key:ident : None $(, $($rest:tt)*)?)) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::Value::None);
        $($crate::_value_map!(@map $map ($($rest)*));)?
    };

    // Next value is an expression.
    (@map $map:ident ($key:ident : $val:expr $(, $($rest:tt)*)?)) => {
        $map.insert(::std::string::String::from(stringify!($key)), $crate::Value::from($val));
        $($crate::_value_map!(@map $map ($($rest)*));)?
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value_list {
    ($($tt:tt)*) => {{
        #[allow(unused_mut)]
        let mut list = ::std::vec::Vec::new();
        $crate::_value_items!(@list list ($($tt)*));
        $crate::Value::List(list)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value_items {
    (@list $list:ident ()) => {};

    // Next element is a map.
    (@list $list:ident ({ $($m:tt)* } $(, $($rest:tt)*)?)) => {
        $list.push($crate::value!($($m)*));
        $($crate::_value_items!(@list $list ($($rest)*));)?
    };

    // Next element is a list.
    (@list $list:ident ([ $($l:tt)* ] $(, $($rest:tt)*)?)) => {
        $list.push($crate::_value_list!($($l)*));
        $($crate::_value_items!(@list $list ($($rest)*));)?
    };

    // Next element is `None`.
    (@list $list:ident (None $(, $($rest:tt)*)?)) => {
        $list.push($crate::Value::None);
        $($crate::_value_items!(@list $list ($($rest)*));)?
    };

    // Next element is an expression.
    (@list $list:ident ($val:expr $(, $($rest:tt)*)?)) => {
        $list.push($crate::Value::from($val));
        $($crate::_value_items!(@list $list ($($rest)*));)?
    };
}
