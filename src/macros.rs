/// Implements [`Reflect`](crate::Reflect) for a struct by listing the fields
/// that participate in deep-copy comparison, in declaration order.
///
/// Works for named and tuple structs; the listed names become the `Field`
/// path segments in failure messages.
///
/// ```
/// use deepmatch::reflect_struct;
///
/// #[derive(Debug)]
/// struct Account {
///     id: i64,
///     tags: Vec<String>,
/// }
/// reflect_struct!(Account { id, tags });
///
/// #[derive(Debug)]
/// struct Pair(i64, i64);
/// reflect_struct!(Pair { 0, 1 });
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($ty:ty { $($field:tt),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Composite(::std::vec![
                    $(
                        $crate::Field {
                            name: ::core::stringify!($field),
                            value: &self.$field,
                        },
                    )*
                ])
            }
        }
    };
}

/// Implements [`Reflect`](crate::Reflect) for a fieldless enum. Equal
/// variants count as a valid copy; enums with payloads implement `Reflect`
/// by hand.
///
/// ```
/// use deepmatch::reflect_enum;
///
/// #[derive(Debug)]
/// enum Color {
///     Red,
///     Green,
///     Blue,
/// }
/// reflect_enum!(Color { Red, Green, Blue });
/// ```
#[macro_export]
macro_rules! reflect_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                match self {
                    $(
                        $ty::$variant => $crate::Shape::Variant(::core::stringify!($variant)),
                    )+
                }
            }
        }
    };
}
