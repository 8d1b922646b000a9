//! Record declaration macro

/// Declare one or more record structs with serialization key annotations
///
/// Each field may carry an annotation after `=>`: the serialization key,
/// optionally followed by a comma and modifiers that are ignored. Fields
/// without an annotation are never written to a document.
///
/// Every field type must implement [`Reflect`](crate::reflect::Reflect),
/// annotated or not, because a record is zero only when all of its fields are.
///
/// # Example
///
/// ```rust
/// use bson::doc;
///
/// mongodoc::record! {
///     #[derive(Debug, Default)]
///     pub struct Entity {
///         pub id: String => "id",
///         pub active: bool => "active,omitempty",
///         pub revision: u32,
///     }
/// }
///
/// let entity = Entity {
///     id: "abc".to_string(),
///     active: false,
///     revision: 3,
/// };
///
/// let doc = mongodoc::build(&entity).unwrap();
/// assert_eq!(doc, doc! { "id": "abc" });
/// ```
#[macro_export]
macro_rules! record {
    (
        $(
            $(#[$meta:meta])*
            $vis:vis struct $name:ident {
                $(
                    $(#[$field_meta:meta])*
                    $field_vis:vis $field:ident : $ty:ty $(=> $tag:literal)?
                ),* $(,)?
            }
        )+
    ) => {
        $(
            $(#[$meta])*
            $vis struct $name {
                $(
                    $(#[$field_meta])*
                    $field_vis $field: $ty,
                )*
            }

            impl $crate::reflect::Record for $name {
                fn record_name(&self) -> &'static str {
                    ::core::stringify!($name)
                }

                fn fields(&self) -> ::std::vec::Vec<$crate::reflect::Field<'_>> {
                    ::std::vec![
                        $(
                            $crate::reflect::Field::new(
                                ::core::stringify!($field),
                                $crate::__record_tag!($($tag)?),
                                &self.$field,
                            ),
                        )*
                    ]
                }
            }

            impl $crate::reflect::Reflect for $name {
                fn reflect_ref(&self) -> $crate::reflect::ValueRef<'_> {
                    $crate::reflect::ValueRef::Record(self)
                }

                fn is_zero(&self) -> bool {
                    $crate::reflect::record_is_zero(self)
                }
            }
        )+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_tag {
    () => {
        ::core::option::Option::None
    };
    ($tag:literal) => {
        ::core::option::Option::Some($tag)
    };
}
