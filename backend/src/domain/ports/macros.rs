//! Helper macro for generating domain port error enums.

/// Generate a `thiserror` enum plus snake_case convenience constructors for
/// each variant, so adapters can write `StoreError::query("...")` instead of
/// spelling out struct variants.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Example error used only by these tests.
        pub enum ExamplePortError {
            /// Unit variant.
            Gone => "resource is gone",
            /// Single string field.
            Query { message: String } => "query failed: {message}",
        }
    }

    #[test]
    fn unit_variant_constructor() {
        assert_eq!(ExamplePortError::gone().to_string(), "resource is gone");
    }

    #[test]
    fn string_field_constructor_accepts_str() {
        let err = ExamplePortError::query("boom");
        assert_eq!(err.to_string(), "query failed: boom");
    }
}
