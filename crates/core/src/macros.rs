//! Helper macro for closed, string-backed enumerations.
//!
//! Every enum defined with [`define_text_enum!`] gets a stable wire string
//! (used for serde, database TEXT columns, and error messages), an `ALL`
//! slice in declaration order, `Display`, and a case-insensitive `FromStr`
//! (plus `TryFrom<String>` for row decoding) that fails with
//! [`CoreError::Validation`](crate::error::CoreError).

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stable wire representation of this value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        let valid: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        $crate::error::CoreError::Validation(format!(
                            "Invalid {} '{}'. Must be one of: {}",
                            $label,
                            value,
                            valid.join(", ")
                        ))
                    })
            }
        }

        impl ::std::convert::TryFrom<String> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}
