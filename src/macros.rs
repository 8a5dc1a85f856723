//! Macros to reduce boilerplate in the codebase

/// Generate `Display`, `FromStr` and a `LABELS` constant for a label enum.
///
/// Parsing is case-insensitive; unknown labels map to `$error_variant`.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::FolioError;
///
/// enum_labels!(
///     MyStatus,
///     FolioError::InvalidStatus,
///     {
///         Pending => "pending",
///         UnderReview => "under_review",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_labels {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl $enum_name {
            /// Every label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($str),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::FolioError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_variant(s.to_string())),
                }
            }
        }
    };
}
