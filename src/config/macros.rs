/// `config_struct!`: a config section declared once, defaults inline
///
/// Each field is written as `name: Type = default`. The expansion is a
/// struct with public fields, a `Default` impl built from those values, and
/// serde derives with `#[serde(default)]`, so a TOML table only has to name
/// the keys it overrides.
///
/// ```ignore
/// config_struct! {
///     pub struct FetcherConfig {
///         signature_limit: usize = 5,
///         transaction_delay_ms: u64 = 500,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $ty:ty = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }
    };
}
