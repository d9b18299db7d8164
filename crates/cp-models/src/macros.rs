/// Declare a string-literal enumeration.
///
/// Generates the enum with serde renames, `VALUES` (the literal set, in
/// declaration order, for use in shapes), `as_str`, and `Display`.
macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $literal:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire literal.
            pub const VALUES: &'static [&'static str] = &[$($literal),+];

            /// The wire literal for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $literal,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
