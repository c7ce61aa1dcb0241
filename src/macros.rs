macro_rules! enum_with_unknown {
    (
        $( #[$enum_attr:meta] )*
        pub enum $name:ident($ty:ty) {
            $( $variant:ident = $value:expr ),+
        }
    ) => {
        enum_with_unknown! {
            $( #[$enum_attr] )*
            pub doc enum $name($ty) {
                $( #[doc(hidden)] $variant = $value ),+
            }
        }
    };
    (
        $( #[$enum_attr:meta] )*
        pub doc enum $name:ident($ty:ty) {
            $(
                $( #[$variant_attr:meta] )+
                $variant:ident = $value:expr
            ),+
        }
    ) => {
        $( #[$enum_attr] )*
        #[derive(Debug, PartialEq, Eq, Clone, Copy)]
        pub enum $name {
            $(
                $( #[$variant_attr] )*
                $variant
            ),*,
            #[doc(hidden)]
            _Unknown($ty)
        }

        impl ::core::convert::From<$ty> for $name {
            fn from(value: $ty) -> Self {
                match value {
                    $( $value => $name::$variant ),*,
                    other => $name::_Unknown(other)
                }
            }
        }

        impl ::core::convert::From<$name> for $ty {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => $value ),*,
                    $name::_Unknown(other) => other
                }
            }
        }
    }
}

/// Declare a closed flag family: an enum whose variants name the defined
/// bits of a wire bitmap, with the bit positions given on the right.
macro_rules! flag_set {
    (
        $( #[$enum_attr:meta] )*
        pub enum $name:ident {
            $(
                $( #[$flag_attr:meta] )*
                $flag:ident = $bit:expr
            ),+
        }
    ) => {
        $( #[$enum_attr] )*
        #[derive(Debug, PartialEq, Eq, Clone, Copy)]
        pub enum $name {
            $(
                $( #[$flag_attr] )*
                $flag
            ),*
        }

        impl $crate::bitmap::FlagBits for $name {
            fn bit(self) -> u32 {
                match self {
                    $( $name::$flag => $bit ),*
                }
            }

            fn from_bit(bit: u32) -> Option<Self> {
                match bit {
                    $( $bit => Some($name::$flag) ),*,
                    _ => None
                }
            }
        }
    }
}
