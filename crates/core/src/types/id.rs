//! Newtype IDs for type-safe entity references.
//!
//! The backend identifies carts, menu items, branches and delivery areas with
//! integer keys. Wrapping each one keeps a branch ID from ever being sent where
//! a delivery area ID is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>`, `Into<i32>`, `Display` and `FromStr`
///
/// # Example
///
/// ```rust
/// # use chicken_one_core::define_id;
/// define_id!(BranchId);
/// define_id!(DeliveryAreaId);
///
/// let branch = BranchId::new(1);
/// let area: DeliveryAreaId = "7".parse().unwrap();
///
/// assert_eq!(branch.as_i32(), 1);
/// assert_eq!(area.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CartItemId);
define_id!(MenuItemId);
define_id!(BranchId);
define_id!(DeliveryAreaId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id: BranchId = " 12 ".parse().unwrap();
        assert_eq!(id, BranchId::new(12));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<DeliveryAreaId>().is_err());
        assert!("".parse::<DeliveryAreaId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&CartItemId::new(42)).unwrap();
        assert_eq!(json, "42");

        let id: MenuItemId = serde_json::from_str("9").unwrap();
        assert_eq!(i32::from(id), 9);
    }
}
