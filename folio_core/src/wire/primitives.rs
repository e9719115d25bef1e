use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Arbitrary-precision natural number.
///
/// Serialized as a decimal string so values beyond the JSON number range
/// survive transport; plain non-negative JSON integers are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nat(pub BigUint);

impl Nat {
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.0.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }
}

impl From<u64> for Nat {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u32> for Nat {
    fn from(value: u32) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Nat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Nat {
    type Err = num_bigint::ParseBigIntError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        BigUint::from_str(raw).map(Self)
    }
}

impl Serialize for Nat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Nat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NatVisitor)
    }
}

struct NatVisitor;

impl<'de> Visitor<'de> for NatVisitor {
    type Value = Nat;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a natural number as a decimal string or non-negative integer")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Nat, E> {
        Ok(Nat::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Nat, E> {
        Ok(Nat(BigUint::from(value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Nat, E> {
        u64::try_from(value)
            .map(Nat::from)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Nat, E> {
        let digits = value.replace('_', "");
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(E::invalid_value(de::Unexpected::Str(value), &self));
        }
        Nat::from_str(&digits).map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

/// Optional value carried as a sequence of zero or one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Opt<T>(Vec<T>);

impl<T> Opt<T> {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn some(value: T) -> Self {
        Self(vec![value])
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_option(self) -> Option<T> {
        self.0.into_iter().next()
    }

    pub fn as_option(&self) -> Option<&T> {
        self.0.first()
    }
}

impl<T> Default for Opt<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Option<T>> for Opt<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Self::some(inner),
            None => Self::none(),
        }
    }
}

/// Blank text carries no meaning and is encoded as absent.
pub fn opt_text(value: Option<&String>) -> Opt<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Opt::some(text.clone()),
        _ => Opt::none(),
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Opt<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        if items.len() > 1 {
            return Err(de::Error::invalid_length(
                items.len(),
                &"an optional encoded as zero or one element",
            ));
        }
        Ok(Self(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nat_serializes_as_decimal_string() {
        assert_eq!(serde_json::to_value(Nat::from(42u64)).unwrap(), json!("42"));
    }

    #[test]
    fn nat_accepts_strings_and_integers() {
        let from_str: Nat = serde_json::from_value(json!("18446744073709551616")).unwrap();
        assert_eq!(from_str.to_u64(), None);
        assert_eq!(from_str.to_string(), "18446744073709551616");

        let from_int: Nat = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(from_int.to_u64(), Some(7));
    }

    #[test]
    fn nat_rejects_negative_and_non_numeric_input() {
        assert!(serde_json::from_value::<Nat>(json!(-1)).is_err());
        assert!(serde_json::from_value::<Nat>(json!("12a")).is_err());
        assert!(serde_json::from_value::<Nat>(json!("")).is_err());
        assert!(serde_json::from_value::<Nat>(json!(1.5)).is_err());
    }

    #[test]
    fn opt_is_a_short_sequence() {
        assert_eq!(serde_json::to_value(Opt::some(1u8)).unwrap(), json!([1]));
        assert_eq!(serde_json::to_value(Opt::<u8>::none()).unwrap(), json!([]));
        let parsed: Opt<u8> = serde_json::from_value(json!([3])).unwrap();
        assert_eq!(parsed.into_option(), Some(3));
        assert!(serde_json::from_value::<Opt<u8>>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<Opt<u8>>(json!(null)).is_err());
    }

    #[test]
    fn blank_text_is_absent() {
        assert!(opt_text(Some(&"  ".to_string())).is_none());
        assert!(opt_text(None).is_none());
        assert_eq!(
            opt_text(Some(&"x".to_string())).into_option().as_deref(),
            Some("x")
        );
    }
}
