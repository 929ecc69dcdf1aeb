//! Serde support for packed `u64` newtypes.
//!
//! Human-readable formats (JSON, TOML) see the canonical text form, compact
//! formats (bincode) see the raw integer.

macro_rules! impl_packed_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.collect_str(self)
                } else {
                    serializer.serialize_u64(self.raw())
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                    text.parse::<$ty>().map_err(serde::de::Error::custom)
                } else {
                    <u64 as serde::Deserialize>::deserialize(deserializer).map(<$ty>::from_raw)
                }
            }
        }
    };
}
