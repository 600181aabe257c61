//! Contains logic shared by the conversions between document representations.

pub(crate) mod attrs;
pub(crate) mod normalize;
