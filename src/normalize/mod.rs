pub(crate) mod normalizer;
pub(crate) mod split;
