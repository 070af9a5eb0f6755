/// Still-image decoding and fitting to the transition resolution.
pub mod decode;
