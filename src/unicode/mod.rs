pub mod idna;
pub mod idna_mapper;
pub mod percent_encode;
pub mod punycode;
