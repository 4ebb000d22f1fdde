//! Derive macros backing `ToFromNetworkOrder` and the small set of
//! conversions (`Default`, `TryFrom<u8>`, `TryFrom<u16>`, `FromStr`) that
//! every unit-variant DNS enum (`QType`, `QClass`, `OpCode`, `ResponseCode`,
//! algorithm numbers, ...) needs.
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod dns_struct;
use dns_struct::dns_derive;

mod dns_enum;
use dns_enum::dns_enum;

/// Derives `ToFromNetworkOrder` for a struct by chaining
/// `to_network_bytes`/`from_network_bytes` calls over its fields in
/// declaration order. Field order IS wire order.
#[proc_macro_derive(DnsStruct)]
pub fn dns_macro_struct(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    dns_derive(&ast)
}

/// Derives `Default` (first variant), `TryFrom<u8>`/`TryFrom<u16>` and
/// `FromStr` for a fieldless enum with explicit integer discriminants.
#[proc_macro_derive(DnsEnum)]
pub fn dns_macro_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    dns_enum(&ast)
}

#[cfg(test)]
pub(crate) fn get_derive_input(s: &str) -> DeriveInput {
    syn::parse_str::<DeriveInput>(s).unwrap()
}
