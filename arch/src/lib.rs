pub mod addr;
pub mod alu;
pub mod decode;
pub mod op;
pub mod reg;
pub mod table;

pub use addr::parse_address;
pub use decode::{decode, decode_all, Decoded};
