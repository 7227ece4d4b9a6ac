//! The record the GM program stores in a greeted account.
//!
//! The program reads its instruction data and writes its account data with the same borsh
//! layout: a little-endian `u32` byte length followed by the UTF-8 bytes of `name`.

use std::sync::LazyLock;

use borsh::{
    BorshDeserialize,
    BorshSerialize,
};

/// The name this client greets with on every run.
pub const GREETING_NAME: &str = "Glass Chewer";

/// Account space allocated for a greeting. Fixed to the encoded length of a record holding
/// [`GREETING_NAME`].
pub static GREETING_SIZE: LazyLock<usize> = LazyLock::new(|| {
    GreetingAccount::new(GREETING_NAME)
        .encoded_len()
        .expect("Should measure a greeting record")
});

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct GreetingAccount {
    pub name: String,
}

impl GreetingAccount {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn encoded_len(&self) -> std::io::Result<usize> {
        borsh::object_length(self)
    }

    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        borsh::to_vec(self)
    }

    /// Decodes a record from the start of `data`. Bytes past the end of the record are left
    /// unread, since account space can exceed the size of the last record written to it.
    pub fn from_bytes(data: &[u8]) -> std::io::Result<Self> {
        Self::deserialize(&mut &data[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_size_matches_layout() {
        assert_eq!(*GREETING_SIZE, 4 + "Glass Chewer".len());
        assert_eq!(*GREETING_SIZE, 16);
        assert_eq!(
            GreetingAccount::new(GREETING_NAME).to_bytes().unwrap().len(),
            *GREETING_SIZE
        );
    }

    #[test]
    fn encoded_len_is_what_borsh_writes() {
        for name in ["", "gm", GREETING_NAME, "ünïcödé ✓"] {
            let record = GreetingAccount::new(name);
            assert_eq!(
                record.encoded_len().unwrap(),
                record.to_bytes().unwrap().len()
            );
        }
    }

    #[test]
    fn encodes_length_prefixed_name() {
        let bytes = GreetingAccount::new("gm").to_bytes().unwrap();
        assert_eq!(bytes, [2, 0, 0, 0, b'g', b'm']);
    }

    #[test]
    fn decodes_what_it_encodes() {
        for name in ["", GREETING_NAME, "ünïcödé ✓", &"x".repeat(1000)] {
            let record = GreetingAccount::new(name);
            let bytes = record.to_bytes().unwrap();
            assert_eq!(GreetingAccount::from_bytes(&bytes).unwrap(), record);
        }
    }

    #[test]
    fn ignores_trailing_account_space() {
        let mut data = GreetingAccount::new("gm").to_bytes().unwrap();
        data.extend_from_slice(&[0; 10]);
        assert_eq!(
            GreetingAccount::from_bytes(&data).unwrap(),
            GreetingAccount::new("gm")
        );
    }

    #[test]
    fn rejects_truncated_data() {
        let data = GreetingAccount::new(GREETING_NAME).to_bytes().unwrap();
        assert!(GreetingAccount::from_bytes(&data[..data.len() - 1]).is_err());
        assert!(GreetingAccount::from_bytes(&[]).is_err());
    }

    #[test]
    fn rejects_invalid_utf8() {
        let data = [2, 0, 0, 0, 0xff, 0xfe];
        assert!(GreetingAccount::from_bytes(&data).is_err());
    }
}
