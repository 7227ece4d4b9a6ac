//! Seed-derived address of the account a payer greets through the GM program.

use solana_sdk::pubkey::Pubkey;

pub const GREETING_SEED: &str = "hello";

/// Derives the greeting account for `payer`. The account is created with seed, so the payer
/// is its base and the program its owner.
///
/// Only fails if `program_id` ends with the PDA marker bytes.
pub fn find_greeting_address(payer: &Pubkey, program_id: &Pubkey) -> anyhow::Result<Pubkey> {
    Pubkey::create_with_seed(payer, GREETING_SEED, program_id)
        .map_err(|e| anyhow::anyhow!("Couldn't derive greeting address: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let payer = Pubkey::new_unique();
        let program_id = Pubkey::new_unique();

        let first = find_greeting_address(&payer, &program_id).unwrap();
        let second = find_greeting_address(&payer, &program_id).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            Pubkey::create_with_seed(&payer, GREETING_SEED, &program_id).unwrap()
        );
    }

    #[test]
    fn derivation_depends_on_payer_and_program() {
        let payer = Pubkey::new_unique();
        let other_payer = Pubkey::new_unique();
        let program_id = Pubkey::new_unique();
        let other_program_id = Pubkey::new_unique();

        let greeting = find_greeting_address(&payer, &program_id).unwrap();
        assert_ne!(greeting, find_greeting_address(&other_payer, &program_id).unwrap());
        assert_ne!(greeting, find_greeting_address(&payer, &other_program_id).unwrap());
        assert_ne!(greeting, payer);
        assert_ne!(greeting, program_id);
    }
}
