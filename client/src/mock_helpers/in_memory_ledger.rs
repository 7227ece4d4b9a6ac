use std::{
    cell::{
        Cell,
        RefCell,
    },
    collections::HashMap,
};

use anyhow::Context;
use mollusk_svm::{
    Mollusk,
    MolluskContext,
};
use solana_account::Account;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
};

use crate::{
    greeting::GreetingAccount,
    ledger::LedgerClient,
};

pub const DEFAULT_LAMPORTS_PER_SIGNATURE: u64 = 5_000;

/// A single-node stand-in for a cluster.
///
/// System program instructions run through a [`MolluskContext`], so account creation behaves
/// exactly as on-chain. Any other deployed program behaves like the GM program: the instruction
/// data is a [`GreetingAccount`] that gets written to the start of the first account, which the
/// program must own.
///
/// Transactions are atomic: if any instruction fails, no account changes.
pub struct InMemoryLedger {
    context: MolluskContext<HashMap<Pubkey, Account>>,
    lamports_per_signature: u64,
    /// Most lamports a single airdrop credits. `None` means unlimited.
    faucet_limit: Option<u64>,
    airdrops: RefCell<Vec<(Pubkey, u64)>>,
    transactions: RefCell<Vec<Vec<Instruction>>>,
    signature_count: Cell<u64>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            context: Mollusk::default().with_context(HashMap::new()),
            lamports_per_signature: DEFAULT_LAMPORTS_PER_SIGNATURE,
            faucet_limit: None,
            airdrops: RefCell::new(vec![]),
            transactions: RefCell::new(vec![]),
            signature_count: Cell::new(0),
        }
    }

    pub fn with_faucet_limit(mut self, limit: u64) -> Self {
        self.faucet_limit = Some(limit);
        self
    }

    pub fn rent_exempt_minimum(&self, data_len: usize) -> u64 {
        self.context.mollusk.sysvars.rent.minimum_balance(data_len)
    }

    pub fn lamports_per_signature(&self) -> u64 {
        self.lamports_per_signature
    }

    /// Creates an executable account owned by a loader at `program_id`.
    pub fn deploy_program(&self, program_id: &Pubkey) {
        let loader = Pubkey::new_unique();
        self.set_account(
            *program_id,
            Account {
                lamports: self.rent_exempt_minimum(36),
                data: vec![0; 36],
                owner: loader,
                executable: true,
                rent_epoch: 0,
            },
        );
    }

    pub fn fund(&self, address: &Pubkey, lamports: u64) {
        self.context
            .account_store
            .borrow_mut()
            .entry(*address)
            .or_insert_with(|| Account::new(0, 0, &solana_system_interface::program::ID))
            .lamports += lamports;
    }

    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.context
            .account_store
            .borrow_mut()
            .insert(address, account);
    }

    pub fn get_account(&self, address: &Pubkey) -> Option<Account> {
        self.context.account_store.borrow().get(address).cloned()
    }

    pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.airdrops.borrow().clone()
    }

    /// Instructions of every transaction that was confirmed, in order.
    pub fn transactions(&self) -> Vec<Vec<Instruction>> {
        self.transactions.borrow().clone()
    }

    fn next_signature(&self) -> Signature {
        let count = self.signature_count.get() + 1;
        self.signature_count.set(count);

        let mut bytes = [0; 64];
        bytes[..8].copy_from_slice(&count.to_le_bytes());
        Signature::from(bytes)
    }

    fn execute_transaction(
        &self,
        payer: &Pubkey,
        instructions: &[Instruction],
    ) -> anyhow::Result<()> {
        {
            let mut store = self.context.account_store.borrow_mut();
            let fee_payer = store
                .get_mut(payer)
                .with_context(|| format!("Fee payer {payer} doesn't exist"))?;
            fee_payer.lamports = fee_payer
                .lamports
                .checked_sub(self.lamports_per_signature)
                .context("Insufficient funds for fee")?;
        }

        for (idx, instruction) in instructions.iter().enumerate() {
            self.execute(instruction)
                .with_context(|| format!("Instruction {idx} failed"))?;
        }
        Ok(())
    }

    fn execute(&self, instruction: &Instruction) -> anyhow::Result<()> {
        if instruction.program_id == solana_system_interface::program::ID {
            let result = self.context.process_instruction(instruction);
            if result.program_result.is_err() {
                anyhow::bail!("System program error: {:?}", result.program_result);
            }
            return Ok(());
        }

        let mut store = self.context.account_store.borrow_mut();
        match store.get(&instruction.program_id) {
            Some(program) if program.executable => {}
            _ => anyhow::bail!("Program {} isn't deployed", instruction.program_id),
        }

        let greeted = instruction
            .accounts
            .first()
            .context("The greeted account is missing")?;
        if !greeted.is_writable {
            anyhow::bail!("The greeted account must be writable");
        }
        let account = store
            .get_mut(&greeted.pubkey)
            .with_context(|| format!("Account {} doesn't exist", greeted.pubkey))?;
        if account.owner != instruction.program_id {
            anyhow::bail!("Greeted account does not have the correct program id");
        }

        let greeting = GreetingAccount::from_bytes(&instruction.data)?;
        let bytes = greeting.to_bytes()?;
        account
            .data
            .get_mut(..bytes.len())
            .context("Account data too small for the greeting")?
            .copy_from_slice(&bytes);

        Ok(())
    }
}

impl LedgerClient for InMemoryLedger {
    async fn version(&self) -> anyhow::Result<String> {
        Ok("in-memory".to_string())
    }

    async fn balance(&self, address: &Pubkey) -> anyhow::Result<u64> {
        Ok(self.get_account(address).map_or(0, |account| account.lamports))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        Ok(self.rent_exempt_minimum(data_len))
    }

    async fn fee_per_signature(&self, _payer: &Pubkey) -> anyhow::Result<u64> {
        Ok(self.lamports_per_signature)
    }

    async fn request_airdrop_and_confirm(
        &self,
        to: &Pubkey,
        lamports: u64,
    ) -> anyhow::Result<Signature> {
        let credited = self.faucet_limit.map_or(lamports, |limit| lamports.min(limit));
        self.fund(to, credited);
        self.airdrops.borrow_mut().push((*to, credited));
        Ok(self.next_signature())
    }

    async fn account(&self, address: &Pubkey) -> anyhow::Result<Option<Account>> {
        Ok(self.get_account(address))
    }

    async fn send_and_confirm(
        &self,
        payer: &Keypair,
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        let snapshot = self.context.account_store.borrow().clone();

        if let Err(e) = self.execute_transaction(&payer.pubkey(), instructions) {
            *self.context.account_store.borrow_mut() = snapshot;
            return Err(e);
        }

        self.transactions.borrow_mut().push(instructions.to_vec());
        Ok(self.next_signature())
    }
}
