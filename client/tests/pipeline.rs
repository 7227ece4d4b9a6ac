use gm_client::{
    address::find_greeting_address,
    greet::report_greeting,
    greeting::{
        GreetingAccount,
        GREETING_NAME,
        GREETING_SIZE,
    },
    mock_helpers::{
        InMemoryLedger,
        TempArtifacts,
    },
    payer::{
        establish_payer,
        required_payer_balance,
    },
    pipeline::{
        self,
        GreeterContext,
        PipelineSettings,
        Stage,
    },
    program::GreetingTarget,
    GmClientError,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signer,
    },
};

fn settings(artifacts: &TempArtifacts) -> PipelineSettings {
    PipelineSettings {
        program: artifacts.artifacts.clone(),
        ..Default::default()
    }
}

fn gm_error(err: &anyhow::Error) -> &GmClientError {
    err.downcast_ref::<GmClientError>()
        .unwrap_or_else(|| panic!("Expected a GmClientError, got: {err:#}"))
}

#[tokio::test]
async fn greets_a_fresh_account() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(true).unwrap();
    ledger.deploy_program(&artifacts.program_id);
    let payer = Keypair::new();
    let payer_pubkey = payer.pubkey();

    let report = pipeline::run(&ledger, payer, &settings(&artifacts))
        .await
        .unwrap();

    let expected_address = find_greeting_address(&payer_pubkey, &artifacts.program_id).unwrap();
    assert_eq!(report.target.program_id, artifacts.program_id);
    assert_eq!(report.target.greeting_pubkey, expected_address);
    assert_eq!(report.greeting, GreetingAccount::new("Glass Chewer"));

    let account = ledger.get_account(&expected_address).unwrap();
    assert_eq!(account.data.len(), *GREETING_SIZE);
    assert_eq!(
        account.data.len(),
        GreetingAccount::new(GREETING_NAME).to_bytes().unwrap().len()
    );
    assert_eq!(account.owner, artifacts.program_id);
    assert_eq!(
        account.lamports,
        ledger.rent_exempt_minimum(*GREETING_SIZE)
    );

    // One airdrop, then the create and the greet transactions.
    assert_eq!(ledger.airdrops().len(), 1);
    let transactions = ledger.transactions();
    assert_eq!(transactions.len(), 2);
    assert_eq!(
        transactions[0][0].program_id,
        solana_system_interface::program::ID
    );
    assert_eq!(transactions[1][0].program_id, artifacts.program_id);
}

#[tokio::test]
async fn second_run_reuses_the_greeting_account() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(true).unwrap();
    ledger.deploy_program(&artifacts.program_id);
    let payer = Keypair::new();
    ledger.fund(&payer.pubkey(), 10_000_000_000);
    let settings = settings(&artifacts);

    let first = pipeline::run(&ledger, payer.insecure_clone(), &settings)
        .await
        .unwrap();
    let second = pipeline::run(&ledger, payer, &settings).await.unwrap();

    assert_eq!(first.target, second.target);
    assert_eq!(second.greeting.name, GREETING_NAME);

    // Create + greet, then only a greet.
    let transactions = ledger.transactions();
    assert_eq!(transactions.len(), 3);
    let creates = transactions
        .iter()
        .filter(|ixs| ixs[0].program_id == solana_system_interface::program::ID)
        .count();
    assert_eq!(creates, 1);

    assert!(ledger.airdrops().is_empty());
}

#[tokio::test]
async fn existing_greeting_account_is_overwritten() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(true).unwrap();
    ledger.deploy_program(&artifacts.program_id);
    let payer = Keypair::new();
    let greeting = find_greeting_address(&payer.pubkey(), &artifacts.program_id).unwrap();

    let mut stale = solana_account::Account::new(1_000_000, *GREETING_SIZE, &artifacts.program_id);
    stale.data[..4].copy_from_slice(&3u32.to_le_bytes());
    stale.data[4..7].copy_from_slice(b"old");
    ledger.set_account(greeting, stale);

    let report = pipeline::run(&ledger, payer, &settings(&artifacts))
        .await
        .unwrap();

    assert_eq!(report.greeting.name, GREETING_NAME);
    // No create transaction was needed.
    assert_eq!(ledger.transactions().len(), 1);
}

#[tokio::test]
async fn undeployed_program_fails_before_any_write() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(true).unwrap();

    let err = pipeline::run(&ledger, Keypair::new(), &settings(&artifacts))
        .await
        .unwrap_err();

    let gm_err = gm_error(&err);
    assert!(gm_err.is_deployment_error());
    assert!(matches!(
        gm_err,
        GmClientError::ProgramNotDeployed { program_id, .. } if *program_id == artifacts.program_id
    ));
    assert!(ledger.transactions().is_empty());
}

#[tokio::test]
async fn unbuilt_program_is_reported_as_not_built() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(false).unwrap();

    let err = pipeline::run(&ledger, Keypair::new(), &settings(&artifacts))
        .await
        .unwrap_err();

    assert!(matches!(
        gm_error(&err),
        GmClientError::ProgramNotBuilt { .. }
    ));
    assert!(ledger.transactions().is_empty());
}

#[tokio::test]
async fn non_executable_program_account_is_rejected() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(true).unwrap();
    ledger.fund(&artifacts.program_id, 1_000_000);

    let err = pipeline::run(&ledger, Keypair::new(), &settings(&artifacts))
        .await
        .unwrap_err();

    assert!(matches!(
        gm_error(&err),
        GmClientError::ProgramNotExecutable { .. }
    ));
    assert!(ledger.transactions().is_empty());
}

#[tokio::test]
async fn missing_greeting_account_is_not_found() {
    let ledger = InMemoryLedger::new();
    let target = GreetingTarget {
        program_id: Pubkey::new_unique(),
        greeting_pubkey: Pubkey::new_unique(),
    };

    let err = report_greeting(&ledger, &target).await.unwrap_err();

    assert!(matches!(
        gm_error(&err),
        GmClientError::GreetingAccountNotFound(address) if *address == target.greeting_pubkey
    ));
}

#[tokio::test]
async fn report_rejects_garbage_account_data() {
    let ledger = InMemoryLedger::new();
    let target = GreetingTarget {
        program_id: Pubkey::new_unique(),
        greeting_pubkey: Pubkey::new_unique(),
    };
    let mut account = solana_account::Account::new(1, 2, &target.program_id);
    account.data = vec![0xff, 0xff];
    ledger.set_account(target.greeting_pubkey, account);

    let err = report_greeting(&ledger, &target).await.unwrap_err();

    assert!(matches!(
        gm_error(&err),
        GmClientError::InvalidGreetingData { .. }
    ));
}

#[tokio::test]
async fn funded_payer_gets_no_airdrop() {
    let ledger = InMemoryLedger::new();
    let payer = Pubkey::new_unique();
    let required = required_payer_balance(&ledger, &payer, 100).await.unwrap();
    assert_eq!(
        required,
        ledger.rent_exempt_minimum(*GREETING_SIZE) + 100 * ledger.lamports_per_signature()
    );
    ledger.fund(&payer, required);

    let balance = establish_payer(&ledger, &payer, 100).await.unwrap();

    assert_eq!(balance, required);
    assert!(ledger.airdrops().is_empty());
}

#[tokio::test]
async fn underfunded_payer_is_topped_up() {
    let ledger = InMemoryLedger::new();
    let payer = Pubkey::new_unique();
    let required = required_payer_balance(&ledger, &payer, 100).await.unwrap();
    ledger.fund(&payer, required - 1);

    let balance = establish_payer(&ledger, &payer, 100).await.unwrap();

    assert!(balance >= required);
    assert_eq!(ledger.airdrops(), vec![(payer, required)]);
}

#[tokio::test]
async fn signature_budget_scales_the_requirement() {
    let ledger = InMemoryLedger::new();
    let payer = Pubkey::new_unique();

    let small = required_payer_balance(&ledger, &payer, 1).await.unwrap();
    let large = required_payer_balance(&ledger, &payer, 101).await.unwrap();

    assert_eq!(large - small, 100 * ledger.lamports_per_signature());
}

#[tokio::test]
async fn dry_faucet_is_insufficient_funds() {
    let ledger = InMemoryLedger::new().with_faucet_limit(1);
    let payer = Pubkey::new_unique();

    let err = establish_payer(&ledger, &payer, 100).await.unwrap_err();

    assert!(matches!(
        gm_error(&err),
        GmClientError::InsufficientFunds { balance: 1, .. }
    ));
}

#[tokio::test]
async fn steps_must_run_in_order() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(true).unwrap();
    ledger.deploy_program(&artifacts.program_id);
    let settings = settings(&artifacts);
    let mut ctx = GreeterContext::new(&ledger, Keypair::new(), &settings);

    assert_eq!(ctx.stage(), Stage::Init);
    assert!(ctx.write().await.is_err());
    assert!(ctx.fund().await.is_err());
    assert!(ledger.transactions().is_empty());

    ctx.connect().await.unwrap();
    assert_eq!(ctx.stage(), Stage::Connected);
    ctx.fund().await.unwrap();
    assert_eq!(ctx.stage(), Stage::Funded);
    let target = ctx.prepare_account().await.unwrap();
    assert_eq!(ctx.stage(), Stage::AccountReady);
    assert_eq!(ctx.target(), Some(&target));

    // Reporting waits for the write.
    assert!(ctx.report().await.is_err());

    ctx.write().await.unwrap();
    assert_eq!(ctx.stage(), Stage::Written);
    assert_eq!(ctx.report().await.unwrap().name, GREETING_NAME);
    assert_eq!(ctx.stage(), Stage::Reported);
}

#[tokio::test]
async fn run_refuses_a_started_context() {
    let ledger = InMemoryLedger::new();
    let artifacts = TempArtifacts::new(true).unwrap();
    ledger.deploy_program(&artifacts.program_id);
    let settings = settings(&artifacts);
    let mut ctx = GreeterContext::new(&ledger, Keypair::new(), &settings);
    ctx.connect().await.unwrap();

    let err = ctx.run().await.unwrap_err();

    assert!(err.to_string().contains("INIT"));
    assert!(ledger.airdrops().is_empty());
    assert!(ledger.transactions().is_empty());
}
