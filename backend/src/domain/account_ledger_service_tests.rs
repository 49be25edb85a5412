//! Tests for the account ledger service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    CreateUserRequest, FixedIdentity, MockBankAccountRepository, UpdateUserRequest,
};
use crate::domain::{Balance, ErrorCode, ErrorReason, PasswordHash, User, UserName};

struct FixtureClock;

impl FixtureClock {
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp")
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        Self::now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Self::now()
    }
}

/// Directory that knows exactly one user.
struct SingleUserDirectory(User);

#[async_trait]
impl UserDirectory for SingleUserDirectory {
    async fn create(&self, _request: CreateUserRequest) -> Result<User, Error> {
        Err(Error::internal("not used"))
    }

    async fn get_self(&self, identity: &dyn IdentitySource, id: &UserId) -> Result<User, Error> {
        match identity.current_user_id() {
            Some(actor) if actor == *id && actor == *self.0.id() => Ok(self.0.clone()),
            Some(actor) if actor == *id => Err(Error::user_not_found(id)),
            actor => Err(Error::user_unauthorized(actor.as_ref())),
        }
    }

    async fn update_self(
        &self,
        _identity: &dyn IdentitySource,
        _id: &UserId,
        _request: UpdateUserRequest,
    ) -> Result<User, Error> {
        Err(Error::internal("not used"))
    }

    async fn delete_self(&self, _identity: &dyn IdentitySource, _id: &UserId) -> Result<(), Error> {
        Err(Error::internal("not used"))
    }
}

#[fixture]
fn owner() -> User {
    User::new(
        UserId::random(),
        UserName::new("alice").expect("name"),
        PasswordHash::new("hash"),
    )
}

fn make_service(
    repo: MockBankAccountRepository,
    owner: &User,
) -> AccountLedgerService<MockBankAccountRepository> {
    AccountLedgerService::new(
        Arc::new(repo),
        Arc::new(SingleUserDirectory(owner.clone())),
        Arc::new(FixtureClock),
    )
}

fn account_for(owner: &User, balance: u64, revision: u32) -> BankAccount {
    BankAccount::from_parts(
        BankAccountId::random(),
        *owner.id(),
        AccountName::new("Savings").expect("name"),
        Balance::from_minor_units(balance),
        revision,
    )
}

fn ledger(account: BankAccount) -> AccountLedgerSnapshot {
    AccountLedgerSnapshot {
        account,
        transactions: Vec::new(),
    }
}

fn deposit(amount: i64) -> ApplyTransactionRequest {
    ApplyTransactionRequest {
        kind: "Deposit".to_owned(),
        amount,
    }
}

fn withdrawal(amount: i64) -> ApplyTransactionRequest {
    ApplyTransactionRequest {
        kind: "withdrawal".to_owned(),
        amount,
    }
}

#[rstest]
#[tokio::test]
async fn create_opens_empty_account_for_caller(owner: User) {
    let owner_id = *owner.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_insert()
        .withf(move |account| {
            account.owner_id() == &owner_id
                && account.balance() == Balance::ZERO
                && account.revision() == 1
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(repo, &owner);
    let account = service
        .create(
            &FixedIdentity::user(owner_id),
            CreateBankAccountRequest {
                name: " Savings ".to_owned(),
            },
        )
        .await
        .expect("account opened");
    assert_eq!(account.name().as_ref(), "Savings");
}

#[rstest]
#[tokio::test]
async fn create_propagates_directory_failure(owner: User) {
    let mut repo = MockBankAccountRepository::new();
    repo.expect_insert().never();
    let service = make_service(repo, &owner);

    let stranger = UserId::random();
    let err = service
        .create(
            &FixedIdentity::user(stranger),
            CreateBankAccountRequest {
                name: "Savings".to_owned(),
            },
        )
        .await
        .expect_err("unknown caller");
    assert_eq!(err, Error::user_not_found(&stranger));

    let err = service
        .create(
            &FixedIdentity::anonymous(),
            CreateBankAccountRequest {
                name: "Savings".to_owned(),
            },
        )
        .await
        .expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn list_mine_is_empty_for_anonymous(owner: User) {
    let mut repo = MockBankAccountRepository::new();
    repo.expect_list_for_owner().never();
    let service = make_service(repo, &owner);

    let accounts = service
        .list_mine(&FixedIdentity::anonymous())
        .await
        .expect("empty list");
    assert!(accounts.is_empty());
}

#[rstest]
#[tokio::test]
async fn get_reports_missing_before_ownership(owner: User) {
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(repo, &owner);

    let err = service
        .get(&FixedIdentity::anonymous(), &BankAccountId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.reason(), Some(ErrorReason::BankAccountNotFound));
}

#[rstest]
#[tokio::test]
async fn get_rejects_other_users(owner: User) {
    let account = account_for(&owner, 0, 1);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(account)));
    let service = make_service(repo, &owner);

    let err = service
        .get(&FixedIdentity::user(UserId::random()), &id)
        .await
        .expect_err("foreign account");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn update_renames_with_revision_check(owner: User) {
    let account = account_for(&owner, 10, 4);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(account)));
    repo.expect_update()
        .withf(|account, expected| {
            *expected == 4 && account.revision() == 5 && account.name().as_ref() == "Holiday"
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    let service = make_service(repo, &owner);

    let updated = service
        .update(
            &FixedIdentity::user(*owner.id()),
            &id,
            UpdateBankAccountRequest {
                name: Some("Holiday".to_owned()),
            },
        )
        .await
        .expect("renamed");
    assert_eq!(updated.balance().minor_units(), 10);
}

#[rstest]
#[tokio::test]
async fn update_by_stranger_leaves_account_untouched(owner: User) {
    let account = account_for(&owner, 10, 1);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(account)));
    repo.expect_update().never();
    let service = make_service(repo, &owner);

    let err = service
        .update(
            &FixedIdentity::user(UserId::random()),
            &id,
            UpdateBankAccountRequest {
                name: Some("Mine now".to_owned()),
            },
        )
        .await
        .expect_err("not owner");
    assert_eq!(err.reason(), Some(ErrorReason::UserUnauthorized));
}

#[rstest]
#[tokio::test]
async fn delete_passes_loaded_revision(owner: User) {
    let account = account_for(&owner, 0, 7);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(account)));
    repo.expect_delete()
        .withf(move |target, expected| *target == id && *expected == 7)
        .times(1)
        .return_once(|_, _| Ok(()));
    let service = make_service(repo, &owner);

    service
        .delete(&FixedIdentity::user(*owner.id()), &id)
        .await
        .expect("deleted");
}

#[rstest]
#[tokio::test]
async fn deposit_commits_transaction_and_balance(owner: User) {
    let account = account_for(&owner, 100, 2);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_with_transactions()
        .return_once(move |_| Ok(Some(ledger(account))));
    repo.expect_commit_transaction()
        .withf(|account, transaction, expected| {
            *expected == 2
                && account.revision() == 3
                && account.balance().minor_units() == 150
                && transaction.amount().minor_units() == 50
                && transaction.kind() == TransactionKind::Deposit
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));
    let service = make_service(repo, &owner);

    let transaction = service
        .apply_transaction(&FixedIdentity::user(*owner.id()), &id, deposit(50))
        .await
        .expect("deposit");
    assert_eq!(transaction.account_id(), &id);
    assert_eq!(transaction.created_at(), FixtureClock::now());
}

#[rstest]
#[tokio::test]
async fn overdraft_commits_nothing(owner: User) {
    let account = account_for(&owner, 100, 1);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_with_transactions()
        .return_once(move |_| Ok(Some(ledger(account))));
    repo.expect_commit_transaction().never();
    let service = make_service(repo, &owner);

    let err = service
        .apply_transaction(&FixedIdentity::user(*owner.id()), &id, withdrawal(150))
        .await
        .expect_err("overdraft");
    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(err.reason(), Some(ErrorReason::InsufficientFunds));
}

#[rstest]
#[case(ApplyTransactionRequest { kind: "transfer".to_owned(), amount: 5 }, ErrorReason::InvalidTransactionType)]
#[case(deposit(0), ErrorReason::InvalidAmount)]
#[case(withdrawal(-5), ErrorReason::InvalidAmount)]
#[tokio::test]
async fn malformed_transactions_are_rejected(
    owner: User,
    #[case] request: ApplyTransactionRequest,
    #[case] reason: ErrorReason,
) {
    let account = account_for(&owner, 100, 1);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_with_transactions()
        .return_once(move |_| Ok(Some(ledger(account))));
    repo.expect_commit_transaction().never();
    let service = make_service(repo, &owner);

    let err = service
        .apply_transaction(&FixedIdentity::user(*owner.id()), &id, request)
        .await
        .expect_err("malformed");
    assert_eq!(err.reason(), Some(reason));
}

#[rstest]
#[tokio::test]
async fn ownership_is_checked_before_transaction_validation(owner: User) {
    let account = account_for(&owner, 100, 1);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_with_transactions()
        .return_once(move |_| Ok(Some(ledger(account))));
    let service = make_service(repo, &owner);

    let request = ApplyTransactionRequest {
        kind: "bogus".to_owned(),
        amount: -1,
    };
    let err = service
        .apply_transaction(&FixedIdentity::user(UserId::random()), &id, request)
        .await
        .expect_err("stranger");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn stale_revision_surfaces_conflict(owner: User) {
    let account = account_for(&owner, 100, 1);
    let id = *account.id();
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_with_transactions()
        .return_once(move |_| Ok(Some(ledger(account))));
    repo.expect_commit_transaction()
        .return_once(|_, _, _| Err(BankAccountRepositoryError::revision_mismatch(1_u32, 2_u32)));
    let service = make_service(repo, &owner);

    let err = service
        .apply_transaction(&FixedIdentity::user(*owner.id()), &id, deposit(1))
        .await
        .expect_err("stale");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.reason(), Some(ErrorReason::WriteConflict));
}

#[rstest]
#[tokio::test]
async fn get_transaction_reports_unknown_id(owner: User) {
    let mut account = account_for(&owner, 0, 1);
    account
        .post(
            TransactionKind::Deposit,
            Amount::try_from_minor_units(5).expect("amount"),
        )
        .expect("post");
    let id = *account.id();
    let recorded = Transaction::record(
        id,
        TransactionKind::Deposit,
        Amount::try_from_minor_units(5).expect("amount"),
        &FixtureClock,
    );
    let known = *recorded.id();
    let snapshot = AccountLedgerSnapshot {
        account,
        transactions: vec![recorded],
    };
    let mut repo = MockBankAccountRepository::new();
    repo.expect_find_with_transactions()
        .times(2)
        .returning(move |_| Ok(Some(snapshot.clone())));
    let service = make_service(repo, &owner);
    let identity = FixedIdentity::user(*owner.id());

    let found = service
        .get_transaction(&identity, &id, &known)
        .await
        .expect("known transaction");
    assert_eq!(found.id(), &known);

    let err = service
        .get_transaction(&identity, &id, &TransactionId::random())
        .await
        .expect_err("unknown transaction");
    assert_eq!(err.reason(), Some(ErrorReason::TransactionNotFound));
}
