//! Bank account and transaction handlers.
//!
//! ```text
//! POST /api/v1/bank-accounts {"name":"savings"}
//! GET /api/v1/bank-accounts
//! GET|PATCH|DELETE /api/v1/bank-accounts/{id}
//! POST /api/v1/bank-accounts/{id}/transactions {"transactionType":"Deposit","amount":500}
//! GET /api/v1/bank-accounts/{id}/transactions
//! GET /api/v1/bank-accounts/{id}/transactions/{txId}
//! ```
//!
//! Amounts and balances are integer minor units.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    ApplyTransactionRequest, CreateBankAccountRequest, UpdateBankAccountRequest,
};
use crate::domain::{BankAccount, BankAccountId, Transaction, TransactionId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::RequestIdentity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_path_id};

const ACCOUNT_ID: FieldName = FieldName::new("id");
const TRANSACTION_ID: FieldName = FieldName::new("txId");

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankAccountBody {
    pub name: String,
}

#[derive(Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBankAccountBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body for posting a transaction. The type is matched case-insensitively.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTransactionBody {
    pub transaction_type: String,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub balance: u64,
}

impl From<&BankAccount> for BankAccountResponse {
    fn from(account: &BankAccount) -> Self {
        Self {
            id: account.id().to_string(),
            user_id: account.owner_id().to_string(),
            name: account.name().to_string(),
            balance: account.balance().minor_units(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub bank_account_id: String,
    pub transaction_type: String,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id().to_string(),
            bank_account_id: transaction.account_id().to_string(),
            transaction_type: transaction.kind().as_str().to_owned(),
            amount: transaction.amount().minor_units(),
            created_at: transaction.created_at(),
        }
    }
}

fn account_id(raw: &str) -> ApiResult<BankAccountId> {
    parse_path_id(ACCOUNT_ID, raw)
}

#[post("/bank-accounts")]
pub async fn create_bank_account(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    payload: web::Json<CreateBankAccountBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateBankAccountRequest {
        name: payload.into_inner().name,
    };
    let account = state.accounts.create(&identity, request).await?;
    Ok(HttpResponse::Created().json(BankAccountResponse::from(&account)))
}

/// Accounts owned by the caller. Anonymous callers get an empty list.
#[get("/bank-accounts")]
pub async fn list_bank_accounts(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
) -> ApiResult<web::Json<Vec<BankAccountResponse>>> {
    let accounts = state.accounts.list_mine(&identity).await?;
    Ok(web::Json(
        accounts.iter().map(BankAccountResponse::from).collect(),
    ))
}

#[get("/bank-accounts/{id}")]
pub async fn get_bank_account(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<BankAccountResponse>> {
    let id = account_id(&path)?;
    let account = state.accounts.get(&identity, &id).await?;
    Ok(web::Json(BankAccountResponse::from(&account)))
}

#[patch("/bank-accounts/{id}")]
pub async fn update_bank_account(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateBankAccountBody>,
) -> ApiResult<web::Json<BankAccountResponse>> {
    let id = account_id(&path)?;
    let request = UpdateBankAccountRequest {
        name: payload.into_inner().name,
    };
    let account = state.accounts.update(&identity, &id, request).await?;
    Ok(web::Json(BankAccountResponse::from(&account)))
}

/// Remove an account and its transaction history.
#[delete("/bank-accounts/{id}")]
pub async fn delete_bank_account(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = account_id(&path)?;
    state.accounts.delete(&identity, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/bank-accounts/{id}/transactions")]
pub async fn apply_transaction(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
    payload: web::Json<ApplyTransactionBody>,
) -> ApiResult<HttpResponse> {
    let id = account_id(&path)?;
    let body = payload.into_inner();
    let request = ApplyTransactionRequest {
        kind: body.transaction_type,
        amount: body.amount,
    };
    let transaction = state
        .accounts
        .apply_transaction(&identity, &id, request)
        .await?;
    Ok(HttpResponse::Created().json(TransactionResponse::from(&transaction)))
}

#[get("/bank-accounts/{id}/transactions")]
pub async fn list_transactions(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<TransactionResponse>>> {
    let id = account_id(&path)?;
    let transactions = state.accounts.list_transactions(&identity, &id).await?;
    Ok(web::Json(
        transactions.iter().map(TransactionResponse::from).collect(),
    ))
}

#[get("/bank-accounts/{id}/transactions/{tx_id}")]
pub async fn get_transaction(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let (raw_account, raw_transaction) = path.into_inner();
    let id = account_id(&raw_account)?;
    let transaction_id: TransactionId = parse_path_id(TRANSACTION_ID, &raw_transaction)?;
    let transaction = state
        .accounts
        .get_transaction(&identity, &id, &transaction_id)
        .await?;
    Ok(web::Json(TransactionResponse::from(&transaction)))
}
