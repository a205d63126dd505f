//! Shared fixture: an in-memory branch with the usual directory rows.

#![allow(dead_code)]

use chrono::NaiveDate;
use loomledger_core::ledger::PersonType;
use loomledger_db::migration::{Migrator, MigratorTrait};
use loomledger_db::repositories::{DirectoryRepository, LinkedAccountKind};
use loomledger_shared::config::DatabaseConfig;
use loomledger_shared::types::{AccountTypeId, BranchId, PersonId, UserId};
use loomledger_shared::{RequestContext, Role};
use sea_orm::DatabaseConnection;

/// A migrated single-connection sqlite database with one configured branch.
pub struct TestBranch {
    pub db: DatabaseConnection,
    pub ctx: RequestContext,
    pub cash: AccountTypeId,
    pub cheque_account: AccountTypeId,
    pub customer: PersonId,
    pub second_customer: PersonId,
    pub supplier: PersonId,
}

impl TestBranch {
    /// Same database and branch, acting with another role.
    pub fn as_role(&self, role: Role) -> RequestContext {
        RequestContext::new(self.ctx.branch_id, self.ctx.user_id, role)
    }

    /// Same database, a different branch.
    pub fn other_branch(&self) -> RequestContext {
        RequestContext::new(BranchId::new(), UserId::new(), Role::Admin)
    }
}

pub async fn connect() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = loomledger_db::connect(&config)
        .await
        .expect("Failed to open sqlite");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

pub async fn setup() -> TestBranch {
    let db = connect().await;
    let ctx = RequestContext::new(BranchId::new(), UserId::new(), Role::Admin);
    let directory = DirectoryRepository::new(db.clone());

    let cash = directory.create_account_type(&ctx, "Cash").await.unwrap();
    let cheque_account = directory
        .create_account_type(&ctx, "Cheques in hand")
        .await
        .unwrap();
    directory
        .set_linked_account(&ctx, LinkedAccountKind::ChequeAccount, cheque_account.id.into())
        .await
        .unwrap();

    let customer = directory
        .create_person(&ctx, "Aslam Traders", PersonType::Customer)
        .await
        .unwrap();
    let second_customer = directory
        .create_person(&ctx, "Noor Fabrics", PersonType::Customer)
        .await
        .unwrap();
    let supplier = directory
        .create_person(&ctx, "Faisal Yarn Mills", PersonType::Supplier)
        .await
        .unwrap();

    TestBranch {
        db,
        ctx,
        cash: cash.id.into(),
        cheque_account: cheque_account.id.into(),
        customer: customer.id.into(),
        second_customer: second_customer.id.into(),
        supplier: supplier.id.into(),
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}
