//! Directory repository: the lookup rows the posting modules depend on.
//!
//! Products, warehouses, formulas and dyeing units live elsewhere and are
//! referenced by id only.

use chrono::NaiveDate;
use loomledger_core::ledger::{LedgerError, PersonType};
use loomledger_shared::types::{AccountTypeId, AssetId, ExpenseId, PersonId, RawProductId};
use loomledger_shared::{Permission, RequestContext};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::info;

use super::common::{authorize, linked_account, require_account_type, require_person};
use crate::entities::{account_types, assets, expenses, linked_accounts, persons, raw_products};
use crate::error::RepoError;

/// Branch-level roles an account type can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedAccountKind {
    /// Clearing account for cheques in transit.
    ChequeAccount,
}

impl LinkedAccountKind {
    /// Key stored in `linked_accounts.kind`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChequeAccount => "cheque_account",
        }
    }
}

/// Input for creating a raw product.
#[derive(Debug, Clone)]
pub struct CreateRawProductInput {
    /// Display name.
    pub name: String,
    /// Glue grade, shown in raw stock positions.
    pub product_glue: Option<String>,
    /// Product type, shown in raw stock positions.
    pub product_type: Option<String>,
}

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct RecordExpenseInput {
    /// Account the expense was paid from.
    pub account_type_id: AccountTypeId,
    /// Amount paid.
    pub amount: Decimal,
    /// Date paid.
    pub date: NaiveDate,
    /// Free-text category.
    pub category: String,
}

/// Directory repository.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    db: DatabaseConnection,
}

impl DirectoryRepository {
    /// Creates a new directory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer or supplier.
    pub async fn create_person(
        &self,
        ctx: &RequestContext,
        name: &str,
        person_type: PersonType,
    ) -> Result<persons::Model, RepoError> {
        authorize(ctx, Permission::ManageDirectory)?;
        let person = persons::ActiveModel {
            id: Set(PersonId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            name: Set(name.to_string()),
            person_type: Set(person_type.into()),
        }
        .insert(&self.db)
        .await?;
        info!(branch = %ctx.branch_id, person = %person.id, %person_type, "person created");
        Ok(person)
    }

    /// Loads a person of the caller's branch.
    pub async fn get_person(
        &self,
        ctx: &RequestContext,
        person_id: PersonId,
    ) -> Result<persons::Model, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        require_person(&self.db, ctx.branch_id, person_id).await
    }

    /// Creates an account type (cash, bank, cheque account...).
    pub async fn create_account_type(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<account_types::Model, RepoError> {
        authorize(ctx, Permission::ManageDirectory)?;
        let account = account_types::ActiveModel {
            id: Set(AccountTypeId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            name: Set(name.to_string()),
        }
        .insert(&self.db)
        .await?;
        Ok(account)
    }

    /// Creates a raw product.
    pub async fn create_raw_product(
        &self,
        ctx: &RequestContext,
        input: CreateRawProductInput,
    ) -> Result<raw_products::Model, RepoError> {
        authorize(ctx, Permission::ManageDirectory)?;
        let product = raw_products::ActiveModel {
            id: Set(RawProductId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            name: Set(input.name),
            product_glue: Set(input.product_glue),
            product_type: Set(input.product_type),
        }
        .insert(&self.db)
        .await?;
        Ok(product)
    }

    /// Links an account type to a branch-level role, replacing any previous link.
    pub async fn set_linked_account(
        &self,
        ctx: &RequestContext,
        kind: LinkedAccountKind,
        account_type_id: AccountTypeId,
    ) -> Result<(), RepoError> {
        authorize(ctx, Permission::ManageDirectory)?;

        let txn = self.db.begin().await?;
        require_account_type(&txn, ctx.branch_id, account_type_id).await?;
        linked_accounts::Entity::insert(linked_accounts::ActiveModel {
            branch_id: Set(ctx.branch_id.into_inner()),
            kind: Set(kind.as_str().to_string()),
            account_type_id: Set(account_type_id.into_inner()),
        })
        .on_conflict(
            OnConflict::columns([linked_accounts::Column::BranchId, linked_accounts::Column::Kind])
                .update_column(linked_accounts::Column::AccountTypeId)
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;
        txn.commit().await?;

        info!(branch = %ctx.branch_id, kind = kind.as_str(), account = %account_type_id, "account linked");
        Ok(())
    }

    /// Account type linked to `kind`, if configured.
    pub async fn linked_account(
        &self,
        ctx: &RequestContext,
        kind: LinkedAccountKind,
    ) -> Result<Option<AccountTypeId>, RepoError> {
        authorize(ctx, Permission::ViewLedger)?;
        linked_account(&self.db, ctx.branch_id, kind).await
    }

    /// Records an expense paid from an account.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotFound`] if the account type is not in the branch
    /// - [`LedgerError::NegativeAmount`] for a negative amount
    pub async fn record_expense(
        &self,
        ctx: &RequestContext,
        input: RecordExpenseInput,
    ) -> Result<expenses::Model, RepoError> {
        authorize(ctx, Permission::ManageDirectory)?;
        if input.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount.into());
        }

        let txn = self.db.begin().await?;
        require_account_type(&txn, ctx.branch_id, input.account_type_id).await?;
        let expense = expenses::ActiveModel {
            id: Set(ExpenseId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            account_type_id: Set(input.account_type_id.into_inner()),
            amount: Set(input.amount),
            date: Set(input.date),
            category: Set(input.category),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        Ok(expense)
    }

    /// Records a fixed asset at its value on `date`.
    pub async fn record_asset(
        &self,
        ctx: &RequestContext,
        name: &str,
        value: Decimal,
        date: NaiveDate,
    ) -> Result<assets::Model, RepoError> {
        authorize(ctx, Permission::ManageDirectory)?;
        if value < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount.into());
        }
        let asset = assets::ActiveModel {
            id: Set(AssetId::new().into_inner()),
            branch_id: Set(ctx.branch_id.into_inner()),
            name: Set(name.to_string()),
            value: Set(value),
            date: Set(date),
        }
        .insert(&self.db)
        .await?;
        Ok(asset)
    }
}
