//! Initial database migration.
//!
//! Creates the directory, ledger, cheque, payment, finished-goods and raw lot
//! tables. Written with the schema builder so the same migration runs on
//! PostgreSQL and on the SQLite database used by the integration tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().primary_key().to_owned()
}

fn uuid<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().to_owned()
}

fn uuid_null<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().null().to_owned()
}

fn decimal<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).decimal_len(16, 4).not_null().to_owned()
}

fn date<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).date().not_null().to_owned()
}

fn serial<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().to_owned()
}

fn label<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string_len(32).not_null().to_owned()
}

fn text<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string_len(255).not_null().to_owned()
}

fn text_null<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string_len(255).null().to_owned()
}

fn flag<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).boolean().not_null().default(false).to_owned()
}

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: DIRECTORY AND BRANCH SETTINGS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Persons::Table)
                    .if_not_exists()
                    .col(id(Persons::Id))
                    .col(uuid(Persons::BranchId))
                    .col(text(Persons::Name))
                    .col(label(Persons::PersonType))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountTypes::Table)
                    .if_not_exists()
                    .col(id(AccountTypes::Id))
                    .col(uuid(AccountTypes::BranchId))
                    .col(text(AccountTypes::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RawProducts::Table)
                    .if_not_exists()
                    .col(id(RawProducts::Id))
                    .col(uuid(RawProducts::BranchId))
                    .col(text(RawProducts::Name))
                    .col(text_null(RawProducts::ProductGlue))
                    .col(text_null(RawProducts::ProductType))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LinkedAccounts::Table)
                    .if_not_exists()
                    .col(uuid(LinkedAccounts::BranchId))
                    .col(label(LinkedAccounts::Kind))
                    .col(uuid(LinkedAccounts::AccountTypeId))
                    .primary_key(
                        Index::create()
                            .col(LinkedAccounts::BranchId)
                            .col(LinkedAccounts::Kind),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SerialCounters::Table)
                    .if_not_exists()
                    .col(uuid(SerialCounters::BranchId))
                    .col(label(SerialCounters::Kind))
                    .col(serial(SerialCounters::LastValue))
                    .primary_key(
                        Index::create()
                            .col(SerialCounters::BranchId)
                            .col(SerialCounters::Kind),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: MONEY LEDGER
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(id(LedgerEntries::Id))
                    .col(uuid(LedgerEntries::BranchId))
                    .col(date(LedgerEntries::Date))
                    .col(decimal(LedgerEntries::Amount))
                    .col(label(LedgerEntries::Nature))
                    .col(uuid(LedgerEntries::PersonId))
                    .col(uuid_null(LedgerEntries::AccountTypeId))
                    .col(uuid_null(LedgerEntries::TransactionId))
                    .col(uuid_null(LedgerEntries::ExternalChequeId))
                    .col(uuid_null(LedgerEntries::PersonalChequeId))
                    .col(uuid_null(LedgerEntries::PaymentId))
                    .col(uuid_null(LedgerEntries::RawTransactionId))
                    .col(uuid_null(LedgerEntries::RawDebitId))
                    .col(ColumnDef::new(LedgerEntries::SourceSerial).big_integer().null())
                    .col(ColumnDef::new(LedgerEntries::Detail).text().null())
                    .col(flag(LedgerEntries::Draft))
                    .col(created_at(LedgerEntries::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entries_branch_date")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::BranchId)
                    .col(LedgerEntries::Date)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: CHEQUES AND PAYMENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(ExternalCheques::Table)
                    .if_not_exists()
                    .col(id(ExternalCheques::Id))
                    .col(uuid(ExternalCheques::BranchId))
                    .col(serial(ExternalCheques::Serial))
                    .col(uuid(ExternalCheques::PersonId))
                    .col(text(ExternalCheques::Bank))
                    .col(label(ExternalCheques::ChequeNumber))
                    .col(date(ExternalCheques::Date))
                    .col(date(ExternalCheques::DueDate))
                    .col(decimal(ExternalCheques::Amount))
                    .col(label(ExternalCheques::Status))
                    .col(flag(ExternalCheques::IsPassedWithHistory))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_external_cheques_bank_number")
                    .table(ExternalCheques::Table)
                    .col(ExternalCheques::BranchId)
                    .col(ExternalCheques::Bank)
                    .col(ExternalCheques::ChequeNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalChequeHistories::Table)
                    .if_not_exists()
                    .col(id(ExternalChequeHistories::Id))
                    .col(uuid(ExternalChequeHistories::BranchId))
                    .col(uuid(ExternalChequeHistories::ParentChequeId))
                    .col(uuid(ExternalChequeHistories::ChequeId))
                    .col(uuid(ExternalChequeHistories::AccountTypeId))
                    .col(decimal(ExternalChequeHistories::Amount))
                    .col(uuid_null(ExternalChequeHistories::ReturnChequeId))
                    .col(date(ExternalChequeHistories::Date))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalChequeTransfers::Table)
                    .if_not_exists()
                    .col(id(ExternalChequeTransfers::Id))
                    .col(uuid(ExternalChequeTransfers::BranchId))
                    .col(uuid(ExternalChequeTransfers::ChequeId).unique_key())
                    .col(uuid(ExternalChequeTransfers::FromPersonId))
                    .col(uuid(ExternalChequeTransfers::ToPersonId))
                    .col(date(ExternalChequeTransfers::Date))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PersonalCheques::Table)
                    .if_not_exists()
                    .col(id(PersonalCheques::Id))
                    .col(uuid(PersonalCheques::BranchId))
                    .col(serial(PersonalCheques::Serial))
                    .col(uuid(PersonalCheques::PersonId))
                    .col(uuid(PersonalCheques::AccountTypeId))
                    .col(text(PersonalCheques::Bank))
                    .col(label(PersonalCheques::ChequeNumber))
                    .col(date(PersonalCheques::Date))
                    .col(date(PersonalCheques::DueDate))
                    .col(decimal(PersonalCheques::Amount))
                    .col(label(PersonalCheques::Status))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(id(Payments::Id))
                    .col(uuid(Payments::BranchId))
                    .col(serial(Payments::Serial))
                    .col(uuid(Payments::PersonId))
                    .col(uuid(Payments::AccountTypeId))
                    .col(label(Payments::Nature))
                    .col(decimal(Payments::Amount))
                    .col(date(Payments::Date))
                    .col(ColumnDef::new(Payments::Description).text().null())
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: FINISHED GOODS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(id(Transactions::Id))
                    .col(uuid(Transactions::BranchId))
                    .col(serial(Transactions::Serial))
                    .col(uuid(Transactions::PersonId))
                    .col(label(Transactions::Nature))
                    .col(date(Transactions::Date))
                    .col(decimal(Transactions::Discount))
                    .col(flag(Transactions::Paid))
                    .col(uuid_null(Transactions::PaidAccountId))
                    .col(decimal(Transactions::PaidAmount))
                    .col(created_at(Transactions::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionDetails::Table)
                    .if_not_exists()
                    .col(id(TransactionDetails::Id))
                    .col(uuid(TransactionDetails::TransactionId))
                    .col(uuid(TransactionDetails::ProductId))
                    .col(uuid(TransactionDetails::WarehouseId))
                    .col(decimal(TransactionDetails::YardsPerPiece))
                    .col(decimal(TransactionDetails::Quantity))
                    .col(decimal(TransactionDetails::Rate))
                    .col(decimal(TransactionDetails::Amount))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_details_transaction")
                            .from(TransactionDetails::Table, TransactionDetails::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stocks::Table)
                    .if_not_exists()
                    .col(id(Stocks::Id))
                    .col(uuid(Stocks::BranchId))
                    .col(uuid(Stocks::ProductId))
                    .col(uuid(Stocks::WarehouseId))
                    .col(decimal(Stocks::YardsPerPiece))
                    .col(decimal(Stocks::StockQuantity))
                    .col(decimal(Stocks::OpeningStock))
                    .col(decimal(Stocks::OpeningStockRate))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_stocks_key")
                    .table(Stocks::Table)
                    .col(Stocks::BranchId)
                    .col(Stocks::ProductId)
                    .col(Stocks::WarehouseId)
                    .col(Stocks::YardsPerPiece)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: RAW LOTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(RawTransactions::Table)
                    .if_not_exists()
                    .col(id(RawTransactions::Id))
                    .col(uuid(RawTransactions::BranchId))
                    .col(serial(RawTransactions::LotNumber))
                    .col(uuid(RawTransactions::PersonId))
                    .col(date(RawTransactions::Date))
                    .col(flag(RawTransactions::Issued))
                    .col(uuid_null(RawTransactions::DyingUnitId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_raw_transactions_lot")
                    .table(RawTransactions::Table)
                    .col(RawTransactions::BranchId)
                    .col(RawTransactions::LotNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RawLotDetails::Table)
                    .if_not_exists()
                    .col(id(RawLotDetails::Id))
                    .col(uuid(RawLotDetails::RawTransactionId))
                    .col(uuid(RawLotDetails::RawProductId))
                    .col(uuid_null(RawLotDetails::WarehouseId))
                    .col(decimal(RawLotDetails::ActualGazaana))
                    .col(decimal(RawLotDetails::ExpectedGazaana))
                    .col(uuid_null(RawLotDetails::FormulaId))
                    .col(decimal(RawLotDetails::Quantity))
                    .col(decimal(RawLotDetails::Rate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_raw_lot_details_raw_transaction")
                            .from(RawLotDetails::Table, RawLotDetails::RawTransactionId)
                            .to(RawTransactions::Table, RawTransactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RawDebits::Table)
                    .if_not_exists()
                    .col(id(RawDebits::Id))
                    .col(uuid(RawDebits::BranchId))
                    .col(serial(RawDebits::Serial))
                    .col(uuid(RawDebits::PersonId))
                    .col(label(RawDebits::DebitType))
                    .col(date(RawDebits::Date))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RawDebitLotDetails::Table)
                    .if_not_exists()
                    .col(id(RawDebitLotDetails::Id))
                    .col(uuid(RawDebitLotDetails::RawDebitId))
                    .col(serial(RawDebitLotDetails::LotNumber))
                    .col(uuid(RawDebitLotDetails::RawProductId))
                    .col(uuid_null(RawDebitLotDetails::WarehouseId))
                    .col(decimal(RawDebitLotDetails::ActualGazaana))
                    .col(decimal(RawDebitLotDetails::ExpectedGazaana))
                    .col(uuid_null(RawDebitLotDetails::FormulaId))
                    .col(decimal(RawDebitLotDetails::Quantity))
                    .col(decimal(RawDebitLotDetails::Rate))
                    .col(label(RawDebitLotDetails::Nature))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_raw_debit_lot_details_raw_debit")
                            .from(RawDebitLotDetails::Table, RawDebitLotDetails::RawDebitId)
                            .to(RawDebits::Table, RawDebits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RawTransfers::Table)
                    .if_not_exists()
                    .col(id(RawTransfers::Id))
                    .col(uuid(RawTransfers::BranchId))
                    .col(serial(RawTransfers::Serial))
                    .col(uuid(RawTransfers::ToWarehouseId))
                    .col(date(RawTransfers::Date))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RawTransferLotDetails::Table)
                    .if_not_exists()
                    .col(id(RawTransferLotDetails::Id))
                    .col(uuid(RawTransferLotDetails::RawTransferId))
                    .col(serial(RawTransferLotDetails::LotNumber))
                    .col(uuid(RawTransferLotDetails::RawProductId))
                    .col(uuid(RawTransferLotDetails::FromWarehouseId))
                    .col(uuid(RawTransferLotDetails::ToWarehouseId))
                    .col(decimal(RawTransferLotDetails::ActualGazaana))
                    .col(decimal(RawTransferLotDetails::ExpectedGazaana))
                    .col(uuid_null(RawTransferLotDetails::FormulaId))
                    .col(decimal(RawTransferLotDetails::Quantity))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_raw_transfer_lot_details_raw_transfer")
                            .from(RawTransferLotDetails::Table, RawTransferLotDetails::RawTransferId)
                            .to(RawTransfers::Table, RawTransfers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DyingIssues::Table)
                    .if_not_exists()
                    .col(id(DyingIssues::Id))
                    .col(uuid(DyingIssues::BranchId))
                    .col(serial(DyingIssues::Serial))
                    .col(uuid(DyingIssues::DyingUnitId))
                    .col(date(DyingIssues::Date))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DyingIssueDetails::Table)
                    .if_not_exists()
                    .col(id(DyingIssueDetails::Id))
                    .col(uuid(DyingIssueDetails::DyingIssueId))
                    .col(serial(DyingIssueDetails::LotNumber))
                    .col(uuid(DyingIssueDetails::RawProductId))
                    .col(uuid_null(DyingIssueDetails::WarehouseId))
                    .col(decimal(DyingIssueDetails::ActualGazaana))
                    .col(decimal(DyingIssueDetails::ExpectedGazaana))
                    .col(uuid_null(DyingIssueDetails::FormulaId))
                    .col(decimal(DyingIssueDetails::Quantity))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dying_issue_details_dying_issue")
                            .from(DyingIssueDetails::Table, DyingIssueDetails::DyingIssueId)
                            .to(DyingIssues::Table, DyingIssues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 6: REPORT COLLABORATORS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(id(Expenses::Id))
                    .col(uuid(Expenses::BranchId))
                    .col(uuid(Expenses::AccountTypeId))
                    .col(decimal(Expenses::Amount))
                    .col(date(Expenses::Date))
                    .col(text(Expenses::Category))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(id(Assets::Id))
                    .col(uuid(Assets::BranchId))
                    .col(text(Assets::Name))
                    .col(decimal(Assets::Value))
                    .col(date(Assets::Date))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables: [DynIden; 24] = [
            Assets::Table.into_iden(),
            Expenses::Table.into_iden(),
            DyingIssueDetails::Table.into_iden(),
            DyingIssues::Table.into_iden(),
            RawTransferLotDetails::Table.into_iden(),
            RawTransfers::Table.into_iden(),
            RawDebitLotDetails::Table.into_iden(),
            RawDebits::Table.into_iden(),
            RawLotDetails::Table.into_iden(),
            RawTransactions::Table.into_iden(),
            Stocks::Table.into_iden(),
            TransactionDetails::Table.into_iden(),
            Transactions::Table.into_iden(),
            Payments::Table.into_iden(),
            PersonalCheques::Table.into_iden(),
            ExternalChequeTransfers::Table.into_iden(),
            ExternalChequeHistories::Table.into_iden(),
            ExternalCheques::Table.into_iden(),
            LedgerEntries::Table.into_iden(),
            SerialCounters::Table.into_iden(),
            LinkedAccounts::Table.into_iden(),
            RawProducts::Table.into_iden(),
            AccountTypes::Table.into_iden(),
            Persons::Table.into_iden(),
        ];
        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
    BranchId,
    Name,
    PersonType,
}

#[derive(DeriveIden)]
enum AccountTypes {
    Table,
    Id,
    BranchId,
    Name,
}

#[derive(DeriveIden)]
enum RawProducts {
    Table,
    Id,
    BranchId,
    Name,
    ProductGlue,
    ProductType,
}

#[derive(DeriveIden)]
enum LinkedAccounts {
    Table,
    BranchId,
    Kind,
    AccountTypeId,
}

#[derive(DeriveIden)]
enum SerialCounters {
    Table,
    BranchId,
    Kind,
    LastValue,
}

#[derive(DeriveIden)]
enum LedgerEntries {
    Table,
    Id,
    BranchId,
    Date,
    Amount,
    Nature,
    PersonId,
    AccountTypeId,
    TransactionId,
    ExternalChequeId,
    PersonalChequeId,
    PaymentId,
    RawTransactionId,
    RawDebitId,
    SourceSerial,
    Detail,
    Draft,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExternalCheques {
    Table,
    Id,
    BranchId,
    Serial,
    PersonId,
    Bank,
    ChequeNumber,
    Date,
    DueDate,
    Amount,
    Status,
    IsPassedWithHistory,
}

#[derive(DeriveIden)]
enum ExternalChequeHistories {
    Table,
    Id,
    BranchId,
    ParentChequeId,
    ChequeId,
    AccountTypeId,
    Amount,
    ReturnChequeId,
    Date,
}

#[derive(DeriveIden)]
enum ExternalChequeTransfers {
    Table,
    Id,
    BranchId,
    ChequeId,
    FromPersonId,
    ToPersonId,
    Date,
}

#[derive(DeriveIden)]
enum PersonalCheques {
    Table,
    Id,
    BranchId,
    Serial,
    PersonId,
    AccountTypeId,
    Bank,
    ChequeNumber,
    Date,
    DueDate,
    Amount,
    Status,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    BranchId,
    Serial,
    PersonId,
    AccountTypeId,
    Nature,
    Amount,
    Date,
    Description,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    BranchId,
    Serial,
    PersonId,
    Nature,
    Date,
    Discount,
    Paid,
    PaidAccountId,
    PaidAmount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TransactionDetails {
    Table,
    Id,
    TransactionId,
    ProductId,
    WarehouseId,
    YardsPerPiece,
    Quantity,
    Rate,
    Amount,
}

#[derive(DeriveIden)]
enum Stocks {
    Table,
    Id,
    BranchId,
    ProductId,
    WarehouseId,
    YardsPerPiece,
    StockQuantity,
    OpeningStock,
    OpeningStockRate,
}

#[derive(DeriveIden)]
enum RawTransactions {
    Table,
    Id,
    BranchId,
    LotNumber,
    PersonId,
    Date,
    Issued,
    DyingUnitId,
}

#[derive(DeriveIden)]
enum RawLotDetails {
    Table,
    Id,
    RawTransactionId,
    RawProductId,
    WarehouseId,
    ActualGazaana,
    ExpectedGazaana,
    FormulaId,
    Quantity,
    Rate,
}

#[derive(DeriveIden)]
enum RawDebits {
    Table,
    Id,
    BranchId,
    Serial,
    PersonId,
    DebitType,
    Date,
}

#[derive(DeriveIden)]
enum RawDebitLotDetails {
    Table,
    Id,
    RawDebitId,
    LotNumber,
    RawProductId,
    WarehouseId,
    ActualGazaana,
    ExpectedGazaana,
    FormulaId,
    Quantity,
    Rate,
    Nature,
}

#[derive(DeriveIden)]
enum RawTransfers {
    Table,
    Id,
    BranchId,
    Serial,
    ToWarehouseId,
    Date,
}

#[derive(DeriveIden)]
enum RawTransferLotDetails {
    Table,
    Id,
    RawTransferId,
    LotNumber,
    RawProductId,
    FromWarehouseId,
    ToWarehouseId,
    ActualGazaana,
    ExpectedGazaana,
    FormulaId,
    Quantity,
}

#[derive(DeriveIden)]
enum DyingIssues {
    Table,
    Id,
    BranchId,
    Serial,
    DyingUnitId,
    Date,
}

#[derive(DeriveIden)]
enum DyingIssueDetails {
    Table,
    Id,
    DyingIssueId,
    LotNumber,
    RawProductId,
    WarehouseId,
    ActualGazaana,
    ExpectedGazaana,
    FormulaId,
    Quantity,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    BranchId,
    AccountTypeId,
    Amount,
    Date,
    Category,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
    BranchId,
    Name,
    Value,
    Date,
}
