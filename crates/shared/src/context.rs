//! Explicit request context and the compile-time permission model.
//!
//! Every core operation receives a [`RequestContext`] instead of reading the
//! branch or role from ambient state. Permissions are a closed enum and each
//! [`Role`] maps to a static slice of them, so checking access is a plain
//! membership test.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;
use crate::types::{BranchId, UserId};

/// Operation tags that can be granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read ledger rows and balances.
    ViewLedger,
    /// Post manual ledger rows and payments.
    PostLedger,
    /// Issue, transfer and record history on external cheques.
    ManageExternalCheques,
    /// Issue and move personal cheques through their lifecycle.
    ManagePersonalCheques,
    /// Post, update and delete finished-goods transactions.
    PostTransactions,
    /// Adjust opening stock.
    ManageStock,
    /// Create raw lots, debits, transfers and dye issues.
    ManageRawLots,
    /// Read raw stock positions.
    ViewRawStock,
    /// Read balance sheet and income statement.
    ViewReports,
    /// Maintain persons, account types, raw products, linked accounts, assets and expenses.
    ManageDirectory,
    /// Delete source documents (cascades ledger rows).
    DeleteDocuments,
}

/// Role of the acting user within a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access within the branch.
    Admin,
    /// Money side: ledger, cheques, transactions, reports.
    Accountant,
    /// Stock side: raw lots and stock.
    Storekeeper,
    /// Read-only.
    Viewer,
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewLedger,
    Permission::PostLedger,
    Permission::ManageExternalCheques,
    Permission::ManagePersonalCheques,
    Permission::PostTransactions,
    Permission::ManageStock,
    Permission::ManageRawLots,
    Permission::ViewRawStock,
    Permission::ViewReports,
    Permission::ManageDirectory,
    Permission::DeleteDocuments,
];

const ACCOUNTANT_PERMISSIONS: &[Permission] = &[
    Permission::ViewLedger,
    Permission::PostLedger,
    Permission::ManageExternalCheques,
    Permission::ManagePersonalCheques,
    Permission::PostTransactions,
    Permission::ViewRawStock,
    Permission::ViewReports,
];

const STOREKEEPER_PERMISSIONS: &[Permission] = &[
    Permission::ManageStock,
    Permission::ManageRawLots,
    Permission::ViewRawStock,
];

const VIEWER_PERMISSIONS: &[Permission] = &[
    Permission::ViewLedger,
    Permission::ViewRawStock,
    Permission::ViewReports,
];

impl Role {
    /// Returns the permissions granted to this role.
    #[must_use]
    pub const fn permissions(self) -> &'static [Permission] {
        match self {
            Self::Admin => ADMIN_PERMISSIONS,
            Self::Accountant => ACCOUNTANT_PERMISSIONS,
            Self::Storekeeper => STOREKEEPER_PERMISSIONS,
            Self::Viewer => VIEWER_PERMISSIONS,
        }
    }

    /// Returns true if the role holds the permission.
    #[must_use]
    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Accountant => "accountant",
            Self::Storekeeper => "storekeeper",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is acting, and in which branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Branch every read and write is scoped to.
    pub branch_id: BranchId,
    /// Acting user.
    pub user_id: UserId,
    /// Role of the acting user in the branch.
    pub role: Role,
}

impl RequestContext {
    /// Creates a new request context.
    #[must_use]
    pub const fn new(branch_id: BranchId, user_id: UserId, role: Role) -> Self {
        Self {
            branch_id,
            user_id,
            role,
        }
    }

    /// Fails with [`AppError::Forbidden`] unless the role holds `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.role.allows(permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "role {} lacks permission {permission:?}",
                self.role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_admin_holds_every_permission() {
        for permission in ADMIN_PERMISSIONS {
            assert!(Role::Admin.allows(*permission));
        }
        assert!(Role::Admin.allows(Permission::DeleteDocuments));
    }

    #[rstest]
    #[case(Role::Accountant, Permission::ManageExternalCheques, true)]
    #[case(Role::Accountant, Permission::ManageRawLots, false)]
    #[case(Role::Storekeeper, Permission::ManageRawLots, true)]
    #[case(Role::Storekeeper, Permission::PostLedger, false)]
    #[case(Role::Viewer, Permission::ViewReports, true)]
    #[case(Role::Viewer, Permission::PostTransactions, false)]
    fn test_role_permission_matrix(
        #[case] role: Role,
        #[case] permission: Permission,
        #[case] expected: bool,
    ) {
        assert_eq!(role.allows(permission), expected);
    }

    #[test]
    fn test_require_reports_forbidden() {
        let ctx = RequestContext::new(BranchId::new(), UserId::new(), Role::Viewer);
        assert!(ctx.require(Permission::ViewLedger).is_ok());
        let err = ctx.require(Permission::PostLedger).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(err.to_string().contains("viewer"));
    }
}
